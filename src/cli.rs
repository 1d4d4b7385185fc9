use crate::config::{self, CliOverrides, Config, IndexMode, RunConfig};
use crate::error::{Result, SamplerError};
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Flags shared by both extractors.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for messages and the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write a sample configuration file to the given path and exit
    #[arg(long, value_name = "FILE")]
    pub generate_config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "sample-points-partial")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy the first N points of a CSV dataset with a fresh index column")]
#[command(after_help = "EXAMPLES:\n  \
    sample-points-partial points.csv 1000 first_1000.csv\n  \
    sample-points-partial points.csv 50 head.csv --output-format json")]
#[command(arg_required_else_help = true)]
pub struct PartialCli {
    /// Input CSV file (no header)
    #[arg(required_unless_present = "generate_config")]
    pub input: Option<PathBuf>,

    /// Maximum number of rows to write
    #[arg(value_name = "N", value_parser = parse_row_limit_arg, required_unless_present = "generate_config")]
    pub row_limit: Option<u64>,

    /// Output CSV file, created or overwritten
    #[arg(required_unless_present = "generate_config")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
#[command(name = "sample-points-random")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Write a uniform random sample of a CSV dataset with the last column replaced by an index")]
#[command(after_help = "EXAMPLES:\n  \
    sample-points-random points.csv 0 sample.csv\n  \
    sample-points-random points.csv 0 sample.csv --seed 42\n  \
    sample-points-random points.csv 0 sample.csv --fraction 0.01 --index-mode source\n\n\
    The N argument is accepted for compatibility and does not change the sample size.")]
#[command(arg_required_else_help = true)]
pub struct RandomCli {
    /// Input CSV file (no header)
    #[arg(required_unless_present = "generate_config")]
    pub input: Option<PathBuf>,

    /// Integer argument kept for compatibility; not used for sampling
    #[arg(value_name = "N", value_parser = parse_row_limit_arg, required_unless_present = "generate_config")]
    pub row_limit: Option<u64>,

    /// Output CSV file, created or overwritten
    #[arg(required_unless_present = "generate_config")]
    pub output: Option<PathBuf>,

    /// Seed for the random number generator (fresh entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Share of rows to sample, in (0, 1]
    #[arg(long, help = "Share of rows to sample (default: 0.05)")]
    pub fraction: Option<f64>,

    /// Number of sampled rows echoed to stdout before writing
    #[arg(long, value_name = "ROWS")]
    pub preview: Option<usize>,

    /// Content of the appended index column
    #[arg(long, value_enum)]
    pub index_mode: Option<IndexMode>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl PartialCli {
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load_with_defaults(self.common.config.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn run_config(&self) -> Result<RunConfig> {
        build_run_config(&self.input, self.row_limit, &self.output)
    }
}

impl RandomCli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.common.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_fraction(self.fraction)
            .with_seed(self.seed)
            .with_index(self.index_mode)
            .with_preview_rows(self.preview)
    }

    pub fn run_config(&self) -> Result<RunConfig> {
        build_run_config(&self.input, self.row_limit, &self.output)
    }
}

fn build_run_config(
    input: &Option<PathBuf>,
    row_limit: Option<u64>,
    output: &Option<PathBuf>,
) -> Result<RunConfig> {
    match (input, row_limit, output) {
        (Some(input), Some(row_limit), Some(output)) => {
            let run = RunConfig::new(input, row_limit, output);
            run.validate()?;
            Ok(run)
        }
        _ => Err(SamplerError::Config {
            message: "Expected three arguments: <INPUT> <N> <OUTPUT>".to_string(),
        }),
    }
}

pub fn parse_row_limit_arg(s: &str) -> std::result::Result<u64, String> {
    config::parse_row_limit(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_positional_arguments() {
        let cli = PartialCli::try_parse_from(["sample-points-partial", "in.csv", "25", "out.csv"])
            .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("in.csv")));
        assert_eq!(cli.row_limit, Some(25));
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert_eq!(cli.common.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_non_integer_row_limit_rejected() {
        let result = PartialCli::try_parse_from(["sample-points-partial", "in.csv", "many", "out.csv"]);
        assert!(result.is_err());

        let result = RandomCli::try_parse_from(["sample-points-random", "in.csv", "1.5", "out.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_arguments_rejected() {
        let result = PartialCli::try_parse_from(["sample-points-partial", "in.csv", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_config_needs_no_positionals() {
        let cli = RandomCli::try_parse_from(["sample-points-random", "--generate-config", "s.toml"])
            .unwrap();
        assert_eq!(cli.common.generate_config, Some(PathBuf::from("s.toml")));
        assert!(cli.run_config().is_err());
    }

    #[test]
    fn test_random_overrides() {
        let cli = RandomCli::try_parse_from([
            "sample-points-random",
            "in.csv",
            "0",
            "out.csv",
            "--seed",
            "9",
            "--index-mode",
            "source",
            "--preview",
            "5",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.seed, Some(9));
        assert_eq!(overrides.index, Some(IndexMode::Source));
        assert_eq!(overrides.preview_rows, Some(5));
        assert_eq!(overrides.fraction, None);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = PartialCli::try_parse_from([
            "sample-points-partial",
            "in.csv",
            "1",
            "out.csv",
            "-q",
            "-v",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_config_checks_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("points.csv");
        std::fs::write(&input, "a,1,2,x\n").unwrap();
        let output = temp_dir.path().join("out.csv");

        let cli = PartialCli {
            input: Some(input.clone()),
            row_limit: Some(3),
            output: Some(output.clone()),
            common: CommonArgs {
                config: None,
                output_format: OutputFormat::Plain,
                verbose: 0,
                quiet: true,
                generate_config: None,
            },
        };

        let run = cli.run_config().unwrap();
        assert_eq!(run, RunConfig::new(input, 3, output));
    }
}

use crate::error::{Result, SamplerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Share of rows kept by the random extractor unless overridden.
pub const DEFAULT_SAMPLE_FRACTION: f64 = 0.05;

/// Rows echoed to stdout before the random sample is written.
pub const DEFAULT_PREVIEW_ROWS: usize = 3;

const MIN_BUFFER_SIZE: usize = 4 * 1024;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub fraction: f64,
    pub seed: Option<u64>,
    pub index: IndexMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub preview_rows: usize,
    pub buffer_size: usize,
}

/// What the appended index column of a random sample holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Fresh zero-based position in the sampled output
    #[default]
    Sequence,
    /// Zero-based row position the sampled row had in the input
    Source,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_SAMPLE_FRACTION,
            seed: None, // Fresh entropy per run
            index: IndexMode::Sequence,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SamplerError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SamplerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SamplerError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["point_sampler.toml", ".point_sampler.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(fraction) = cli_args.fraction {
            self.sampling.fraction = fraction;
        }

        if let Some(seed) = cli_args.seed {
            self.sampling.seed = Some(seed);
        }

        if let Some(index) = cli_args.index {
            self.sampling.index = index;
        }

        if let Some(preview_rows) = cli_args.preview_rows {
            self.output.preview_rows = preview_rows;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| SamplerError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| SamplerError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let fraction = self.sampling.fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(SamplerError::InvalidFraction { fraction });
        }

        if self.output.buffer_size < MIN_BUFFER_SIZE {
            return Err(SamplerError::Config {
                message: format!(
                    "Buffer size must be at least {} bytes, got {}",
                    MIN_BUFFER_SIZE, self.output.buffer_size
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub fraction: Option<f64>,
    pub seed: Option<u64>,
    pub index: Option<IndexMode>,
    pub preview_rows: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fraction(mut self, fraction: Option<f64>) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_index(mut self, index: Option<IndexMode>) -> Self {
        self.index = index;
        self
    }

    pub fn with_preview_rows(mut self, preview_rows: Option<usize>) -> Self {
        self.preview_rows = preview_rows;
        self
    }
}

/// The positional arguments of one run, checked once before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub row_limit: u64,
    pub output: PathBuf,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, row_limit: u64, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            row_limit,
            output: output.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(SamplerError::Config {
                message: "Output path must not be empty".to_string(),
            });
        }

        if !self.input.is_file() {
            return Err(SamplerError::input_not_found(&self.input));
        }

        // Creating the output truncates it before the input is read.
        if self.output_is_input()? {
            return Err(SamplerError::Config {
                message: format!(
                    "Input and output refer to the same file: {}",
                    self.input.display()
                ),
            });
        }

        Ok(())
    }

    fn output_is_input(&self) -> Result<bool> {
        if self.input == self.output {
            return Ok(true);
        }
        if !self.output.exists() {
            return Ok(false);
        }
        Ok(std::fs::canonicalize(&self.input)? == std::fs::canonicalize(&self.output)?)
    }
}

pub fn parse_row_limit(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| SamplerError::InvalidRowLimit {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sampling.fraction, 0.05);
        assert_eq!(config.sampling.seed, None);
        assert_eq!(config.sampling.index, IndexMode::Sequence);
        assert_eq!(config.output.preview_rows, 3);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.sampling.fraction = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SamplerError::InvalidFraction { .. })
        ));

        config.sampling.fraction = 1.5;
        assert!(config.validate().is_err());

        config.sampling.fraction = 1.0;
        config.output.buffer_size = 16;
        assert!(matches!(config.validate(), Err(SamplerError::Config { .. })));
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.sampling.seed = Some(42);
        config.sampling.index = IndexMode::Source;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.sampling.seed, Some(42));
        assert_eq!(loaded_config.sampling.index, IndexMode::Source);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sampler.toml");
        std::fs::write(&path, "[sampling]\nfraction = 0.1\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.sampling.fraction, 0.1);
        assert_eq!(config.output.preview_rows, DEFAULT_PREVIEW_ROWS);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(SamplerError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_seed(Some(7))
            .with_fraction(Some(0.25))
            .with_preview_rows(Some(0));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.sampling.seed, Some(7));
        assert_eq!(config.sampling.fraction, 0.25);
        assert_eq!(config.output.preview_rows, 0);
        assert_eq!(config.sampling.index, IndexMode::Sequence);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[sampling]"));
        assert!(sample.contains("[output]"));
        assert!(sample.contains("fraction = 0.05"));
    }

    #[test]
    fn test_run_config_validation() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("points.csv");
        std::fs::write(&input, "a,1,2,x\n").unwrap();

        let ok = RunConfig::new(&input, 1, temp_dir.path().join("out.csv"));
        assert!(ok.validate().is_ok());

        let missing = RunConfig::new(temp_dir.path().join("nope.csv"), 1, "out.csv");
        assert!(matches!(
            missing.validate(),
            Err(SamplerError::InputNotFound { .. })
        ));

        let same = RunConfig::new(&input, 1, &input);
        assert!(matches!(same.validate(), Err(SamplerError::Config { .. })));
    }

    #[test]
    fn test_run_config_detects_aliased_paths() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("data")).unwrap();
        let input = temp_dir.path().join("data").join("points.csv");
        std::fs::write(&input, "a,1,2,x\n").unwrap();

        let dotted = temp_dir.path().join(".").join("data").join("points.csv");
        let aliased = RunConfig::new(&input, 1, &dotted);
        assert!(matches!(aliased.validate(), Err(SamplerError::Config { .. })));

        let parent = temp_dir.path().join("data").join("..").join("data").join("points.csv");
        let aliased = RunConfig::new(&parent, 1, &input);
        assert!(matches!(aliased.validate(), Err(SamplerError::Config { .. })));

        let sibling = RunConfig::new(&input, 1, temp_dir.path().join("data").join("out.csv"));
        std::fs::write(&sibling.output, "old\n").unwrap();
        assert!(sibling.validate().is_ok());
    }

    #[test]
    fn test_parse_row_limit() {
        assert_eq!(parse_row_limit("10").unwrap(), 10);
        assert_eq!(parse_row_limit(" 0 ").unwrap(), 0);
        assert!(matches!(
            parse_row_limit("ten"),
            Err(SamplerError::InvalidRowLimit { .. })
        ));
        assert!(parse_row_limit("-1").is_err());
        assert!(parse_row_limit("2.5").is_err());
    }
}

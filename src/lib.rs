//! Extract subsets of headerless CSV point datasets.
//!
//! Two pipelines share this crate: [`PartialExtractor`] copies the first `n`
//! rows, and [`RandomExtractor`] writes a uniform random sample. Both append a
//! zero-based index column to every written row.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod ui;

// Public API re-exports
pub use cli::{CommonArgs, OutputFormat, PartialCli, RandomCli};
pub use config::{CliOverrides, Config, IndexMode, OutputConfig, RunConfig, SamplingConfig};
pub use error::{Result, SamplerError, UserFriendlyError};

// Core functionality re-exports
pub use dataset::{PointTable, SampledRow};
pub use extractor::{
    ExtractionMode, ExtractionSummary, IndexedWriter, PartialExtractor, PreviewRow,
    RandomExtractor, StopReason,
};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use rand::Rng;
use std::path::Path;

/// Main library interface tying configuration, extractors and terminal output together.
pub struct PointSampler {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl PointSampler {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_partial_cli(cli_args: &PartialCli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Ok(Self::from_common(config, &cli_args.common))
    }

    pub fn from_random_cli(cli_args: &RandomCli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Ok(Self::from_common(config, &cli_args.common))
    }

    fn from_common(config: Config, common: &CommonArgs) -> Self {
        let output_mode = match common.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, common.verbose, common.quiet)
    }

    /// Copy fields 1 and 2 of the first `row_limit` input rows.
    pub fn run_partial(&self, run: &RunConfig) -> Result<ExtractionSummary> {
        self.output_formatter
            .start_operation(&format!("Extracting up to {} rows", run.row_limit));
        self.output_formatter
            .info(&format!("Reading {}", run.input.display()));

        let row_progress = self.progress_manager.create_row_progress(run.row_limit);
        let progress_callback = {
            let pb = row_progress.clone();
            move |rows: u64| ui::progress::update_row_progress(&pb, rows)
        };

        let extractor =
            PartialExtractor::new().with_buffer_size(self.config.output.buffer_size);
        let result = extractor.extract(&run.input, run.row_limit, &run.output, Some(&progress_callback));

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                row_progress.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &row_progress,
            &format!("Wrote {} rows", summary.rows_written),
            summary.duration,
        );
        self.output_formatter.debug(&summary.display_summary());

        Ok(summary)
    }

    /// Write a random sample using the configured seed or fresh entropy.
    pub fn run_random(&self, run: &RunConfig) -> Result<ExtractionSummary> {
        let extractor = self.random_extractor()?;
        self.log_unused_limit(run);

        let spinner = self.progress_manager.create_spinner("Sampling rows...");
        let preview = |rows: &[PreviewRow], total: usize| {
            spinner.suspend(|| self.output_formatter.print_preview(rows, total));
        };

        let result = extractor.extract(&run.input, &run.output, Some(&preview));
        self.finish_random(&spinner, result)
    }

    /// Like [`PointSampler::run_random`] but draws from the caller's generator.
    pub fn run_random_with_rng<R: Rng + ?Sized>(
        &self,
        run: &RunConfig,
        rng: &mut R,
    ) -> Result<ExtractionSummary> {
        let extractor = self.random_extractor()?;
        self.log_unused_limit(run);

        let spinner = self.progress_manager.create_spinner("Sampling rows...");
        let preview = |rows: &[PreviewRow], total: usize| {
            spinner.suspend(|| self.output_formatter.print_preview(rows, total));
        };

        let result = extractor.extract_with_rng(&run.input, &run.output, rng, Some(&preview));
        self.finish_random(&spinner, result)
    }

    fn random_extractor(&self) -> Result<RandomExtractor> {
        let sampling = &self.config.sampling;
        self.output_formatter.start_operation(&format!(
            "Sampling {:.2}% of rows",
            sampling.fraction * 100.0
        ));

        Ok(RandomExtractor::new()
            .with_fraction(sampling.fraction)?
            .with_seed(sampling.seed)
            .with_index_mode(sampling.index)
            .with_preview_rows(self.config.output.preview_rows)
            .with_buffer_size(self.config.output.buffer_size))
    }

    fn log_unused_limit(&self, run: &RunConfig) {
        self.output_formatter
            .info(&format!("Reading {}", run.input.display()));
        tracing::debug!(
            row_limit = run.row_limit,
            "Row limit argument does not affect random sampling"
        );
    }

    fn finish_random(
        &self,
        spinner: &indicatif::ProgressBar,
        result: Result<ExtractionSummary>,
    ) -> Result<ExtractionSummary> {
        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                spinner.abandon();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            spinner,
            &format!("Sampled {} of {} rows", summary.rows_written, summary.rows_read),
            summary.duration,
        );

        if summary.rows_written == 0 && summary.rows_read > 0 {
            self.output_formatter.warning(&format!(
                "Input has {} rows; a {} sample rounds to zero rows",
                summary.rows_read, self.config.sampling.fraction
            ));
        }
        self.output_formatter.debug(&summary.display_summary());

        Ok(summary)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &SamplerError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    Partial,
    Random,
}

/// Why an extraction stopped reading its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    LimitReached,
    EndOfInput,
    Sampled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub mode: ExtractionMode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_read: u64,
    pub rows_written: u64,
    pub stop_reason: StopReason,
    pub seed: Option<u64>,
    pub duration: Duration,
    pub finished_at: DateTime<Utc>,
}

/// Collects counters while an extraction runs.
#[derive(Debug)]
pub struct SummaryBuilder {
    mode: ExtractionMode,
    input: PathBuf,
    output: PathBuf,
    start_time: Instant,
    seed: Option<u64>,
}

impl SummaryBuilder {
    pub fn new(mode: ExtractionMode, input: &Path, output: &Path) -> Self {
        Self {
            mode,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            start_time: Instant::now(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn finish(self, rows_read: u64, rows_written: u64, stop_reason: StopReason) -> ExtractionSummary {
        ExtractionSummary {
            mode: self.mode,
            duration: self.start_time.elapsed(),
            input: self.input,
            output: self.output,
            rows_read,
            rows_written,
            stop_reason,
            seed: self.seed,
            finished_at: Utc::now(),
        }
    }
}

impl ExtractionSummary {
    pub fn display_summary(&self) -> String {
        format!(
            "{} rows read, {} rows written to {} ({})",
            self.rows_read,
            self.rows_written,
            self.output.display(),
            self.stop_reason.describe()
        )
    }
}

impl StopReason {
    pub fn describe(&self) -> &'static str {
        match self {
            StopReason::LimitReached => "row limit reached",
            StopReason::EndOfInput => "end of input",
            StopReason::Sampled => "random sample",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serialization() {
        let summary = SummaryBuilder::new(
            ExtractionMode::Partial,
            Path::new("in.csv"),
            Path::new("out.csv"),
        )
        .finish(3, 2, StopReason::LimitReached);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["mode"], "partial");
        assert_eq!(json["stop_reason"], "limit_reached");
        assert_eq!(json["rows_written"], 2);
        assert!(json["seed"].is_null());
    }

    #[test]
    fn test_display_summary() {
        let summary = SummaryBuilder::new(
            ExtractionMode::Random,
            Path::new("in.csv"),
            Path::new("sample.csv"),
        )
        .with_seed(Some(4))
        .finish(100, 5, StopReason::Sampled);

        let text = summary.display_summary();
        assert!(text.contains("100 rows read"));
        assert!(text.contains("sample.csv"));
        assert_eq!(summary.seed, Some(4));
    }
}

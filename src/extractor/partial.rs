use crate::dataset::{open_point_lines, project_point};
use crate::error::Result;
use crate::extractor::summary::{ExtractionMode, ExtractionSummary, StopReason, SummaryBuilder};
use crate::extractor::writer::IndexedWriter;
use std::path::Path;

const PROGRESS_INTERVAL: u64 = 1024;

/// Copies fields 1 and 2 of the first `n` input lines, numbering them from 0.
pub struct PartialExtractor {
    buffer_size: usize,
}

impl PartialExtractor {
    pub fn new() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096); // Minimum 4KB buffer
        self
    }

    pub fn extract(
        &self,
        input: &Path,
        row_limit: u64,
        output: &Path,
        progress_callback: Option<&dyn Fn(u64)>,
    ) -> Result<ExtractionSummary> {
        let summary = SummaryBuilder::new(ExtractionMode::Partial, input, output);

        // Open the input first so a missing file never truncates the output.
        let mut lines = open_point_lines(input, self.buffer_size)?;
        let mut writer = IndexedWriter::create(output, self.buffer_size)?;

        let stop_reason = loop {
            if writer.rows_written() >= row_limit {
                break StopReason::LimitReached;
            }

            let (line, text) = match lines.next_line()? {
                Some(next) => next,
                None => break StopReason::EndOfInput,
            };

            let point = match project_point(text, line) {
                Ok(point) => point,
                Err(e) => {
                    // Rows already written stay on disk.
                    writer.flush()?;
                    tracing::error!(error = %e, "Stopping at malformed line");
                    return Err(e);
                }
            };

            writer.write_sequenced([point.first, point.second])?;

            if let Some(callback) = progress_callback {
                if writer.rows_written() % PROGRESS_INTERVAL == 0 {
                    callback(writer.rows_written());
                }
            }
        };

        let rows_written = writer.finish()?;
        let rows_read = lines.lines_read();

        if let Some(callback) = progress_callback {
            callback(rows_written);
        }

        tracing::info!(
            rows = rows_written,
            lines_read = rows_read,
            limit = row_limit,
            reason = stop_reason.describe(),
            "Partial extraction finished"
        );

        Ok(summary.finish(rows_read, rows_written, stop_reason))
    }
}

impl Default for PartialExtractor {
    fn default() -> Self {
        Self::new()
    }
}

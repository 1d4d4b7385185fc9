use crate::config::{IndexMode, DEFAULT_PREVIEW_ROWS, DEFAULT_SAMPLE_FRACTION};
use crate::dataset::{PointTable, SampledRow};
use crate::error::{Result, SamplerError};
use crate::extractor::summary::{ExtractionMode, ExtractionSummary, StopReason, SummaryBuilder};
use crate::extractor::writer::IndexedWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// An output row: the kept fields followed by the index value.
pub type PreviewRow = Vec<String>;

/// Writes a uniform random sample of a point table with the last column
/// replaced by an index.
pub struct RandomExtractor {
    fraction: f64,
    index_mode: IndexMode,
    preview_rows: usize,
    buffer_size: usize,
    seed: Option<u64>,
}

impl RandomExtractor {
    pub fn new() -> Self {
        Self {
            fraction: DEFAULT_SAMPLE_FRACTION,
            index_mode: IndexMode::Sequence,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            buffer_size: 64 * 1024,
            seed: None,
        }
    }

    pub fn with_fraction(mut self, fraction: f64) -> Result<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(SamplerError::InvalidFraction { fraction });
        }
        self.fraction = fraction;
        Ok(self)
    }

    pub fn with_index_mode(mut self, index_mode: IndexMode) -> Self {
        self.index_mode = index_mode;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Samples with the configured seed, or fresh OS entropy when unset.
    pub fn extract(
        &self,
        input: &Path,
        output: &Path,
        preview_callback: Option<&dyn Fn(&[PreviewRow], usize)>,
    ) -> Result<ExtractionSummary> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.extract_with_rng(input, output, &mut rng, preview_callback)
    }

    pub fn extract_with_rng<R: Rng + ?Sized>(
        &self,
        input: &Path,
        output: &Path,
        rng: &mut R,
        preview_callback: Option<&dyn Fn(&[PreviewRow], usize)>,
    ) -> Result<ExtractionSummary> {
        let summary = SummaryBuilder::new(ExtractionMode::Random, input, output).with_seed(self.seed);

        let table = PointTable::load(input, self.buffer_size)?;
        let sampled = table.sample(self.fraction, rng)?;

        tracing::info!(
            rows = table.len(),
            sampled = sampled.len(),
            fraction = self.fraction,
            "Drew random sample"
        );

        let indexed: Vec<(&SampledRow, u64)> = sampled
            .iter()
            .enumerate()
            .map(|(position, row)| (row, self.index_value(position, row)))
            .collect();

        if let Some(callback) = preview_callback {
            let preview: Vec<PreviewRow> = indexed
                .iter()
                .take(self.preview_rows)
                .map(|(row, index)| {
                    let mut fields = row.fields.clone();
                    fields.push(index.to_string());
                    fields
                })
                .collect();
            callback(&preview, sampled.len());
        }

        let mut writer = IndexedWriter::create(output, self.buffer_size)?;
        for (row, index) in &indexed {
            writer.write_row(&row.fields, *index)?;
        }
        let rows_written = writer.finish()?;

        Ok(summary.finish(table.len() as u64, rows_written, StopReason::Sampled))
    }

    fn index_value(&self, position: usize, row: &SampledRow) -> u64 {
        match self.index_mode {
            IndexMode::Sequence => position as u64,
            IndexMode::Source => row.source_row as u64,
        }
    }
}

impl Default for RandomExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_points(dir: &TempDir, rows: usize) -> PathBuf {
        let content: String = (0..rows)
            .map(|i| format!("{},{}.5,{}.25,label{}\n", i, i, i, i))
            .collect();
        let path = dir.path().join("points.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| line.split(',').map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_sample_shape_and_sequence_index() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_points(&temp_dir, 200);
        let output = temp_dir.path().join("sample.csv");

        let summary = RandomExtractor::new()
            .extract_with_rng(&input, &output, &mut StdRng::seed_from_u64(1), None)
            .unwrap();

        let rows = read_rows(&output);
        assert_eq!(rows.len(), 10);
        assert_eq!(summary.rows_read, 200);
        assert_eq!(summary.rows_written, 10);

        let mut seen = HashSet::new();
        for (i, row) in rows.iter().enumerate() {
            // Width is unchanged: one column dropped, one appended.
            assert_eq!(row.len(), 4);
            assert!(!row[3].starts_with("label"));
            assert_eq!(row[3], i.to_string());
            assert!(seen.insert(row[0].clone()), "row sampled twice");
        }
    }

    #[test]
    fn test_source_index_mode() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_points(&temp_dir, 100);
        let output = temp_dir.path().join("sample.csv");

        RandomExtractor::new()
            .with_index_mode(IndexMode::Source)
            .extract_with_rng(&input, &output, &mut StdRng::seed_from_u64(8), None)
            .unwrap();

        for row in read_rows(&output) {
            // The first input column equals the zero-based row number.
            assert_eq!(row[3], row[0]);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_points(&temp_dir, 300);
        let first = temp_dir.path().join("a.csv");
        let second = temp_dir.path().join("b.csv");
        let extractor = RandomExtractor::new().with_seed(Some(99));

        extractor.extract(&input, &first, None).unwrap();
        extractor.extract(&input, &second, None).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_preview_receives_first_rows() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_points(&temp_dir, 100);
        let output = temp_dir.path().join("sample.csv");
        let seen = RefCell::new((Vec::new(), 0usize));
        let callback = |rows: &[PreviewRow], total: usize| {
            *seen.borrow_mut() = (rows.to_vec(), total);
        };

        RandomExtractor::new()
            .extract_with_rng(&input, &output, &mut StdRng::seed_from_u64(2), Some(&callback))
            .unwrap();

        let (preview, total) = seen.into_inner();
        assert_eq!(total, 5);
        assert_eq!(preview.len(), 3);
        assert_eq!(preview, read_rows(&output)[..3].to_vec());
    }

    #[test]
    fn test_single_column_input_is_schema_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("ids.csv");
        fs::write(&input, "1\n2\n3\n").unwrap();

        let result = RandomExtractor::new().extract(&input, &temp_dir.path().join("o.csv"), None);
        assert!(matches!(result, Err(SamplerError::Schema { columns: 1 })));
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        assert!(RandomExtractor::new().with_fraction(0.0).is_err());
        assert!(RandomExtractor::new().with_fraction(-0.1).is_err());
        assert!(RandomExtractor::new().with_fraction(f64::NAN).is_err());
        assert!(RandomExtractor::new().with_fraction(1.0).is_ok());
    }
}

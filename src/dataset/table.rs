use crate::dataset::record::{open_point_reader, record_line};
use crate::error::{Result, SamplerError};
use csv::{Reader, StringRecord};
use rand::seq::index;
use rand::Rng;
use std::io::Read;
use std::path::Path;

/// A headerless CSV dataset held fully in memory.
#[derive(Debug, Clone, Default)]
pub struct PointTable {
    rows: Vec<StringRecord>,
    width: usize,
}

/// A sampled row with its last column already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledRow {
    /// Zero-based position of the row in the input table.
    pub source_row: usize,
    pub fields: Vec<String>,
}

impl PointTable {
    pub fn load(path: &Path, buffer_size: usize) -> Result<Self> {
        let reader = open_point_reader(path, buffer_size)?;
        let table = Self::from_reader(reader)?;

        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.width(),
            "Loaded point table"
        );
        Ok(table)
    }

    /// Reads every record. The first row fixes the column count: shorter rows
    /// are padded with empty fields, longer rows are malformed.
    pub fn from_reader<R: Read>(mut reader: Reader<R>) -> Result<Self> {
        let mut rows = Vec::new();
        let mut width = 0;

        for record in reader.records() {
            let mut record = record?;
            if rows.is_empty() {
                width = record.len();
            } else if record.len() > width {
                return Err(SamplerError::MalformedRecord {
                    line: record_line(&record),
                    fields: record.len(),
                    expected: width,
                });
            }
            while record.len() < width {
                record.push_field("");
            }
            rows.push(record);
        }

        Ok(Self { rows, width })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Fails unless at least one column survives dropping the last one.
    pub fn ensure_droppable(&self) -> Result<()> {
        if !self.is_empty() && self.width < 2 {
            return Err(SamplerError::Schema {
                columns: self.width,
            });
        }
        Ok(())
    }

    /// Number of rows a sample of `fraction` takes from this table. Halves
    /// round to the nearest even count.
    pub fn sample_size(&self, fraction: f64) -> usize {
        let wanted = (fraction * self.len() as f64).round_ties_even();
        (wanted.max(0.0) as usize).min(self.len())
    }

    /// Distinct row positions drawn uniformly without replacement, in the
    /// order they were drawn.
    pub fn sample_positions<R: Rng + ?Sized>(&self, fraction: f64, rng: &mut R) -> Vec<usize> {
        let amount = self.sample_size(fraction);
        index::sample(rng, self.len(), amount).into_vec()
    }

    /// Samples rows and drops their last column.
    pub fn sample<R: Rng + ?Sized>(&self, fraction: f64, rng: &mut R) -> Result<Vec<SampledRow>> {
        self.ensure_droppable()?;

        let kept = self.width.saturating_sub(1);
        let sampled = self
            .sample_positions(fraction, rng)
            .into_iter()
            .map(|position| SampledRow {
                source_row: position,
                fields: self.rows[position]
                    .iter()
                    .take(kept)
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        Ok(sampled)
    }
}

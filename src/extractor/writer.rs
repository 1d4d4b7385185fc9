use crate::error::Result;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Headerless CSV sink that appends an index column to every row.
pub struct IndexedWriter<W: Write> {
    inner: Writer<W>,
    rows_written: u64,
}

impl IndexedWriter<File> {
    /// Creates or truncates `path`.
    pub fn create(path: &Path, buffer_size: usize) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file, buffer_size))
    }
}

impl<W: Write> IndexedWriter<W> {
    pub fn from_writer(sink: W, buffer_size: usize) -> Self {
        let inner = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .buffer_capacity(buffer_size)
            .from_writer(sink);

        Self {
            inner,
            rows_written: 0,
        }
    }

    pub fn write_row<I, T>(&mut self, fields: I, index: u64) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for field in fields {
            self.inner.write_field(field)?;
        }
        self.inner.write_field(index.to_string())?;
        self.inner.write_record(None::<&[u8]>)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Writes `fields` followed by the next sequence index.
    pub fn write_sequenced<I, T>(&mut self, fields: I) -> Result<u64>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let index = self.rows_written;
        self.write_row(fields, index)?;
        Ok(index)
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the number of rows written.
    pub fn finish(mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.rows_written)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        match self.inner.into_inner() {
            Ok(sink) => sink,
            Err(e) => panic!("flush failed: {}", e.error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sequenced_rows() {
        let mut writer = IndexedWriter::from_writer(Vec::new(), 4096);
        assert_eq!(writer.write_sequenced(["1", "2"]).unwrap(), 0);
        assert_eq!(writer.write_sequenced(["3", "4"]).unwrap(), 1);
        assert_eq!(writer.rows_written(), 2);

        let bytes = writer.into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "1,2,0\n3,4,1\n");
    }

    #[test]
    fn test_explicit_index_and_no_quoting() {
        let mut writer = IndexedWriter::from_writer(Vec::new(), 4096);
        writer.write_row(["a b", "\"q\""], 17).unwrap();

        let bytes = writer.into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a b,\"q\",17\n");
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        std::fs::write(&path, "stale,content,99\nmore\n").unwrap();

        let mut writer = IndexedWriter::create(&path, 4096).unwrap();
        writer.write_sequenced(["x", "y"]).unwrap();
        assert_eq!(writer.finish().unwrap(), 1);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x,y,0\n");
    }
}

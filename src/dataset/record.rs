use crate::error::{Result, SamplerError};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Minimum number of fields a point line needs for the partial projection.
pub const POINT_FIELDS: usize = 3;

/// Fields 1 and 2 of a point line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedPoint<'a> {
    pub first: &'a str,
    pub second: &'a str,
}

/// Line-at-a-time reader that hands out every line, blank ones included.
pub struct PointLines<R: BufRead> {
    reader: R,
    buffer: String,
    line: u64,
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SamplerError::input_not_found(path),
        _ => SamplerError::Io(e),
    })
}

/// Opens a headerless, unquoted CSV file as a table reader.
pub fn open_point_reader(path: &Path, buffer_size: usize) -> Result<Reader<File>> {
    let file = open_input(path)?;
    Ok(point_reader_builder(buffer_size).from_reader(file))
}

/// Opens a point file for sequential line reading.
pub fn open_point_lines(path: &Path, buffer_size: usize) -> Result<PointLines<BufReader<File>>> {
    let file = open_input(path)?;
    Ok(PointLines::new(BufReader::with_capacity(buffer_size, file)))
}

pub(crate) fn point_reader_builder(buffer_size: usize) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .buffer_capacity(buffer_size);
    builder
}

#[cfg(test)]
pub(crate) fn reader_from<R: std::io::Read>(source: R) -> Reader<R> {
    point_reader_builder(8 * 1024).from_reader(source)
}

impl<R: BufRead> PointLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line: 0,
        }
    }

    /// Next line without its `\n` or `\r\n` terminator, with its one-based number.
    pub fn next_line(&mut self) -> Result<Option<(u64, &str)>> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut text = self.buffer.as_str();
        if let Some(stripped) = text.strip_suffix('\n') {
            text = stripped.strip_suffix('\r').unwrap_or(stripped);
        }
        Ok(Some((self.line, text)))
    }

    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

/// One-based line number the record started on.
pub fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

pub fn project_point(text: &str, line: u64) -> Result<ProjectedPoint<'_>> {
    let mut fields = text.split(',').skip(1);
    match (fields.next(), fields.next()) {
        (Some(first), Some(second)) => Ok(ProjectedPoint { first, second }),
        _ => Err(SamplerError::MalformedRecord {
            line,
            fields: text.split(',').count(),
            expected: POINT_FIELDS,
        }),
    }
}

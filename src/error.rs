use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing failed: {message}")]
    Csv {
        message: String,
        #[source]
        source: csv::Error,
    },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Malformed record on line {line}: found {fields} field(s), expected {expected}")]
    MalformedRecord {
        line: u64,
        fields: usize,
        expected: usize,
    },

    #[error("Invalid row limit: {value}")]
    InvalidRowLimit { value: String },

    #[error("Table has {columns} column(s); at least 2 are required to drop the last column")]
    Schema { columns: usize },

    #[error("Sample fraction out of range: {fraction}")]
    InvalidFraction { fraction: f64 },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SamplerError {
    pub fn input_not_found(path: &Path) -> Self {
        SamplerError::InputNotFound {
            path: path.display().to_string(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SamplerError::InvalidRowLimit { .. } | SamplerError::InvalidFraction { .. } => 2,
            SamplerError::InputNotFound { .. } => 3,
            SamplerError::MalformedRecord { .. } => 4,
            SamplerError::Schema { .. } => 5,
            SamplerError::Config { .. } => 6,
            _ => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SamplerError {
    fn user_message(&self) -> String {
        match self {
            SamplerError::Csv { message, .. } => {
                format!("Could not process CSV data: {}", message)
            }
            SamplerError::InputNotFound { path } => {
                format!("Input file does not exist: {}", path)
            }
            SamplerError::MalformedRecord {
                line,
                fields,
                expected,
            } => {
                format!(
                    "Line {} has {} field(s) but {} are required",
                    line, fields, expected
                )
            }
            SamplerError::InvalidRowLimit { value } => {
                format!("Row limit must be a non-negative integer, got: {}", value)
            }
            SamplerError::Schema { columns } => {
                format!(
                    "Input table has only {} column(s); nothing would remain after dropping the last one",
                    columns
                )
            }
            SamplerError::InvalidFraction { fraction } => {
                format!("Sample fraction must be in (0, 1], got: {}", fraction)
            }
            SamplerError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SamplerError::InputNotFound { .. } => Some(
                "Check the input path; it is resolved relative to the current directory.".to_string()
            ),
            SamplerError::MalformedRecord { .. } => Some(
                "Every input line must be comma-separated with an identifier followed by at least two coordinates.".to_string()
            ),
            SamplerError::Schema { .. } => Some(
                "The random extractor drops the trailing column, so the input needs at least two columns.".to_string()
            ),
            SamplerError::InvalidFraction { .. } => Some(
                "Use --fraction with a value such as 0.05 for a 5% sample.".to_string()
            ),
            SamplerError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are in range.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<csv::Error> for SamplerError {
    fn from(error: csv::Error) -> Self {
        if !error.is_io_error() {
            return SamplerError::Csv {
                message: error.to_string(),
                source: error,
            };
        }

        match error.into_kind() {
            csv::ErrorKind::Io(io_error) => SamplerError::Io(io_error),
            kind => SamplerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("{:?}", kind),
            )),
        }
    }
}

impl From<toml::de::Error> for SamplerError {
    fn from(error: toml::de::Error) -> Self {
        SamplerError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SamplerError>;

//! Error types for dq-agent.

use std::path::PathBuf;

/// Result type alias for dq-agent operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or checking a dataset.
///
/// Only two conditions are fatal for a run: the input file cannot be read,
/// or it has no usable header row. Everything below the file level (bad
/// numbers, bad dates, empty cells) is recoverable and handled by the
/// detectors, never by this enum.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error during CSV decoding.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The input has no header row, or the header row is empty.
    #[error("Missing or empty header row")]
    MissingHeader,

    /// Dataset contains no rows where at least one was required.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A configured column does not exist in the dataset.
    #[error("Column '{name}' not found in dataset")]
    ColumnNotFound {
        /// The name of the missing column.
        name: String,
    },

    /// Invalid run configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Report serialization or formatting error.
    #[error("Format error: {0}")]
    Format(String),
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create an I/O error without path context.
    pub fn io_no_path(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }

    /// Create a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/file");
        assert!(err.to_string().contains("/path/to/file"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_io_error_without_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io_no_path(io_err);
        assert!(err.to_string().contains("None"));
    }

    #[test]
    fn test_column_not_found() {
        let err = Error::column_not_found("customer_id");
        assert!(err.to_string().contains("customer_id"));
    }

    #[test]
    fn test_invalid_config() {
        let err = Error::invalid_config("iqr_multiplier must be positive");
        assert!(err.to_string().contains("iqr_multiplier must be positive"));
    }

    #[test]
    fn test_missing_header() {
        assert!(Error::MissingHeader.to_string().contains("header"));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(Error::EmptyDataset.to_string().contains("empty"));
    }
}

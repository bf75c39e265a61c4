//! Error types for yearline operations.
//!
//! This module provides the error hierarchy using `thiserror` for
//! extraction, storage, I/O, and CLI commands.

use thiserror::Error;

/// Result type alias for yearline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Extraction errors (input validation, rule configuration).
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Invalid state errors.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state.
        message: String,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors raised while scanning text for year references.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Input is not plain text (binary data or invalid UTF-8).
    #[error("invalid input at byte offset {offset}: {reason}")]
    InvalidInput {
        /// Byte offset of the first offending byte.
        offset: usize,
        /// What was wrong with the input.
        reason: String,
    },

    /// An event read back from outside the extractor breaks timeline order
    /// or bounds.
    #[error("invalid event #{index} (year {year}): {reason}")]
    InvalidEvent {
        /// Position of the event in its sequence.
        index: usize,
        /// Year carried by the event.
        year: u16,
        /// What was wrong with the event.
        reason: String,
    },

    /// Invalid extractor configuration.
    #[error("invalid extractor configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(String),

    /// Unknown rejection rule name.
    #[error("unknown rejection rule: {name}")]
    UnknownRule {
        /// Name of the unknown rule.
        name: String,
    },

    /// Batch processing error.
    #[error("batch extraction failed: {reason}")]
    BatchFailed {
        /// Reason for failure.
        reason: String,
    },
}

/// Storage-specific errors for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Storage not initialized (init command not run).
    #[error("timeline store not initialized. Run: yearline init")]
    NotInitialized,

    /// Document not found by ID or name.
    #[error("document not found: {identifier}")]
    DocumentNotFound {
        /// Document ID or name that was not found.
        identifier: String,
    },

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<regex::Error> for ExtractionError {
    fn from(err: regex::Error) -> Self {
        Self::Regex(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for ExtractionError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::InvalidInput {
            offset: err.utf8_error().valid_up_to(),
            reason: "invalid UTF-8".to_string(),
        }
    }
}

impl From<std::str::Utf8Error> for ExtractionError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidInput {
            offset: err.valid_up_to(),
            reason: "invalid UTF-8".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidState {
            message: "test error".to_string(),
        };
        assert_eq!(err.to_string(), "invalid state: test error");
    }

    #[test]
    fn test_extraction_error_display() {
        let err = ExtractionError::InvalidInput {
            offset: 42,
            reason: "NUL byte".to_string(),
        };
        assert_eq!(err.to_string(), "invalid input at byte offset 42: NUL byte");

        let err = ExtractionError::UnknownRule {
            name: "zip-code".to_string(),
        };
        assert_eq!(err.to_string(), "unknown rejection rule: zip-code");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotInitialized;
        assert_eq!(
            err.to_string(),
            "timeline store not initialized. Run: yearline init"
        );

        let err = StorageError::DocumentNotFound {
            identifier: "memoir".to_string(),
        };
        assert_eq!(err.to_string(), "document not found: memoir");
    }

    #[test]
    fn test_io_error_display() {
        let err = IoError::FileNotFound {
            path: "/tmp/test.txt".to_string(),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/test.txt");
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::MissingArgument("--yes".to_string());
        assert_eq!(err.to_string(), "missing required argument: --yes");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_extraction() {
        let err: Error = ExtractionError::InvalidConfig {
            reason: "bounds".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_error_from_storage() {
        let err: Error = StorageError::NotInitialized.into();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_error_config() {
        let err = Error::Config {
            message: "bad config".to_string(),
        };
        assert_eq!(err.to_string(), "configuration error: bad config");
    }

    #[test]
    fn test_from_rusqlite_error() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Storage(StorageError::Database(_))));
    }

    #[test]
    #[allow(clippy::invalid_regex)]
    fn test_from_regex_error() {
        let regex_err = regex::Regex::new("[invalid").unwrap_err();
        let err: ExtractionError = regex_err.into();
        assert!(matches!(err, ExtractionError::Regex(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_from_utf8_error_is_invalid_input() {
        let invalid_bytes: Vec<u8> = vec![b'a', 0xff, 0xfe];
        let utf8_err = std::str::from_utf8(&invalid_bytes).unwrap_err();
        let err: ExtractionError = utf8_err.into();
        assert!(matches!(err, ExtractionError::InvalidInput { offset: 1, .. }));

        let utf8_err = String::from_utf8(invalid_bytes).unwrap_err();
        let err: ExtractionError = utf8_err.into();
        assert!(matches!(err, ExtractionError::InvalidInput { offset: 1, .. }));
    }
}

//! Error types for flightregistry.
//!
//! Lookups that miss are not errors: `find` and `remove` report them through
//! `Option`. The variants here cover file I/O, JSON decoding and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightregistry operations.
#[derive(Error, Debug)]
pub enum Error {
    // === File Errors ===
    /// Failed to read a flights document from disk.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path of the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an exported flights document.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path of the output file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Any other file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// The document is not valid JSON or does not have the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for flightregistry operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Check if this error came from reading or writing a file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::FileWrite { .. } | Self::Io(_)
        )
    }

    /// Check if this error came from decoding a document.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

//! Error types for officekit library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::backend::Family;

/// Result type alias for officekit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or saving documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The real backend for a family could not be acquired.
    ///
    /// The resolver absorbs this error and falls back to the dummy backend.
    #[error("{family} backend unavailable: {reason}")]
    CapabilityUnavailable {
        /// Affected document family
        family: Family,
        /// Why the real backend could not be used
        reason: String,
    },

    /// A document could not be written to its target path.
    #[error("Failed to save {}: {source}", .path.display())]
    Persistence {
        /// Target path of the save
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Content passed to a mutation method has an invalid shape or range.
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// An A1-style cell reference could not be parsed.
    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),

    /// A document family name was not recognized.
    #[error("Unknown document family: {0}")]
    UnknownFamily(String),

    /// The bytes are neither an OOXML container nor a placeholder.
    #[error("Unknown file format: not an office package or placeholder")]
    UnknownFormat,

    /// The underlying document library failed to render the package.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidContent`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidContent(msg.into())
    }

    /// Whether this error only reduces capability instead of failing an operation.
    pub fn is_capability(&self) -> bool {
        matches!(self, Error::CapabilityUnavailable { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(feature = "powerpoint")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Backend(err.to_string()),
        }
    }
}

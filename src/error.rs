//! Centralized error types for mboxdump.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mboxdump library.
///
/// Missing headers, empty HTML bodies and unsupported content types are
/// not errors; they surface as absent values in the extracted record.
#[derive(Error, Debug)]
pub enum MboxError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("MBOX file not found: {0}")]
    FileNotFound(PathBuf),

    /// The configuration file could not be read or parsed.
    #[error("Invalid configuration '{path}': {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Convenience alias for `Result<T, MboxError>`.
pub type Result<T> = std::result::Result<T, MboxError>;

impl MboxError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// A `NotFound` error is reported as [`MboxError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound(path);
        }
        Self::Io { path, source }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (writing the report to stdout, for instance).
impl From<std::io::Error> for MboxError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<stdout>"),
            source,
        }
    }
}

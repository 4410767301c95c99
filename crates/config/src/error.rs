//! Configuration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No layer defines the requested option.
    #[display("unknown configuration key: {_0}")]
    UnknownKey(#[error(not(source))] String),
    /// The option exists but doesn't deserialize into the requested type.
    #[display("invalid value for configuration key: {_0}")]
    InvalidValue(#[error(not(source))] String),
    /// Settings files or environment variables could not be merged.
    #[display("could not load settings")]
    Load,
    /// The data directory could not be created.
    #[display("data directory unavailable: {}", _0.display())]
    DataDirectory(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DataDirectory(_))
    }
}

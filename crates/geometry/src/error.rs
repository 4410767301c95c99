//! Geometry Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A normalization error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for normalization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The detector's report doesn't follow the expected grammar.
    #[display("malformed detector report: {_0}")]
    MalformedReport(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Detector output is deterministic for a given image.
        false
    }
}

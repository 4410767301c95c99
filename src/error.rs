//! Fact Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Errors from the member crates are raised into this
//! crate's tree with the helpers at the bottom of this module, keeping their
//! own frames as children.

use derive_more::{Display, Error};
use filemeta_config::error::{Error as ConfigError, ErrorKind as ConfigErrorKind};
use filemeta_geometry::error::{Error as GeometryError, ErrorKind as GeometryErrorKind};
use std::path::PathBuf;

/// A fact extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fact extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No layer of the handle's variant knows how to produce this key.
    #[display("unsupported fetch key: {_0}")]
    UnsupportedKey(#[error(not(source))] String),
    /// The analyzer doesn't apply to the handle's variant.
    #[display("analyzer {analyzer} is not available for {kind} files")]
    UnsupportedAnalyzer { analyzer: String, kind: String },
    /// No configuration layer defines the option.
    #[display("unknown configuration key: {_0}")]
    UnknownConfigKey(#[error(not(source))] String),
    /// The option exists but has the wrong type.
    #[display("invalid value for configuration key: {_0}")]
    InvalidConfigValue(#[error(not(source))] String),
    /// Reading or writing a local file failed.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The file's type could not be determined.
    #[display("could not sniff file type: {}", _0.display())]
    Sniff(#[error(not(source))] PathBuf),
    /// The file isn't a decodable raster image.
    #[display("could not decode image: {}", _0.display())]
    Decode(#[error(not(source))] PathBuf),
    /// Decoding would allocate more than the allowed number of bytes.
    #[display("decoded image exceeds {_0} bytes")]
    ResourceLimit(#[error(not(source))] u64),
    /// An external program isn't installed or isn't on `PATH`.
    #[display("program not found: {_0}")]
    ToolNotFound(#[error(not(source))] String),
    /// An external program ran but reported failure.
    #[display("program failed: {_0}")]
    ToolFailed(#[error(not(source))] String),
    /// An external program's output doesn't follow its documented format.
    #[display("malformed output: {_0}")]
    MalformedOutput(#[error(not(source))] String),
    /// An auxiliary file could not be downloaded.
    #[display("download failed: {_0}")]
    Download(#[error(not(source))] String),
    /// A downloaded archive could not be unpacked.
    #[display("could not unpack: {}", _0.display())]
    Unpack(#[error(not(source))] PathBuf),
    /// The analyzer needs a collaborator the toolkit wasn't given.
    #[display("no {_0} configured")]
    Unavailable(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Download(_))
    }

    /// Raise a configuration error into this crate's tree.
    #[track_caller]
    pub fn config(err: ConfigError) -> Error {
        let kind = match &*err {
            ConfigErrorKind::UnknownKey(key) => Self::UnknownConfigKey(key.clone()),
            ConfigErrorKind::InvalidValue(key) => Self::InvalidConfigValue(key.clone()),
            ConfigErrorKind::DataDirectory(path) => Self::Io(path.clone()),
            ConfigErrorKind::Load => Self::InvalidConfigValue("settings".to_string()),
        };
        err.raise(kind)
    }

    /// Raise a detector report parsing error into this crate's tree.
    #[track_caller]
    pub fn geometry(err: GeometryError) -> Error {
        let kind = match &*err {
            GeometryErrorKind::MalformedReport(reason) => Self::MalformedOutput(reason.clone()),
        };
        err.raise(kind)
    }
}

//! Metadata facts for media files.
//!
//! [`create`] sniffs a file and returns a [`FileHandle`] specialised for its
//! [`Kind`]. The handle resolves intermediate artifacts on demand (a raster
//! copy of a vector drawing, decoded pixels, exiftool output) and caches each
//! one for its own lifetime, so analyzers sharing an artifact never compute
//! it twice:
//!
//! ```no_run
//! use filemeta::{Analyzer, Toolkit};
//!
//! let toolkit = Toolkit::default().shared();
//! let file = filemeta::create("holiday.jpg", toolkit)?;
//! let colour = file.analyze(Analyzer::ColorAverage)?;
//! let everything = file.analyze_all();
//! assert!(everything.facts.len() >= colour.len());
//! # Ok::<(), filemeta::error::Error>(())
//! ```
//!
//! External programs, downloads, decoding and the detectors are reached
//! through the collaborators held by a [`Toolkit`]; see [`tools`].

pub mod analyze;
mod dispatch;
pub mod error;
mod facts;
mod fetch;
mod handle;
#[cfg(test)]
mod testing;
pub mod tools;
mod variant;

pub use crate::analyze::{Analysis, Analyzer, Face, Failure, Landmarks};
pub use crate::dispatch::create;
pub use crate::facts::Facts;
pub use crate::fetch::{FetchKey, Fetched};
pub use crate::handle::FileHandle;
pub use crate::tools::Toolkit;
pub use crate::variant::Kind;
pub use filemeta_config::{Options, Settings, options};
pub use filemeta_geometry::{BarcodeRecord, BoundingBox, Point, Points, Symbol};

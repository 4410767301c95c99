//! Unpacking of compressed auxiliary files.
//!
//! Model files fetched on first use are published as compressed archives
//! (the facial landmark model ships as a `.bz2`). [`Packing`] is detected
//! from the archive's name ([`Packing::from_path`]), names the unpacked
//! file ([`Packing::unpacked_path`]) and unpacks it atomically
//! ([`Packing::unpack_file`]), never leaving a half-written destination
//! behind.

mod construct;
pub mod error;
mod ops;
mod util;

/// How a file on disk is packed.
///
/// Defaults to [`Plain`](Self::Plain) (stored as-is).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Packing {
    /// Not compressed
    #[default]
    Plain,
    /// Bzip2 compression (.bz2)
    Bzip2,
}

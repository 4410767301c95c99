use crate::error::{Error, ErrorKind};
use crate::tools::PixelArray;
use derive_more::Display;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempPath;

/// Every value a handle knows how to produce.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKey {
    /// Absolute path of the file itself.
    #[display("filename")]
    Filename,
    /// Path of a raster rendition (the file itself unless it needs converting).
    #[display("filename_raster")]
    FilenameRaster,
    /// `file://` URI of the raster rendition.
    #[display("filename_zxing")]
    FilenameZxing,
    /// Decoded pixel array of the raster rendition.
    #[display("ndarray")]
    Ndarray,
    /// Parsed exiftool metadata.
    #[display("exiftool")]
    Exiftool,
}
impl FetchKey {
    pub const ALL: [FetchKey; 5] = [Self::Filename, Self::FilenameRaster, Self::FilenameZxing, Self::Ndarray, Self::Exiftool];
}
impl FromStr for FetchKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| Error::from(ErrorKind::UnsupportedKey(s.to_string())))
    }
}

/// A cached value. Cloning is cheap: heavy payloads are shared.
#[derive(Debug, Clone)]
pub enum Fetched {
    Path(PathBuf),
    /// A temporary conversion, removed once the last clone is dropped.
    Converted(Arc<TempPath>),
    Uri(String),
    Pixels(Arc<PixelArray>),
    Exif(Arc<Map<String, Value>>),
}
impl Fetched {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path.as_path()),
            Self::Converted(temp) => {
                let path: &Path = temp;
                Some(path)
            },
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(uri) => Some(uri.as_str()),
            _ => None,
        }
    }

    pub fn as_pixels(&self) -> Option<&Arc<PixelArray>> {
        match self {
            Self::Pixels(pixels) => Some(pixels),
            _ => None,
        }
    }

    pub fn as_exif(&self) -> Option<&Arc<Map<String, Value>>> {
        match self {
            Self::Exif(exif) => Some(exif),
            _ => None,
        }
    }
}

use crate::analyze::Analyzer;
use crate::error::{ErrorKind, Result};
use crate::fetch::{FetchKey, Fetched};
use crate::handle::FileHandle;
use crate::tools::placeholder;
use crate::variant::Layer;
use filemeta_config::{Options, Value, options};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// 1024³ / 4 / 3 bytes.
const MAX_DECOMPRESSED_SIZE: u64 = 89_478_485;

/// Any raster or vector image.
pub(crate) struct ImageFile;

impl Layer for ImageFile {
    fn defaults(&self) -> Options {
        options([
            ("max_decompressed_size", Value::from(MAX_DECOMPRESSED_SIZE)),
            ("facial_landmarks", Value::from(true)),
            ("detector_upsample_num_times", Value::from(0u32)),
            ("java", Value::from("java")),
            ("barcode_min_dimension", Value::from(4u64)),
        ])
    }

    fn produce(&self, handle: &FileHandle, key: FetchKey) -> Option<Result<Fetched>> {
        match key {
            // Already a raster format.
            FetchKey::FilenameRaster => Some(handle.fetch(FetchKey::Filename)),
            FetchKey::FilenameZxing => Some(handle.raster_path().map(|path| Fetched::Uri(file_uri(&path)))),
            FetchKey::Ndarray => Some(decode(handle)),
            _ => None,
        }
    }

    fn analyzers(&self) -> &'static [Analyzer] {
        &[
            Analyzer::Softwares,
            Analyzer::ColorAverage,
            Analyzer::FacialLandmarks,
            Analyzer::BarcodeZxing,
            Analyzer::BarcodeZbar,
        ]
    }
}

#[instrument(skip(handle), fields(path = %handle.path().display()))]
fn decode(handle: &FileHandle) -> Result<Fetched> {
    let max_bytes: u64 = handle.config("max_decompressed_size")?;
    let raster = handle.raster_path()?;
    let pixels = match handle.toolkit().decoder.decode(&raster, max_bytes) {
        Ok(pixels) => pixels,
        Err(err) if matches!(err.deref(), ErrorKind::ResourceLimit(_)) => {
            tracing::warn!(
                path = %handle.path().display(),
                max_decompressed_size = max_bytes,
                "Image is too large to decompress; raise max_decompressed_size to analyze it"
            );
            placeholder()
        },
        Err(err) => return Err(err),
    };
    Ok(Fetched::Pixels(Arc::new(pixels)))
}

/// `file://` URI with every byte outside the unreserved set (and `/`)
/// percent-encoded.
pub(crate) fn file_uri(path: &Path) -> String {
    let mut uri = String::from("file://");
    for &byte in path.as_os_str().as_encoded_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => uri.push(byte as char),
            _ => uri.push_str(&format!("%{byte:02X}")),
        }
    }
    uri
}

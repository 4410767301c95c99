use crate::error::{ErrorKind, Result};
use crate::facts::Facts;
use crate::handle::FileHandle;
use crate::tools::{PixelArray, ensure_downloaded};
use exn::{OptionExt, ResultExt};
use filemeta_geometry::{BarcodeRecord, parse_zxing_report};
use ndarray::{Array2, Ix2, Ix3};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::instrument;

const MAVEN: &str = "https://repo1.maven.org/maven2";
const ZXING_RUNNER: &str = "com.google.zxing.client.j2se.CommandLineRunner";

struct Jar {
    group: &'static str,
    name: &'static str,
    version: &'static str,
}
impl Jar {
    fn file_name(&self) -> String {
        format!("{}-{}.jar", self.name, self.version)
    }

    fn url(&self) -> String {
        format!("{MAVEN}/{}/{}/{}/{}", self.group, self.name, self.version, self.file_name())
    }
}

const ZXING_JARS: [Jar; 3] = [
    Jar { group: "com/google/zxing", name: "core", version: "3.2.1" },
    Jar { group: "com/google/zxing", name: "javase", version: "3.2.1" },
    Jar { group: "com/beust", name: "jcommander", version: "1.48" },
];

/// Paths of the zxing jars, downloading any that are missing.
fn zxing_jars(handle: &FileHandle) -> Result<Vec<PathBuf>> {
    let dir = handle.toolkit().settings().data_subdir("zxing").map_err(ErrorKind::config)?;
    ZXING_JARS
        .iter()
        .map(|jar| {
            let path = dir.join(jar.file_name());
            ensure_downloaded(handle.toolkit().downloader.as_ref(), &jar.url(), &path)?;
            Ok(path)
        })
        .collect()
}

#[instrument(skip(handle), fields(path = %handle.path().display(), barcodes))]
pub(super) fn barcode_zxing(handle: &FileHandle) -> Result<Facts> {
    let pixels = handle.pixels()?;
    let min_dimension: usize = handle.config("barcode_min_dimension")?;
    // zxing crashes on tiny images, and they can't hold a barcode anyway.
    if pixels.shape().iter().all(|&axis| axis < min_dimension) {
        tracing::debug!(shape = ?pixels.shape(), "Image too small for barcodes");
        return Ok(Facts::new());
    }

    let jars = zxing_jars(handle)?;
    let classpath = std::env::join_paths(&jars).or_raise(|| ErrorKind::Io(jars[0].clone()))?;
    let java: String = handle.config("java")?;
    let args: [OsString; 5] =
        ["-cp".into(), classpath, ZXING_RUNNER.into(), "--multi".into(), handle.zxing_uri()?.into()];
    let report = handle.toolkit().runner.run(&java, &args)?;

    let records = parse_zxing_report(&report).map_err(ErrorKind::geometry)?;
    tracing::Span::current().record("barcodes", records.len());
    barcode_facts("zxing:Barcodes", &records)
}

fn barcode_facts(key: &str, records: &[BarcodeRecord]) -> Result<Facts> {
    let mut facts = Facts::new();
    if !records.is_empty() {
        facts.insert_serialized(key, records)?;
    }
    Ok(facts)
}

/// ITU-R BT.709 luma, rounded to the nearest byte. Alpha is ignored.
fn to_grey(pixels: &PixelArray) -> Option<Array2<u8>> {
    match pixels.ndim() {
        2 => pixels.view().into_dimensionality::<Ix2>().ok().map(|grey| grey.to_owned()),
        3 => {
            let image = pixels.view().into_dimensionality::<Ix3>().ok()?;
            let (height, width, channels) = image.dim();
            if channels < 3 {
                return None;
            }
            Some(Array2::from_shape_fn((height, width), |(y, x)| {
                let luma = 0.2125 * f64::from(image[[y, x, 0]])
                    + 0.7154 * f64::from(image[[y, x, 1]])
                    + 0.0721 * f64::from(image[[y, x, 2]]);
                luma.round().clamp(0.0, 255.0) as u8
            }))
        },
        _ => None,
    }
}

#[instrument(skip(handle), fields(path = %handle.path().display(), barcodes))]
pub(super) fn barcode_zbar(handle: &FileHandle) -> Result<Facts> {
    let scanner = handle.toolkit().symbols.as_deref().ok_or_raise(|| ErrorKind::Unavailable("symbol scanner"))?;
    let pixels = handle.pixels()?;
    let Some(grey) = to_grey(&pixels) else {
        tracing::warn!(shape = ?pixels.shape(), "Barcodes can only be scanned in still images");
        return Ok(Facts::new());
    };
    let records: Vec<BarcodeRecord> = scanner.scan(grey.view())?.into_iter().map(BarcodeRecord::from).collect();
    tracing::Span::current().record("barcodes", records.len());
    barcode_facts("zbar:Barcodes", &records)
}

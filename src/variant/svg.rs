use crate::fetch::{FetchKey, Fetched};
use crate::error::Result;
use crate::handle::FileHandle;
use crate::variant::Layer;
use crate::variant::xcf::temporary_png;
use filemeta_config::{Options, Value, options};
use std::sync::Arc;
use tracing::instrument;

/// Vector images; rasterized to PNG before anything reads pixels.
pub(crate) struct SvgFile;

impl Layer for SvgFile {
    fn defaults(&self) -> Options {
        options([
            ("svg_rasterizer", Value::from("rsvg-convert")),
            ("raster_dpi", Value::from(90u32)),
            // Rasterized drawings tend to be small.
            ("detector_upsample_num_times", Value::from(1u32)),
        ])
    }

    fn produce(&self, handle: &FileHandle, key: FetchKey) -> Option<Result<Fetched>> {
        match key {
            FetchKey::FilenameRaster => Some(rasterize(handle)),
            _ => None,
        }
    }
}

#[instrument(skip(handle), fields(path = %handle.path().display()))]
fn rasterize(handle: &FileHandle) -> Result<Fetched> {
    let rasterizer: String = handle.config("svg_rasterizer")?;
    let dpi: u32 = handle.config("raster_dpi")?;
    let output = temporary_png()?;
    let args = [
        "--dpi-x".into(),
        dpi.to_string().into(),
        "--dpi-y".into(),
        dpi.to_string().into(),
        "-f".into(),
        "png".into(),
        "-o".into(),
        output.as_os_str().to_os_string(),
        handle.path().as_os_str().to_os_string(),
    ];
    handle.toolkit().runner.run(&rasterizer, &args)?;
    tracing::debug!(output = %output.display(), dpi, "Rasterized SVG image");
    Ok(Fetched::Converted(Arc::new(output)))
}

use crate::error::{ErrorKind, Result};
use crate::fetch::{FetchKey, Fetched};
use crate::handle::FileHandle;
use crate::variant::Layer;
use exn::ResultExt;
use filemeta_config::{Options, Value, options};
use std::sync::Arc;
use tempfile::TempPath;
use tracing::instrument;

/// GIMP's native format; flattened to PNG before anything reads pixels.
pub(crate) struct XcfFile;

impl Layer for XcfFile {
    fn defaults(&self) -> Options {
        options([("xcf_converter", Value::from("xcf2png"))])
    }

    fn produce(&self, handle: &FileHandle, key: FetchKey) -> Option<Result<Fetched>> {
        match key {
            FetchKey::FilenameRaster => Some(flatten(handle)),
            _ => None,
        }
    }
}

/// An empty `.png` in the system temp directory, removed on drop.
pub(crate) fn temporary_png() -> Result<TempPath> {
    let file = tempfile::Builder::new()
        .prefix("filemeta-")
        .suffix(".png")
        .tempfile()
        .or_raise(|| ErrorKind::Io(std::env::temp_dir()))?;
    Ok(file.into_temp_path())
}

#[instrument(skip(handle), fields(path = %handle.path().display()))]
fn flatten(handle: &FileHandle) -> Result<Fetched> {
    let converter: String = handle.config("xcf_converter")?;
    let output = temporary_png()?;
    let args = ["-o".into(), output.as_os_str().to_os_string(), handle.path().as_os_str().to_os_string()];
    handle.toolkit().runner.run(&converter, &args)?;
    tracing::debug!(output = %output.display(), "Flattened XCF image");
    Ok(Fetched::Converted(Arc::new(output)))
}

use crate::analyze::Analyzer;
use crate::error::{ErrorKind, Result};
use crate::fetch::{FetchKey, Fetched};
use crate::handle::FileHandle;
use crate::variant::Layer;
use exn::{OptionExt, ResultExt};
use filemeta_config::{Options, Value, options};
use serde_json::Map;
use std::sync::Arc;
use tracing::instrument;

/// Any file at all.
pub(crate) struct GenericFile;

impl Layer for GenericFile {
    fn defaults(&self) -> Options {
        options([("sniff_bytes", Value::from(8192u64)), ("exiftool", Value::from("exiftool"))])
    }

    fn produce(&self, handle: &FileHandle, key: FetchKey) -> Option<Result<Fetched>> {
        match key {
            FetchKey::Filename => Some(Ok(Fetched::Path(handle.path().to_path_buf()))),
            FetchKey::Exiftool => Some(exiftool(handle)),
            _ => None,
        }
    }

    fn analyzers(&self) -> &'static [Analyzer] {
        &[Analyzer::OsStat, Analyzer::Mimetype, Analyzer::Exiftool]
    }
}

/// `exiftool -j -a -G` prints a one-element JSON array with every tag,
/// duplicates included, keyed `Group:Tag`.
#[instrument(skip(handle), fields(path = %handle.path().display()))]
fn exiftool(handle: &FileHandle) -> Result<Fetched> {
    let program: String = handle.config("exiftool")?;
    let args = ["-j".into(), "-a".into(), "-G".into(), handle.path().as_os_str().to_os_string()];
    let output = handle.toolkit().runner.run(&program, &args)?;
    let parsed: Vec<Map<String, serde_json::Value>> =
        serde_json::from_str(&output).or_raise(|| ErrorKind::MalformedOutput(program.clone()))?;
    let tags = parsed.into_iter().next().ok_or_raise(|| ErrorKind::MalformedOutput(program.clone()))?;
    tracing::debug!(tags = tags.len(), "Parsed exiftool output");
    Ok(Fetched::Exif(Arc::new(tags)))
}

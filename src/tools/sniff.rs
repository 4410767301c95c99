use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

/// Determines a file's MIME type from its content.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, path: &Path) -> Result<String>;
}

const SNIFF_BYTES: u64 = 8192;
const XCF_MAGIC: &[u8] = b"gimp xcf ";
const FALLBACK: &str = "application/octet-stream";

/// Magic-byte detection through [`infer`], then a few heuristics for formats
/// it doesn't know about.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferSniffer;

impl MimeSniffer for InferSniffer {
    #[instrument(level = "debug", skip(self), fields(path = %path.display(), mime))]
    fn sniff(&self, path: &Path) -> Result<String> {
        let mut buffer = Vec::new();
        File::open(path)
            .and_then(|file| file.take(SNIFF_BYTES).read_to_end(&mut buffer))
            .or_raise(|| ErrorKind::Sniff(path.to_path_buf()))?;
        let mime = sniff_buffer(&buffer);
        tracing::Span::current().record("mime", mime);
        Ok(mime.to_string())
    }
}

fn sniff_buffer(buffer: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(buffer) {
        return kind.mime_type();
    }
    if buffer.starts_with(XCF_MAGIC) {
        return "image/x-xcf";
    }
    // A partial read may cut a multi-byte character in half.
    let text = match std::str::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) if err.error_len().is_none() => {
            std::str::from_utf8(&buffer[..err.valid_up_to()]).unwrap_or_default()
        },
        Err(_) => return FALLBACK,
    };
    if buffer.is_empty() || text.contains('\0') {
        return FALLBACK;
    }
    if text.trim_start_matches('\u{feff}').trim_start().starts_with('<') {
        "application/xml"
    } else {
        "text/plain"
    }
}

use crate::Packing;
use std::path::Path;

impl Packing {
    /// Detect packing from a file name (or URL path) extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bz2") => Packing::Bzip2,
            _ => Packing::Plain,
        }
    }
}

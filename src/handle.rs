use crate::error::{ErrorKind, Result};
use crate::fetch::{FetchKey, Fetched};
use crate::tools::{PixelArray, Toolkit};
use crate::variant::Kind;
use exn::{OptionExt, ResultExt};
use filemeta_config::{Layered, Options};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// One file under analysis.
///
/// Values are fetched by [`FetchKey`] and cached for the lifetime of the
/// handle: the first fetch computes, every later fetch of the same key hands
/// back the same value. Dropping the handle releases cached pixel buffers and
/// removes temporary raster conversions.
///
/// A handle is owned by one thread at a time; it is `Send` but not `Sync`.
pub struct FileHandle {
    path: PathBuf,
    kind: Kind,
    mime: OnceCell<String>,
    cache: RefCell<HashMap<FetchKey, Fetched>>,
    toolkit: Arc<Toolkit>,
}

impl Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("mime", &self.mime.get())
            .field("cached", &self.cache.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FileHandle {
    /// A handle of an explicit variant, skipping type detection.
    ///
    /// Prefer [`create`](crate::create), which picks the most specific
    /// variant for the file's content.
    pub fn new(path: impl AsRef<Path>, kind: Kind, toolkit: Arc<Toolkit>) -> Result<Self> {
        let path = path.as_ref();
        let path = std::path::absolute(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        Ok(Self { path, kind, mime: OnceCell::new(), cache: RefCell::default(), toolkit })
    }

    /// The same file as another variant. The sniffed type carries over,
    /// cached values don't.
    pub(crate) fn into_kind(self, kind: Kind) -> Self {
        Self { kind, cache: RefCell::default(), ..self }
    }

    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    /// The file's MIME type, sniffed on first use.
    pub fn mime(&self) -> Result<&str> {
        if let Some(mime) = self.mime.get() {
            return Ok(mime.as_str());
        }
        let sniffed = self.toolkit.sniffer.sniff(&self.path)?;
        tracing::debug!(path = %self.path.display(), mime = %sniffed, "Sniffed file type");
        Ok(self.mime.get_or_init(|| sniffed).as_str())
    }

    /// Resolve `key`, computing it on first use.
    ///
    /// # Errors
    ///
    /// [`UnsupportedKey`](ErrorKind::UnsupportedKey) if no layer of this
    /// handle's variant produces `key`; otherwise whatever the producer fails
    /// with. Failures aren't cached.
    #[instrument(skip(self), fields(path = %self.path.display(), kind = %self.kind))]
    pub fn fetch(&self, key: FetchKey) -> Result<Fetched> {
        if let Some(cached) = self.cache.borrow().get(&key).cloned() {
            tracing::trace!("Cache hit");
            return Ok(cached);
        }
        // Producers may fetch other keys, so the cache can't stay borrowed here.
        let produced = self.produce(key)?;
        let mut cache = self.cache.borrow_mut();
        Ok(cache.entry(key).or_insert(produced).clone())
    }

    /// [`fetch`](Self::fetch) by key name.
    pub fn fetch_named(&self, key: &str) -> Result<Fetched> {
        self.fetch(key.parse::<FetchKey>()?)
    }

    fn produce(&self, key: FetchKey) -> Result<Fetched> {
        for layer in self.kind.lineage().iter().rev() {
            if let Some(produced) = layer.produce(self, key) {
                return produced;
            }
        }
        exn::bail!(ErrorKind::UnsupportedKey(key.to_string()));
    }

    /// Path of the raster rendition (`filename_raster`).
    pub fn raster_path(&self) -> Result<PathBuf> {
        let fetched = self.fetch(FetchKey::FilenameRaster)?;
        let path = fetched.as_path().ok_or_raise(|| ErrorKind::UnsupportedKey(FetchKey::FilenameRaster.to_string()))?;
        Ok(path.to_path_buf())
    }

    /// The decoded pixels (`ndarray`).
    pub fn pixels(&self) -> Result<Arc<PixelArray>> {
        let fetched = self.fetch(FetchKey::Ndarray)?;
        let pixels = fetched.as_pixels().ok_or_raise(|| ErrorKind::UnsupportedKey(FetchKey::Ndarray.to_string()))?;
        Ok(Arc::clone(pixels))
    }

    /// The `file://` URI of the raster rendition (`filename_zxing`).
    pub fn zxing_uri(&self) -> Result<String> {
        let fetched = self.fetch(FetchKey::FilenameZxing)?;
        let uri = fetched.as_uri().ok_or_raise(|| ErrorKind::UnsupportedKey(FetchKey::FilenameZxing.to_string()))?;
        Ok(uri.to_string())
    }

    /// Every exiftool tag (`exiftool`).
    pub fn exif(&self) -> Result<Arc<Map<String, Value>>> {
        let fetched = self.fetch(FetchKey::Exiftool)?;
        let exif = fetched.as_exif().ok_or_raise(|| ErrorKind::UnsupportedKey(FetchKey::Exiftool.to_string()))?;
        Ok(Arc::clone(exif))
    }

    /// Resolve an option through every layer of this handle's variant and
    /// the user's settings.
    pub fn config<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config_with(key, &Options::new())
    }

    /// Like [`config`](Self::config), with `local` taking precedence over
    /// everything else.
    ///
    /// # Errors
    ///
    /// - [`UnknownConfigKey`](ErrorKind::UnknownConfigKey) if nothing defines `key`.
    /// - [`InvalidConfigValue`](ErrorKind::InvalidConfigValue) if the value
    ///   doesn't deserialize into `T`.
    pub fn config_with<T: DeserializeOwned>(&self, key: &str, local: &Options) -> Result<T> {
        self.kind
            .lineage()
            .iter()
            .fold(Layered::new(), |layered, layer| layered.layer(&layer.defaults()))
            .layer(&self.toolkit.settings.options)
            .layer(local)
            .get(key)
            .map_err(ErrorKind::config)
    }

    /// Up to `limit` bytes from the start of the file.
    pub fn head(&self, limit: u64) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        File::open(&self.path)
            .and_then(|file| file.take(limit).read_to_end(&mut buffer))
            .or_raise(|| ErrorKind::Io(self.path.clone()))?;
        Ok(buffer)
    }

    /// Whether the file is SVG: by MIME type, or XML/text that carries the
    /// `.svg` extension or whose root element is `<svg>`.
    pub fn looks_like_svg(&self) -> Result<bool> {
        let mime = self.mime()?;
        if mime == "image/svg+xml" {
            return Ok(true);
        }
        let textual = mime.starts_with("text/") || mime == "application/xml" || mime.ends_with("+xml");
        if !textual {
            return Ok(false);
        }
        if self.path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("svg")) {
            return Ok(true);
        }
        let sniff_bytes: u64 = self.config("sniff_bytes")?;
        Ok(has_svg_root(&self.head(sniff_bytes)?))
    }
}

/// Whether the first element of `head` is `<svg>`. The XML declaration,
/// comments, processing instructions and a DOCTYPE may precede it.
fn has_svg_root(head: &[u8]) -> bool {
    let mut reader = Reader::from_reader(head);
    reader.trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => return e.local_name().as_ref() == b"svg",
            Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {},
            Ok(Event::Text(text)) if text.iter().all(u8::is_ascii_whitespace) => {},
            // Text, CDATA, a stray end tag, EOF or broken markup before any element.
            _ => return false,
        }
        buf.clear();
    }
}

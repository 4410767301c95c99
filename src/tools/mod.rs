//! Collaborators the handles delegate to.
//!
//! Each external concern sits behind a narrow trait so that tests (and
//! embedders) can swap in their own implementation. A [`Toolkit`] bundles one
//! of each, plus the process-wide [`Settings`], and is shared by every handle
//! created from it.

mod detect;
mod download;
mod palette;
mod pixels;
mod process;
mod sniff;

pub use crate::tools::detect::{Detection, FaceDetector, SymbolScanner};
pub use crate::tools::download::{Downloader, HttpDownloader};
pub use crate::tools::palette::{NamedPalette, Palette};
pub use crate::tools::pixels::{ImageDecoder, PixelArray, PixelDecoder};
pub use crate::tools::process::{CommandRunner, SystemRunner};
pub use crate::tools::sniff::{InferSniffer, MimeSniffer};

pub(crate) use crate::tools::download::ensure_downloaded;
pub(crate) use crate::tools::pixels::placeholder;

use filemeta_config::Settings;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Settings and collaborators shared by every handle.
///
/// ```rust
/// use filemeta::{Settings, Toolkit};
///
/// let toolkit = Toolkit::new(Settings::default().with_data_dir("/tmp/filemeta")).shared();
/// assert!(!toolkit.has_face_detector());
/// ```
pub struct Toolkit {
    pub(crate) settings: Settings,
    pub(crate) sniffer: Box<dyn MimeSniffer>,
    pub(crate) decoder: Box<dyn PixelDecoder>,
    pub(crate) runner: Box<dyn CommandRunner>,
    pub(crate) downloader: Box<dyn Downloader>,
    pub(crate) palette: Box<dyn Palette>,
    pub(crate) faces: Option<Box<dyn FaceDetector>>,
    pub(crate) symbols: Option<Box<dyn SymbolScanner>>,
}
impl Default for Toolkit {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
impl Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit")
            .field("settings", &self.settings)
            .field("faces", &self.faces.is_some())
            .field("symbols", &self.symbols.is_some())
            .finish_non_exhaustive()
    }
}
impl Toolkit {
    /// Default collaborators; no face detector and no symbol scanner.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            sniffer: Box::new(InferSniffer),
            decoder: Box::new(ImageDecoder),
            runner: Box::new(SystemRunner),
            downloader: Box::new(HttpDownloader),
            palette: Box::new(NamedPalette::default()),
            faces: None,
            symbols: None,
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn has_face_detector(&self) -> bool {
        self.faces.is_some()
    }

    pub fn has_symbol_scanner(&self) -> bool {
        self.symbols.is_some()
    }

    #[must_use]
    pub fn with_sniffer(mut self, sniffer: impl MimeSniffer + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: impl PixelDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    #[must_use]
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    #[must_use]
    pub fn with_downloader(mut self, downloader: impl Downloader + 'static) -> Self {
        self.downloader = Box::new(downloader);
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: impl Palette + 'static) -> Self {
        self.palette = Box::new(palette);
        self
    }

    #[must_use]
    pub fn with_face_detector(mut self, detector: impl FaceDetector + 'static) -> Self {
        self.faces = Some(Box::new(detector));
        self
    }

    #[must_use]
    pub fn with_symbol_scanner(mut self, scanner: impl SymbolScanner + 'static) -> Self {
        self.symbols = Some(Box::new(scanner));
        self
    }
}

//! Analyzers turn what a handle can fetch into [`Facts`].
//!
//! Expected dead ends (an animated image where only stills make sense, an
//! image too small to hold a barcode, nothing detected) log and produce no
//! facts. Anything unexpected is an error, and a failing analyzer never
//! contributes partial facts.

mod barcode;
mod color;
mod exif;
mod faces;
mod stat;

pub use crate::analyze::faces::{Face, Landmarks};

use crate::error::{Error, ErrorKind, Result};
use crate::facts::Facts;
use crate::handle::FileHandle;
use derive_more::Display;
use std::str::FromStr;
use tracing::instrument;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analyzer {
    /// `File:FileSize` and the file's timestamps.
    #[display("os_stat")]
    OsStat,
    /// `File:MIMEType`.
    #[display("mimetype")]
    Mimetype,
    /// Every exiftool tag.
    #[display("exiftool")]
    Exiftool,
    /// `Composite:Softwares`: the programs that produced the file.
    #[display("softwares")]
    Softwares,
    /// `Color:*`: average colour and its nearest named colour.
    #[display("color_average")]
    ColorAverage,
    /// `dlib:Faces`.
    #[display("facial_landmarks")]
    FacialLandmarks,
    /// `zxing:Barcodes`.
    #[display("barcode_zxing")]
    BarcodeZxing,
    /// `zbar:Barcodes`.
    #[display("barcode_zbar")]
    BarcodeZbar,
}
impl Analyzer {
    pub const ALL: [Analyzer; 8] = [
        Self::OsStat,
        Self::Mimetype,
        Self::Exiftool,
        Self::Softwares,
        Self::ColorAverage,
        Self::FacialLandmarks,
        Self::BarcodeZxing,
        Self::BarcodeZbar,
    ];

    /// Method-style name, e.g. `analyze_color_average`.
    pub fn method_name(&self) -> String {
        format!("analyze_{self}")
    }

    fn run(self, handle: &FileHandle) -> Result<Facts> {
        match self {
            Self::OsStat => stat::os_stat(handle),
            Self::Mimetype => stat::mimetype(handle),
            Self::Exiftool => exif::exiftool(handle),
            Self::Softwares => exif::softwares(handle),
            Self::ColorAverage => color::color_average(handle),
            Self::FacialLandmarks => faces::facial_landmarks(handle),
            Self::BarcodeZxing => barcode::barcode_zxing(handle),
            Self::BarcodeZbar => barcode::barcode_zbar(handle),
        }
    }

    /// Whether the toolkit has every collaborator this analyzer needs.
    fn is_available(self, handle: &FileHandle) -> bool {
        match self {
            Self::FacialLandmarks => handle.toolkit().has_face_detector(),
            Self::BarcodeZbar => handle.toolkit().has_symbol_scanner(),
            _ => true,
        }
    }
}
impl FromStr for Analyzer {
    type Err = Error;

    /// Accepts both `color_average` and `analyze_color_average`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.strip_prefix("analyze_").unwrap_or(s);
        Self::ALL.into_iter().find(|analyzer| analyzer.to_string() == name).ok_or_else(|| {
            Error::from(ErrorKind::UnsupportedAnalyzer { analyzer: s.to_string(), kind: "any".to_string() })
        })
    }
}

/// An analyzer that failed during [`FileHandle::analyze_all`].
#[derive(Debug)]
pub struct Failure {
    pub analyzer: Analyzer,
    pub error: Error,
}

/// Outcome of [`FileHandle::analyze_all`].
#[derive(Debug, Default)]
pub struct Analysis {
    /// Facts from every analyzer that succeeded, merged in run order.
    pub facts: Facts,
    pub failures: Vec<Failure>,
}
impl Analysis {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl FileHandle {
    /// Run one analyzer.
    ///
    /// # Errors
    ///
    /// [`UnsupportedAnalyzer`](ErrorKind::UnsupportedAnalyzer) if the
    /// analyzer doesn't apply to this handle's variant, otherwise whatever the
    /// analyzer fails with.
    #[instrument(skip(self), fields(path = %self.path().display(), kind = %self.kind(), facts))]
    pub fn analyze(&self, analyzer: Analyzer) -> Result<Facts> {
        if !self.kind().supports(analyzer) {
            exn::bail!(ErrorKind::UnsupportedAnalyzer { analyzer: analyzer.to_string(), kind: self.kind().to_string() });
        }
        let facts = analyzer.run(self)?;
        tracing::Span::current().record("facts", facts.len());
        Ok(facts)
    }

    /// Run every analyzer this handle's variant supports and whose
    /// collaborators are configured, merging their facts. A failing
    /// analyzer is logged and recorded; the others still run.
    #[instrument(skip(self), fields(path = %self.path().display(), kind = %self.kind()))]
    pub fn analyze_all(&self) -> Analysis {
        let mut analysis = Analysis::default();
        for analyzer in self.kind().analyzers() {
            if !analyzer.is_available(self) {
                tracing::debug!(%analyzer, "Skipping analyzer; collaborator not configured");
                continue;
            }
            match self.analyze(analyzer) {
                Ok(facts) => analysis.facts.merge(facts),
                Err(error) => {
                    tracing::warn!(%analyzer, error = %*error, "Analyzer failed");
                    analysis.failures.push(Failure { analyzer, error });
                },
            }
        }
        analysis
    }
}

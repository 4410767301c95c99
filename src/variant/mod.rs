//! File variants.
//!
//! Each variant is a [`Layer`] on top of a more general one: it can add
//! option defaults, produce fetch keys (overriding the layers below it) and
//! enable analyzers. A [`Kind`] names the most specific layer of a handle.

mod generic;
mod image;
mod jpeg;
mod svg;
mod xcf;

use crate::analyze::Analyzer;
use crate::error::Result;
use crate::fetch::{FetchKey, Fetched};
use crate::handle::FileHandle;
use derive_more::Display;
use filemeta_config::Options;

pub(crate) use crate::variant::generic::GenericFile;
pub(crate) use crate::variant::image::ImageFile;
pub(crate) use crate::variant::jpeg::JpegFile;
pub(crate) use crate::variant::svg::SvgFile;
pub(crate) use crate::variant::xcf::XcfFile;

pub(crate) trait Layer: Sync {
    /// Option defaults this layer adds or overrides.
    fn defaults(&self) -> Options {
        Options::new()
    }

    /// Produce `key`, or `None` to defer to the layer below.
    fn produce(&self, _handle: &FileHandle, _key: FetchKey) -> Option<Result<Fetched>> {
        None
    }

    /// Analyzers this layer enables, in addition to the ones below it.
    fn analyzers(&self) -> &'static [Analyzer] {
        &[]
    }
}

/// The variant a handle was created as.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    #[display("generic")]
    Generic,
    #[display("image")]
    Image,
    #[display("jpeg")]
    Jpeg,
    #[display("xcf")]
    Xcf,
    #[display("svg")]
    Svg,
}
impl Kind {
    /// Every layer of this variant, most general first.
    pub(crate) fn lineage(self) -> &'static [&'static dyn Layer] {
        match self {
            Self::Generic => &[&GenericFile],
            Self::Image => &[&GenericFile, &ImageFile],
            Self::Jpeg => &[&GenericFile, &ImageFile, &JpegFile],
            Self::Xcf => &[&GenericFile, &ImageFile, &XcfFile],
            Self::Svg => &[&GenericFile, &ImageFile, &SvgFile],
        }
    }

    /// Analyzers enabled anywhere in the lineage, most general first.
    pub fn analyzers(self) -> Vec<Analyzer> {
        self.lineage().iter().flat_map(|layer| layer.analyzers().iter().copied()).collect()
    }

    pub fn supports(self, analyzer: Analyzer) -> bool {
        self.lineage().iter().any(|layer| layer.analyzers().contains(&analyzer))
    }

    /// Whether this variant descends from the image variant.
    pub fn is_image(self) -> bool {
        !matches!(self, Self::Generic)
    }
}

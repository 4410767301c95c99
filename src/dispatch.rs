use crate::error::Result;
use crate::handle::FileHandle;
use crate::tools::Toolkit;
use crate::variant::Kind;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

enum Test {
    /// `image/*`, either XCF MIME type, or anything that looks like SVG.
    ImageFamily,
    Mime(&'static str),
    Xcf,
    Svg,
    Always,
}
impl Test {
    fn matches(&self, handle: &FileHandle) -> Result<bool> {
        Ok(match self {
            Self::ImageFamily => {
                let mime = handle.mime()?;
                mime.starts_with("image/") || is_xcf(mime) || handle.looks_like_svg()?
            },
            Self::Mime(expected) => handle.mime()? == *expected,
            Self::Xcf => is_xcf(handle.mime()?),
            Self::Svg => handle.looks_like_svg()?,
            Self::Always => true,
        })
    }
}

fn is_xcf(mime: &str) -> bool {
    matches!(mime.split_once('/'), Some(("image" | "application", "x-xcf")))
}

enum Target {
    Variant(Kind),
    /// Continue with a more specific table.
    Refine(&'static [Rule]),
}

struct Rule {
    test: Test,
    target: Target,
}

const GENERIC_RULES: &[Rule] = &[
    Rule { test: Test::ImageFamily, target: Target::Refine(IMAGE_RULES) },
    Rule { test: Test::Always, target: Target::Variant(Kind::Generic) },
];

const IMAGE_RULES: &[Rule] = &[
    Rule { test: Test::Mime("image/jpeg"), target: Target::Variant(Kind::Jpeg) },
    Rule { test: Test::Xcf, target: Target::Variant(Kind::Xcf) },
    Rule { test: Test::Svg, target: Target::Variant(Kind::Svg) },
    Rule { test: Test::Always, target: Target::Variant(Kind::Image) },
];

/// Open `path` as the most specific variant its content calls for.
///
/// ```rust,no_run
/// use filemeta::{Kind, Toolkit};
///
/// let toolkit = Toolkit::default().shared();
/// let file = filemeta::create("photo.jpg", toolkit)?;
/// assert_eq!(file.kind(), Kind::Jpeg);
/// # Ok::<(), filemeta::error::Error>(())
/// ```
#[instrument(skip(path, toolkit), fields(path = %path.as_ref().display(), kind))]
pub fn create(path: impl AsRef<Path>, toolkit: Arc<Toolkit>) -> Result<FileHandle> {
    let handle = FileHandle::new(path, Kind::Generic, toolkit)?;
    let mut rules = GENERIC_RULES;
    let kind = 'table: loop {
        for rule in rules {
            if rule.test.matches(&handle)? {
                match rule.target {
                    Target::Variant(kind) => break 'table kind,
                    Target::Refine(next) => {
                        rules = next;
                        continue 'table;
                    },
                }
            }
        }
        break Kind::Generic;
    };
    tracing::Span::current().record("kind", tracing::field::display(kind));
    tracing::debug!(mime = handle.mime()?, %kind, "Dispatched file");
    Ok(handle.into_kind(kind))
}

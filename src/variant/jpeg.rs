use crate::variant::Layer;

/// JPEG images; nothing beyond the image variant yet.
pub(crate) struct JpegFile;

impl Layer for JpegFile {}

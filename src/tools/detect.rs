use crate::error::Result;
use filemeta_geometry::Symbol;
use ndarray::{ArrayView2, ArrayView3};
use std::path::Path;

/// One face found by a [`FaceDetector`], corners inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub score: f64,
    /// The 68 shape points of the iBUG 300-W annotation, in order. Only
    /// present when a landmarks model was handed to the detector.
    pub shape: Option<Vec<(i64, i64)>>,
}

/// Frontal face detection, optionally with a 68-point shape predictor.
pub trait FaceDetector: Send + Sync {
    /// Find faces in an RGB image (`[height, width, 3]`).
    ///
    /// The image is upscaled `upsample` times before detection. When
    /// `landmarks_model` is given, every detection must carry its shape.
    fn detect(&self, rgb: ArrayView3<'_, u8>, upsample: u32, landmarks_model: Option<&Path>) -> Result<Vec<Detection>>;
}

/// zbar-style symbol scanning over a greyscale image (`[height, width]`).
pub trait SymbolScanner: Send + Sync {
    fn scan(&self, grey: ArrayView2<'_, u8>) -> Result<Vec<Symbol>>;
}

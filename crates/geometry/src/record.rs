use crate::{BoundingBox, Point};
use serde::Serialize;

/// Detection points exactly as reported, in detector order.
///
/// Each detector family keeps its own coordinate type: zxing reports
/// sub-pixel positions, zbar whole pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Points {
    Subpixel(Vec<Point>),
    Pixel(Vec<(i64, i64)>),
}
impl Points {
    pub fn len(&self) -> usize {
        match self {
            Self::Subpixel(points) => points.len(),
            Self::Pixel(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded symbol, independent of the detector that found it.
///
/// Field names serialize to the keys used in the `*:Barcodes` facts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarcodeRecord {
    /// Symbology, as named by the detector (`QR_CODE`, `EAN13`, `I25`, ...).
    pub format: String,
    /// Decoded text.
    pub data: String,
    /// Undecorated text, when the detector distinguishes it from `data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<String>,
    /// Detector-specific quality, when the detector reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(rename = "bounding box", skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    pub points: Points,
}

use crate::{BarcodeRecord, BoundingBox, Points};

/// A symbol as handed over by a zbar-style scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Symbology name (`QRCODE`, `EAN13`, `I25`, ...).
    pub format: String,
    pub data: String,
    /// Scanner quality score. Higher is better; the scale is scanner-specific.
    pub quality: i64,
    /// Outline polygon in whole pixels, any number of vertices.
    pub location: Vec<(i64, i64)>,
}

impl From<Symbol> for BarcodeRecord {
    fn from(symbol: Symbol) -> Self {
        Self {
            format: symbol.format,
            data: symbol.data,
            raw_data: None,
            confidence: Some(symbol.quality as f64),
            bounding_box: BoundingBox::enclosing(&symbol.location),
            points: Points::Pixel(symbol.location),
        }
    }
}

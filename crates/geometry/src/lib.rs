//! Canonical geometry for detected symbols.
//!
//! Two barcode detector families report positions differently:
//!
//! - **zxing** prints a text report per symbol with 2 (linear barcodes) or 4
//!   (matrix codes) floating-point corner points. See [`parse_zxing_report`].
//! - **zbar** hands over an integer polygon of any length, together with a
//!   quality score. See [`Symbol`].
//!
//! Both end up as a [`BarcodeRecord`]: the raw points plus a [`BoundingBox`]
//! derived from them. The two families use different extent conventions and
//! the normalizer keeps them apart:
//!
//! ```rust
//! use filemeta_geometry::{BoundingBox, Point};
//!
//! // zxing, two points: inclusive of both corner pixels.
//! let linear = BoundingBox::from_detection(&[Point::new(0.0, 0.0), Point::new(9.0, 9.0)]);
//! assert_eq!(linear, Some(BoundingBox { left: 0, top: 0, width: 10, height: 10 }));
//!
//! // zbar, any polygon: plain extent.
//! let polygon = BoundingBox::enclosing(&[(0, 0), (5, 5), (10, 0)]);
//! assert_eq!(polygon, Some(BoundingBox { left: 0, top: 0, width: 10, height: 5 }));
//! ```

mod bbox;
mod consts;
pub mod error;
mod record;
mod zbar;
mod zxing;

pub use crate::bbox::{BoundingBox, Point};
pub use crate::record::{BarcodeRecord, Points};
pub use crate::zbar::Symbol;
pub use crate::zxing::{NO_BARCODE_FOUND, parse_report as parse_zxing_report};

use serde::{Serialize, Serializer};

/// A detection point in image coordinates (top-left origin).
///
/// Serializes as an `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Truncate towards zero into whole pixels.
    fn pixel(&self) -> (i64, i64) {
        (self.x.trunc() as i64, self.y.trunc() as i64)
    }
}
impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x as f64, y as f64)
    }
}
impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.x, self.y).serialize(serializer)
    }
}

/// Axis-aligned rectangle in whole pixels, top-left origin.
///
/// `width` and `height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}
impl BoundingBox {
    fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Box spanned by two opposite corners, inclusive of both corner pixels.
    ///
    /// The corners may come in either order: a linear barcode read in the
    /// reverse direction reports its end point first.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (ax, ay) = a.pixel();
        let (bx, by) = b.pixel();
        Self::new(ax.min(bx), ay.min(by), (bx - ax).abs() + 1, (by - ay).abs() + 1)
    }

    /// Box covering a (possibly skewed) quadrilateral given in detector
    /// order: bottom-left, top-left, top-right, bottom-right.
    ///
    /// Each extent is the larger of the two opposite edges, so a slightly
    /// rotated symbol is never clipped.
    pub fn from_quadrilateral(bottom_left: Point, top_left: Point, top_right: Point, bottom_right: Point) -> Self {
        let (bl_x, bl_y) = bottom_left.pixel();
        let (tl_x, tl_y) = top_left.pixel();
        let (tr_x, tr_y) = top_right.pixel();
        let (br_x, br_y) = bottom_right.pixel();
        Self::new(
            bl_x.min(tl_x),
            tl_y.min(tr_y),
            (br_x - bl_x).max(tr_x - tl_x),
            (br_y - tr_y).max(bl_y - tl_y),
        )
    }

    /// Box for a zxing-style detection: 2 end points or 4 quadrilateral
    /// points. Any other count has no defined box.
    pub fn from_detection(points: &[Point]) -> Option<Self> {
        match *points {
            [first, second] => Some(Self::from_corners(first, second)),
            [bl, tl, tr, br] => Some(Self::from_quadrilateral(bl, tl, tr, br)),
            _ => None,
        }
    }

    /// Plain extent of an integer polygon, as reported by zbar-style scanners.
    ///
    /// Unlike [`from_corners`](Self::from_corners) there is no +1: these
    /// scanners already report the outer edge of the symbol.
    pub fn enclosing(points: &[(i64, i64)]) -> Option<Self> {
        let left = points.iter().map(|(x, _)| *x).min()?;
        let right = points.iter().map(|(x, _)| *x).max()?;
        let top = points.iter().map(|(_, y)| *y).min()?;
        let bottom = points.iter().map(|(_, y)| *y).max()?;
        Some(Self::new(left, top, right - left, bottom - top))
    }
}

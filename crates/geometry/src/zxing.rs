//! Parsing of the zxing `CommandLineRunner --multi` report.
//!
//! One block per detected symbol, blocks separated by a `file:` marker:
//!
//! ```text
//! file:/tmp/qr.png (format: QR_CODE, type: TEXT):
//! Raw result:
//! hello
//! Parsed result:
//! hello
//! Found 4 result points.
//!   Point 0: (35.5,135.5)
//!   Point 1: (35.5,35.5)
//!   Point 2: (135.5,35.5)
//!   Point 3: (120.5,120.5)
//! ```

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::{BarcodeRecord, BoundingBox, Point, Points};
use exn::{OptionExt, ResultExt};
use tracing::instrument;

/// Marker zxing prints instead of a block when nothing was decoded.
pub const NO_BARCODE_FOUND: &str = "No barcode found";

const BLOCK_SEPARATOR: &str = "\nfile:";
const RAW_HEADER: &str = "Raw result:";
const PARSED_HEADER: &str = "Parsed result:";

fn malformed(reason: impl Into<String>) -> impl FnOnce() -> ErrorKind {
    let reason = reason.into();
    move || ErrorKind::MalformedReport(reason)
}

/// Parse a full zxing report into one record per detected symbol.
///
/// A report containing [`NO_BARCODE_FOUND`] yields no records.
///
/// # Errors
///
/// [`MalformedReport`](ErrorKind::MalformedReport) if any block is missing
/// its format, its result sections, its point count, or one of its points.
#[instrument(skip(report), fields(report_size = report.len(), symbols))]
pub fn parse_report(report: &str) -> Result<Vec<BarcodeRecord>> {
    if report.contains(NO_BARCODE_FOUND) {
        tracing::Span::current().record("symbols", 0);
        return Ok(Vec::new());
    }
    if report.trim().is_empty() {
        exn::bail!(ErrorKind::MalformedReport("empty report".to_string()));
    }
    let records = report.split(BLOCK_SEPARATOR).map(parse_block).collect::<Result<Vec<_>>>()?;
    tracing::Span::current().record("symbols", records.len());
    Ok(records)
}

fn parse_block(block: &str) -> Result<BarcodeRecord> {
    let lines: Vec<&str> = block.trim().lines().collect();
    let header = lines.first().ok_or_raise(malformed("empty block"))?;
    let format = consts::FORMAT_REGEX
        .captures(header)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_raise(malformed(format!("no format in header: {header}")))?;

    let raw_at = lines.iter().position(|line| line.trim() == RAW_HEADER).ok_or_raise(malformed("no raw result"))?;
    let parsed_at = lines
        .iter()
        .skip(raw_at + 1)
        .position(|line| line.trim() == PARSED_HEADER)
        .map(|offset| raw_at + 1 + offset)
        .ok_or_raise(malformed("no parsed result"))?;
    let (count_at, count) = lines
        .iter()
        .enumerate()
        .skip(parsed_at + 1)
        .find_map(|(i, line)| consts::POINT_COUNT_REGEX.captures(line).map(|captures| (i, captures)))
        .map(|(i, captures)| (i, captures[1].to_string()))
        .ok_or_raise(malformed("no result point count"))?;
    let count = count.parse::<usize>().or_raise(malformed(format!("point count is not a number: {count}")))?;

    let points = lines
        .iter()
        .skip(count_at + 1)
        .take(count)
        .map(|line| parse_point(line))
        .collect::<Result<Vec<_>>>()?;
    if points.len() != count {
        exn::bail!(ErrorKind::MalformedReport(format!("expected {count} result points, found {}", points.len())));
    }

    Ok(BarcodeRecord {
        format,
        data: lines[parsed_at + 1..count_at].join("\n"),
        raw_data: Some(lines[raw_at + 1..parsed_at].join("\n")),
        confidence: None,
        bounding_box: BoundingBox::from_detection(&points),
        points: Points::Subpixel(points),
    })
}

fn parse_point(line: &str) -> Result<Point> {
    let captures = consts::POINT_REGEX.captures(line).ok_or_raise(malformed(format!("not a point: {line}")))?;
    let x = captures[1].parse::<f64>().or_raise(malformed(format!("bad x coordinate: {line}")))?;
    let y = captures[2].parse::<f64>().or_raise(malformed(format!("bad y coordinate: {line}")))?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const QR_REPORT: &str = "file:/tmp/qr.png (format: QR_CODE, type: URI):
Raw result:
http://example.org
Parsed result:
http://example.org
Found 4 result points.
  Point 0: (35.5,135.5)
  Point 1: (35.5,35.5)
  Point 2: (135.5,35.5)
  Point 3: (120.5,120.5)
";

    const MULTI_REPORT: &str = "file:/tmp/two.png (format: EAN_13, type: PRODUCT):
Raw result:
5901234123457
Parsed result:
5901234123457
Found 2 result points.
  Point 0: (21.5,40.0)
  Point 1: (180.5,40.0)
file:/tmp/two.png (format: DATA_MATRIX, type: TEXT):
Raw result:
first line
second line
Parsed result:
first line
second line
Found 4 result points.
  Point 0: (10.0,60.0)
  Point 1: (10.0,10.0)
  Point 2: (60.0,10.0)
  Point 3: (60.0,60.0)
";

    #[test]
    fn test_single_qr_code() {
        let records = parse_report(QR_REPORT).unwrap();
        assert_eq!(records.len(), 1);
        let qr = &records[0];
        assert_eq!(qr.format, "QR_CODE");
        assert_eq!(qr.data, "http://example.org");
        assert_eq!(qr.raw_data.as_deref(), Some("http://example.org"));
        assert_eq!(qr.confidence, None);
        assert_eq!(qr.points.len(), 4);
        assert!(matches!(&qr.points, Points::Subpixel(points) if points[0] == Point::new(35.5, 135.5)));
        assert_eq!(qr.bounding_box, Some(BoundingBox { left: 35, top: 35, width: 100, height: 100 }));
    }

    #[test]
    fn test_multiple_blocks() {
        let records = parse_report(MULTI_REPORT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].format, "EAN_13");
        assert_eq!(records[0].bounding_box, Some(BoundingBox { left: 21, top: 40, width: 160, height: 1 }));
        assert_eq!(records[1].format, "DATA_MATRIX");
        assert_eq!(records[1].data, "first line\nsecond line");
        assert_eq!(records[1].bounding_box, Some(BoundingBox { left: 10, top: 10, width: 50, height: 50 }));
    }

    #[rstest]
    #[case("file:/tmp/blank.png: No barcode found\n")]
    #[case("No barcode found")]
    fn test_no_barcode(#[case] report: &str) {
        assert!(parse_report(report).unwrap().is_empty());
    }

    #[test]
    fn test_three_points_has_no_bounding_box() {
        let report = "file:/tmp/a.png (format: QR_CODE, type: TEXT):
Raw result:
x
Parsed result:
x
Found 3 result points.
  Point 0: (1.0,2.0)
  Point 1: (3.0,4.0)
  Point 2: (5.0,6.0)
";
        let records = parse_report(report).unwrap();
        assert_eq!(records[0].bounding_box, None);
        assert_eq!(records[0].points.len(), 3);
    }

    #[rstest]
    #[case("")]
    #[case("file:/tmp/a.png (type: TEXT):\nRaw result:\nx\nParsed result:\nx\nFound 0 result points.\n")]
    #[case("file:/tmp/a.png (format: QR_CODE, type: TEXT):\nParsed result:\nx\nFound 0 result points.\n")]
    #[case("file:/tmp/a.png (format: QR_CODE, type: TEXT):\nRaw result:\nx\nParsed result:\nx\n")]
    #[case(
        "file:/tmp/a.png (format: QR_CODE, type: TEXT):\nRaw result:\nx\nParsed result:\nx\nFound 2 result points.\n  Point 0: (1.0,2.0)\n"
    )]
    #[case(
        "file:/tmp/a.png (format: QR_CODE, type: TEXT):\nRaw result:\nx\nParsed result:\nx\nFound 1 result points.\n  Point 0: (one,two)\n"
    )]
    fn test_malformed(#[case] report: &str) {
        let err = parse_report(report).unwrap_err();
        assert!(matches!(*err, ErrorKind::MalformedReport(_)));
    }

    #[test]
    fn test_record_serialization() {
        let records = parse_report(QR_REPORT).unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["format"], "QR_CODE");
        assert_eq!(json["bounding box"]["width"], 100);
        assert_eq!(json["points"][1], serde_json::json!([35.5, 35.5]));
        assert!(json.get("confidence").is_none());
    }
}

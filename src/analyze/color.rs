use crate::error::Result;
use crate::facts::Facts;
use crate::handle::FileHandle;
use crate::tools::PixelArray;
use ndarray::Axis;

/// Mean of the first three channels over every pixel (and frame); greyscale
/// is replicated into three channels. `None` for layouts without colour.
fn mean_rgb(pixels: &PixelArray) -> Option<[f64; 3]> {
    let spatial = match pixels.ndim() {
        2 => 2,
        3 | 4 => pixels.ndim() - 1,
        _ => return None,
    };
    // Collapse frames, rows and columns, leaving one mean per channel.
    let mut means = pixels.mapv(f64::from);
    for _ in 0..spatial {
        means = means.mean_axis(Axis(0))?;
    }
    match *means.as_slice()? {
        [grey] => Some([grey; 3]),
        [r, g, b, ..] => Some([r, g, b]),
        _ => None,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub(super) fn color_average(handle: &FileHandle) -> Result<Facts> {
    let pixels = handle.pixels()?;
    let Some(mean) = mean_rgb(&pixels) else {
        tracing::warn!(
            path = %handle.path().display(),
            shape = ?pixels.shape(),
            "Unsupported pixel layout for colour averaging; expected greyscale, RGB(A) or animated"
        );
        return Ok(Facts::new());
    };
    let (name, closest) = handle.toolkit().palette.closest(mean);
    let mut facts = Facts::new();
    facts.insert_serialized("Color:AverageRGB", &mean.map(round3))?;
    facts.insert("Color:ClosestLabeledColor", name);
    facts.insert_serialized("Color:ClosestLabeledColorRGB", &closest)?;
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::testing::{self, FixedDecoder};
    use crate::variant::Kind;
    use ndarray::IxDyn;
    use serde_json::json;

    #[test]
    fn test_solid_colour() {
        let dir = tempfile::tempdir().unwrap();
        let path = testing::write_png(dir.path(), "red.png", 3, 3, [250, 2, 4]);
        let file = crate::create(&path, testing::toolkit(dir.path()).shared()).unwrap();
        let facts = file.analyze(Analyzer::ColorAverage).unwrap();
        assert_eq!(facts.get("Color:AverageRGB"), Some(&json!([250.0, 2.0, 4.0])));
        assert_eq!(facts.get("Color:ClosestLabeledColor"), Some(&json!("Red")));
        assert_eq!(facts.get("Color:ClosestLabeledColorRGB"), Some(&json!([255, 0, 0])));
    }

    #[test]
    fn test_mean_drops_alpha() {
        // Two RGBA pixels: opaque black and transparent white.
        let pixels = PixelArray::from_shape_vec(IxDyn(&[1, 2, 4]), vec![0, 0, 0, 255, 255, 255, 255, 0]).unwrap();
        assert_eq!(mean_rgb(&pixels), Some([127.5, 127.5, 127.5]));
    }

    #[test]
    fn test_mean_over_frames() {
        let mut raw = vec![0u8; 2 * 4];
        raw.extend(std::iter::repeat_n([90u8, 60, 30, 255], 2).flatten());
        let pixels = PixelArray::from_shape_vec(IxDyn(&[2, 1, 2, 4]), raw).unwrap();
        assert_eq!(mean_rgb(&pixels), Some([45.0, 30.0, 15.0]));
    }

    #[test]
    fn test_greyscale_is_replicated() {
        let pixels = PixelArray::from_shape_vec(IxDyn(&[1, 3]), vec![10, 20, 31]).unwrap();
        let [r, g, b] = mean_rgb(&pixels).unwrap();
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(round3(r), 20.333);
    }

    #[test]
    fn test_two_channels_have_no_colour() {
        let pixels = PixelArray::from_shape_vec(IxDyn(&[1, 2, 2]), vec![10, 255, 20, 255]).unwrap();
        assert_eq!(mean_rgb(&pixels), None);
    }

    #[test]
    fn test_unsupported_layout_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = testing::write_png(dir.path(), "red.png", 1, 1, [255, 0, 0]);
        let toolkit = testing::toolkit(dir.path()).with_decoder(FixedDecoder(crate::tools::placeholder())).shared();
        let file = FileHandle::new(&path, Kind::Image, toolkit).unwrap();
        let (facts, warnings) = testing::count_warnings(|| file.analyze(Analyzer::ColorAverage));
        assert!(facts.unwrap().is_empty());
        assert_eq!(warnings, 1);
    }
}

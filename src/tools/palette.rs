/// Names a colour.
pub trait Palette: Send + Sync {
    /// The labelled colour nearest to `rgb` (channels in `0..=255`).
    fn closest(&self, rgb: [f64; 3]) -> (String, [u8; 3]);
}

/// A fixed table of named colours, matched by Euclidean distance in RGB.
#[derive(Debug, Clone)]
pub struct NamedPalette {
    colours: Vec<(String, [u8; 3])>,
}

const BUILTIN: &[(&str, [u8; 3])] = &[
    ("Black", [0, 0, 0]),
    ("Dim Grey", [105, 105, 105]),
    ("Grey", [128, 128, 128]),
    ("Silver", [192, 192, 192]),
    ("Light Grey", [211, 211, 211]),
    ("White", [255, 255, 255]),
    ("Maroon", [128, 0, 0]),
    ("Dark Red", [139, 0, 0]),
    ("Red", [255, 0, 0]),
    ("Crimson", [220, 20, 60]),
    ("Salmon", [250, 128, 114]),
    ("Pink", [255, 192, 203]),
    ("Hot Pink", [255, 105, 180]),
    ("Brown", [165, 42, 42]),
    ("Chocolate", [210, 105, 30]),
    ("Tan", [210, 180, 140]),
    ("Beige", [245, 245, 220]),
    ("Orange", [255, 165, 0]),
    ("Dark Orange", [255, 140, 0]),
    ("Gold", [255, 215, 0]),
    ("Yellow", [255, 255, 0]),
    ("Khaki", [240, 230, 140]),
    ("Olive", [128, 128, 0]),
    ("Lime", [0, 255, 0]),
    ("Green", [0, 128, 0]),
    ("Dark Green", [0, 100, 0]),
    ("Sea Green", [46, 139, 87]),
    ("Teal", [0, 128, 128]),
    ("Cyan", [0, 255, 255]),
    ("Turquoise", [64, 224, 208]),
    ("Sky Blue", [135, 206, 235]),
    ("Steel Blue", [70, 130, 180]),
    ("Blue", [0, 0, 255]),
    ("Navy", [0, 0, 128]),
    ("Indigo", [75, 0, 130]),
    ("Purple", [128, 0, 128]),
    ("Violet", [238, 130, 238]),
    ("Magenta", [255, 0, 255]),
    ("Lavender", [230, 230, 250]),
];

impl Default for NamedPalette {
    fn default() -> Self {
        Self::new(BUILTIN.iter().map(|(name, rgb)| (name.to_string(), *rgb)))
    }
}
impl NamedPalette {
    pub fn new(colours: impl IntoIterator<Item = (String, [u8; 3])>) -> Self {
        Self { colours: colours.into_iter().collect() }
    }
}

impl Palette for NamedPalette {
    fn closest(&self, rgb: [f64; 3]) -> (String, [u8; 3]) {
        let distance = |colour: &[u8; 3]| -> f64 {
            colour.iter().zip(rgb).map(|(&channel, target)| (f64::from(channel) - target).powi(2)).sum()
        };
        self.colours
            .iter()
            .min_by(|(_, a), (_, b)| distance(a).total_cmp(&distance(b)))
            .map(|(name, colour)| (name.clone(), *colour))
            .unwrap_or_else(|| ("Black".to_string(), [0, 0, 0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([255.0, 0.0, 0.0], "Red")]
    #[case([250.0, 5.0, 3.0], "Red")]
    #[case([1.0, 1.0, 1.0], "Black")]
    #[case([128.0, 128.0, 128.0], "Grey")]
    #[case([10.0, 10.0, 120.0], "Navy")]
    fn test_closest(#[case] rgb: [f64; 3], #[case] expected: &str) {
        assert_eq!(NamedPalette::default().closest(rgb).0, expected);
    }

    #[test]
    fn test_custom_palette() {
        let palette = NamedPalette::new([("Ink".to_string(), [20, 20, 40]), ("Paper".to_string(), [240, 240, 230])]);
        assert_eq!(palette.closest([200.0, 200.0, 200.0]), ("Paper".to_string(), [240, 240, 230]));
    }
}

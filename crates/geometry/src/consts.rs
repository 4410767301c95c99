use regex::Regex;
use std::sync::LazyLock;

const NUMBER: &str = r"-?\d*\.?\d+(?:[eE][-+]?\d+)?";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// First line of each block: `file:/tmp/a.png (format: QR_CODE, type: TEXT):`
regex!(FORMAT_REGEX, r"format:\s([^,]+)");
regex!(POINT_COUNT_REGEX, r"Found (\d+) result points?\.");
regex!(POINT_REGEX, format!(r"\(\s*({NUMBER})\s*,\s*({NUMBER})\s*\)").as_str());

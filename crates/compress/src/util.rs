use crate::Packing;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

impl Display for Packing {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Packing::Plain => "plain",
            Packing::Bzip2 => "bzip2",
        })
    }
}

impl Packing {
    /// Returns the file extension for this packing format.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Packing::Plain => "",
            Packing::Bzip2 => ".bz2",
        }
    }

    /// The path a packed file unpacks to: `model.dat.bz2` becomes `model.dat`.
    ///
    /// Paths that don't carry this format's extension are returned unchanged.
    #[must_use]
    pub fn unpacked_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let extension = self.extension();
        if extension.is_empty() {
            return path.to_path_buf();
        }
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name)
                if name.len() > extension.len()
                    && name.is_char_boundary(name.len() - extension.len())
                    && name[name.len() - extension.len()..].eq_ignore_ascii_case(extension) =>
            {
                path.with_file_name(&name[..name.len() - extension.len()])
            },
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Packing;
    use rstest::rstest;
    use std::path::Path;

    #[test]
    fn test_display() {
        assert_eq!(Packing::Bzip2.to_string(), "bzip2");
        assert_eq!(Packing::Plain.to_string(), "plain");
    }

    #[rstest]
    #[case(Packing::Bzip2, "/data/model.dat.bz2", "/data/model.dat")]
    #[case(Packing::Bzip2, "/data/model.dat.BZ2", "/data/model.dat")]
    #[case(Packing::Bzip2, "model.dat", "model.dat")]
    #[case(Packing::Plain, "core-3.2.1.jar", "core-3.2.1.jar")]
    #[case(Packing::Bzip2, ".bz2", ".bz2")]
    fn test_unpacked_path(#[case] format: Packing, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(format.unpacked_path(path), Path::new(expected));
    }
}

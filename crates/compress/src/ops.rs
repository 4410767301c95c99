//! Unpacking Operations

use crate::Packing;
use crate::error::{ErrorKind, Result};
use bzip2::read::BzDecoder;
use exn::ResultExt;
use std::fs::File;
use std::io::{BufReader, ErrorKind as IoErrorKind, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::instrument;

/// Decoders report corrupt input through the I/O error kind; anything else
/// is a genuine read/write failure.
fn classify(err: &std::io::Error) -> ErrorKind {
    match err.kind() {
        IoErrorKind::InvalidData | IoErrorKind::InvalidInput | IoErrorKind::UnexpectedEof => ErrorKind::InvalidData,
        _ => ErrorKind::Io,
    }
}

impl Packing {
    fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Packing::Plain => Box::new(reader),
            Packing::Bzip2 => Box::new(BzDecoder::new(reader)),
        }
    }

    fn unpack_stream<'a, R: Read + 'a, W: Write>(&self, reader: R, mut writer: W) -> Result<u64> {
        let mut reader = self.wrap_reader(reader);
        match std::io::copy(&mut reader, &mut writer) {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                let kind = classify(&err);
                Err(err).or_raise(|| kind)
            },
        }
    }

    /// Unpack the file at `source` into `destination`, returning the number
    /// of unpacked bytes.
    ///
    /// The unpacked data is staged in a temporary file next to the
    /// destination and renamed into place once complete, so a concurrent
    /// reader either sees nothing or the whole file.
    #[instrument(skip_all, fields(format = %self, source = %source.as_ref().display(), unpacked_size))]
    pub fn unpack_file(&self, source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<u64> {
        let destination = destination.as_ref();
        let directory = destination.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let input = File::open(source.as_ref()).or_raise(|| ErrorKind::Io)?;
        let mut staged = NamedTempFile::new_in(directory).or_raise(|| ErrorKind::Io)?;
        let bytes = self.unpack_stream(BufReader::new(input), staged.as_file_mut())?;
        staged.as_file().sync_all().or_raise(|| ErrorKind::Io)?;
        staged.persist(destination).or_raise(|| ErrorKind::Io)?;
        tracing::Span::current().record("unpacked_size", bytes);
        Ok(bytes)
    }
}

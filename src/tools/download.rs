use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::instrument;

/// Fetches a remote file onto local disk.
pub trait Downloader: Send + Sync {
    /// Download `url` into `destination`, replacing it if present.
    fn download(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Plain HTTP(S) downloads through [`ureq`].
///
/// The body is staged in a temporary file next to `destination` and moved
/// into place once complete, so a failed download never leaves a truncated
/// file behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    #[instrument(skip(self), fields(destination = %destination.display(), bytes))]
    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        let parent = destination.parent().ok_or_raise(|| ErrorKind::Io(destination.to_path_buf()))?;
        let mut staged = NamedTempFile::new_in(parent).or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
        let response = ureq::get(url).call().or_raise(|| ErrorKind::Download(url.to_string()))?;
        let bytes = std::io::copy(&mut response.into_reader(), &mut staged)
            .or_raise(|| ErrorKind::Download(url.to_string()))?;
        tracing::Span::current().record("bytes", bytes);
        staged.flush().or_raise(|| ErrorKind::Io(destination.to_path_buf()))?;
        staged.as_file().sync_all().or_raise(|| ErrorKind::Io(destination.to_path_buf()))?;
        staged.persist(destination).or_raise(|| ErrorKind::Io(destination.to_path_buf()))?;
        Ok(())
    }
}

/// Download `url` to `destination` unless it's already there.
///
/// Returns whether a download happened.
pub(crate) fn ensure_downloaded(downloader: &dyn Downloader, url: &str, destination: &Path) -> Result<bool> {
    if destination.exists() {
        tracing::trace!(destination = %destination.display(), "Auxiliary file already present");
        return Ok(false);
    }
    tracing::info!(url, destination = %destination.display(), "Downloading auxiliary file; the first run may take longer");
    downloader.download(url, destination)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);
    impl Downloader for Recording {
        fn download(&self, url: &str, destination: &Path) -> Result<()> {
            self.0.lock().unwrap().push(url.to_string());
            std::fs::write(destination, url).or_raise(|| ErrorKind::Io(destination.to_path_buf()))
        }
    }

    #[test]
    fn test_downloads_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("model.dat");
        let downloader = Recording::default();
        assert!(ensure_downloaded(&downloader, "http://example.org/model.dat", &destination).unwrap());
        assert!(!ensure_downloaded(&downloader, "http://example.org/model.dat", &destination).unwrap());
        assert_eq!(downloader.0.lock().unwrap().len(), 1);
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "http://example.org/model.dat");
    }

    #[test]
    fn test_unreachable_host_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("jar.jar");
        let err = HttpDownloader.download("http://127.0.0.1:9/missing.jar", &destination).unwrap_err();
        assert_eq!(*err, ErrorKind::Download("http://127.0.0.1:9/missing.jar".to_string()));
        assert!(!destination.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

//! Fixtures and fake collaborators shared by the unit tests.

use crate::error::{ErrorKind, Result};
use crate::tools::{CommandRunner, Downloader, ImageDecoder, PixelArray, PixelDecoder, Toolkit};
use exn::ResultExt;
use filemeta_config::Settings;
use image::{Rgb, RgbImage};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub(crate) fn settings(dir: &Path) -> Settings {
    Settings::default().with_data_dir(dir.join("data"))
}

pub(crate) fn toolkit(dir: &Path) -> Toolkit {
    Toolkit::new(settings(dir))
}

pub(crate) fn write_png(dir: &Path, name: &str, width: u32, height: u32, colour: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(colour)).save(&path).unwrap();
    path
}

pub(crate) fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub(crate) const SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="red"/></svg>
"#;

pub(crate) const XCF: &[u8] = b"gimp xcf v011\0\0\0\0\x08\0\0\0\x08\0\0\0\0";

type Call = (String, Vec<OsString>);
type Reply = Box<dyn Fn(&str, &[OsString]) -> Result<String> + Send + Sync>;

/// Records every invocation and answers with `reply`.
pub(crate) struct FakeRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    reply: Reply,
}
impl FakeRunner {
    pub(crate) fn new(reply: impl Fn(&str, &[OsString]) -> Result<String> + Send + Sync + 'static) -> Self {
        Self { calls: Arc::default(), reply: Box::new(reply) }
    }

    /// Prints `stdout` for every program.
    pub(crate) fn printing(stdout: &str) -> Self {
        let stdout = stdout.to_string();
        Self::new(move |_, _| Ok(stdout.clone()))
    }

    /// Behaves like a converter: writes an 8x8 PNG to the path after `-o`.
    pub(crate) fn converting(colour: [u8; 3]) -> Self {
        Self::new(move |program, args| {
            let output = args
                .iter()
                .position(|arg| arg == "-o")
                .and_then(|at| args.get(at + 1))
                .ok_or_else(|| exn::Exn::from(ErrorKind::ToolFailed(program.to_string())))?;
            RgbImage::from_pixel(8, 8, Rgb(colour))
                .save_with_format(output, image::ImageFormat::Png)
                .or_raise(|| ErrorKind::ToolFailed(program.to_string()))?;
            Ok(String::new())
        })
    }

    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }
}
impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<String> {
        self.calls.lock().unwrap().push((program.to_string(), args.to_vec()));
        (self.reply)(program, args)
    }
}

/// The real decoder, counting how often it's asked.
#[derive(Default)]
pub(crate) struct CountingDecoder {
    pub(crate) count: Arc<AtomicUsize>,
}
impl PixelDecoder for CountingDecoder {
    fn decode(&self, path: &Path, max_bytes: u64) -> Result<PixelArray> {
        self.count.fetch_add(1, Ordering::SeqCst);
        ImageDecoder.decode(path, max_bytes)
    }
}

/// Hands back a fixed array whatever the file.
pub(crate) struct FixedDecoder(pub(crate) PixelArray);
impl PixelDecoder for FixedDecoder {
    fn decode(&self, _path: &Path, _max_bytes: u64) -> Result<PixelArray> {
        Ok(self.0.clone())
    }
}

/// Writes `body(url)` to the destination and records the url.
pub(crate) struct FakeDownloader {
    urls: Arc<Mutex<Vec<String>>>,
    body: Box<dyn Fn(&str) -> Vec<u8> + Send + Sync>,
}
impl FakeDownloader {
    pub(crate) fn new(body: impl Fn(&str) -> Vec<u8> + Send + Sync + 'static) -> Self {
        Self { urls: Arc::default(), body: Box::new(body) }
    }

    pub(crate) fn urls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.urls)
    }
}
impl Downloader for FakeDownloader {
    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        std::fs::write(destination, (self.body)(url)).or_raise(|| ErrorKind::Io(destination.to_path_buf()))
    }
}

/// Counts `WARN` events.
#[derive(Clone, Default)]
pub(crate) struct WarnCounter(pub(crate) Arc<AtomicUsize>);
impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` and return its result along with the number of warnings it logged.
pub(crate) fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    use tracing_subscriber::layer::SubscriberExt;

    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.0.load(Ordering::SeqCst))
}

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ColorType, DynamicImage, ImageDecoder as _, ImageError, ImageFormat, ImageReader, Limits};
use ndarray::{ArrayD, IxDyn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::instrument;

/// Decoded pixels, one byte per channel.
///
/// - greyscale: `[height, width]`
/// - static colour: `[height, width, channels]` with 3 (RGB) or 4 (RGBA) channels
/// - animated: `[frames, height, width, 4]`
///
/// A guarded-out decode leaves the one-dimensional placeholder `[0]`.
pub type PixelArray = ArrayD<u8>;

pub(crate) fn placeholder() -> PixelArray {
    PixelArray::zeros(IxDyn(&[0]))
}

/// Turns a raster file into a [`PixelArray`].
pub trait PixelDecoder: Send + Sync {
    /// # Errors
    ///
    /// [`ResourceLimit`](ErrorKind::ResourceLimit) when decoding would
    /// allocate more than `max_bytes`.
    fn decode(&self, path: &Path, max_bytes: u64) -> Result<PixelArray>;
}

/// Decoding through the [`image`] crate, guarded by its allocation limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl PixelDecoder for ImageDecoder {
    #[instrument(skip(self), fields(path = %path.display(), shape))]
    fn decode(&self, path: &Path, max_bytes: u64) -> Result<PixelArray> {
        let mut limits = Limits::default();
        limits.max_alloc = Some(max_bytes);

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        let pixels = match reader.format() {
            Some(ImageFormat::Gif) => decode_gif(path, limits, max_bytes)?,
            _ => {
                let mut reader = reader;
                reader.limits(limits);
                let image = match reader.decode() {
                    Ok(image) => image,
                    Err(ImageError::Limits(err)) => return Err(err).or_raise(|| ErrorKind::ResourceLimit(max_bytes)),
                    Err(err) => return Err(err).or_raise(|| ErrorKind::Decode(path.to_path_buf())),
                };
                from_image(image).or_raise(|| ErrorKind::Decode(path.to_path_buf()))?
            },
        };
        tracing::Span::current().record("shape", format!("{:?}", pixels.shape()));
        Ok(pixels)
    }
}

fn from_image(image: DynamicImage) -> std::result::Result<PixelArray, ndarray::ShapeError> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    match image.color() {
        ColorType::L8 | ColorType::L16 => PixelArray::from_shape_vec(IxDyn(&[height, width]), image.into_luma8().into_raw()),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => {
            PixelArray::from_shape_vec(IxDyn(&[height, width, 3]), image.into_rgb8().into_raw())
        },
        // Grey with alpha has no array layout of its own.
        _ => PixelArray::from_shape_vec(IxDyn(&[height, width, 4]), image.into_rgba8().into_raw()),
    }
}

/// GIFs decode frame by frame; more than one frame gives an animated array.
fn decode_gif(path: &Path, limits: Limits, max_bytes: u64) -> Result<PixelArray> {
    let file = File::open(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    let mut decoder = GifDecoder::new(BufReader::new(file)).or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
    decoder.set_limits(limits).or_raise(|| ErrorKind::ResourceLimit(max_bytes))?;
    let (width, height) = decoder.dimensions();
    let (width, height) = (width as usize, height as usize);
    let frame_bytes = (width * height * 4) as u64;
    if frame_bytes > max_bytes {
        exn::bail!(ErrorKind::ResourceLimit(max_bytes));
    }

    let mut raw = Vec::new();
    let mut frames = 0usize;
    for frame in decoder.into_frames() {
        let frame = frame.or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
        frames += 1;
        if frames as u64 * frame_bytes > max_bytes {
            exn::bail!(ErrorKind::ResourceLimit(max_bytes));
        }
        raw.extend_from_slice(frame.buffer().as_raw());
    }
    let shape = match frames {
        0 => exn::bail!(ErrorKind::Decode(path.to_path_buf())),
        1 => vec![height, width, 4],
        _ => vec![frames, height, width, 4],
    };
    PixelArray::from_shape_vec(IxDyn(&shape), raw).or_raise(|| ErrorKind::Decode(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, GrayImage, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
    use image::ImageBuffer;

    const UNLIMITED: u64 = u64::MAX;

    #[test]
    fn test_rgb_is_three_dimensional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(5, 3, Rgb([255, 0, 0])).save(&path).unwrap();
        let pixels = ImageDecoder.decode(&path, UNLIMITED).unwrap();
        assert_eq!(pixels.shape(), &[3, 5, 3]);
        assert_eq!(pixels[[2, 4, 0]], 255);
        assert_eq!(pixels[[2, 4, 1]], 0);
    }

    #[test]
    fn test_grey_is_two_dimensional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        GrayImage::from_pixel(4, 6, image::Luma([128])).save(&path).unwrap();
        let pixels = ImageDecoder.decode(&path, UNLIMITED).unwrap();
        assert_eq!(pixels.shape(), &[6, 4]);
        assert!(pixels.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_grey_alpha_becomes_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey_alpha.png");
        ImageBuffer::<LumaA<u8>, _>::from_pixel(2, 2, LumaA([10, 200])).save(&path).unwrap();
        let pixels = ImageDecoder.decode(&path, UNLIMITED).unwrap();
        assert_eq!(pixels.shape(), &[2, 2, 4]);
        assert_eq!(pixels[[0, 0, 0]], 10);
        assert_eq!(pixels[[0, 0, 3]], 200);
    }

    #[test]
    fn test_animated_gif_is_four_dimensional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GifEncoder::new(file);
            let frames = [Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 255])].map(|colour| {
                Frame::from_parts(RgbaImage::from_pixel(4, 3, colour), 0, 0, Delay::from_numer_denom_ms(100, 1))
            });
            encoder.encode_frames(frames).unwrap();
        }
        let pixels = ImageDecoder.decode(&path, UNLIMITED).unwrap();
        assert_eq!(pixels.shape(), &[2, 3, 4, 4]);
    }

    #[test]
    fn test_allocation_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.png");
        RgbImage::from_pixel(100, 100, Rgb([1, 2, 3])).save(&path).unwrap();
        let err = ImageDecoder.decode(&path, 1000).unwrap_err();
        assert_eq!(*err, ErrorKind::ResourceLimit(1000));
    }

    #[test]
    fn test_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "definitely not pixels").unwrap();
        let err = ImageDecoder.decode(&path, UNLIMITED).unwrap_err();
        assert_eq!(*err, ErrorKind::Decode(path));
    }

    #[test]
    fn test_placeholder_shape() {
        assert_eq!(placeholder().shape(), &[0]);
        assert_eq!(placeholder().ndim(), 1);
    }
}

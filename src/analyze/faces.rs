use crate::error::{ErrorKind, Result};
use crate::facts::Facts;
use crate::handle::FileHandle;
use crate::tools::{Detection, PixelArray, ensure_downloaded};
use exn::OptionExt;
use filemeta_compress::Packing;
use filemeta_geometry::{BoundingBox, Point};
use ndarray::{Array3, Ix2, Ix3, s};
use serde::Serialize;
use std::path::PathBuf;
use tracing::instrument;

const LANDMARKS_ARCHIVE: &str = "shape_predictor_68_face_landmarks.dat.bz2";
const LANDMARKS_URL: &str = "http://dlib.net/files/shape_predictor_68_face_landmarks.dat.bz2";
const SHAPE_POINTS: usize = 68;

/// Centres of the facial features, from the 68-point shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Landmarks {
    pub nose: (i64, i64),
    pub left_eye: (i64, i64),
    pub right_eye: (i64, i64),
    pub mouth: (i64, i64),
}
impl Landmarks {
    fn from_shape(shape: &[(i64, i64)]) -> Option<Self> {
        if shape.len() != SHAPE_POINTS {
            return None;
        }
        let mid = |a: usize, b: usize| ((shape[a].0 + shape[b].0) / 2, (shape[a].1 + shape[b].1) / 2);
        Some(Self {
            // Tip of the nose.
            nose: shape[34],
            // Outer and inner corners of each eye, and the corners of the mouth.
            left_eye: mid(40, 37),
            right_eye: mid(46, 43),
            mouth: mid(49, 55),
        })
    }
}

/// One detected face, as reported in `dlib:Faces`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Face {
    pub position: BoundingBox,
    pub score: f64,
    #[serde(flatten)]
    pub landmarks: Option<Landmarks>,
}
impl Face {
    fn from_detection(detection: Detection, with_landmarks: bool) -> Result<Self> {
        let landmarks = if with_landmarks {
            let shape = detection.shape.as_deref().ok_or_raise(|| ErrorKind::MalformedOutput("face shape".to_string()))?;
            Some(Landmarks::from_shape(shape).ok_or_raise(|| {
                ErrorKind::MalformedOutput(format!("expected {SHAPE_POINTS} shape points, found {}", shape.len()))
            })?)
        } else {
            None
        };
        Ok(Self {
            position: BoundingBox::from_corners(
                Point::from((detection.left, detection.top)),
                Point::from((detection.right, detection.bottom)),
            ),
            score: detection.score,
            landmarks,
        })
    }
}

/// Three-channel copy of a still image; alpha is dropped and greyscale
/// replicated. `None` for animations and anything else.
fn to_rgb(pixels: &PixelArray) -> Option<Array3<u8>> {
    match pixels.ndim() {
        2 => {
            let grey = pixels.view().into_dimensionality::<Ix2>().ok()?;
            let (height, width) = grey.dim();
            Some(Array3::from_shape_fn((height, width, 3), |(y, x, _)| grey[[y, x]]))
        },
        3 => {
            let image = pixels.view().into_dimensionality::<Ix3>().ok()?;
            match image.dim().2 {
                3 => Some(image.to_owned()),
                4 => Some(image.slice(s![.., .., ..3]).to_owned()),
                _ => None,
            }
        },
        _ => None,
    }
}

/// The shape predictor model, downloaded and unpacked on first use.
fn landmarks_model(handle: &FileHandle) -> Result<PathBuf> {
    let settings = handle.toolkit().settings();
    let archive = settings.data_path(LANDMARKS_ARCHIVE).map_err(ErrorKind::config)?;
    let packing = Packing::from_path(&archive);
    let model = packing.unpacked_path(&archive);
    if model.exists() {
        return Ok(model);
    }
    ensure_downloaded(handle.toolkit().downloader.as_ref(), LANDMARKS_URL, &archive)?;
    let bytes = match packing.unpack_file(&archive, &model) {
        Ok(bytes) => bytes,
        Err(err) => {
            // Drop the corrupt download so the next run fetches it again.
            if let Err(remove) = std::fs::remove_file(&archive) {
                tracing::warn!(archive = %archive.display(), error = %remove, "Could not remove corrupt archive");
            }
            return Err(err.raise(ErrorKind::Unpack(archive)));
        },
    };
    tracing::info!(model = %model.display(), bytes, "Unpacked facial landmarks model");
    Ok(model)
}

#[instrument(skip(handle), fields(path = %handle.path().display(), faces))]
pub(super) fn facial_landmarks(handle: &FileHandle) -> Result<Facts> {
    let detector = handle.toolkit().faces.as_deref().ok_or_raise(|| ErrorKind::Unavailable("face detector"))?;
    let pixels = handle.pixels()?;
    let Some(rgb) = to_rgb(&pixels) else {
        tracing::warn!(shape = ?pixels.shape(), "Faces can only be detected in still images");
        return Ok(Facts::new());
    };
    let with_landmarks: bool = handle.config("facial_landmarks")?;
    let upsample: u32 = handle.config("detector_upsample_num_times")?;
    let model = if with_landmarks { Some(landmarks_model(handle)?) } else { None };

    let detections = detector.detect(rgb.view(), upsample, model.as_deref())?;
    tracing::Span::current().record("faces", detections.len());
    if detections.is_empty() {
        return Ok(Facts::new());
    }
    let faces = detections
        .into_iter()
        .map(|detection| Face::from_detection(detection, with_landmarks))
        .collect::<Result<Vec<_>>>()?;
    let mut facts = Facts::new();
    facts.insert_serialized("dlib:Faces", &faces)?;
    Ok(facts)
}

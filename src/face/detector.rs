//! Frontal face detection via rustface
//!
//! Wraps the SeetaFace frontal detector. The model file is an opaque
//! artifact loaded once at construction; detection itself runs on the raw
//! luma buffer.

use std::path::Path;

use rustface::ImageData;

use crate::constants::detection;
use crate::error::{DiagnosisError, Result};
use crate::face::FaceFinder;
use crate::types::{FaceBox, GrayImage};

/// SeetaFace frontal detector behind the [`FaceFinder`] seam.
pub struct SeetaFaceFinder {
    detector: Box<dyn rustface::Detector>,
}

impl std::fmt::Debug for SeetaFaceFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeetaFaceFinder").finish_non_exhaustive()
    }
}

impl SeetaFaceFinder {
    /// Load the detector model from disk and apply the pipeline tuning.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosisError::ModelLoad`] when the model file is missing
    /// or malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let path_str = path.to_str().ok_or_else(|| {
            DiagnosisError::model_load_msg(format!(
                "detector model path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        let mut detector = rustface::create_detector(path_str).map_err(|e| {
            DiagnosisError::model_load_msg(format!(
                "face detector model {}: {}",
                path.display(),
                e
            ))
        })?;

        detector.set_min_face_size(detection::MIN_FACE_SIZE);
        detector.set_score_thresh(detection::SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(detection::PYRAMID_SCALE_FACTOR);
        let (step_x, step_y) = detection::SLIDE_WINDOW_STEP;
        detector.set_slide_window_step(step_x, step_y);

        Ok(Self { detector })
    }
}

impl FaceFinder for SeetaFaceFinder {
    fn find_faces(&mut self, gray: &GrayImage) -> Vec<FaceBox> {
        let data = ImageData::new(gray.as_raw(), gray.width(), gray.height());
        let faces = self.detector.detect(&data);
        log::debug!("detector returned {} face(s)", faces.len());

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox::new(
                    bbox.x() as f32,
                    bbox.y() as f32,
                    bbox.width() as f32,
                    bbox.height() as f32,
                )
            })
            .collect()
    }
}

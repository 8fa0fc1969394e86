//! Face localization module
//!
//! Two collaborators feed the pipeline: a face detector producing bounding
//! boxes and a landmark model producing the 68-point shape inside a box.
//! Both sit behind traits so the pipeline can be exercised without model
//! files; the shipped implementations are [`SeetaFaceFinder`] (rustface)
//! and [`ErtLandmarkModel`] (regression-tree cascade).

pub mod detector;
pub mod predictor;

pub use detector::SeetaFaceFinder;
pub use predictor::ErtLandmarkModel;

use crate::constants::landmarks as idx;
use crate::error::{DiagnosisError, Result};
use crate::types::{FaceBox, GrayImage, Point};

/// Face detection collaborator.
///
/// Detection mutates internal detector state (image pyramids, score
/// buffers), hence `&mut self`; a detector must not be shared across
/// threads without external synchronization.
pub trait FaceFinder {
    /// All face boxes found in the luma image, detector order.
    fn find_faces(&mut self, gray: &GrayImage) -> Vec<FaceBox>;
}

/// Landmark prediction collaborator: face box to 68 ordered points.
pub trait LandmarkModel {
    fn predict(&self, gray: &GrayImage, face: &FaceBox) -> Landmarks;
}

/// An ordered 68-point landmark set with the fixed iBUG index-to-anatomy
/// mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    points: Vec<Point>,
}

impl Landmarks {
    /// Wrap a point list, enforcing the 68-point invariant.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() != idx::POINT_COUNT {
            return Err(DiagnosisError::Processing(format!(
                "landmark set has {} points, expected {}",
                points.len(),
                idx::POINT_COUNT
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn jaw(&self) -> &[Point] {
        &self.points[idx::JAW]
    }

    pub fn right_brow(&self) -> &[Point] {
        &self.points[idx::RIGHT_BROW]
    }

    pub fn left_brow(&self) -> &[Point] {
        &self.points[idx::LEFT_BROW]
    }

    pub fn nose(&self) -> &[Point] {
        &self.points[idx::NOSE]
    }

    pub fn right_eye(&self) -> &[Point] {
        &self.points[idx::RIGHT_EYE]
    }

    pub fn left_eye(&self) -> &[Point] {
        &self.points[idx::LEFT_EYE]
    }

    pub fn lips(&self) -> &[Point] {
        &self.points[idx::LIPS]
    }

    /// Left cheek recipe: nose-bridge run plus the left jaw run.
    pub fn left_cheek(&self) -> Vec<Point> {
        let mut pts = self.points[idx::CHEEK_BRIDGE].to_vec();
        pts.extend_from_slice(&self.points[idx::LEFT_CHEEK_JAW]);
        pts
    }

    /// Right cheek recipe: nose-bridge run plus the right jaw run.
    pub fn right_cheek(&self) -> Vec<Point> {
        let mut pts = self.points[idx::CHEEK_BRIDGE].to_vec();
        pts.extend_from_slice(&self.points[idx::RIGHT_CHEEK_JAW]);
        pts
    }
}

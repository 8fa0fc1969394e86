//! Landmark prediction with an ensemble-of-regression-trees cascade
//!
//! Implements the inference side of the Kazemi & Sullivan ERT scheme: the
//! mean face shape is scaled into the detected face box, then each cascade
//! stage reads sparse pixel-intensity-difference features around the
//! current estimate and sums per-tree shape corrections. The trained model
//! is an opaque bincode artifact.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::landmarks as idx;
use crate::error::{DiagnosisError, Result};
use crate::face::{LandmarkModel, Landmarks};
use crate::types::{FaceBox, GrayImage, Point};

/// A split feature: the intensity difference between two probe pixels,
/// each anchored to a landmark with a face-box-relative offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbePair {
    pub anchor_a: u16,
    pub offset_a: (f32, f32),
    pub anchor_b: u16,
    pub offset_b: (f32, f32),
}

/// A regression tree node; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal split: probe difference above the threshold goes left.
    Fork {
        pair: ProbePair,
        threshold: f32,
        left: u32,
        right: u32,
    },
    /// Leaf: per-landmark shape correction in normalized coordinates.
    Leaf { correction: Vec<(f32, f32)> },
}

/// A single regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Walk from the root to a leaf and return its correction.
    fn walk<F>(&self, probe: F) -> &[(f32, f32)]
    where
        F: Fn(&ProbePair) -> f32,
    {
        let mut node = 0usize;
        loop {
            match &self.nodes[node] {
                TreeNode::Fork {
                    pair,
                    threshold,
                    left,
                    right,
                } => {
                    node = if probe(pair) > *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
                TreeNode::Leaf { correction } => return correction,
            }
        }
    }
}

/// One cascade stage: a forest whose corrections are summed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeStage {
    pub trees: Vec<RegressionTree>,
}

/// Trained ERT landmark model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErtLandmarkModel {
    /// Mean face shape in normalized [0,1] face-box coordinates.
    mean_shape: Vec<Point>,
    /// Cascade stages applied in order.
    stages: Vec<CascadeStage>,
}

impl ErtLandmarkModel {
    /// Assemble a model from its parts, validating the point count.
    pub fn from_parts(mean_shape: Vec<Point>, stages: Vec<CascadeStage>) -> Result<Self> {
        if mean_shape.len() != idx::POINT_COUNT {
            return Err(DiagnosisError::model_load_msg(format!(
                "landmark model mean shape has {} points, expected {}",
                mean_shape.len(),
                idx::POINT_COUNT
            )));
        }
        Ok(Self { mean_shape, stages })
    }

    /// Load a model artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosisError::ModelLoad`] when the file is unreadable,
    /// fails to deserialize, or carries the wrong point count.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            DiagnosisError::model_load(format!("landmark model {}", path.display()), e)
        })?;
        let model: Self = bincode::deserialize_from(BufReader::new(file)).map_err(|e| {
            DiagnosisError::model_load(format!("landmark model {}", path.display()), e)
        })?;
        Self::from_parts(model.mean_shape, model.stages)
    }

    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Bilinear intensity sample at sub-pixel coordinates.
    fn sample(gray: &GrayImage, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = gray.get(x0, y0) as f32;
        let p10 = gray.get(x0 + 1, y0) as f32;
        let p01 = gray.get(x0, y0 + 1) as f32;
        let p11 = gray.get(x0 + 1, y0 + 1) as f32;

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bottom = p01 * (1.0 - fx) + p11 * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Intensity difference for one probe pair around the current shape.
    fn probe(gray: &GrayImage, face: &FaceBox, shape: &[Point], pair: &ProbePair) -> f32 {
        let a = shape[pair.anchor_a as usize];
        let b = shape[pair.anchor_b as usize];
        let ax = a.x + pair.offset_a.0 * face.width;
        let ay = a.y + pair.offset_a.1 * face.height;
        let bx = b.x + pair.offset_b.0 * face.width;
        let by = b.y + pair.offset_b.1 * face.height;
        Self::sample(gray, ax, ay) - Self::sample(gray, bx, by)
    }
}

impl LandmarkModel for ErtLandmarkModel {
    fn predict(&self, gray: &GrayImage, face: &FaceBox) -> Landmarks {
        // Mean shape scaled into the face box is the initial estimate
        let mut shape: Vec<Point> = self
            .mean_shape
            .iter()
            .map(|p| face.denormalize(*p))
            .collect();

        for stage in &self.stages {
            let mut delta = vec![Point::zero(); shape.len()];
            for tree in &stage.trees {
                let correction = tree.walk(|pair| Self::probe(gray, face, &shape, pair));
                for (d, c) in delta.iter_mut().zip(correction.iter()) {
                    d.x += c.0;
                    d.y += c.1;
                }
            }
            // Corrections are normalized; scale into image space
            for (p, d) in shape.iter_mut().zip(delta.iter()) {
                p.x += d.x * face.width;
                p.y += d.y * face.height;
            }
        }

        Landmarks::new(shape).expect("mean shape point count validated at load")
    }
}

//! Feature assembly for the season classifiers
//!
//! Condenses the palette and region samples into the fixed-order feature
//! vector the pretrained classifiers consume. The flattened layout,
//! the u8 truncation of cluster centers, the arithmetic hue mean, and the
//! second face-detection pass are all part of the training contract and
//! must not change without retraining the models.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::convert::{bgr_to_hsv, bgr_to_lab};
use crate::color::{cluster_bgr, ClusterParams};
use crate::constants::{clustering, contrast};
use crate::error::{DiagnosisError, Result};
use crate::extract::FacePalette;
use crate::face::FaceFinder;
use crate::types::{GrayImage, Rect};

/// The classifier input: named fields flattening to exactly ten numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// a channel of the mean lip color in 8-bit Lab
    pub lip_a: f32,
    /// Facial contrast score in [0, 1)
    pub contrast: f32,
    /// b channel of the mean skin color in 8-bit Lab
    pub skin_b: f32,
    /// Blue channel of the mean raw (unconverted) skin cluster center
    pub skin_blue: f32,
    /// Channel-wise mean of the palette in 8-bit HSV
    pub palette_hsv: [f32; 3],
    /// Channel-wise mean of the palette in 8-bit Lab
    pub palette_lab: [f32; 3],
}

impl FeatureVector {
    /// Flattened length of [`FeatureVector::to_array`].
    pub const LEN: usize = 10;

    /// Flatten into the frozen classifier order.
    pub fn to_array(&self) -> [f32; 10] {
        [
            self.lip_a,
            self.contrast,
            self.skin_b,
            self.skin_blue,
            self.palette_hsv[0],
            self.palette_hsv[1],
            self.palette_hsv[2],
            self.palette_lab[0],
            self.palette_lab[1],
            self.palette_lab[2],
        ]
    }
}

/// Assembles the feature vector from an extracted palette.
#[derive(Debug, Clone, Default)]
pub struct FeatureAssembler {
    clustering: ClusterParams,
}

impl FeatureAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the clustering parameters.
    pub fn with_clustering(mut self, params: ClusterParams) -> Self {
        self.clustering = params;
        self
    }

    /// Build the feature vector.
    ///
    /// Runs a second, independent detection pass over `gray` to crop the
    /// face for the contrast score; consolidating it with the extraction
    /// pass would change the feature values.
    ///
    /// # Errors
    ///
    /// - [`DiagnosisError::NoFaceDetected`] when the second pass finds no
    ///   face
    /// - [`DiagnosisError::EmptyRegion`] /
    ///   [`DiagnosisError::InsufficientPixels`] when a sample set cannot
    ///   support its clustering step
    pub fn assemble<D: FaceFinder>(
        &self,
        palette: &FacePalette,
        gray: &GrayImage,
        detector: &mut D,
    ) -> Result<FeatureVector> {
        // Palette means in both classifier color spaces
        let palette_u8: Vec<[u8; 3]> = palette.colors.iter().map(truncate_center).collect();
        let palette_hsv = mean_converted(&palette_u8, bgr_to_hsv);
        let palette_lab = mean_converted(&palette_u8, bgr_to_lab);

        // Skin tone: cheeks pooled, re-clustered, summarized twice (Lab
        // mean of truncated centers, raw mean of untruncated centers)
        let mut skin: Vec<[u8; 3]> = palette.left_cheek.clone();
        skin.extend_from_slice(&palette.right_cheek);
        let skin_centers = cluster_bgr(
            &skin,
            clustering::SKIN_CLUSTERS,
            &self.clustering,
            "cheeks",
        )?;
        let skin_u8: Vec<[u8; 3]> = skin_centers.iter().map(truncate_center).collect();
        let skin_lab = mean_converted(&skin_u8, bgr_to_lab);
        let skin_raw = mean_raw(&skin_centers);
        debug!("skin centers: lab mean {:?}, raw mean {:?}", skin_lab, skin_raw);

        // Lip tone
        let lip_centers = cluster_bgr(
            &palette.lips,
            clustering::LIP_CLUSTERS,
            &self.clustering,
            "lips",
        )?;
        let lip_u8: Vec<[u8; 3]> = lip_centers.iter().map(truncate_center).collect();
        let lip_lab = mean_converted(&lip_u8, bgr_to_lab);

        // Facial contrast over a fresh detection pass
        let faces = detector.find_faces(gray);
        let face = faces.first().ok_or(DiagnosisError::NoFaceDetected)?;
        let rect = face
            .clipped_rect(gray.width(), gray.height())
            .ok_or_else(|| {
                DiagnosisError::Processing("face box lies outside the image".to_string())
            })?;
        let contrast = contrast_score(gray, &rect);

        Ok(FeatureVector {
            lip_a: lip_lab[1],
            contrast,
            skin_b: skin_lab[2],
            skin_blue: skin_raw[0],
            palette_hsv,
            palette_lab,
        })
    }
}

/// Truncate a float cluster center to u8 channels (C-cast semantics, the
/// layout the classifiers were trained against).
fn truncate_center(center: &[f32; 3]) -> [u8; 3] {
    [
        center[0].clamp(0.0, 255.0) as u8,
        center[1].clamp(0.0, 255.0) as u8,
        center[2].clamp(0.0, 255.0) as u8,
    ]
}

/// Channel-wise mean after converting each entry with `convert`.
fn mean_converted(entries: &[[u8; 3]], convert: fn([u8; 3]) -> [u8; 3]) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    for entry in entries {
        let converted = convert(*entry);
        for (s, c) in sum.iter_mut().zip(converted.iter()) {
            *s += *c as f32;
        }
    }
    let n = entries.len().max(1) as f32;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Channel-wise mean of raw float centers.
fn mean_raw(centers: &[[f32; 3]]) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    for center in centers {
        for (s, c) in sum.iter_mut().zip(center.iter()) {
            *s += c;
        }
    }
    let n = centers.len().max(1) as f32;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Contrast score of a grayscale crop: the population variance of its
/// normalized 256-bin intensity histogram. Always in [0, 1).
pub fn contrast_score(gray: &GrayImage, rect: &Rect) -> f32 {
    let mut hist = [0.0f64; contrast::HISTOGRAM_BINS];
    for y in rect.y as u32..rect.y as u32 + rect.height {
        for x in rect.x as u32..rect.x as u32 + rect.width {
            hist[gray.get(x as i32, y as i32) as usize] += 1.0;
        }
    }

    let total: f64 = hist.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    for bin in hist.iter_mut() {
        *bin /= total;
    }

    let bins = contrast::HISTOGRAM_BINS as f64;
    let mean = hist.iter().sum::<f64>() / bins;
    let variance = hist.iter().map(|p| (p - mean) * (p - mean)).sum::<f64>() / bins;
    variance as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::FaceFinder;
    use crate::types::{FaceBox, GrayImage};

    const SKIN_BGR: [u8; 3] = [150, 170, 210];

    struct FixedFinder {
        faces: Vec<FaceBox>,
    }

    impl FaceFinder for FixedFinder {
        fn find_faces(&mut self, _gray: &GrayImage) -> Vec<FaceBox> {
            self.faces.clone()
        }
    }

    fn sample_palette() -> FacePalette {
        FacePalette {
            colors: vec![
                [150.0, 170.0, 210.0],
                [140.0, 160.0, 200.0],
                [155.0, 175.0, 215.0],
                [148.0, 168.0, 208.0],
            ],
            lips: vec![[120, 110, 200]; 30],
            left_cheek: vec![SKIN_BGR; 40],
            right_cheek: vec![[145, 165, 205]; 40],
        }
    }

    #[test]
    fn test_flatten_order() {
        let features = FeatureVector {
            lip_a: 1.0,
            contrast: 2.0,
            skin_b: 3.0,
            skin_blue: 4.0,
            palette_hsv: [5.0, 6.0, 7.0],
            palette_lab: [8.0, 9.0, 10.0],
        };
        assert_eq!(
            features.to_array(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
        );
        assert_eq!(features.to_array().len(), FeatureVector::LEN);
    }

    #[test]
    fn test_truncation_matches_c_cast() {
        assert_eq!(truncate_center(&[210.9, 0.4, 255.0]), [210, 0, 255]);
        assert_eq!(truncate_center(&[-3.0, 300.0, 127.5]), [0, 255, 127]);
    }

    #[test]
    fn test_contrast_uniform_crop() {
        let gray = GrayImage::from_fn(32, 32, |_, _| 77);
        let score = contrast_score(&gray, &Rect::new(0, 0, 32, 32));

        // All mass in one bin: variance of [1, 0, 0, ...] around 1/256
        let bins = 256.0f64;
        let mean = 1.0 / bins;
        let expected =
            ((1.0 - mean).powi(2) + (bins - 1.0) * mean * mean) / bins;
        assert!((score as f64 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_bounds() {
        let flat = GrayImage::from_fn(16, 16, |_, _| 200);
        let busy = GrayImage::from_fn(16, 16, |x, y| ((x * 16 + y) % 256) as u8);
        for gray in [flat, busy] {
            let score = contrast_score(&gray, &Rect::new(0, 0, 16, 16));
            assert!((0.0..1.0).contains(&score));
        }
    }

    #[test]
    fn test_concentrated_histogram_scores_higher() {
        // A concentrated histogram scores above a spread one
        let uniform = GrayImage::from_fn(16, 16, |_, _| 128);
        let spread = GrayImage::from_fn(16, 16, |x, y| (x * 16 + y) as u8);
        let rect = Rect::new(0, 0, 16, 16);
        assert!(contrast_score(&uniform, &rect) > contrast_score(&spread, &rect));
    }

    #[test]
    fn test_assemble_produces_contracted_ranges() {
        let gray = GrayImage::from_fn(100, 100, |x, _| (x * 2) as u8);
        let mut finder = FixedFinder {
            faces: vec![FaceBox::new(10.0, 10.0, 60.0, 60.0)],
        };

        let assembler = FeatureAssembler::new();
        let features = assembler
            .assemble(&sample_palette(), &gray, &mut finder)
            .unwrap();

        assert!((0.0..1.0).contains(&features.contrast));
        assert!((0.0..180.0).contains(&features.palette_hsv[0]));
        assert!((0.0..=255.0).contains(&features.palette_hsv[1]));
        assert!((0.0..=255.0).contains(&features.palette_hsv[2]));
        assert!((0.0..=255.0).contains(&features.skin_b));
        assert!((0.0..=255.0).contains(&features.skin_blue));
        assert!((0.0..=255.0).contains(&features.lip_a));
    }

    #[test]
    fn test_assemble_requires_face() {
        let gray = GrayImage::from_fn(50, 50, |_, _| 128);
        let mut finder = FixedFinder { faces: vec![] };
        let err = FeatureAssembler::new()
            .assemble(&sample_palette(), &gray, &mut finder)
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::NoFaceDetected));
    }

    #[test]
    fn test_assemble_rejects_empty_lips() {
        let gray = GrayImage::from_fn(50, 50, |_, _| 128);
        let mut finder = FixedFinder {
            faces: vec![FaceBox::new(5.0, 5.0, 30.0, 30.0)],
        };
        let mut palette = sample_palette();
        palette.lips.clear();

        let err = FeatureAssembler::new()
            .assemble(&palette, &gray, &mut finder)
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::EmptyRegion { .. }));
    }

    #[test]
    fn test_lip_a_reads_red_lips() {
        // Reddish lips push the Lab a channel above the +128 neutral point
        let gray = GrayImage::from_fn(50, 50, |_, _| 128);
        let mut finder = FixedFinder {
            faces: vec![FaceBox::new(5.0, 5.0, 30.0, 30.0)],
        };
        let features = FeatureAssembler::new()
            .assemble(&sample_palette(), &gray, &mut finder)
            .unwrap();
        assert!(features.lip_a > 128.0);
    }
}

//! Palette extraction from a portrait
//!
//! Locates the first face, predicts its landmarks, filters the six facial
//! regions down to skin-toned pixels, and clusters the pooled pixels into a
//! small representative palette. Multi-face images silently degrade to the
//! first detected face (documented limitation).

use log::debug;

use crate::color::{cluster_bgr, ClusterParams};
use crate::constants::clustering;
use crate::error::{DiagnosisError, Result};
use crate::face::{FaceFinder, LandmarkModel};
use crate::region::{skin_pixels, FaceRegion};
use crate::types::{BgrImage, GrayImage};

/// Label used when the pooled pixel set is empty.
const POOLED_REGION: &str = "pooled face regions";

/// Palette extraction result: the clustered palette plus the raw region
/// samples the feature assembly re-clusters.
#[derive(Debug, Clone)]
pub struct FacePalette {
    /// Cluster centers over the pooled regions, `[b, g, r]` in [0, 255]
    pub colors: Vec<[f32; 3]>,
    /// Skin-filtered lip pixels
    pub lips: Vec<[u8; 3]>,
    /// Skin-filtered left-cheek pixels
    pub left_cheek: Vec<[u8; 3]>,
    /// Skin-filtered right-cheek pixels
    pub right_cheek: Vec<[u8; 3]>,
}

/// Palette extractor holding the two face collaborators.
pub struct PaletteExtractor<D, L> {
    detector: D,
    predictor: L,
    n_colors: usize,
    clustering: ClusterParams,
}

impl<D: FaceFinder, L: LandmarkModel> PaletteExtractor<D, L> {
    /// Create an extractor with the default palette size.
    pub fn new(detector: D, predictor: L) -> Self {
        Self::with_n_colors(detector, predictor, clustering::DEFAULT_PALETTE_SIZE)
    }

    /// Create an extractor producing `n_colors` palette entries.
    pub fn with_n_colors(detector: D, predictor: L, n_colors: usize) -> Self {
        Self {
            detector,
            predictor,
            n_colors,
            clustering: ClusterParams::default(),
        }
    }

    /// Override the clustering parameters.
    pub fn with_clustering(mut self, params: ClusterParams) -> Self {
        self.clustering = params;
        self
    }

    pub fn n_colors(&self) -> usize {
        self.n_colors
    }

    /// Borrow the detector, for the assembly step's second detection pass.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Extract the palette and region samples from a loaded portrait.
    ///
    /// # Errors
    ///
    /// - [`DiagnosisError::NoFaceDetected`] when the detector finds no face
    /// - [`DiagnosisError::EmptyRegion`] when skin masking leaves no pixels
    ///   to cluster
    pub fn extract(&mut self, image: &BgrImage, gray: &GrayImage) -> Result<FacePalette> {
        let faces = self.detector.find_faces(gray);
        let face = faces.first().ok_or(DiagnosisError::NoFaceDetected)?;
        if faces.len() > 1 {
            debug!("{} faces detected, using the first", faces.len());
        }

        let landmarks = self.predictor.predict(gray, face);

        let mut samples = Vec::with_capacity(FaceRegion::EXTRACTION_ORDER.len());
        for region in FaceRegion::EXTRACTION_ORDER {
            let pixels = skin_pixels(image, &region.points(&landmarks));
            debug!("region {}: {} skin pixels", region.name(), pixels.len());
            samples.push(pixels);
        }

        let pooled: Vec<[u8; 3]> = samples.iter().flatten().copied().collect();
        if pooled.is_empty() {
            return Err(DiagnosisError::EmptyRegion {
                region: POOLED_REGION.to_string(),
            });
        }

        let colors = cluster_bgr(&pooled, self.n_colors, &self.clustering, POOLED_REGION)?;

        let mut samples = samples.into_iter();
        let _right_eye = samples.next();
        let _left_eye = samples.next();
        let lips = samples.next().unwrap_or_default();
        let left_cheek = samples.next().unwrap_or_default();
        let right_cheek = samples.next().unwrap_or_default();

        Ok(FacePalette {
            colors,
            lips,
            left_cheek,
            right_cheek,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{test_support, Landmarks};
    use crate::types::{FaceBox, Point};

    /// A BGR value inside the skin chroma range.
    const SKIN_BGR: [u8; 3] = [150, 170, 210];

    struct FixedFinder {
        faces: Vec<FaceBox>,
    }

    impl FaceFinder for FixedFinder {
        fn find_faces(&mut self, _gray: &GrayImage) -> Vec<FaceBox> {
            self.faces.clone()
        }
    }

    struct GridModel;

    impl LandmarkModel for GridModel {
        fn predict(&self, _gray: &GrayImage, face: &FaceBox) -> Landmarks {
            test_support::grid_landmarks(Point::new(face.x, face.y), 4.0)
        }
    }

    fn skin_portrait(size: u32) -> (BgrImage, GrayImage) {
        let image = BgrImage::from_fn(size, size, |_, _| SKIN_BGR);
        let gray = image.to_gray();
        (image, gray)
    }

    #[test]
    fn test_no_face_detected() {
        let (image, gray) = skin_portrait(80);
        let mut extractor = PaletteExtractor::new(FixedFinder { faces: vec![] }, GridModel);
        let err = extractor.extract(&image, &gray).unwrap_err();
        assert!(matches!(err, DiagnosisError::NoFaceDetected));
    }

    #[test]
    fn test_palette_has_n_colors() {
        let (image, gray) = skin_portrait(80);
        let finder = FixedFinder {
            faces: vec![FaceBox::new(10.0, 10.0, 40.0, 40.0)],
        };
        let mut extractor = PaletteExtractor::new(finder, GridModel);

        let palette = extractor.extract(&image, &gray).unwrap();
        assert_eq!(palette.colors.len(), clustering::DEFAULT_PALETTE_SIZE);
        assert!(!palette.lips.is_empty());
        assert!(!palette.left_cheek.is_empty());
        assert!(!palette.right_cheek.is_empty());
    }

    #[test]
    fn test_custom_palette_size() {
        let (image, gray) = skin_portrait(80);
        let finder = FixedFinder {
            faces: vec![FaceBox::new(10.0, 10.0, 40.0, 40.0)],
        };
        let mut extractor = PaletteExtractor::with_n_colors(finder, GridModel, 2);

        let palette = extractor.extract(&image, &gray).unwrap();
        assert_eq!(palette.colors.len(), 2);
    }

    #[test]
    fn test_non_skin_image_fails_with_empty_region() {
        // Saturated blue everywhere: every region masks to nothing
        let image = BgrImage::from_fn(80, 80, |_, _| [255, 0, 0]);
        let gray = image.to_gray();
        let finder = FixedFinder {
            faces: vec![FaceBox::new(10.0, 10.0, 40.0, 40.0)],
        };
        let mut extractor = PaletteExtractor::new(finder, GridModel);

        let err = extractor.extract(&image, &gray).unwrap_err();
        assert!(matches!(err, DiagnosisError::EmptyRegion { .. }));
    }

    #[test]
    fn test_first_face_wins() {
        // Second face sits outside the image; extraction must still succeed
        // because only the first box is used
        let (image, gray) = skin_portrait(80);
        let finder = FixedFinder {
            faces: vec![
                FaceBox::new(10.0, 10.0, 40.0, 40.0),
                FaceBox::new(500.0, 500.0, 40.0, 40.0),
            ],
        };
        let mut extractor = PaletteExtractor::new(finder, GridModel);
        assert!(extractor.extract(&image, &gray).is_ok());
    }

    #[test]
    fn test_palette_colors_near_skin_tone() {
        let (image, gray) = skin_portrait(80);
        let finder = FixedFinder {
            faces: vec![FaceBox::new(10.0, 10.0, 40.0, 40.0)],
        };
        let mut extractor = PaletteExtractor::new(finder, GridModel);

        let palette = extractor.extract(&image, &gray).unwrap();
        // Uniform input: every center sits near the (round-tripped) skin tone
        for center in &palette.colors {
            for (c, s) in center.iter().zip(SKIN_BGR.iter()) {
                assert!((c - *s as f32).abs() < 4.0, "center {:?}", center);
            }
        }
    }
}

//! # season_colors
//!
//! Personal-color season diagnosis from portrait photographs.
//!
//! This library extracts facial color features from a photo and feeds them
//! to pretrained classifiers to assign a season category:
//! - Locates the face and its 68 landmarks
//! - Carves out semantic regions (eyes, lips, cheeks, nose) and filters
//!   them to skin-toned pixels
//! - Clusters region colors into a representative palette
//! - Assembles a fixed-order feature vector across HSV and Lab summaries
//! - Classifies warm/cool, then the season pair, yielding one of
//!   `spr`, `sum`, `fal`, `win`
//!
//! Diagnosis is a one-shot, fail-fast pipeline: any failure aborts the
//! run, and the input image file is removed on success and on every
//! failure path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use season_colors::{diagnose, DiagnosisConfig};
//! use std::path::Path;
//!
//! let config = DiagnosisConfig::default();
//! let diagnosis = diagnose(Path::new("photo.jpg"), &config)?;
//! println!("Season: {}", diagnosis.season);
//! # Ok::<(), season_colors::DiagnosisError>(())
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use palette::Srgb;
use serde::{Deserialize, Serialize};

pub mod classify;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod face;
pub mod features;
pub mod image_loader;
pub mod region;
pub mod render;
pub mod types;

pub use classify::{BinaryModel, LinearModel, Season, SeasonClassifier, Undertone};
pub use config::DiagnosisConfig;
pub use error::{DiagnosisError, Result};
pub use extract::{FacePalette, PaletteExtractor};
pub use face::{ErtLandmarkModel, FaceFinder, LandmarkModel, Landmarks, SeetaFaceFinder};
pub use features::{FeatureAssembler, FeatureVector};

/// One palette entry in display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteSwatch {
    /// sRGB color for display purposes
    pub srgb: Srgb,
    /// Hexadecimal color representation
    pub hex: String,
}

/// Complete diagnosis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Assigned season
    pub season: Season,
    /// Warm/cool undertone from the first classification stage
    pub undertone: Undertone,
    /// The feature vector handed to the classifiers
    pub features: FeatureVector,
    /// Extracted palette in display form
    pub palette: Vec<PaletteSwatch>,
}

/// The assembled pipeline: extractor, assembler, and classifier sharing
/// one set of loaded models.
///
/// Methods take `&mut self` because face detection mutates detector state;
/// a `Diagnoser` serves one diagnosis at a time.
pub struct Diagnoser<D = SeetaFaceFinder, L = ErtLandmarkModel, M = LinearModel> {
    extractor: PaletteExtractor<D, L>,
    assembler: FeatureAssembler,
    classifier: SeasonClassifier<M>,
    palette_output: Option<PathBuf>,
}

impl Diagnoser<SeetaFaceFinder, ErtLandmarkModel, LinearModel> {
    /// Load every model named by the configuration and assemble the
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosisError::ModelLoad`] when any artifact is missing
    /// or malformed.
    pub fn from_config(config: &DiagnosisConfig) -> Result<Self> {
        let detector = SeetaFaceFinder::from_file(&config.models.face_detector)?;
        let predictor = ErtLandmarkModel::from_file(&config.models.landmarks)?;
        let classifier = SeasonClassifier::from_files(
            &config.models.warm_cool,
            &config.models.warm,
            &config.models.cool,
        )?;
        Ok(Self::new(detector, predictor, classifier, config))
    }
}

impl<D: FaceFinder, L: LandmarkModel, M: BinaryModel> Diagnoser<D, L, M> {
    /// Assemble a pipeline from already-loaded collaborators.
    pub fn new(
        detector: D,
        predictor: L,
        classifier: SeasonClassifier<M>,
        config: &DiagnosisConfig,
    ) -> Self {
        Self {
            extractor: PaletteExtractor::with_n_colors(detector, predictor, config.n_colors)
                .with_clustering(config.clustering),
            assembler: FeatureAssembler::new().with_clustering(config.clustering),
            classifier,
            palette_output: config.palette_output.clone(),
        }
    }

    /// Diagnose one photo.
    ///
    /// The input file is removed before this returns, on success and on
    /// every failure path; a removal failure is logged and never masks the
    /// diagnosis outcome.
    pub fn diagnose(&mut self, image_path: &Path) -> Result<Diagnosis> {
        let outcome = self.run(image_path);
        remove_input(image_path);
        outcome
    }

    fn run(&mut self, image_path: &Path) -> Result<Diagnosis> {
        let image = image_loader::load_image(image_path)?;
        let gray = image.to_gray();
        debug!(
            "loaded {} ({}x{})",
            image_path.display(),
            image.width(),
            image.height()
        );

        let palette = self.extractor.extract(&image, &gray)?;

        if let Some(path) = &self.palette_output {
            // Inspection artifact only; never fails the diagnosis
            if let Err(e) = render::render_palette_strip(&palette.colors, path) {
                warn!("palette strip not written: {e}");
            }
        }

        let features = self
            .assembler
            .assemble(&palette, &gray, self.extractor.detector_mut())?;
        let season = self.classifier.classify(&features)?;
        let undertone = season.undertone();
        info!("diagnosis result: {season}");

        let swatches = palette
            .colors
            .iter()
            .map(|center| {
                let bgr = [
                    center[0].clamp(0.0, 255.0) as u8,
                    center[1].clamp(0.0, 255.0) as u8,
                    center[2].clamp(0.0, 255.0) as u8,
                ];
                PaletteSwatch {
                    srgb: color::convert::bgr_to_srgb(bgr),
                    hex: color::convert::bgr_hex(bgr),
                }
            })
            .collect();

        Ok(Diagnosis {
            season,
            undertone,
            features,
            palette: swatches,
        })
    }
}

/// Diagnose one photo with freshly loaded models.
///
/// Convenience entry point for single calls; reuse a [`Diagnoser`] to keep
/// the models loaded across diagnoses.
pub fn diagnose(image_path: &Path, config: &DiagnosisConfig) -> Result<Diagnosis> {
    let mut diagnoser = Diagnoser::from_config(config)?;
    diagnoser.diagnose(image_path)
}

/// Remove the input image, tolerating a file that is already gone.
fn remove_input(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("removed input {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove input {}: {e}", path.display()),
    }
}

//! Configuration structures for the diagnosis pipeline.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed
//! programmatically:
//!
//! ```no_run
//! use season_colors::DiagnosisConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = DiagnosisConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = DiagnosisConfig::default();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The clustering section exists for experiments only: the seeds and
//! restart counts shipped in [`ClusterParams::default`] are part of the
//! classifier training contract.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::ClusterParams;
use crate::constants::clustering;

/// Complete pipeline configuration for a diagnosis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisConfig {
    /// Palette size produced by the extractor
    pub n_colors: usize,

    /// Where to write the palette strip image; `None` disables the artifact
    pub palette_output: Option<PathBuf>,

    /// Model artifact locations
    pub models: ModelPaths,

    /// Clustering parameters
    pub clustering: ClusterParams,
}

/// Locations of the opaque model artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPaths {
    /// SeetaFace frontal detector binary
    pub face_detector: PathBuf,

    /// ERT landmark cascade (bincode)
    pub landmarks: PathBuf,

    /// Warm/cool undertone model (bincode)
    pub warm_cool: PathBuf,

    /// Warm season-pair model: spring vs fall (bincode)
    pub warm: PathBuf,

    /// Cool season-pair model: summer vs winter (bincode)
    pub cool: PathBuf,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            n_colors: clustering::DEFAULT_PALETTE_SIZE,
            palette_output: None,
            models: ModelPaths {
                face_detector: PathBuf::from("models/seeta_fd_frontal_v1.0.bin"),
                landmarks: PathBuf::from("models/landmarks_68.bin"),
                warm_cool: PathBuf::from("models/warm_cool.bin"),
                warm: PathBuf::from("models/warm.bin"),
                cool: PathBuf::from("models/cool.bin"),
            },
            clustering: ClusterParams::default(),
        }
    }
}

impl DiagnosisConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

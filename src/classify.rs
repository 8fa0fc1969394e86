//! Two-stage season classification
//!
//! A warm/cool binary model routes the feature vector to one of two
//! season-pair models: cool resolves to summer or winter, warm to spring
//! or fall. Model internals stay behind the [`BinaryModel`] seam; the
//! shipped implementation is a linear decision function loaded from an
//! opaque bincode artifact.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DiagnosisError, Result};
use crate::features::FeatureVector;

/// A personal-color season. The wire labels are the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "spr")]
    Spring,
    #[serde(rename = "sum")]
    Summer,
    #[serde(rename = "fal")]
    Fall,
    #[serde(rename = "win")]
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// The three-letter wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "spr",
            Season::Summer => "sum",
            Season::Fall => "fal",
            Season::Winter => "win",
        }
    }

    /// The undertone branch this season belongs to.
    pub fn undertone(&self) -> Undertone {
        match self {
            Season::Spring | Season::Fall => Undertone::Warm,
            Season::Summer | Season::Winter => Undertone::Cool,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "spr" => Ok(Season::Spring),
            "sum" => Ok(Season::Summer),
            "fal" => Ok(Season::Fall),
            "win" => Ok(Season::Winter),
            other => Err(DiagnosisError::Processing(format!(
                "unknown season label '{other}'"
            ))),
        }
    }
}

/// Warm/cool undertone from the first classification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undertone {
    Warm,
    Cool,
}

/// A pretrained binary decision over the feature vector.
///
/// `true` selects class 1 of the stage's pair (warm for the undertone
/// stage; winter/fall for the season stages).
pub trait BinaryModel {
    fn decide(&self, features: &FeatureVector) -> Result<bool>;
}

/// A linear decision function: `dot(weights, features) + bias > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<f32>,
    bias: f32,
}

impl LinearModel {
    /// Build a model, validating the weight count against the feature
    /// contract.
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self> {
        if weights.len() != FeatureVector::LEN {
            return Err(DiagnosisError::model_load_msg(format!(
                "linear model has {} weights, feature vector has {}",
                weights.len(),
                FeatureVector::LEN
            )));
        }
        Ok(Self { weights, bias })
    }

    /// Load a model artifact from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            DiagnosisError::model_load(format!("classifier model {}", path.display()), e)
        })?;
        let model: Self = bincode::deserialize_from(BufReader::new(file)).map_err(|e| {
            DiagnosisError::model_load(format!("classifier model {}", path.display()), e)
        })?;
        Self::new(model.weights, model.bias)
    }
}

impl BinaryModel for LinearModel {
    fn decide(&self, features: &FeatureVector) -> Result<bool> {
        let score: f32 = self
            .weights
            .iter()
            .zip(features.to_array().iter())
            .map(|(w, f)| w * f)
            .sum::<f32>()
            + self.bias;
        Ok(score > 0.0)
    }
}

/// The two-stage classifier over a warm/cool model and two season-pair
/// models.
pub struct SeasonClassifier<M = LinearModel> {
    warm_cool: M,
    warm: M,
    cool: M,
}

impl SeasonClassifier<LinearModel> {
    /// Load all three model artifacts.
    pub fn from_files(warm_cool: &Path, warm: &Path, cool: &Path) -> Result<Self> {
        Ok(Self::new(
            LinearModel::from_file(warm_cool)?,
            LinearModel::from_file(warm)?,
            LinearModel::from_file(cool)?,
        ))
    }
}

impl<M: BinaryModel> SeasonClassifier<M> {
    pub fn new(warm_cool: M, warm: M, cool: M) -> Self {
        Self {
            warm_cool,
            warm,
            cool,
        }
    }

    /// Undertone from the first stage alone.
    pub fn undertone(&self, features: &FeatureVector) -> Result<Undertone> {
        Ok(if self.warm_cool.decide(features)? {
            Undertone::Warm
        } else {
            Undertone::Cool
        })
    }

    /// Map a feature vector to its season.
    pub fn classify(&self, features: &FeatureVector) -> Result<Season> {
        let undertone = self.undertone(features)?;
        let season = match undertone {
            Undertone::Cool => {
                if self.cool.decide(features)? {
                    Season::Winter
                } else {
                    Season::Summer
                }
            }
            Undertone::Warm => {
                if self.warm.decide(features)? {
                    Season::Fall
                } else {
                    Season::Spring
                }
            }
        };
        debug!("undertone {:?} resolved to {}", undertone, season);
        Ok(season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    impl BinaryModel for Fixed {
        fn decide(&self, _features: &FeatureVector) -> Result<bool> {
            Ok(self.0)
        }
    }

    fn features() -> FeatureVector {
        FeatureVector {
            lip_a: 150.0,
            contrast: 0.003,
            skin_b: 140.0,
            skin_blue: 150.0,
            palette_hsv: [10.0, 70.0, 210.0],
            palette_lab: [180.0, 140.0, 145.0],
        }
    }

    #[test]
    fn test_label_mapping_table() {
        // (warm_cool, pair decision) -> season
        let cases = [
            (false, false, Season::Summer),
            (false, true, Season::Winter),
            (true, false, Season::Spring),
            (true, true, Season::Fall),
        ];
        for (wc, pair, expected) in cases {
            let classifier = SeasonClassifier::new(Fixed(wc), Fixed(pair), Fixed(pair));
            assert_eq!(classifier.classify(&features()).unwrap(), expected);
        }
    }

    #[test]
    fn test_undertone_stage() {
        let warm = SeasonClassifier::new(Fixed(true), Fixed(false), Fixed(false));
        assert_eq!(warm.undertone(&features()).unwrap(), Undertone::Warm);

        let cool = SeasonClassifier::new(Fixed(false), Fixed(false), Fixed(false));
        assert_eq!(cool.undertone(&features()).unwrap(), Undertone::Cool);
    }

    #[test]
    fn test_season_undertone_branches() {
        assert_eq!(Season::Spring.undertone(), Undertone::Warm);
        assert_eq!(Season::Fall.undertone(), Undertone::Warm);
        assert_eq!(Season::Summer.undertone(), Undertone::Cool);
        assert_eq!(Season::Winter.undertone(), Undertone::Cool);
    }

    #[test]
    fn test_season_labels() {
        assert_eq!(Season::Spring.label(), "spr");
        assert_eq!(Season::Summer.label(), "sum");
        assert_eq!(Season::Fall.label(), "fal");
        assert_eq!(Season::Winter.label(), "win");
    }

    #[test]
    fn test_season_label_round_trip() {
        for season in Season::ALL {
            assert_eq!(season.label().parse::<Season>().unwrap(), season);
        }
        assert!("autumn".parse::<Season>().is_err());
    }

    #[test]
    fn test_season_serde_uses_wire_labels() {
        assert_eq!(serde_json::to_string(&Season::Winter).unwrap(), "\"win\"");
        let parsed: Season = serde_json::from_str("\"spr\"").unwrap();
        assert_eq!(parsed, Season::Spring);
    }

    #[test]
    fn test_linear_model_weight_count() {
        assert!(LinearModel::new(vec![0.0; FeatureVector::LEN], 0.0).is_ok());
        let err = LinearModel::new(vec![0.0; 3], 0.0).unwrap_err();
        assert!(matches!(err, DiagnosisError::ModelLoad { .. }));
    }

    #[test]
    fn test_linear_model_decision_boundary() {
        // Weight only the contrast component
        let mut weights = vec![0.0; FeatureVector::LEN];
        weights[1] = 1.0;

        let above = LinearModel::new(weights.clone(), 0.0).unwrap();
        assert!(above.decide(&features()).unwrap());

        let below = LinearModel::new(weights, -1.0).unwrap();
        assert!(!below.decide(&features()).unwrap());
    }

    #[test]
    fn test_linear_model_file_round_trip() {
        let model = LinearModel::new(vec![0.5; FeatureVector::LEN], -2.0).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warm_cool.bin");
        std::fs::write(&path, bincode::serialize(&model).unwrap()).unwrap();

        let loaded = LinearModel::from_file(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_missing_model_file() {
        let err = LinearModel::from_file(Path::new("missing.bin")).unwrap_err();
        assert!(matches!(err, DiagnosisError::ModelLoad { .. }));
    }
}

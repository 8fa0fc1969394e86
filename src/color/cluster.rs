//! Seeded k-means clustering over region pixel sets
//!
//! Wraps `kmeans_colors` with the deterministic restart policy the feature
//! contract requires: a fixed base seed, a fixed number of independent
//! initializations, and the lowest within-cluster-sum-of-squares solution
//! kept. Given identical pixels, seed, and k, two runs return identical
//! centers (center order is not canonical).

use kmeans_colors::{get_kmeans, Kmeans};
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::constants::clustering;
use crate::error::{DiagnosisError, Result};

/// Deterministic clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Base seed; restart `i` runs with `seed + i`
    pub seed: u64,
    /// Independent initializations, best score kept
    pub restarts: usize,
    /// Iteration cap per run
    pub max_iterations: usize,
    /// Convergence threshold on center movement
    pub convergence: f32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            seed: clustering::SEED,
            restarts: clustering::RESTARTS,
            max_iterations: clustering::MAX_ITERATIONS,
            convergence: clustering::CONVERGENCE,
        }
    }
}

/// Cluster BGR pixels into `k` representative colors.
///
/// Pixels are scaled into unit-range color points for the solver; centers
/// are returned unscaled as `[b, g, r]` in [0, 255]. Scaling is uniform, so
/// cluster assignments match clustering the raw byte values.
///
/// # Errors
///
/// Returns [`DiagnosisError::EmptyRegion`] when `pixels` is empty and
/// [`DiagnosisError::InsufficientPixels`] when fewer than `k` pixels are
/// available; `region` only labels the error.
pub fn cluster_bgr(
    pixels: &[[u8; 3]],
    k: usize,
    params: &ClusterParams,
    region: &str,
) -> Result<Vec<[f32; 3]>> {
    if k == 0 {
        return Err(DiagnosisError::Processing(
            "cluster count must be at least 1".to_string(),
        ));
    }
    if pixels.is_empty() {
        return Err(DiagnosisError::EmptyRegion {
            region: region.to_string(),
        });
    }
    if pixels.len() < k {
        return Err(DiagnosisError::InsufficientPixels {
            region: region.to_string(),
            required: k,
            available: pixels.len(),
        });
    }

    let buf: Vec<Srgb> = pixels
        .iter()
        .map(|px| {
            Srgb::new(
                px[2] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[0] as f32 / 255.0,
            )
        })
        .collect();

    let mut best: Option<Kmeans<Srgb>> = None;
    for restart in 0..params.restarts.max(1) {
        let run = get_kmeans(
            k,
            params.max_iterations,
            params.convergence,
            false,
            &buf,
            params.seed + restart as u64,
        );
        let improved = best.as_ref().map_or(true, |b| run.score < b.score);
        if improved {
            best = Some(run);
        }
    }

    let solution = best.expect("at least one restart ran");
    Ok(solution
        .centroids
        .iter()
        .map(|c| [c.blue * 255.0, c.green * 255.0, c.red * 255.0])
        .collect())
}

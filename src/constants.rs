//! Fixed pipeline constants
//!
//! The values in this module are part of the feature contract with the
//! pretrained classifiers: the landmark index ranges, the skin chroma
//! bounds, and the clustering seeds all shaped the data the models were
//! trained on. Changing any of them requires retraining.

/// Landmark anatomy for the 68-point iBUG annotation scheme
///
/// The landmark predictor emits exactly 68 ordered points; these index
/// ranges carve them into anatomical groups. The cheek recipes union the
/// nose-bridge points with a run of jaw points on the matching side.
pub mod landmarks {
    use std::ops::Range;

    /// Number of points every landmark set carries
    pub const POINT_COUNT: usize = 68;

    pub const JAW: Range<usize> = 0..17;
    pub const RIGHT_BROW: Range<usize> = 17..22;
    pub const LEFT_BROW: Range<usize> = 22..27;
    pub const NOSE: Range<usize> = 27..36;
    pub const RIGHT_EYE: Range<usize> = 36..42;
    pub const LEFT_EYE: Range<usize> = 42..48;
    pub const LIPS: Range<usize> = 48..68;

    /// Nose-bridge run shared by both cheek regions
    pub const CHEEK_BRIDGE: Range<usize> = 29..33;
    /// Jaw run bounding the left cheek
    pub const LEFT_CHEEK_JAW: Range<usize> = 4..9;
    /// Jaw run bounding the right cheek
    pub const RIGHT_CHEEK_JAW: Range<usize> = 10..15;
}

/// Skin-tone chroma filter in YCrCb
///
/// Bounds from the explicit skin-detection literature (Basilio et al.,
/// "Explicit image detection using YCbCr space color model as skin
/// detection"): skin pixels satisfy Cr in [133, 173] and Cb in [77, 127]
/// with luma unconstrained.
pub mod skin {
    pub const CR_MIN: u8 = 133;
    pub const CR_MAX: u8 = 173;
    pub const CB_MIN: u8 = 77;
    pub const CB_MAX: u8 = 127;

    /// BGR value a masked-out pixel takes after the YCrCb round trip:
    /// YCrCb (0, 0, 0) converts back to BGR (0, 135, 0). Pixels equal to
    /// this sentinel are dropped from every region sample.
    pub const MASKED_BGR: [u8; 3] = [0, 135, 0];
}

/// Clustering parameters
///
/// K-means runs with a fixed seed and a fixed number of independent
/// restarts, keeping the lowest within-cluster-sum-of-squares solution, so
/// identical pixels always yield identical centers.
pub mod clustering {
    /// Base seed for the first restart; restart `i` uses `SEED + i`
    pub const SEED: u64 = 42;

    /// Independent initializations per clustering call
    pub const RESTARTS: usize = 10;

    /// Iteration cap per run
    pub const MAX_ITERATIONS: usize = 300;

    /// Convergence threshold on center movement
    pub const CONVERGENCE: f32 = 1e-4;

    /// Palette size when none is configured
    pub const DEFAULT_PALETTE_SIZE: usize = 4;

    /// Skin-tone clusters over the pooled cheek pixels
    pub const SKIN_CLUSTERS: usize = 10;

    /// Lip-tone clusters over the lip pixels
    pub const LIP_CLUSTERS: usize = 3;
}

/// Face detector tuning
pub mod detection {
    /// Minimum face size in pixels passed to the detector
    pub const MIN_FACE_SIZE: u32 = 20;

    /// Detector score threshold
    pub const SCORE_THRESHOLD: f64 = 2.0;

    /// Image pyramid scale factor
    pub const PYRAMID_SCALE_FACTOR: f32 = 0.8;

    /// Sliding window step in x and y
    pub const SLIDE_WINDOW_STEP: (u32, u32) = (4, 4);
}

/// Facial contrast measure
pub mod contrast {
    /// Intensity histogram resolution over the face crop
    pub const HISTOGRAM_BINS: usize = 256;
}

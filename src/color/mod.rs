//! Color space conversion and clustering module
//!
//! This module handles the 8-bit color space conversions the feature
//! contract depends on and the seeded k-means clustering that produces
//! palette and region colors.

pub mod cluster;
pub mod convert;

pub use cluster::{cluster_bgr, ClusterParams};

//! Clinical input features
//!
//! The ten named features, the fixed-order vector the model consumes, and
//! optional input normalization.

pub mod scaling;
pub mod vector;

pub use scaling::FeatureScaling;
pub use vector::{Feature, FeatureVector};

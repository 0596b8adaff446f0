//! Prediction and inference
//!
//! Load the trained model, classify submissions and describe the result.

pub mod describe;
pub mod inference;
pub mod render;

pub use describe::{describe, lookup, ClassDescription, Description, NO_DESCRIPTION};
pub use inference::{argmax, BurnScoreModel, Classifier, ScoreModel};
pub use render::{render, OutputFormat};

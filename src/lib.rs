//! Disease classification from clinical features
//!
//! Feeds ten numeric clinical features to a pre-trained classifier and maps
//! the predicted class to a human-readable description.

pub mod features;
pub mod form;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::features::FeatureScaling;
use crate::predict::OutputFormat;

/// Known outcome classes, in the order the model emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    FollowUpShort,
    SeverityAbsent,
    SickHigh,
    AdlHigh,
    ComaOrIntub,
}

impl ClassLabel {
    pub const ALL: [ClassLabel; 5] = [
        ClassLabel::FollowUpShort,
        ClassLabel::SeverityAbsent,
        ClassLabel::SickHigh,
        ClassLabel::AdlHigh,
        ClassLabel::ComaOrIntub,
    ];

    /// Number of classes the description table covers
    pub const COUNT: usize = Self::ALL.len();

    /// Map a model output index to a known label
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            ClassLabel::FollowUpShort => 0,
            ClassLabel::SeverityAbsent => 1,
            ClassLabel::SickHigh => 2,
            ClassLabel::AdlHigh => 3,
            ClassLabel::ComaOrIntub => 4,
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Display tier attached to each description; the renderer picks the color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green,
    Blue,
    Orange,
    Purple,
    Red,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Green => write!(f, "green"),
            Tier::Blue => write!(f, "blue"),
            Tier::Orange => write!(f, "orange"),
            Tier::Purple => write!(f, "purple"),
            Tier::Red => write!(f, "red"),
        }
    }
}

/// Model prediction output for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Index of the highest-scoring class (may lie outside the known table)
    pub class_index: usize,
    /// Score of the winning class
    pub probability: f32,
    /// Full per-class score row as returned by the model
    pub scores: Vec<f32>,
}

impl Prediction {
    /// The known label, if the index is covered by the description table
    pub fn label(&self) -> Option<ClassLabel> {
        ClassLabel::from_index(self.class_index)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to load model from {path}: {message}")]
    Load { path: String, message: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("No description for class {0}")]
    UnknownClass(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Errors that end an interactive session instead of rejecting one submission
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClassifierError::Load { .. })
    }
}

impl From<inquire::InquireError> for ClassifierError {
    fn from(e: inquire::InquireError) -> Self {
        ClassifierError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Artifact path without extension (burn appends `.mpk`)
    pub path: String,
    pub hidden_dims: Vec<usize>,
    pub num_classes: usize,
    pub dropout: f64,
    /// Input normalization the model was trained with, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<FeatureScaling>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            path: "model/disease_model".to_string(),
            hidden_dims: vec![64, 32],
            num_classes: ClassLabel::COUNT,
            dropout: 0.1,
            scaling: None,
        }
    }
}

impl ModelConfig {
    /// Path of the file burn actually reads and writes
    pub fn artifact_file(&self) -> String {
        format!("{}.mpk", self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    pub format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ClassifierError::Config(format!("Failed to parse config: {}", e)))?;
        if let Some(scaling) = &config.model.scaling {
            scaling.validate()?;
        }
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClassifierError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

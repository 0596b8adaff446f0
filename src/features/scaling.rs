//! Z-score input normalization

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::{ClassifierError, Result};

/// Per-feature normalization the model was trained with: (x - mean) / std
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaling {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl FeatureScaling {
    /// No-op scaling
    pub fn identity() -> Self {
        FeatureScaling {
            mean: vec![0.0; FeatureVector::DIM],
            std: vec![1.0; FeatureVector::DIM],
        }
    }

    /// Check arity against the feature vector and that every std is usable
    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != FeatureVector::DIM || self.std.len() != FeatureVector::DIM {
            return Err(ClassifierError::Config(format!(
                "scaling needs {} means and {} stds, got {} and {}",
                FeatureVector::DIM,
                FeatureVector::DIM,
                self.mean.len(),
                self.std.len()
            )));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(ClassifierError::Config(format!("scaling mean[{}] is not finite", i)));
        }
        if let Some(i) = self.std.iter().position(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ClassifierError::Config(format!(
                "scaling std[{}] must be positive, got {}",
                i, self.std[i]
            )));
        }
        Ok(())
    }

    /// Normalize a [batch, DIM] input tensor
    pub fn normalize<B: Backend>(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = x.device();
        let mean = Tensor::<B, 1>::from_floats(self.mean.as_slice(), &device).unsqueeze_dim(0);
        let std = Tensor::<B, 1>::from_floats(self.std.as_slice(), &device).unsqueeze_dim(0);

        (x - mean) / std
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_identity_is_valid() {
        FeatureScaling::identity().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_zero_std() {
        let mut scaling = FeatureScaling::identity();
        scaling.std[3] = 0.0;
        let err = scaling.validate().unwrap_err();
        assert!(err.to_string().contains("std[3]"));
    }

    #[test]
    fn test_validate_rejects_short_vectors() {
        let scaling = FeatureScaling {
            mean: vec![0.0; 9],
            std: vec![1.0; 10],
        };
        assert!(scaling.validate().is_err());
    }

    #[test]
    fn test_normalize() {
        let device = Default::default();
        let mut scaling = FeatureScaling::identity();
        scaling.mean[0] = 2.0;
        scaling.std[0] = 4.0;
        scaling.std[1] = 0.5;

        let mut input = vec![0.0f32; FeatureVector::DIM * 2];
        input[0] = 10.0;
        input[1] = 3.0;
        input[FeatureVector::DIM] = 2.0;
        let x = Tensor::<TestBackend, 1>::from_floats(input.as_slice(), &device)
            .reshape([2, FeatureVector::DIM]);

        let out = scaling.normalize(x);
        assert_eq!(out.dims(), [2, FeatureVector::DIM]);

        let data = out.to_data();
        let vals = data.as_slice::<f32>().unwrap();
        assert!((vals[0] - 2.0).abs() < 1e-6);
        assert!((vals[1] - 6.0).abs() < 1e-6);
        assert!(vals[FeatureVector::DIM].abs() < 1e-6);
    }
}

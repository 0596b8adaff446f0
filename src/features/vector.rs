//! Named clinical features and the fixed-order input vector

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ClassifierError, Result};

/// A clinical input feature, in the column order the model was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    DiseaseGroup,
    DiseaseClassification,
    IncomeLevel,
    SeverityOfComaScore,
    MedicalCharges,
    TotalCost,
    BloodPhLevel,
    AdlPhysical,
    AdlSocial,
    AdlCognitive,
}

impl Feature {
    pub const ALL: [Feature; FeatureVector::DIM] = [
        Feature::DiseaseGroup,
        Feature::DiseaseClassification,
        Feature::IncomeLevel,
        Feature::SeverityOfComaScore,
        Feature::MedicalCharges,
        Feature::TotalCost,
        Feature::BloodPhLevel,
        Feature::AdlPhysical,
        Feature::AdlSocial,
        Feature::AdlCognitive,
    ];

    /// Column name as used in the training data
    pub fn name(&self) -> &'static str {
        match self {
            Feature::DiseaseGroup => "Disease_Group",
            Feature::DiseaseClassification => "Disease_Classification",
            Feature::IncomeLevel => "Income_Level",
            Feature::SeverityOfComaScore => "Severity_of_Coma_Score",
            Feature::MedicalCharges => "Medical_Charges",
            Feature::TotalCost => "Total_Cost",
            Feature::BloodPhLevel => "Blood_pH_Level",
            Feature::AdlPhysical => "ADL_Physical",
            Feature::AdlSocial => "ADL_Social",
            Feature::AdlCognitive => "ADL_Cognitive",
        }
    }

    /// Look up a feature by column name (case-insensitive, `-` or `_`)
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('-', "_").to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().to_lowercase() == wanted)
    }

    /// Position of this feature in the model input
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One submission: exactly ten finite values in `Feature::ALL` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FeatureVector::DIM],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl FeatureVector {
    /// Number of clinical features the model consumes
    pub const DIM: usize = 10;

    /// Every feature at its form default (0.0)
    pub fn zeros() -> Self {
        FeatureVector {
            values: [0.0; FeatureVector::DIM],
        }
    }

    /// Build from raw values, rejecting wrong arity and non-finite entries
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.len() != Self::DIM {
            return Err(ClassifierError::Inference(format!(
                "expected {} feature values, got {}",
                Self::DIM,
                values.len()
            )));
        }

        let mut vector = Self::zeros();
        for (feature, &value) in Feature::ALL.iter().zip(values) {
            vector.set(*feature, value)?;
        }
        Ok(vector)
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ClassifierError::Inference(format!(
                "{} must be a finite number, got {}",
                feature, value
            )));
        }
        self.values[feature.index()] = value;
        Ok(())
    }

    /// Builder-style `set` for callers that already hold finite values
    pub fn with(mut self, feature: Feature, value: f64) -> Result<Self> {
        self.set(feature, value)?;
        Ok(self)
    }

    pub fn values(&self) -> &[f64; FeatureVector::DIM] {
        &self.values
    }

    /// Values in model precision
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }

    /// (feature, value) pairs in model order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().copied().zip(self.values.iter().copied())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(feature, value)| format!("{}={:.2}", feature.name(), value))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let names: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "Disease_Group",
                "Disease_Classification",
                "Income_Level",
                "Severity_of_Coma_Score",
                "Medical_Charges",
                "Total_Cost",
                "Blood_pH_Level",
                "ADL_Physical",
                "ADL_Social",
                "ADL_Cognitive",
            ]
        );
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            Feature::from_name("severity-of-coma-score"),
            Some(Feature::SeverityOfComaScore)
        );
        assert_eq!(Feature::from_name("Blood_pH_Level"), Some(Feature::BloodPhLevel));
        assert_eq!(Feature::from_name(" adl_social "), Some(Feature::AdlSocial));
        assert_eq!(Feature::from_name("Heart_Rate"), None);
    }

    #[test]
    fn test_dimension_matches_feature_list() {
        assert_eq!(Feature::ALL.len(), FeatureVector::DIM);
        assert_eq!(FeatureVector::zeros().values().len(), FeatureVector::DIM);
        assert_eq!(FeatureVector::zeros().iter().count(), FeatureVector::DIM);
    }

    #[test]
    fn test_zeros_default() {
        let v = FeatureVector::default();
        assert_eq!(v.values(), &[0.0; 10]);
        assert_eq!(v.to_f32().len(), FeatureVector::DIM);
    }

    #[test]
    fn test_from_values_wrong_arity() {
        let err = FeatureVector::from_values(&[0.0; 9]).unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));

        let err = FeatureVector::from_values(&[0.0; 11]).unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));

        assert!(FeatureVector::from_values(&[]).is_err());
    }

    #[test]
    fn test_from_values_rejects_non_finite() {
        let mut values = [1.0; 10];
        values[6] = f64::NAN;
        let err = FeatureVector::from_values(&values).unwrap_err();
        assert!(err.to_string().contains("Blood_pH_Level"));

        values[6] = f64::INFINITY;
        assert!(FeatureVector::from_values(&values).is_err());
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        // Semantically odd values are not guarded
        let v = FeatureVector::zeros()
            .with(Feature::SeverityOfComaScore, -40.0)
            .unwrap();
        assert_eq!(v.get(Feature::SeverityOfComaScore), -40.0);
    }

    #[test]
    fn test_set_keeps_previous_value_on_error() {
        let mut v = FeatureVector::zeros();
        v.set(Feature::TotalCost, 1200.5).unwrap();
        assert!(v.set(Feature::TotalCost, f64::NEG_INFINITY).is_err());
        assert_eq!(v.get(Feature::TotalCost), 1200.5);
    }

    #[test]
    fn test_display_two_decimals() {
        let v = FeatureVector::zeros().with(Feature::DiseaseGroup, 3.14159).unwrap();
        let text = v.to_string();
        assert!(text.starts_with("Disease_Group=3.14, Disease_Classification=0.00"));
        assert!(text.ends_with("ADL_Cognitive=0.00"));
    }
}

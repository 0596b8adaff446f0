//! Interactive input form
//!
//! Prompts for each clinical feature (default 0.00), submits the vector to
//! the classifier and prints the described result. Rejected submissions are
//! reported and the session carries on.

use inquire::validator::Validation;
use inquire::{Confirm, CustomType, InquireError};

use crate::features::{Feature, FeatureVector};
use crate::predict::{describe, render, Classifier, ScoreModel};
use crate::{DisplayConfig, Result};

pub const FORM_TITLE: &str = "Disease Classification Prediction";

/// Result of filling in the form once
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Every field answered and the submit confirmed
    Submitted(FeatureVector),
    /// Every field answered, submit declined
    Discarded,
    /// The user cancelled a prompt (Esc / Ctrl-C)
    Closed,
}

/// Two-decimal rendering used for defaults and echoed answers
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

fn is_closed(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn prompt_feature(feature: Feature, default: f64) -> std::result::Result<f64, InquireError> {
    CustomType::<f64>::new(feature.name())
        .with_default(default)
        .with_formatter(&|v: f64| format_value(v))
        .with_default_value_formatter(&|v: f64| format_value(v))
        .with_error_message("Please type a valid number")
        .with_validator(|v: &f64| {
            if v.is_finite() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Value must be a finite number".into()))
            }
        })
        .prompt()
}

/// Ask for all ten features, then for the submit confirmation
pub fn prompt_features(defaults: &FeatureVector) -> Result<Submission> {
    let mut features = *defaults;

    for feature in Feature::ALL {
        match prompt_feature(feature, defaults.get(feature)) {
            Ok(value) => features.set(feature, value)?,
            Err(e) if is_closed(&e) => return Ok(Submission::Closed),
            Err(e) => return Err(e.into()),
        }
    }

    match Confirm::new("Predict?").with_default(true).prompt() {
        Ok(true) => Ok(Submission::Submitted(features)),
        Ok(false) => Ok(Submission::Discarded),
        Err(e) if is_closed(&e) => Ok(Submission::Closed),
        Err(e) => Err(e.into()),
    }
}

/// Classify one submission and render the result for display
pub fn respond<M: ScoreModel>(
    classifier: &Classifier<M>,
    features: &FeatureVector,
    display: &DisplayConfig,
) -> Result<String> {
    let prediction = classifier.predict(features)?;
    let description = describe(prediction.class_index);
    Ok(render(&prediction, &description, display.format, display.color))
}

/// Run the form until the user closes it
pub fn run<M: ScoreModel>(classifier: &Classifier<M>, display: &DisplayConfig) -> Result<()> {
    println!("{}", FORM_TITLE);
    println!("This application predicts the disease classification based on input features.\n");
    println!("Input Features");

    let mut defaults = FeatureVector::zeros();
    loop {
        match prompt_features(&defaults)? {
            Submission::Closed => break,
            Submission::Discarded => {}
            Submission::Submitted(features) => {
                match respond(classifier, &features, display) {
                    Ok(output) => {
                        println!("\nPrediction Result");
                        print!("{}", output);
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => eprintln!("Submission rejected: {}", e),
                }
                defaults = features;
            }
        }

        match Confirm::new("Classify another patient?")
            .with_default(false)
            .prompt()
        {
            Ok(true) => continue,
            Ok(false) => break,
            Err(e) if is_closed(&e) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

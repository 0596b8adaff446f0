//! Class descriptions shown next to a prediction

use serde::Serialize;
use std::fmt;

use crate::{ClassLabel, ClassifierError, Result, Tier};

/// Shown when the model predicts a class the table does not cover
pub const NO_DESCRIPTION: &str = "No description available.";

/// Title, explanation and display tier for one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescription {
    pub label: ClassLabel,
    pub title: &'static str,
    pub text: &'static str,
    pub tier: Tier,
}

static DESCRIPTIONS: [ClassDescription; ClassLabel::COUNT] = [
    ClassDescription {
        label: ClassLabel::FollowUpShort,
        title: "Less than 2 months follow-up",
        text: "Indicates that the follow-up period for the patient was less than 2 months. \
               This is typically used in clinical studies or patient records to note the \
               duration of time after a treatment or procedure during which the patient was \
               monitored.",
        tier: Tier::Green,
    },
    ClassDescription {
        label: ClassLabel::SeverityAbsent,
        title: "No (M2 and SIP pres)",
        text: "This likely means that the conditions or scores referred to as M2 and SIP \
               (Sickness Impact Profile) were not present. In other words, the patient did \
               not meet the criteria for M2 and had no SIP score.",
        tier: Tier::Blue,
    },
    ClassDescription {
        label: ClassLabel::SickHigh,
        title: "SIP >= 30",
        text: "Refers to a score of 30 or higher on the Sickness Impact Profile (SIP), which \
               is a measure used to assess the impact of sickness on a patient's daily life. \
               A higher score suggests a greater impact on health-related quality of life.",
        tier: Tier::Orange,
    },
    ClassDescription {
        label: ClassLabel::AdlHigh,
        title: "ADL >= 4 (>= 5 if sur)",
        text: "Refers to the Activities of Daily Living (ADL) score, which assesses a \
               patient's ability to perform everyday tasks. ADL >= 4 indicates that the \
               patient has a score of 4 or higher. >= 5 if sur might imply that if the \
               patient had surgery, the ADL score is 5 or higher.",
        tier: Tier::Purple,
    },
    ClassDescription {
        label: ClassLabel::ComaOrIntub,
        title: "Coma or Intub",
        text: "Refers to whether the patient was in a coma or was intubated. Intubation \
               involves inserting a tube into the patient's airway to assist with breathing, \
               usually when they are unable to do so on their own due to severe illness or \
               injury.",
        tier: Tier::Red,
    },
];

impl ClassLabel {
    pub fn description(&self) -> &'static ClassDescription {
        &DESCRIPTIONS[self.index()]
    }
}

impl fmt::Display for ClassDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.text)
    }
}

/// Strict lookup: unknown indices are an error
pub fn lookup(index: usize) -> Result<&'static ClassDescription> {
    ClassLabel::from_index(index)
        .map(|label| label.description())
        .ok_or(ClassifierError::UnknownClass(index))
}

/// What the user sees for a predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Description {
    Known(&'static ClassDescription),
    Unavailable,
}

impl Description {
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Description::Known(d) => Some(d.title),
            Description::Unavailable => None,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Description::Known(d) => d.text,
            Description::Unavailable => NO_DESCRIPTION,
        }
    }

    pub fn tier(&self) -> Option<Tier> {
        match self {
            Description::Known(d) => Some(d.tier),
            Description::Unavailable => None,
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Description::Known(d) => write!(f, "{}", d),
            Description::Unavailable => write!(f, "{}", NO_DESCRIPTION),
        }
    }
}

/// Lookup that never fails; unknown classes fall back to `NO_DESCRIPTION`
pub fn describe(index: usize) -> Description {
    match lookup(index) {
        Ok(d) => Description::Known(d),
        Err(e) => {
            log::warn!("{}", e);
            Description::Unavailable
        }
    }
}

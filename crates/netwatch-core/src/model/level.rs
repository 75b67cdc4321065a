use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Five-bucket classification shared by connection quality and stability.
///
/// Variants are declared worst to best, so `Ord` reads naturally:
/// `QualityLevel::Excellent > QualityLevel::Poor`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QualityLevel {
    Unstable,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityLevel {
    pub const EXCELLENT_MIN: f64 = 90.0;
    pub const GOOD_MIN: f64 = 75.0;
    pub const FAIR_MIN: f64 = 60.0;
    pub const POOR_MIN: f64 = 40.0;

    /// Map a 0–100 score onto a level. The single threshold table used for
    /// both the overall quality score and the standalone stability score.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_MIN {
            Self::Excellent
        } else if score >= Self::GOOD_MIN {
            Self::Good
        } else if score >= Self::FAIR_MIN {
            Self::Fair
        } else if score >= Self::POOR_MIN {
            Self::Poor
        } else {
            Self::Unstable
        }
    }

    /// Poor or unstable.
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Poor | Self::Unstable)
    }

    /// Fair or worse: the user should see a warning.
    pub fn warrants_warning(self) -> bool {
        self <= Self::Fair
    }
}

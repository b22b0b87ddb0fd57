//! Bone age versus chronological age

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};

/// Skeletal maturation relative to chronological age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneAgeClassification {
    /// Bone age lags chronological age by more than the threshold
    Delayed,
    /// Within the threshold
    Appropriate,
    /// Bone age exceeds chronological age by more than the threshold
    Advanced,
}

impl BoneAgeClassification {
    /// What the discrepancy implies for remaining growth
    #[must_use]
    pub const fn growth_potential(self) -> &'static str {
        match self {
            Self::Delayed => "Potential for catch-up growth",
            Self::Appropriate => "Growth potential as expected",
            Self::Advanced => "Reduced remaining growth potential",
        }
    }

    /// Get a descriptive name for this classification
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Delayed => "Delayed",
            Self::Appropriate => "Appropriate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for BoneAgeClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of a bone age comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneAgeComparison {
    /// Bone age minus chronological age, in years
    pub difference_years: f64,
    /// Classification of the difference
    pub classification: BoneAgeClassification,
    /// Threshold the difference was compared against
    pub threshold_years: f64,
}

/// Compare skeletal and chronological age
///
/// A difference exactly equal to the threshold is still appropriate.
pub fn compare_bone_age(
    bone_age_years: f64,
    chronological_age_years: f64,
    threshold_years: f64,
) -> Result<BoneAgeComparison> {
    if !(bone_age_years.is_finite() && chronological_age_years.is_finite()) {
        return Err(GrowthError::invalid_input(
            "bone age and chronological age must be finite",
        ));
    }
    if !(threshold_years.is_finite() && threshold_years >= 0.0) {
        return Err(GrowthError::invalid_input(format!(
            "bone age threshold must be a non-negative number of years, got {threshold_years}"
        )));
    }

    let difference_years = bone_age_years - chronological_age_years;
    let classification = if difference_years < -threshold_years {
        BoneAgeClassification::Delayed
    } else if difference_years > threshold_years {
        BoneAgeClassification::Advanced
    } else {
        BoneAgeClassification::Appropriate
    };

    Ok(BoneAgeComparison {
        difference_years,
        classification,
        threshold_years,
    })
}

//! Mid-parental target height
//!
//! The central target is the parents' mean height adjusted by half the
//! average adult sex difference; the band half-width comes from
//! [`crate::config::EvaluationConfig`].

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result, ensure_positive};
use crate::models::types::Sex;

/// Adult sex difference in height (cm) added for boys and subtracted for girls
pub const MID_PARENTAL_CORRECTION_CM: f64 = 13.0;

/// Predicted adult height band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParentalTarget {
    /// Lower bound of the family channel (cm)
    pub low: f64,
    /// Mid-parental target height (cm)
    pub central: f64,
    /// Upper bound of the family channel (cm)
    pub high: f64,
}

impl ParentalTarget {
    /// Whether an adult height falls inside the family channel
    #[must_use]
    pub fn contains(&self, height_cm: f64) -> bool {
        (self.low..=self.high).contains(&height_cm)
    }

    /// Half-width of the band (cm)
    #[must_use]
    pub fn half_width(&self) -> f64 {
        (self.high - self.low) / 2.0
    }
}

/// Mid-parental target with its projection onto the adult reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAssessment {
    /// Target band in cm
    pub target: ParentalTarget,
    /// Percentile of the central target on the adult height reference,
    /// when an adult reference is available
    pub target_percentile: Option<f64>,
}

/// Compute the mid-parental target height band
///
/// # Arguments
/// * `mother_height_cm` - Mother's height
/// * `father_height_cm` - Father's height
/// * `sex` - The child's sex
/// * `half_width_cm` - Half-width of the family channel
pub fn parental_target(
    mother_height_cm: f64,
    father_height_cm: f64,
    sex: Sex,
    half_width_cm: f64,
) -> Result<ParentalTarget> {
    ensure_positive(mother_height_cm, "mother's height")?;
    ensure_positive(father_height_cm, "father's height")?;
    if !(half_width_cm.is_finite() && half_width_cm >= 0.0) {
        return Err(GrowthError::invalid_input(format!(
            "target band half-width must be a non-negative number, got {half_width_cm}"
        )));
    }

    let correction = match sex {
        Sex::Male => MID_PARENTAL_CORRECTION_CM,
        Sex::Female => -MID_PARENTAL_CORRECTION_CM,
    };
    let central = (mother_height_cm + father_height_cm + correction) / 2.0;

    Ok(ParentalTarget {
        low: central - half_width_cm,
        central,
        high: central + half_width_cm,
    })
}

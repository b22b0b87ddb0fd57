//! Configuration for growth evaluation.
//!
//! Published variants of the clinical rules disagree on two constants: the
//! half-width of the mid-parental target band (8.5 cm or 10 cm) and the bone
//! age discrepancy that counts as delayed or advanced (6 months or 2 years).
//! Both are exposed as named constants. The bone age threshold has no default
//! and must be chosen when the configuration is created.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};

/// Narrow target band half-width (cm)
pub const PARENTAL_BAND_HALF_WIDTH_NARROW_CM: f64 = 8.5;

/// Wide target band half-width (cm)
pub const PARENTAL_BAND_HALF_WIDTH_WIDE_CM: f64 = 10.0;

/// Bone age threshold of six months (in years)
pub const BONE_AGE_THRESHOLD_SIX_MONTHS: f64 = 0.5;

/// Bone age threshold of two years
pub const BONE_AGE_THRESHOLD_TWO_YEARS: f64 = 2.0;

/// What to do when a target age falls outside a reference table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Score against the nearest edge row and attach a clamp warning
    #[default]
    Clamp,
    /// Leave the Z-score and percentile undefined and attach a clamp warning
    Reject,
}

/// Thresholds used by the diagnostic classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Height percentile below which short stature is flagged
    pub low_stature_percentile: f64,
    /// Height Z-score below which low stature is graded severe
    pub severe_stature_z: f64,
    /// Height percentile above which tall stature is flagged
    pub tall_stature_percentile: f64,
    /// Ages below this (years) use the infant BMI cut-offs
    pub bmi_band_boundary_years: f64,
    /// Infant BMI Z-score above which overweight is flagged
    pub infant_overweight_z: f64,
    /// Infant BMI Z-score above which obesity is flagged
    pub infant_obesity_z: f64,
    /// Child BMI Z-score above which overweight is flagged
    pub child_overweight_z: f64,
    /// Child BMI Z-score above which obesity is flagged
    pub child_obesity_z: f64,
    /// BMI Z-score below which underweight is flagged
    pub underweight_z: f64,
    /// Height percentile below which the family pattern is checked
    pub family_pattern_height_percentile: f64,
    /// Target percentile above which a low height deviates from the family pattern
    pub family_pattern_target_percentile: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            low_stature_percentile: 3.0,
            severe_stature_z: -3.0,
            tall_stature_percentile: 97.0,
            bmi_band_boundary_years: 5.0,
            infant_overweight_z: 2.0,
            infant_obesity_z: 3.0,
            child_overweight_z: 1.0,
            child_obesity_z: 2.0,
            underweight_z: -2.0,
            family_pattern_height_percentile: 25.0,
            family_pattern_target_percentile: 50.0,
        }
    }
}

const fn default_parental_half_width() -> f64 {
    PARENTAL_BAND_HALF_WIDTH_NARROW_CM
}

const fn default_min_age() -> f64 {
    0.0
}

const fn default_max_age() -> f64 {
    19.0
}

const fn default_infant_max() -> f64 {
    5.0
}

const fn default_preterm_max_weeks() -> f64 {
    50.0
}

/// Configuration for a [`crate::evaluation::GrowthEvaluator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Bone age discrepancy (years) beyond which bone age is delayed or advanced
    pub bone_age_threshold_years: f64,
    /// Half-width of the mid-parental target band (cm)
    #[serde(default = "default_parental_half_width")]
    pub parental_band_half_width_cm: f64,
    /// Out-of-range age handling
    #[serde(default)]
    pub extrapolation: ExtrapolationPolicy,
    /// Lowest accepted chronological age (years)
    #[serde(default = "default_min_age")]
    pub min_age_years: f64,
    /// Highest accepted chronological age (years)
    #[serde(default = "default_max_age")]
    pub max_age_years: f64,
    /// Ages up to and including this (years) use infant tables
    #[serde(default = "default_infant_max")]
    pub infant_domain_max_years: f64,
    /// Preterm tables apply up to this postmenstrual age (weeks)
    #[serde(default = "default_preterm_max_weeks")]
    pub preterm_max_postmenstrual_weeks: f64,
    /// Classifier thresholds
    #[serde(default)]
    pub thresholds: ClassifierThresholds,
}

impl EvaluationConfig {
    /// Create a configuration with an explicit bone age threshold
    ///
    /// # Arguments
    /// * `bone_age_threshold_years` - e.g. [`BONE_AGE_THRESHOLD_SIX_MONTHS`]
    ///   or [`BONE_AGE_THRESHOLD_TWO_YEARS`]
    #[must_use]
    pub fn new(bone_age_threshold_years: f64) -> Self {
        Self {
            bone_age_threshold_years,
            parental_band_half_width_cm: default_parental_half_width(),
            extrapolation: ExtrapolationPolicy::default(),
            min_age_years: default_min_age(),
            max_age_years: default_max_age(),
            infant_domain_max_years: default_infant_max(),
            preterm_max_postmenstrual_weeks: default_preterm_max_weeks(),
            thresholds: ClassifierThresholds::default(),
        }
    }

    /// Set the target band half-width
    #[must_use]
    pub const fn with_parental_band_half_width(mut self, half_width_cm: f64) -> Self {
        self.parental_band_half_width_cm = half_width_cm;
        self
    }

    /// Set the extrapolation policy
    #[must_use]
    pub const fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    /// Set the accepted age range
    #[must_use]
    pub const fn with_age_limits(mut self, min_age_years: f64, max_age_years: f64) -> Self {
        self.min_age_years = min_age_years;
        self.max_age_years = max_age_years;
        self
    }

    /// Set the preterm cut-off in postmenstrual weeks
    #[must_use]
    pub const fn with_preterm_max_postmenstrual_weeks(mut self, weeks: f64) -> Self {
        self.preterm_max_postmenstrual_weeks = weeks;
        self
    }

    /// Replace the classifier thresholds
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ClassifierThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Check the configuration for internally inconsistent values
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("bone_age_threshold_years", self.bone_age_threshold_years),
            ("parental_band_half_width_cm", self.parental_band_half_width_cm),
            ("min_age_years", self.min_age_years),
            ("infant_domain_max_years", self.infant_domain_max_years),
            ("preterm_max_postmenstrual_weeks", self.preterm_max_postmenstrual_weeks),
            ("thresholds.bmi_band_boundary_years", self.thresholds.bmi_band_boundary_years),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GrowthError::invalid_input(format!(
                    "configuration value {name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.max_age_years.is_finite() && self.max_age_years > self.min_age_years) {
            return Err(GrowthError::invalid_input(format!(
                "max_age_years ({}) must exceed min_age_years ({})",
                self.max_age_years, self.min_age_years
            )));
        }
        let t = &self.thresholds;
        let cut_offs = [
            ("low_stature_percentile", t.low_stature_percentile),
            ("severe_stature_z", t.severe_stature_z),
            ("tall_stature_percentile", t.tall_stature_percentile),
            ("infant_overweight_z", t.infant_overweight_z),
            ("infant_obesity_z", t.infant_obesity_z),
            ("child_overweight_z", t.child_overweight_z),
            ("child_obesity_z", t.child_obesity_z),
            ("underweight_z", t.underweight_z),
            ("family_pattern_height_percentile", t.family_pattern_height_percentile),
            ("family_pattern_target_percentile", t.family_pattern_target_percentile),
        ];
        if let Some((name, value)) = cut_offs.iter().find(|(_, value)| !value.is_finite()) {
            return Err(GrowthError::invalid_input(format!(
                "classifier threshold {name} must be finite, got {value}"
            )));
        }
        if t.infant_overweight_z > t.infant_obesity_z || t.child_overweight_z > t.child_obesity_z {
            return Err(GrowthError::invalid_input(
                "overweight cut-offs must not exceed obesity cut-offs",
            ));
        }
        if t.low_stature_percentile >= t.tall_stature_percentile {
            return Err(GrowthError::invalid_input(
                "low stature percentile must be below tall stature percentile",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for EvaluationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Evaluation Configuration:")?;
        writeln!(f, "  Bone Age Threshold: {} years", self.bone_age_threshold_years)?;
        writeln!(f, "  Target Band Half-Width: {} cm", self.parental_band_half_width_cm)?;
        writeln!(f, "  Extrapolation: {:?}", self.extrapolation)?;
        writeln!(f, "  Age Limits: {}-{} years", self.min_age_years, self.max_age_years)?;
        writeln!(f, "  Infant Tables Up To: {} years", self.infant_domain_max_years)?;
        writeln!(
            f,
            "  Preterm Tables Up To: {} weeks postmenstrual",
            self.preterm_max_postmenstrual_weeks
        )?;
        Ok(())
    }
}

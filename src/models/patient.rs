//! Patient context for a single evaluation
//!
//! The context is an immutable value built by the caller for each evaluation
//! request. Ages are fractional years throughout.

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result, ensure_positive};
use crate::models::types::Sex;
use crate::reference::Population;

/// Weeks per month used to convert chronological months into weeks
pub const WEEKS_PER_MONTH: f64 = 4.345;

/// Lowest gestational age at birth accepted for preterm evaluation (weeks)
pub const MIN_GESTATIONAL_AGE_WEEKS: f64 = 20.0;

/// Highest gestational age at birth accepted for preterm evaluation (weeks)
pub const MAX_GESTATIONAL_AGE_WEEKS: f64 = 44.0;

/// Everything about the patient an evaluation needs besides the measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientContext {
    /// Biological sex
    pub sex: Sex,
    /// Chronological age in fractional years
    pub age_years: f64,
    /// Reference population the patient is assessed against
    #[serde(default)]
    pub population: Population,
    /// Gestational age at birth in weeks (required for preterm)
    #[serde(default)]
    pub gestational_age_weeks: Option<f64>,
    /// Skeletal age in fractional years
    #[serde(default)]
    pub bone_age_years: Option<f64>,
    /// Mother's height in cm
    #[serde(default)]
    pub mother_height_cm: Option<f64>,
    /// Father's height in cm
    #[serde(default)]
    pub father_height_cm: Option<f64>,
}

impl PatientContext {
    /// Create a context for the standard population with no auxiliary data
    #[must_use]
    pub const fn new(sex: Sex, age_years: f64) -> Self {
        Self {
            sex,
            age_years,
            population: Population::Standard,
            gestational_age_weeks: None,
            bone_age_years: None,
            mother_height_cm: None,
            father_height_cm: None,
        }
    }

    /// Create a context from whole years and months of age
    #[must_use]
    pub fn from_years_months(sex: Sex, years: u32, months: u32) -> Self {
        Self::new(sex, f64::from(years) + f64::from(months) / 12.0)
    }

    /// Assess against the trisomy 21 population
    #[must_use]
    pub const fn with_trisomy21(mut self) -> Self {
        self.population = Population::Trisomy21;
        self
    }

    /// Assess as a preterm infant born at the given gestational age
    #[must_use]
    pub const fn with_preterm_birth(mut self, gestational_age_weeks: f64) -> Self {
        self.population = Population::Preterm;
        self.gestational_age_weeks = Some(gestational_age_weeks);
        self
    }

    /// Set the skeletal age in years
    #[must_use]
    pub const fn with_bone_age(mut self, bone_age_years: f64) -> Self {
        self.bone_age_years = Some(bone_age_years);
        self
    }

    /// Set both parents' heights in cm
    #[must_use]
    pub const fn with_parents(mut self, mother_height_cm: f64, father_height_cm: f64) -> Self {
        self.mother_height_cm = Some(mother_height_cm);
        self.father_height_cm = Some(father_height_cm);
        self
    }

    /// Chronological age in months
    #[must_use]
    pub fn age_months(&self) -> f64 {
        self.age_years * 12.0
    }

    /// Postmenstrual age in weeks (gestational age plus chronological weeks)
    pub fn postmenstrual_age_weeks(&self) -> Result<f64> {
        let gestational = self.gestational_age_weeks.ok_or_else(|| {
            GrowthError::invalid_input("gestational age is required for preterm evaluation")
        })?;
        Ok(gestational + self.age_months() * WEEKS_PER_MONTH)
    }

    /// Both parents' heights, when both are known
    #[must_use]
    pub fn parent_heights(&self) -> Option<(f64, f64)> {
        self.mother_height_cm.zip(self.father_height_cm)
    }

    /// Check that every field lies in its documented range
    ///
    /// # Arguments
    /// * `min_age_years` - Lowest chronological age accepted
    /// * `max_age_years` - Highest chronological age accepted
    pub fn validate(&self, min_age_years: f64, max_age_years: f64) -> Result<()> {
        check_age(self.age_years, min_age_years, max_age_years, "age")?;

        if let Some(bone_age) = self.bone_age_years {
            check_age(bone_age, min_age_years, max_age_years, "bone age")?;
        }

        if self.population == Population::Preterm {
            let gestational = self.gestational_age_weeks.ok_or_else(|| {
                GrowthError::invalid_input("gestational age is required for preterm evaluation")
            })?;
            if !(MIN_GESTATIONAL_AGE_WEEKS..=MAX_GESTATIONAL_AGE_WEEKS).contains(&gestational) {
                return Err(GrowthError::invalid_input(format!(
                    "gestational age {gestational} weeks is outside \
                     {MIN_GESTATIONAL_AGE_WEEKS}-{MAX_GESTATIONAL_AGE_WEEKS} weeks"
                )));
            }
        }

        if let Some(mother) = self.mother_height_cm {
            ensure_positive(mother, "mother's height")?;
        }
        if let Some(father) = self.father_height_cm {
            ensure_positive(father, "father's height")?;
        }

        Ok(())
    }
}

fn check_age(age: f64, min: f64, max: f64, what: &str) -> Result<()> {
    if age.is_finite() && (min..=max).contains(&age) {
        Ok(())
    } else {
        Err(GrowthError::invalid_input(format!(
            "{what} {age} years is outside {min}-{max} years"
        )))
    }
}

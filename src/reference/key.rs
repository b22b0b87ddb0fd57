//! Reference table keys
//!
//! A key names exactly one reference table. The population tag decides the
//! transform mode once, so call sites never branch on prematurity or
//! trisomy 21 themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::types::{Parameter, Sex};

/// Reference population a patient is assessed against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    /// General population (WHO LMS curves)
    #[default]
    Standard,
    /// Preterm infants, indexed by postmenstrual age in weeks
    Preterm,
    /// Children with trisomy 21 (Down syndrome)
    Trisomy21,
}

impl Population {
    /// How raw values are transformed into Z-scores for this population
    #[must_use]
    pub const fn transform_mode(self) -> TransformMode {
        match self {
            Self::Standard => TransformMode::Lms,
            Self::Preterm | Self::Trisomy21 => TransformMode::Band,
        }
    }

    /// Clinical note attached to every evaluation in this population
    #[must_use]
    pub const fn advisory(self) -> Option<&'static str> {
        match self {
            Self::Trisomy21 => Some(
                "Use syndrome-specific growth curves; screen for obesity and hypothyroidism",
            ),
            Self::Standard | Self::Preterm => None,
        }
    }

    /// Get a descriptive name for this population
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Preterm => "Preterm",
            Self::Trisomy21 => "Trisomy 21",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Transform applied to a raw value given interpolated reference parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    /// Cole LMS power transform
    Lms,
    /// Linear transform from P3/P50/P97 percentile bands
    Band,
}

/// Age band a table covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeDomain {
    /// Birth to the infant cut-off (WHO 0-5 years, indexed in months)
    Infant,
    /// Beyond the infant cut-off (WHO 5-19 years, indexed in years)
    ChildAdolescent,
}

impl AgeDomain {
    /// Domain for a chronological age given the infant cut-off
    #[must_use]
    pub fn for_age(age_years: f64, infant_max_years: f64) -> Self {
        if age_years <= infant_max_years {
            Self::Infant
        } else {
            Self::ChildAdolescent
        }
    }
}

impl fmt::Display for AgeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infant => f.write_str("infant"),
            Self::ChildAdolescent => f.write_str("child_adolescent"),
        }
    }
}

/// Identifies one reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceTableKey {
    /// Sex the curve describes
    pub sex: Sex,
    /// Measured parameter
    pub parameter: Parameter,
    /// Reference population
    pub population: Population,
    /// Age band
    pub age_domain: AgeDomain,
}

impl ReferenceTableKey {
    /// Create a new key
    #[must_use]
    pub const fn new(
        sex: Sex,
        parameter: Parameter,
        population: Population,
        age_domain: AgeDomain,
    ) -> Self {
        Self {
            sex,
            parameter,
            population,
            age_domain,
        }
    }

    /// Key for a standard-population table
    #[must_use]
    pub const fn standard(sex: Sex, parameter: Parameter, age_domain: AgeDomain) -> Self {
        Self::new(sex, parameter, Population::Standard, age_domain)
    }

    /// Transform mode implied by the key's population
    #[must_use]
    pub const fn transform_mode(&self) -> TransformMode {
        self.population.transform_mode()
    }
}

impl fmt::Display for ReferenceTableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.sex,
            self.parameter,
            match self.population {
                Population::Standard => "standard",
                Population::Preterm => "preterm",
                Population::Trisomy21 => "trisomy21",
            },
            self.age_domain
        )
    }
}

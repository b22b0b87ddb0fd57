//! Severity tags for growth diagnoses

use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgently a finding should be followed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth noting at the next routine visit
    Mild = 1,
    /// Warrants targeted investigation
    Moderate = 2,
    /// Warrants prompt specialist referral
    Severe = 3,
}

impl Severity {
    /// Get a descriptive name for this severity level
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Highest severity among a set of findings, if any
pub fn highest_severity<I>(severities: I) -> Option<Severity>
where
    I: IntoIterator<Item = Severity>,
{
    severities.into_iter().max()
}

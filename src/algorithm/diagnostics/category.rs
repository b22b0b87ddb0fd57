//! Diagnosis kinds and the groups they are emitted in

use std::fmt;

use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// Rule group; findings are emitted group by group in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisCategory {
    /// Height-for-age findings
    Height = 1,
    /// Weight and BMI findings
    WeightBmi = 2,
    /// Deviation from the mid-parental target
    ParentalTarget = 3,
    /// Bone age findings
    BoneAge = 4,
}

impl DiagnosisCategory {
    /// Get the display name for this category
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Height => "Height",
            Self::WeightBmi => "Weight/BMI",
            Self::ParentalTarget => "Parental Target",
            Self::BoneAge => "Bone Age",
        }
    }
}

impl fmt::Display for DiagnosisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Every finding the classifier can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisKind {
    /// Height percentile below the low-stature cut-off
    LowStature,
    /// Height percentile above the tall-stature cut-off
    TallStature,
    /// BMI Z-score below the underweight cut-off
    Underweight,
    /// BMI Z-score above the age band's overweight cut-off
    Overweight,
    /// BMI Z-score above the age band's obesity cut-off
    Obesity,
    /// Low height percentile despite a tall family target
    FamilyPatternDeviation,
    /// Bone age behind chronological age beyond the threshold
    DelayedBoneAge,
    /// Bone age ahead of chronological age beyond the threshold
    AdvancedBoneAge,
}

impl DiagnosisKind {
    /// Rule group this finding belongs to
    #[must_use]
    pub const fn category(self) -> DiagnosisCategory {
        match self {
            Self::LowStature | Self::TallStature => DiagnosisCategory::Height,
            Self::Underweight | Self::Overweight | Self::Obesity => DiagnosisCategory::WeightBmi,
            Self::FamilyPatternDeviation => DiagnosisCategory::ParentalTarget,
            Self::DelayedBoneAge | Self::AdvancedBoneAge => DiagnosisCategory::BoneAge,
        }
    }

    /// Clinical label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowStature => "Low stature",
            Self::TallStature => "Tall stature",
            Self::Underweight => "Underweight",
            Self::Overweight => "Overweight",
            Self::Obesity => "Obesity",
            Self::FamilyPatternDeviation => "Deviation from family growth pattern",
            Self::DelayedBoneAge => "Delayed bone age",
            Self::AdvancedBoneAge => "Advanced bone age",
        }
    }

    /// Fixed recommendation paired with the finding
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::LowStature => "Investigate endocrine, genetic or nutritional causes",
            Self::TallStature => "Evaluate for precocious puberty or syndromic causes",
            Self::Underweight => "Assess caloric intake and possible underlying disease",
            Self::Overweight | Self::Obesity => "Counsel on eating habits and physical activity",
            Self::FamilyPatternDeviation => "Consider further investigation of the growth pattern",
            Self::DelayedBoneAge => "Request hormonal assays and gonadal ultrasound",
            Self::AdvancedBoneAge => "Evaluate for precocious puberty",
        }
    }

    /// Severity tag of the finding
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::TallStature | Self::Overweight | Self::FamilyPatternDeviation => Severity::Mild,
            Self::LowStature
            | Self::Underweight
            | Self::Obesity
            | Self::DelayedBoneAge
            | Self::AdvancedBoneAge => Severity::Moderate,
        }
    }
}

impl fmt::Display for DiagnosisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

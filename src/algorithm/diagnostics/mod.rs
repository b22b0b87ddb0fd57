//! Diagnostic classification of growth scores
//!
//! This module turns standardized scores plus auxiliary context into clinical
//! findings. Each rule group is evaluated independently and every matching
//! finding is emitted, in a fixed order: height, weight/BMI, parental target,
//! bone age. Within the BMI group obesity supersedes overweight. An empty
//! result means every input was within normal limits.

pub mod category;
pub mod severity;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::algorithm::bone_age::{BoneAgeClassification, BoneAgeComparison};
use crate::algorithm::parental::TargetAssessment;
use crate::algorithm::percentile::StandardScore;
use crate::config::ClassifierThresholds;
use category::{DiagnosisCategory, DiagnosisKind};
use severity::Severity;

/// A finding with its recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Which rule fired
    pub kind: DiagnosisKind,
    /// Rule group
    pub category: DiagnosisCategory,
    /// Clinical label
    pub label: String,
    /// Fixed recommendation for the label
    pub recommendation: String,
    /// Severity tag
    pub severity: Severity,
    /// The values that triggered the rule
    pub detail: String,
}

impl Diagnosis {
    /// Create a finding of the given kind
    #[must_use]
    pub fn new(kind: DiagnosisKind, detail: String) -> Self {
        Self {
            kind,
            category: kind.category(),
            label: kind.label().to_string(),
            recommendation: kind.recommendation().to_string(),
            severity: kind.severity(),
            detail,
        }
    }

    /// Override the kind's default severity
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Ordered findings; usually only a handful
pub type Diagnoses = SmallVec<[Diagnosis; 4]>;

/// Everything the classifier looks at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierInput {
    /// Chronological age in years (selects the BMI cut-off band)
    pub age_years: f64,
    /// Height-for-age score
    pub height: Option<StandardScore>,
    /// BMI-for-age score
    pub bmi: Option<StandardScore>,
    /// Mid-parental target and its projected percentile
    pub target: Option<TargetAssessment>,
    /// Bone age comparison
    pub bone_age: Option<BoneAgeComparison>,
}

/// Classify scores into findings
///
/// # Arguments
/// * `input` - Scores and context for one evaluation
/// * `thresholds` - Cut-offs for every rule
///
/// # Returns
/// Findings in emission order; empty when nothing is abnormal
#[must_use]
pub fn classify(input: &ClassifierInput, thresholds: &ClassifierThresholds) -> Diagnoses {
    let mut diagnoses = Diagnoses::new();

    if let Some(height) = input.height {
        classify_height(&mut diagnoses, height, thresholds);
    }
    if let Some(bmi) = input.bmi {
        classify_bmi(&mut diagnoses, bmi, input.age_years, thresholds);
    }
    if let (Some(height), Some(target)) = (input.height, input.target) {
        classify_family_pattern(&mut diagnoses, height, &target, thresholds);
    }
    if let Some(bone_age) = input.bone_age {
        classify_bone_age(&mut diagnoses, &bone_age);
    }

    diagnoses
}

fn classify_height(diagnoses: &mut Diagnoses, height: StandardScore, t: &ClassifierThresholds) {
    let detail = format!(
        "height percentile {:.1} (Z = {:.2})",
        height.percentile, height.z
    );
    if height.percentile < t.low_stature_percentile {
        let diagnosis = Diagnosis::new(DiagnosisKind::LowStature, detail);
        diagnoses.push(if height.z < t.severe_stature_z {
            diagnosis.with_severity(Severity::Severe)
        } else {
            diagnosis
        });
    } else if height.percentile > t.tall_stature_percentile {
        diagnoses.push(Diagnosis::new(DiagnosisKind::TallStature, detail));
    }
}

fn classify_bmi(
    diagnoses: &mut Diagnoses,
    bmi: StandardScore,
    age_years: f64,
    t: &ClassifierThresholds,
) {
    let (overweight_z, obesity_z) = if age_years < t.bmi_band_boundary_years {
        (t.infant_overweight_z, t.infant_obesity_z)
    } else {
        (t.child_overweight_z, t.child_obesity_z)
    };

    let detail = format!("BMI Z = {:.2}", bmi.z);
    if bmi.z > obesity_z {
        diagnoses.push(Diagnosis::new(DiagnosisKind::Obesity, detail));
    } else if bmi.z > overweight_z {
        diagnoses.push(Diagnosis::new(DiagnosisKind::Overweight, detail));
    } else if bmi.z < t.underweight_z {
        diagnoses.push(Diagnosis::new(DiagnosisKind::Underweight, detail));
    }
}

fn classify_family_pattern(
    diagnoses: &mut Diagnoses,
    height: StandardScore,
    target: &TargetAssessment,
    t: &ClassifierThresholds,
) {
    let Some(target_percentile) = target.target_percentile else {
        return;
    };
    if height.percentile < t.family_pattern_height_percentile
        && target_percentile > t.family_pattern_target_percentile
    {
        diagnoses.push(Diagnosis::new(
            DiagnosisKind::FamilyPatternDeviation,
            format!(
                "height percentile {:.1} against target percentile {:.1} ({:.1} cm)",
                height.percentile, target_percentile, target.target.central
            ),
        ));
    }
}

fn classify_bone_age(diagnoses: &mut Diagnoses, bone_age: &BoneAgeComparison) {
    let kind = match bone_age.classification {
        BoneAgeClassification::Delayed => DiagnosisKind::DelayedBoneAge,
        BoneAgeClassification::Advanced => DiagnosisKind::AdvancedBoneAge,
        BoneAgeClassification::Appropriate => return,
    };
    diagnoses.push(Diagnosis::new(
        kind,
        format!(
            "bone age differs by {:+.1} years (threshold {:.1})",
            bone_age.difference_years, bone_age.threshold_years
        ),
    ));
}

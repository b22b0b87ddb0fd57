//! A Rust library for evaluating pediatric growth measurements against
//! reference curves (WHO LMS tables and percentile-band tables for special
//! populations), with mid-parental target height, bone age comparison and
//! rule-based clinical flagging.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod reference;
pub mod report;
pub mod repository;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{
    BONE_AGE_THRESHOLD_SIX_MONTHS, BONE_AGE_THRESHOLD_TWO_YEARS, ClassifierThresholds,
    EvaluationConfig, ExtrapolationPolicy, PARENTAL_BAND_HALF_WIDTH_NARROW_CM,
    PARENTAL_BAND_HALF_WIDTH_WIDE_CM,
};
pub use error::{GrowthError, Result};
pub use evaluation::{
    CentileCurves, EvaluationRequest, EvaluationResult, GrowthEvaluator, ParameterScore,
    PretermCorrection,
};
pub use models::{AgeBreakdown, Measurement, Parameter, PatientContext, Sex, Unit, age_between};

// Reference data
pub use reference::{
    AgeDomain, AgeUnit, BandRow, LmsRow, Population, ReferenceTable, ReferenceTableKey,
    ReferenceTableStore, TableRows, TransformMode, builtin_store,
};

// Algorithms
pub use algorithm::bone_age::{BoneAgeClassification, BoneAgeComparison, compare_bone_age};
pub use algorithm::diagnostics::category::{DiagnosisCategory, DiagnosisKind};
pub use algorithm::diagnostics::severity::Severity;
pub use algorithm::diagnostics::{ClassifierInput, Diagnoses, Diagnosis, classify};
pub use algorithm::interpolation::{CurveParams, RangeClampWarning, interpolate};
pub use algorithm::parental::{ParentalTarget, TargetAssessment, parental_target};
pub use algorithm::percentile::{StandardScore, percentile, standard_normal_cdf};
pub use algorithm::zscore::{centile_curve, value_at_z, z_score};

// Collaborators
pub use report::{Summary, render_summary};
pub use repository::{InMemoryRepository, PatientRepository, evaluate_latest};

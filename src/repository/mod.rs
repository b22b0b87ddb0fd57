//! Patient and measurement repository
//!
//! Storage of patients and their visits lives behind [`PatientRepository`],
//! which is injected into [`evaluate_latest`]. The evaluation core never
//! sees the repository; it receives the patient context and measurements of
//! one visit as plain values.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::evaluation::{EvaluationResult, GrowthEvaluator};
use crate::models::age::{AgeBreakdown, age_between};
use crate::models::measurement::Measurement;
use crate::models::patient::PatientContext;
use crate::models::types::Sex;
use crate::reference::key::Population;
use crate::utils::logging::log_evaluation;

/// Stable patient data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Repository identifier
    pub id: String,
    /// Biological sex
    pub sex: Sex,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Reference population
    #[serde(default)]
    pub population: Population,
    /// Gestational age at birth in weeks
    #[serde(default)]
    pub gestational_age_weeks: Option<f64>,
    /// Mother's height in cm
    #[serde(default)]
    pub mother_height_cm: Option<f64>,
    /// Father's height in cm
    #[serde(default)]
    pub father_height_cm: Option<f64>,
}

impl PatientRecord {
    /// Create a standard-population record
    pub fn new(id: impl Into<String>, sex: Sex, birth_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            sex,
            birth_date,
            population: Population::Standard,
            gestational_age_weeks: None,
            mother_height_cm: None,
            father_height_cm: None,
        }
    }

    /// Set the parents' heights
    #[must_use]
    pub fn with_parents(mut self, mother_height_cm: f64, father_height_cm: f64) -> Self {
        self.mother_height_cm = Some(mother_height_cm);
        self.father_height_cm = Some(father_height_cm);
        self
    }

    /// Set the reference population
    #[must_use]
    pub fn with_population(mut self, population: Population) -> Self {
        self.population = population;
        self
    }

    /// Set the gestational age at birth
    #[must_use]
    pub fn with_gestational_age(mut self, weeks: f64) -> Self {
        self.gestational_age_weeks = Some(weeks);
        self
    }

    /// Patient context as of one visit
    pub fn context_at(&self, visit: &MeasurementRecord) -> Result<(PatientContext, AgeBreakdown)> {
        let age = age_between(self.birth_date, visit.measured_on)?;
        let context = PatientContext {
            sex: self.sex,
            age_years: age.fractional_years,
            population: self.population,
            gestational_age_weeks: self.gestational_age_weeks,
            bone_age_years: visit.bone_age_years,
            mother_height_cm: self.mother_height_cm,
            father_height_cm: self.father_height_cm,
        };
        Ok((context, age))
    }
}

/// Measurements taken at one visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Visit date
    pub measured_on: NaiveDate,
    /// Measurements, at most one per parameter
    pub measurements: Vec<Measurement>,
    /// Bone age read at this visit, in years
    #[serde(default)]
    pub bone_age_years: Option<f64>,
}

impl MeasurementRecord {
    /// Create a visit without bone age
    #[must_use]
    pub const fn new(measured_on: NaiveDate, measurements: Vec<Measurement>) -> Self {
        Self {
            measured_on,
            measurements,
            bone_age_years: None,
        }
    }

    /// Attach a bone age reading
    #[must_use]
    pub const fn with_bone_age(mut self, bone_age_years: f64) -> Self {
        self.bone_age_years = Some(bone_age_years);
        self
    }
}

/// Source of patients and their visits
pub trait PatientRepository: Send + Sync {
    /// Patient with the given identifier, if known
    fn patient(&self, id: &str) -> Result<Option<PatientRecord>>;

    /// Every visit recorded for a patient, in any order
    fn visits(&self, id: &str) -> Result<Vec<MeasurementRecord>>;

    /// Identifiers of all known patients
    fn patient_ids(&self) -> Result<Vec<String>>;

    /// Most recent visit for a patient
    fn latest_visit(&self, id: &str) -> Result<Option<MeasurementRecord>> {
        Ok(self
            .visits(id)?
            .into_iter()
            .max_by_key(|visit| visit.measured_on))
    }
}

/// Repository held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    patients: FxHashMap<String, PatientRecord>,
    visits: FxHashMap<String, Vec<MeasurementRecord>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a patient
    pub fn add_patient(&mut self, patient: PatientRecord) {
        self.patients.insert(patient.id.clone(), patient);
    }

    /// Record a visit for a known patient
    ///
    /// # Errors
    /// Returns [`GrowthError::InvalidInput`] when the patient is unknown or
    /// the visit predates the birth date
    pub fn add_visit(&mut self, id: &str, visit: MeasurementRecord) -> Result<()> {
        let patient = self
            .patients
            .get(id)
            .ok_or_else(|| GrowthError::invalid_input(format!("unknown patient '{id}'")))?;
        if visit.measured_on < patient.birth_date {
            return Err(GrowthError::invalid_input(format!(
                "visit on {} precedes birth date {} of patient '{id}'",
                visit.measured_on, patient.birth_date
            )));
        }
        self.visits.entry(id.to_string()).or_default().push(visit);
        Ok(())
    }
}

impl PatientRepository for InMemoryRepository {
    fn patient(&self, id: &str) -> Result<Option<PatientRecord>> {
        Ok(self.patients.get(id).cloned())
    }

    fn visits(&self, id: &str) -> Result<Vec<MeasurementRecord>> {
        Ok(self.visits.get(id).cloned().unwrap_or_default())
    }

    fn patient_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<_> = self.patients.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Evaluation of one patient's visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientEvaluation {
    /// Repository identifier
    pub patient_id: String,
    /// Visit date
    pub measured_on: NaiveDate,
    /// Age at the visit
    pub age: AgeBreakdown,
    /// Evaluation outcome
    pub result: EvaluationResult,
}

/// Evaluate a patient's most recent visit
///
/// # Errors
/// * [`GrowthError::InvalidInput`] when the patient is unknown or has no visits
/// * Any error from [`GrowthEvaluator::evaluate`]
pub fn evaluate_latest<R>(
    repository: &R,
    evaluator: &GrowthEvaluator<'_>,
    id: &str,
) -> Result<PatientEvaluation>
where
    R: PatientRepository + ?Sized,
{
    let patient = repository
        .patient(id)?
        .ok_or_else(|| GrowthError::invalid_input(format!("unknown patient '{id}'")))?;
    let visit = repository
        .latest_visit(id)?
        .ok_or_else(|| {
            GrowthError::invalid_input(format!("patient '{id}' has no recorded visits"))
        })?;

    let (context, age) = patient.context_at(&visit)?;
    let result = evaluator.evaluate(&context, &visit.measurements)?;

    log_evaluation(
        id,
        result.scores.len(),
        result.diagnoses.len(),
        result.clamp_warnings().count(),
    );

    Ok(PatientEvaluation {
        patient_id: patient.id,
        measured_on: visit.measured_on,
        age,
        result,
    })
}

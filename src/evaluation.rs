//! End-to-end growth evaluation
//!
//! [`GrowthEvaluator`] ties the pieces together for one patient: resolve the
//! reference table for each measurement, interpolate it at the patient's age,
//! transform the value into a Z-score and percentile, then run the
//! mid-parental target, bone age comparison and diagnostic classifier.
//!
//! An evaluation is a pure function of the patient context, the measurements
//! and the read-only store. Independent requests can be evaluated in
//! parallel with [`GrowthEvaluator::evaluate_batch`].

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::bone_age::{BoneAgeComparison, compare_bone_age};
use crate::algorithm::diagnostics::severity::{Severity, highest_severity};
use crate::algorithm::diagnostics::{ClassifierInput, Diagnoses, classify};
use crate::algorithm::interpolation::{RangeClampWarning, interpolate};
use crate::algorithm::parental::{TargetAssessment, parental_target};
use crate::algorithm::percentile::{StandardScore, Z_P3, Z_P97, percentile};
use crate::algorithm::zscore::{CurvePoint, centile_curve, z_score};
use crate::config::{EvaluationConfig, ExtrapolationPolicy};
use crate::error::{GrowthError, Result};
use crate::models::measurement::{Measurement, body_mass_index};
use crate::models::patient::PatientContext;
use crate::models::types::{Parameter, Unit};
use crate::reference::key::{AgeDomain, Population, ReferenceTableKey};
use crate::reference::store::ReferenceTableStore;
use crate::reference::table::{AgeUnit, ReferenceTable};

/// One patient and the measurements taken at a single visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Patient context
    pub patient: PatientContext,
    /// Measurements, at most one per parameter
    pub measurements: Vec<Measurement>,
}

impl EvaluationRequest {
    /// Create a new request
    #[must_use]
    pub const fn new(patient: PatientContext, measurements: Vec<Measurement>) -> Self {
        Self {
            patient,
            measurements,
        }
    }
}

/// Score of one parameter against its reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterScore {
    /// Scored parameter
    pub parameter: Parameter,
    /// Value in the table's unit
    pub value: f64,
    /// The table's value unit
    pub unit: Unit,
    /// Z-score; `None` when the age is outside the table and extrapolation is rejected
    pub z: Option<f64>,
    /// Percentile (0-100); `None` exactly when `z` is `None`
    pub percentile: Option<f64>,
    /// Key of the table used
    pub key: ReferenceTableKey,
    /// Name of the table used
    pub table: String,
    /// Age index the table was read at
    pub age_index: f64,
    /// Unit of `age_index`
    pub age_unit: AgeUnit,
    /// Set when `age_index` was outside the table
    pub clamp: Option<RangeClampWarning>,
    /// True when the value was computed (BMI) rather than measured
    pub derived: bool,
}

impl ParameterScore {
    /// Z-score and percentile, when defined
    #[must_use]
    pub fn standard_score(&self) -> Option<StandardScore> {
        self.z.zip(self.percentile)
            .map(|(z, percentile)| StandardScore { z, percentile })
    }

    /// Whether the score was read at the edge of its table
    #[must_use]
    pub const fn is_clamped(&self) -> bool {
        self.clamp.is_some()
    }
}

/// How the age axis was chosen for a preterm patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PretermCorrection {
    /// Gestational age at birth plus chronological weeks
    pub postmenstrual_age_weeks: f64,
    /// False once the patient is past the preterm window and standard
    /// tables were used with chronological age
    pub preterm_tables_used: bool,
}

/// Everything an evaluation produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Scores in measurement order, derived BMI last
    pub scores: Vec<ParameterScore>,
    /// Age-axis decision for preterm patients
    pub preterm: Option<PretermCorrection>,
    /// Mid-parental target, when both parents' heights are known
    pub parental_target: Option<TargetAssessment>,
    /// Bone age comparison, when bone age is known
    pub bone_age: Option<BoneAgeComparison>,
    /// Findings; empty when everything is within normal limits
    pub diagnoses: Diagnoses,
    /// Population notes that apply regardless of findings
    pub advisories: Vec<String>,
}

impl EvaluationResult {
    /// Score for `parameter`, if it was evaluated
    #[must_use]
    pub fn score(&self, parameter: Parameter) -> Option<&ParameterScore> {
        self.scores.iter().find(|score| score.parameter == parameter)
    }

    /// Whether no diagnosis was emitted
    #[must_use]
    pub fn is_within_normal_limits(&self) -> bool {
        self.diagnoses.is_empty()
    }

    /// Severity of the most serious finding, if any
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        highest_severity(self.diagnoses.iter().map(|diagnosis| diagnosis.severity))
    }

    /// Range-clamp warnings attached to the scores
    pub fn clamp_warnings(&self) -> impl Iterator<Item = (Parameter, &RangeClampWarning)> {
        self.scores
            .iter()
            .filter_map(|score| score.clamp.as_ref().map(|clamp| (score.parameter, clamp)))
    }
}

/// P3, P50 and P97 lines of one reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentileCurves {
    /// Table the curves were drawn from
    pub key: ReferenceTableKey,
    /// Unit of the age axis
    pub age_unit: AgeUnit,
    /// Unit of the value axis
    pub value_unit: Unit,
    /// 3rd percentile
    pub p3: Vec<CurvePoint>,
    /// Median
    pub p50: Vec<CurvePoint>,
    /// 97th percentile
    pub p97: Vec<CurvePoint>,
}

/// Where on the age axis a patient is read
#[derive(Debug, Clone, Copy)]
enum AgeBasis {
    Chronological { years: f64 },
    Postmenstrual { weeks: f64 },
}

impl AgeBasis {
    fn index_in(self, unit: AgeUnit) -> f64 {
        match self {
            Self::Chronological { years } => unit.from_years(years),
            Self::Postmenstrual { weeks } => unit.from_weeks(weeks),
        }
    }
}

/// Evaluates patients against a read-only table store
#[derive(Debug, Clone)]
pub struct GrowthEvaluator<'a> {
    store: &'a ReferenceTableStore,
    config: EvaluationConfig,
}

impl<'a> GrowthEvaluator<'a> {
    /// Create an evaluator
    ///
    /// # Errors
    /// Returns [`GrowthError::InvalidInput`] when the configuration is inconsistent
    pub fn new(store: &'a ReferenceTableStore, config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// The evaluator's configuration
    #[must_use]
    pub const fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// The table store
    #[must_use]
    pub const fn store(&self) -> &'a ReferenceTableStore {
        self.store
    }

    /// Evaluate one patient
    ///
    /// # Arguments
    /// * `patient` - Patient context
    /// * `measurements` - At least one measurement, at most one per parameter
    ///
    /// # Errors
    /// * [`GrowthError::InvalidInput`] for invalid patient fields, empty or
    ///   duplicated measurements, non-positive values or incompatible units
    /// * [`GrowthError::Configuration`] when a needed table is not registered
    pub fn evaluate(
        &self,
        patient: &PatientContext,
        measurements: &[Measurement],
    ) -> Result<EvaluationResult> {
        patient.validate(self.config.min_age_years, self.config.max_age_years)?;
        if measurements.is_empty() {
            return Err(GrowthError::invalid_input("at least one measurement is required"));
        }
        if let Some(parameter) = measurements.iter().map(|m| m.parameter).duplicates().next() {
            return Err(GrowthError::invalid_input(format!(
                "{parameter} was measured more than once in the same evaluation"
            )));
        }
        for measurement in measurements {
            measurement.canonical_value()?;
        }

        let (population, basis, preterm) = self.age_axis(patient)?;

        let mut scores = measurements
            .iter()
            .map(|measurement| self.score(patient, population, basis, measurement, false))
            .collect::<Result<Vec<_>>>()?;
        // A derived BMI is only scored when a BMI table is registered
        if let Some(bmi) = derived_bmi(measurements)? {
            let key = self.table_key(patient, population, Parameter::Bmi);
            if self.store.contains(&key) {
                scores.push(self.score(patient, population, basis, &bmi, true)?);
            }
        }

        let parental_target = match patient.parent_heights() {
            Some((mother, father)) => Some(self.target_assessment(patient, mother, father)?),
            None => None,
        };
        let bone_age = patient
            .bone_age_years
            .map(|bone_age| {
                compare_bone_age(bone_age, patient.age_years, self.config.bone_age_threshold_years)
            })
            .transpose()?;

        let score_of = |parameter| {
            scores
                .iter()
                .find(|score: &&ParameterScore| score.parameter == parameter)
                .and_then(ParameterScore::standard_score)
        };
        let input = ClassifierInput {
            age_years: patient.age_years,
            height: score_of(Parameter::Height),
            bmi: score_of(Parameter::Bmi),
            target: parental_target,
            bone_age,
        };
        let diagnoses = classify(&input, &self.config.thresholds);

        let advisories = patient
            .population
            .advisory()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(EvaluationResult {
            scores,
            preterm,
            parental_target,
            bone_age,
            diagnoses,
            advisories,
        })
    }

    /// Evaluate a request
    ///
    /// # Errors
    /// See [`GrowthEvaluator::evaluate`]
    pub fn evaluate_request(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        self.evaluate(&request.patient, &request.measurements)
    }

    /// Evaluate independent requests in parallel
    ///
    /// Results are returned in request order; one failing request does not
    /// affect the others.
    #[must_use]
    pub fn evaluate_batch(&self, requests: &[EvaluationRequest]) -> Vec<Result<EvaluationResult>> {
        requests
            .par_iter()
            .map(|request| self.evaluate_request(request))
            .collect()
    }

    /// P3, P50 and P97 lines of the table registered for `key`
    ///
    /// # Errors
    /// Returns [`GrowthError::Configuration`] when no table is registered
    pub fn centile_curves(&self, key: &ReferenceTableKey) -> Result<CentileCurves> {
        let table = self.store.get(key)?;
        Ok(CentileCurves {
            key: *key,
            age_unit: table.age_unit(),
            value_unit: table.value_unit(),
            p3: centile_curve(table, Z_P3)?,
            p50: centile_curve(table, 0.0)?,
            p97: centile_curve(table, Z_P97)?,
        })
    }

    fn age_axis(
        &self,
        patient: &PatientContext,
    ) -> Result<(Population, AgeBasis, Option<PretermCorrection>)> {
        let chronological = AgeBasis::Chronological {
            years: patient.age_years,
        };
        if patient.population != Population::Preterm {
            return Ok((patient.population, chronological, None));
        }

        let weeks = patient.postmenstrual_age_weeks()?;
        let preterm_tables_used = weeks <= self.config.preterm_max_postmenstrual_weeks;
        let correction = Some(PretermCorrection {
            postmenstrual_age_weeks: weeks,
            preterm_tables_used,
        });
        if preterm_tables_used {
            Ok((Population::Preterm, AgeBasis::Postmenstrual { weeks }, correction))
        } else {
            Ok((Population::Standard, chronological, correction))
        }
    }

    fn table_key(
        &self,
        patient: &PatientContext,
        population: Population,
        parameter: Parameter,
    ) -> ReferenceTableKey {
        let age_domain = match population {
            Population::Preterm => AgeDomain::Infant,
            Population::Standard | Population::Trisomy21 => {
                AgeDomain::for_age(patient.age_years, self.config.infant_domain_max_years)
            }
        };
        ReferenceTableKey::new(patient.sex, parameter, population, age_domain)
    }

    fn score(
        &self,
        patient: &PatientContext,
        population: Population,
        basis: AgeBasis,
        measurement: &Measurement,
        derived: bool,
    ) -> Result<ParameterScore> {
        let key = self.table_key(patient, population, measurement.parameter);
        let table = self.store.get(&key)?;
        let value = measurement.unit.convert(measurement.value, table.value_unit())?;

        let age_index = basis.index_in(table.age_unit());
        let interpolated = interpolate(table, age_index)?;

        let z = match (interpolated.clamp, self.config.extrapolation) {
            (Some(_), ExtrapolationPolicy::Reject) => None,
            _ => Some(z_score(value, &interpolated.params)?),
        };

        Ok(ParameterScore {
            parameter: measurement.parameter,
            value,
            unit: table.value_unit(),
            z,
            percentile: z.map(percentile),
            key,
            table: table.name().to_string(),
            age_index,
            age_unit: table.age_unit(),
            clamp: interpolated.clamp,
            derived,
        })
    }

    fn target_assessment(
        &self,
        patient: &PatientContext,
        mother: f64,
        father: f64,
    ) -> Result<TargetAssessment> {
        let target = parental_target(
            mother,
            father,
            patient.sex,
            self.config.parental_band_half_width_cm,
        )?;

        let adult_key =
            ReferenceTableKey::standard(patient.sex, Parameter::Height, AgeDomain::ChildAdolescent);
        let target_percentile = match self.store.get(&adult_key) {
            Ok(table) => Some(adult_percentile(table, target.central)?),
            Err(GrowthError::Configuration { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(TargetAssessment {
            target,
            target_percentile,
        })
    }
}

/// Percentile of a height on the oldest row of a height table
fn adult_percentile(table: &ReferenceTable, height_cm: f64) -> Result<f64> {
    let (_, oldest) = table.age_range();
    let params = interpolate(table, oldest)?.params;
    let value = Unit::Centimeters.convert(height_cm, table.value_unit())?;
    Ok(percentile(z_score(value, &params)?))
}

/// BMI from weight and height when BMI itself was not measured
fn derived_bmi(measurements: &[Measurement]) -> Result<Option<Measurement>> {
    let find = |parameter| measurements.iter().find(|m: &&Measurement| m.parameter == parameter);
    if find(Parameter::Bmi).is_some() {
        return Ok(None);
    }
    match (find(Parameter::Weight), find(Parameter::Height)) {
        (Some(weight), Some(height)) => {
            let bmi = body_mass_index(weight.canonical_value()?, height.canonical_value()?)?;
            Ok(Some(Measurement::bmi(bmi)))
        }
        _ => Ok(None),
    }
}

//! Raw anthropometric measurements
//!
//! A measurement is supplied by the data-entry collaborator in whatever unit
//! was recorded; it is normalised to its parameter's canonical unit before any
//! reference lookup happens.

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result, ensure_positive};
use crate::models::types::{Parameter, Unit};

/// A single raw measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Which parameter was measured
    pub parameter: Parameter,
    /// Raw value in `unit`
    pub value: f64,
    /// Unit the value was recorded in
    pub unit: Unit,
}

impl Measurement {
    /// Create a new measurement
    #[must_use]
    pub const fn new(parameter: Parameter, value: f64, unit: Unit) -> Self {
        Self {
            parameter,
            value,
            unit,
        }
    }

    /// Weight in kilograms
    #[must_use]
    pub const fn weight_kg(value: f64) -> Self {
        Self::new(Parameter::Weight, value, Unit::Kilograms)
    }

    /// Height or length in centimetres
    #[must_use]
    pub const fn height_cm(value: f64) -> Self {
        Self::new(Parameter::Height, value, Unit::Centimeters)
    }

    /// Head circumference in centimetres
    #[must_use]
    pub const fn head_circumference_cm(value: f64) -> Self {
        Self::new(Parameter::HeadCircumference, value, Unit::Centimeters)
    }

    /// Body mass index in kg/m²
    #[must_use]
    pub const fn bmi(value: f64) -> Self {
        Self::new(Parameter::Bmi, value, Unit::KilogramsPerSquareMeter)
    }

    /// Validate the value and convert it to the parameter's canonical unit
    pub fn canonical_value(&self) -> Result<f64> {
        if !self.unit.is_compatible_with(self.parameter) {
            return Err(GrowthError::invalid_input(format!(
                "unit {} cannot express {}",
                self.unit, self.parameter
            )));
        }
        ensure_positive(self.value, &self.parameter.to_string())?;
        self.unit
            .convert(self.value, self.parameter.canonical_unit())
    }
}

/// Body mass index from weight (kg) and height (cm)
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> Result<f64> {
    ensure_positive(weight_kg, "weight")?;
    ensure_positive(height_cm, "height")?;
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

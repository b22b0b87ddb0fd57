//! Common domain type definitions
//!
//! This module contains the enum types shared by patient context, measurements
//! and reference-table keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};

/// Biological sex used to select sex-specific reference curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Lowercase identifier used in keys and reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "boy" | "boys" | "1" => Ok(Self::Male),
            "f" | "female" | "girl" | "girls" | "2" => Ok(Self::Female),
            other => Err(GrowthError::invalid_input(format!("unrecognised sex '{other}'"))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anthropometric parameter scored against a reference curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Body weight
    Weight,
    /// Standing height or recumbent length
    Height,
    /// Body mass index (weight / height²)
    Bmi,
    /// Occipitofrontal head circumference
    HeadCircumference,
}

impl Parameter {
    /// All parameters, in report order
    pub const ALL: [Self; 4] = [Self::Weight, Self::Height, Self::Bmi, Self::HeadCircumference];

    /// Get a display name for this parameter
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Weight => "Weight-for-age",
            Self::Height => "Height-for-age",
            Self::Bmi => "BMI-for-age",
            Self::HeadCircumference => "Head circumference-for-age",
        }
    }

    /// Unit every measurement of this parameter is normalised to
    #[must_use]
    pub const fn canonical_unit(self) -> Unit {
        match self {
            Self::Weight => Unit::Kilograms,
            Self::Height | Self::HeadCircumference => Unit::Centimeters,
            Self::Bmi => Unit::KilogramsPerSquareMeter,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Bmi => "bmi",
            Self::HeadCircumference => "head_circumference",
        };
        f.write_str(name)
    }
}

/// Unit of a raw measurement or of a reference table's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Kilograms
    #[serde(alias = "kg")]
    Kilograms,
    /// Grams
    #[serde(alias = "g")]
    Grams,
    /// Centimetres
    #[serde(alias = "cm")]
    Centimeters,
    /// Millimetres
    #[serde(alias = "mm")]
    Millimeters,
    /// Metres
    #[serde(alias = "m")]
    Meters,
    /// Kilograms per square metre
    #[serde(alias = "kg/m2")]
    KilogramsPerSquareMeter,
}

/// Physical dimension shared by convertible units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Mass,
    Length,
    MassPerArea,
}

impl Unit {
    /// Short unit symbol
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Grams => "g",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::Meters => "m",
            Self::KilogramsPerSquareMeter => "kg/m²",
        }
    }

    const fn dimension(self) -> Dimension {
        match self {
            Self::Kilograms | Self::Grams => Dimension::Mass,
            Self::Centimeters | Self::Millimeters | Self::Meters => Dimension::Length,
            Self::KilogramsPerSquareMeter => Dimension::MassPerArea,
        }
    }

    /// Factor converting one of this unit into the dimension's base unit (kg, cm, kg/m²)
    const fn base_factor(self) -> f64 {
        match self {
            Self::Kilograms | Self::Centimeters | Self::KilogramsPerSquareMeter => 1.0,
            Self::Grams => 0.001,
            Self::Millimeters => 0.1,
            Self::Meters => 100.0,
        }
    }

    /// Whether a value in this unit can express the given parameter
    #[must_use]
    pub fn is_compatible_with(self, parameter: Parameter) -> bool {
        self.dimension() == parameter.canonical_unit().dimension()
    }

    /// Convert a value from this unit into `target`
    pub fn convert(self, value: f64, target: Self) -> Result<f64> {
        if self.dimension() != target.dimension() {
            return Err(GrowthError::invalid_input(format!(
                "cannot convert {} to {}",
                self.symbol(),
                target.symbol()
            )));
        }
        if self == target {
            return Ok(value);
        }
        Ok(value * self.base_factor() / target.base_factor())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

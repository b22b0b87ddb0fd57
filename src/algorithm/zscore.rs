//! Z-score transforms
//!
//! LMS mode applies Cole's power transform; band mode derives a standard
//! deviation proxy from the P3-P97 spread for populations where only three
//! percentile curves are published.

use serde::{Deserialize, Serialize};

use crate::algorithm::interpolation::{CurveParams, interpolate};
use crate::error::{GrowthError, Result, ensure_positive};
use crate::reference::table::{ReferenceTable, TableRows};

/// Two-sided 95% normal quantile used to turn the P3-P97 spread into an SD
pub const BAND_QUANTILE: f64 = 1.959_964;

/// |L| below this is treated as the L = 0 (log) case
const L_ZERO_TOLERANCE: f64 = 1e-12;

/// Z-score from the LMS power transform
///
/// # Arguments
/// * `value` - Measurement in the table's value unit
/// * `l`, `m`, `s` - Interpolated LMS parameters
pub fn lms_z_score(value: f64, l: f64, m: f64, s: f64) -> Result<f64> {
    ensure_positive(value, "measurement")?;
    ensure_positive(m, "LMS median (M)")?;
    ensure_positive(s, "LMS coefficient of variation (S)")?;

    let ratio = value / m;
    let z = if l.abs() < L_ZERO_TOLERANCE {
        ratio.ln() / s
    } else {
        (ratio.powf(l) - 1.0) / (l * s)
    };
    Ok(z)
}

/// Standard deviation proxy of a percentile band
#[must_use]
pub fn band_standard_deviation(p3: f64, p97: f64) -> f64 {
    (p97 - p3) / (2.0 * BAND_QUANTILE)
}

/// Z-score from a P3/P50/P97 band
pub fn band_z_score(value: f64, p3: f64, p50: f64, p97: f64) -> Result<f64> {
    ensure_positive(value, "measurement")?;
    let sd = band_standard_deviation(p3, p97);
    if !(sd.is_finite() && sd > 0.0) {
        return Err(GrowthError::invalid_input(format!(
            "band standard deviation must be positive (P3 {p3}, P97 {p97})"
        )));
    }
    Ok((value - p50) / sd)
}

/// Z-score for a value given interpolated parameters of either kind
pub fn z_score(value: f64, params: &CurveParams) -> Result<f64> {
    match *params {
        CurveParams::Lms { l, m, s } => lms_z_score(value, l, m, s),
        CurveParams::Band { p3, p50, p97 } => band_z_score(value, p3, p50, p97),
    }
}

/// Measurement value lying at Z-score `z` (inverse transform)
pub fn value_at_z(z: f64, params: &CurveParams) -> Result<f64> {
    if !z.is_finite() {
        return Err(GrowthError::invalid_input(format!("Z-score {z} is not finite")));
    }

    match *params {
        CurveParams::Lms { l, m, s } => {
            ensure_positive(m, "LMS median (M)")?;
            ensure_positive(s, "LMS coefficient of variation (S)")?;
            if l.abs() < L_ZERO_TOLERANCE {
                return Ok(m * (s * z).exp());
            }
            let base = 1.0 + l * s * z;
            if base <= 0.0 {
                return Err(GrowthError::invalid_input(format!(
                    "Z-score {z} lies outside the support of the LMS distribution"
                )));
            }
            Ok(m * base.powf(1.0 / l))
        }
        CurveParams::Band { p3, p50, p97 } => {
            let sd = band_standard_deviation(p3, p97);
            Ok(p50 + z * sd)
        }
    }
}

/// One point of a centile curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Age index in the table's unit
    pub age: f64,
    /// Value at the requested Z-score
    pub value: f64,
}

/// Centile curve at Z-score `z`, evaluated at every knot of `table`
///
/// Chart layers draw the P3, P50 and P97 lines from these points.
pub fn centile_curve(table: &ReferenceTable, z: f64) -> Result<Vec<CurvePoint>> {
    let ages = match table.rows() {
        TableRows::Lms(rows) => rows.iter().map(|row| row.age).collect::<Vec<_>>(),
        TableRows::Band(rows) => rows.iter().map(|row| row.age).collect::<Vec<_>>(),
    };

    ages.into_iter()
        .map(|age| {
            let params = interpolate(table, age)?.params;
            Ok(CurvePoint {
                age,
                value: value_at_z(z, &params)?,
            })
        })
        .collect()
}

//! Piecewise-linear interpolation over reference tables
//!
//! Values are interpolated between the two rows bracketing the target age.
//! Outside the table's domain the nearest edge row is returned unchanged and a
//! [`RangeClampWarning`] records the clamp; nothing is ever extrapolated.

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::reference::table::{BandRow, LmsRow, ReferenceTable, TableRows};

/// Reference parameters at a single age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveParams {
    /// LMS triple
    Lms {
        /// Box-Cox power
        l: f64,
        /// Median
        m: f64,
        /// Coefficient of variation
        s: f64,
    },
    /// Percentile-band triple
    Band {
        /// 3rd percentile
        p3: f64,
        /// 50th percentile
        p50: f64,
        /// 97th percentile
        p97: f64,
    },
}

impl CurveParams {
    /// Median of the reference distribution
    #[must_use]
    pub const fn median(&self) -> f64 {
        match *self {
            Self::Lms { m, .. } => m,
            Self::Band { p50, .. } => p50,
        }
    }
}

/// Which edge of the table a target age was clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampSide {
    /// Target age precedes the first row
    BelowRange,
    /// Target age follows the last row
    AboveRange,
}

/// Non-fatal notice that a target age fell outside a table's domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeClampWarning {
    /// Side of the table that was used
    pub side: ClampSide,
    /// Age index that was requested
    pub requested_age: f64,
    /// Age index of the edge row whose values were used
    pub edge_age: f64,
}

/// Interpolation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interpolated {
    /// Parameters at the target age (or at the clamped edge)
    pub params: CurveParams,
    /// Present when the target age was outside the table's domain
    pub clamp: Option<RangeClampWarning>,
}

impl Interpolated {
    /// Whether the values come from a clamped edge row
    #[must_use]
    pub const fn is_clamped(&self) -> bool {
        self.clamp.is_some()
    }
}

/// A row the interpolator can work on
trait Knot: Copy {
    fn age(&self) -> f64;
    fn params(&self) -> CurveParams;
    fn lerp(lower: &Self, upper: &Self, t: f64) -> CurveParams;
}

impl Knot for LmsRow {
    fn age(&self) -> f64 {
        self.age
    }

    fn params(&self) -> CurveParams {
        CurveParams::Lms {
            l: self.l,
            m: self.m,
            s: self.s,
        }
    }

    fn lerp(lower: &Self, upper: &Self, t: f64) -> CurveParams {
        CurveParams::Lms {
            l: lerp(lower.l, upper.l, t),
            m: lerp(lower.m, upper.m, t),
            s: lerp(lower.s, upper.s, t),
        }
    }
}

impl Knot for BandRow {
    fn age(&self) -> f64 {
        self.age
    }

    fn params(&self) -> CurveParams {
        CurveParams::Band {
            p3: self.p3,
            p50: self.p50,
            p97: self.p97,
        }
    }

    fn lerp(lower: &Self, upper: &Self, t: f64) -> CurveParams {
        CurveParams::Band {
            p3: lerp(lower.p3, upper.p3, t),
            p50: lerp(lower.p50, upper.p50, t),
            p97: lerp(lower.p97, upper.p97, t),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate a table's parameters at `target_age` (in the table's age unit)
///
/// # Arguments
/// * `table` - A validated reference table
/// * `target_age` - Age index in the table's own unit
///
/// # Returns
/// The parameters at that age. Knot ages return the row values exactly; ages
/// outside the table return the edge row with a clamp warning.
pub fn interpolate(table: &ReferenceTable, target_age: f64) -> Result<Interpolated> {
    if !target_age.is_finite() {
        return Err(GrowthError::invalid_input(format!(
            "target age {target_age} is not a finite number"
        )));
    }

    match table.rows() {
        TableRows::Lms(rows) => interpolate_rows(table.name(), rows, target_age),
        TableRows::Band(rows) => interpolate_rows(table.name(), rows, target_age),
    }
}

fn interpolate_rows<K: Knot>(name: &str, rows: &[K], target_age: f64) -> Result<Interpolated> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(GrowthError::invalid_table(name, "table has no rows"));
    };

    if target_age < first.age() {
        return Ok(clamped(first, ClampSide::BelowRange, target_age));
    }
    if target_age > last.age() {
        return Ok(clamped(last, ClampSide::AboveRange, target_age));
    }

    // First row whose age is not below the target; exists because target <= last
    let upper_index = rows.partition_point(|row| row.age() < target_age);
    let upper = &rows[upper_index];

    if upper.age() == target_age {
        return Ok(Interpolated {
            params: upper.params(),
            clamp: None,
        });
    }

    // target > first.age(), so the upper row is never the first one here
    let lower = &rows[upper_index - 1];
    let t = (target_age - lower.age()) / (upper.age() - lower.age());

    Ok(Interpolated {
        params: K::lerp(lower, upper, t),
        clamp: None,
    })
}

fn clamped<K: Knot>(edge: &K, side: ClampSide, requested_age: f64) -> Interpolated {
    Interpolated {
        params: edge.params(),
        clamp: Some(RangeClampWarning {
            side,
            requested_age,
            edge_age: edge.age(),
        }),
    }
}

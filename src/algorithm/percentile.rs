//! Z-score to percentile conversion
//!
//! The standard normal CDF uses Hart's double-precision rational
//! approximation (as published by West, 2005), accurate to machine precision
//! over the clinical range and exactly 0.5 at zero.

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};

/// Beyond this |x| the tail probability underflows to zero
const CDF_TAIL_CUTOFF: f64 = 37.0;

/// Switch point between the rational approximation and the continued fraction
const CDF_RATIONAL_LIMIT: f64 = 7.071_067_811_865_47;

/// sqrt(2π)
const SQRT_TWO_PI: f64 = 2.506_628_274_631;

/// Z-score of the 3rd percentile
pub const Z_P3: f64 = -1.880_793_608_151_251;

/// Z-score of the 97th percentile
pub const Z_P97: f64 = 1.880_793_608_151_251;

/// Cumulative standard normal distribution function
#[must_use]
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let x_abs = x.abs();
    let tail = if x_abs > CDF_TAIL_CUTOFF {
        0.0
    } else {
        let exponential = (-x_abs * x_abs / 2.0).exp();
        if x_abs < CDF_RATIONAL_LIMIT {
            let mut numerator = 3.526_249_659_989_11e-2 * x_abs + 0.700_383_064_443_688;
            numerator = numerator * x_abs + 6.373_962_203_531_65;
            numerator = numerator * x_abs + 33.912_866_078_383;
            numerator = numerator * x_abs + 112.079_291_497_871;
            numerator = numerator * x_abs + 221.213_596_169_931;
            numerator = numerator * x_abs + 220.206_867_912_376;

            let mut denominator = 8.838_834_764_831_84e-2 * x_abs + 1.755_667_163_182_64;
            denominator = denominator * x_abs + 16.064_177_579_207;
            denominator = denominator * x_abs + 86.780_732_202_946_1;
            denominator = denominator * x_abs + 296.564_248_779_674;
            denominator = denominator * x_abs + 637.333_633_378_831;
            denominator = denominator * x_abs + 793.826_512_519_948;
            denominator = denominator * x_abs + 440.413_735_824_752;

            exponential * numerator / denominator
        } else {
            let mut fraction = x_abs + 0.65;
            fraction = x_abs + 4.0 / fraction;
            fraction = x_abs + 3.0 / fraction;
            fraction = x_abs + 2.0 / fraction;
            fraction = x_abs + 1.0 / fraction;
            exponential / fraction / SQRT_TWO_PI
        }
    };

    if x > 0.0 { 1.0 - tail } else { tail }
}

/// Cumulative percentile (0-100) of a Z-score
#[must_use]
pub fn percentile(z: f64) -> f64 {
    standard_normal_cdf(z) * 100.0
}

/// Z-score whose cumulative percentile is `percentile`
///
/// Solved by bisection on the CDF, which is monotonic, so the result is
/// consistent with [`percentile`] to well below clinical resolution.
pub fn z_for_percentile(percentile: f64) -> Result<f64> {
    if !(percentile > 0.0 && percentile < 100.0) {
        return Err(GrowthError::invalid_input(format!(
            "percentile must lie strictly between 0 and 100, got {percentile}"
        )));
    }

    let target = percentile / 100.0;
    let (mut low, mut high) = (-CDF_TAIL_CUTOFF, CDF_TAIL_CUTOFF);
    for _ in 0..200 {
        let mid = (low + high) / 2.0;
        if standard_normal_cdf(mid) < target {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < 1e-13 {
            break;
        }
    }
    Ok((low + high) / 2.0)
}

/// A Z-score with its percentile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScore {
    /// Standard deviations from the reference median
    pub z: f64,
    /// Cumulative percentile, 0-100
    pub percentile: f64,
}

impl StandardScore {
    /// Build a score from a Z-score
    #[must_use]
    pub fn from_z(z: f64) -> Self {
        Self {
            z,
            percentile: percentile(z),
        }
    }
}

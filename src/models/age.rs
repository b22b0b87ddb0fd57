//! Age calculation from calendar dates

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};

/// Mean days per year used for fractional ages
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Age at a measurement date, both as a fraction and as whole years and months
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBreakdown {
    /// Whole completed years
    pub years: u32,
    /// Whole completed months beyond `years` (0-11)
    pub months: u32,
    /// Days elapsed since birth
    pub days: i64,
    /// Fractional age in years (days / 365.25)
    pub fractional_years: f64,
}

impl AgeBreakdown {
    /// Total completed months
    #[must_use]
    pub const fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }
}

/// Compute the age at `measured_on` for someone born on `birth_date`
pub fn age_between(birth_date: NaiveDate, measured_on: NaiveDate) -> Result<AgeBreakdown> {
    if measured_on < birth_date {
        return Err(GrowthError::invalid_input(format!(
            "measurement date {measured_on} precedes birth date {birth_date}"
        )));
    }

    let days = (measured_on - birth_date).num_days();

    let mut total_months = (measured_on.year() - birth_date.year()) * 12
        + measured_on.month() as i32
        - birth_date.month() as i32;
    if measured_on.day() < birth_date.day() {
        total_months -= 1;
    }
    let total_months = u32::try_from(total_months.max(0)).unwrap_or(0);

    Ok(AgeBreakdown {
        years: total_months / 12,
        months: total_months % 12,
        days,
        fractional_years: days as f64 / DAYS_PER_YEAR,
    })
}

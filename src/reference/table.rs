//! Reference tables
//!
//! A table is an ordered sequence of knots on an age axis, either LMS
//! parameters or P3/P50/P97 percentile bands. Tables are validated when they
//! are built or deserialized, so every `ReferenceTable` in circulation holds
//! at least two rows with strictly increasing ages and well-formed values.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::models::patient::WEEKS_PER_MONTH;
use crate::models::types::Unit;
use crate::reference::key::TransformMode;

/// Unit of a table's age index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    /// Weeks (postmenstrual age for preterm tables)
    Weeks,
    /// Completed months
    Months,
    /// Fractional years
    Years,
}

impl AgeUnit {
    /// Convert a fractional age in years to this unit
    #[must_use]
    pub fn from_years(self, years: f64) -> f64 {
        match self {
            Self::Weeks => years * 12.0 * WEEKS_PER_MONTH,
            Self::Months => years * 12.0,
            Self::Years => years,
        }
    }

    /// Convert a number of weeks to this unit
    #[must_use]
    pub fn from_weeks(self, weeks: f64) -> f64 {
        match self {
            Self::Weeks => weeks,
            Self::Months => weeks / WEEKS_PER_MONTH,
            Self::Years => weeks / WEEKS_PER_MONTH / 12.0,
        }
    }
}

impl fmt::Display for AgeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weeks => f.write_str("weeks"),
            Self::Months => f.write_str("months"),
            Self::Years => f.write_str("years"),
        }
    }
}

/// One knot of an LMS table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmsRow {
    /// Age index in the table's age unit
    pub age: f64,
    /// Box-Cox power (skewness)
    pub l: f64,
    /// Median
    pub m: f64,
    /// Coefficient of variation
    pub s: f64,
}

impl LmsRow {
    /// Create a new LMS row
    #[must_use]
    pub const fn new(age: f64, l: f64, m: f64, s: f64) -> Self {
        Self { age, l, m, s }
    }
}

/// One knot of a percentile-band table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    /// Age index in the table's age unit
    pub age: f64,
    /// 3rd percentile
    pub p3: f64,
    /// 50th percentile
    pub p50: f64,
    /// 97th percentile
    pub p97: f64,
}

impl BandRow {
    /// Create a new band row
    #[must_use]
    pub const fn new(age: f64, p3: f64, p50: f64, p97: f64) -> Self {
        Self { age, p3, p50, p97 }
    }
}

/// Rows of a table, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum TableRows {
    /// LMS parameter rows
    Lms(Vec<LmsRow>),
    /// P3/P50/P97 rows
    Band(Vec<BandRow>),
}

impl TableRows {
    /// Transform mode these rows support
    #[must_use]
    pub const fn mode(&self) -> TransformMode {
        match self {
            Self::Lms(_) => TransformMode::Lms,
            Self::Band(_) => TransformMode::Band,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Lms(rows) => rows.len(),
            Self::Band(rows) => rows.len(),
        }
    }

    /// Whether there are no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Age indices of all rows, in table order
    #[must_use]
    pub fn ages(&self) -> Vec<f64> {
        match self {
            Self::Lms(rows) => rows.iter().map(|r| r.age).collect(),
            Self::Band(rows) => rows.iter().map(|r| r.age).collect(),
        }
    }
}

/// Serialized form of a reference table, validated on conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Human-readable table name (e.g. source dataset)
    pub name: String,
    /// Unit of the age index
    pub age_unit: AgeUnit,
    /// Unit of the tabulated values (M or P50)
    pub value_unit: Unit,
    /// Table rows
    #[serde(flatten)]
    pub rows: TableRows,
}

/// A validated reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableDefinition", into = "TableDefinition")]
pub struct ReferenceTable {
    name: String,
    age_unit: AgeUnit,
    value_unit: Unit,
    rows: TableRows,
}

impl ReferenceTable {
    /// Build and validate an LMS table
    pub fn lms(
        name: impl Into<String>,
        age_unit: AgeUnit,
        value_unit: Unit,
        rows: Vec<LmsRow>,
    ) -> Result<Self> {
        Self::from_rows(name.into(), age_unit, value_unit, TableRows::Lms(rows))
    }

    /// Build and validate a percentile-band table
    pub fn band(
        name: impl Into<String>,
        age_unit: AgeUnit,
        value_unit: Unit,
        rows: Vec<BandRow>,
    ) -> Result<Self> {
        Self::from_rows(name.into(), age_unit, value_unit, TableRows::Band(rows))
    }

    fn from_rows(
        name: String,
        age_unit: AgeUnit,
        value_unit: Unit,
        rows: TableRows,
    ) -> Result<Self> {
        validate_rows(&name, &rows)?;
        Ok(Self {
            name,
            age_unit,
            value_unit,
            rows,
        })
    }

    /// Table name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit of the age index
    #[must_use]
    pub const fn age_unit(&self) -> AgeUnit {
        self.age_unit
    }

    /// Unit of the tabulated values
    #[must_use]
    pub const fn value_unit(&self) -> Unit {
        self.value_unit
    }

    /// Table rows
    #[must_use]
    pub const fn rows(&self) -> &TableRows {
        &self.rows
    }

    /// Transform mode the rows support
    #[must_use]
    pub const fn mode(&self) -> TransformMode {
        self.rows.mode()
    }

    /// Number of rows (always at least 2)
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a validated table
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last age index covered by the table
    #[must_use]
    pub fn age_range(&self) -> (f64, f64) {
        let ages = self.rows.ages();
        let first = ages.first().copied().unwrap_or(f64::NAN);
        let last = ages.last().copied().unwrap_or(f64::NAN);
        (first, last)
    }

    /// Whether an age index lies inside the covered domain
    #[must_use]
    pub fn covers(&self, age: f64) -> bool {
        let (first, last) = self.age_range();
        (first..=last).contains(&age)
    }
}

impl TryFrom<TableDefinition> for ReferenceTable {
    type Error = GrowthError;

    fn try_from(definition: TableDefinition) -> Result<Self> {
        Self::from_rows(
            definition.name,
            definition.age_unit,
            definition.value_unit,
            definition.rows,
        )
    }
}

impl From<ReferenceTable> for TableDefinition {
    fn from(table: ReferenceTable) -> Self {
        Self {
            name: table.name,
            age_unit: table.age_unit,
            value_unit: table.value_unit,
            rows: table.rows,
        }
    }
}

fn validate_rows(name: &str, rows: &TableRows) -> Result<()> {
    if rows.len() < 2 {
        return Err(GrowthError::invalid_table(
            name,
            format!("at least 2 rows are required, found {}", rows.len()),
        ));
    }

    let ages = rows.ages();
    if let Some(age) = ages.iter().find(|age| !age.is_finite()) {
        return Err(GrowthError::invalid_table(name, format!("non-finite age index {age}")));
    }
    if let Some((previous, next)) = ages.iter().tuple_windows().find(|(a, b)| b <= a) {
        return Err(GrowthError::invalid_table(
            name,
            format!("age index must be strictly increasing ({previous} followed by {next})"),
        ));
    }

    match rows {
        TableRows::Lms(rows) => {
            for row in rows {
                if !(row.l.is_finite() && row.m.is_finite() && row.s.is_finite()) {
                    return Err(GrowthError::invalid_table(
                        name,
                        format!("non-finite LMS values at age {}", row.age),
                    ));
                }
                if row.m <= 0.0 {
                    return Err(GrowthError::invalid_table(
                        name,
                        format!("M must be positive at age {}, found {}", row.age, row.m),
                    ));
                }
                if row.s <= 0.0 {
                    return Err(GrowthError::invalid_table(
                        name,
                        format!("S must be positive at age {}, found {}", row.age, row.s),
                    ));
                }
            }
        }
        TableRows::Band(rows) => {
            for row in rows {
                if !(row.p3.is_finite() && row.p50.is_finite() && row.p97.is_finite()) {
                    return Err(GrowthError::invalid_table(
                        name,
                        format!("non-finite percentile values at age {}", row.age),
                    ));
                }
                if !(row.p3 < row.p50 && row.p50 < row.p97) {
                    return Err(GrowthError::invalid_table(
                        name,
                        format!(
                            "percentiles must satisfy P3 < P50 < P97 at age {} ({}, {}, {})",
                            row.age, row.p3, row.p50, row.p97
                        ),
                    ));
                }
            }
        }
    }

    Ok(())
}

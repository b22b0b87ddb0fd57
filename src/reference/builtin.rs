//! Built-in abridged reference datasets
//!
//! WHO Child Growth Standards, first year of life, at monthly knots for
//! weight, length/height, BMI and head circumference, plus a Fenton-style
//! preterm weight band indexed by postmenstrual week. L and S are held
//! constant across the year in this abridged form.
//!
//! Child/adolescent and trisomy 21 tables are not bundled; register them from
//! files with [`crate::reference::loader`].

use crate::error::Result;
use crate::models::types::{Parameter, Sex, Unit};
use crate::reference::key::{AgeDomain, Population, ReferenceTableKey};
use crate::reference::store::ReferenceTableStore;
use crate::reference::table::{AgeUnit, BandRow, LmsRow, ReferenceTable};

struct LmsSeries {
    name: &'static str,
    sex: Sex,
    parameter: Parameter,
    l: f64,
    s: f64,
    medians: [f64; 13],
}

const WHO_INFANT: [LmsSeries; 8] = [
    LmsSeries {
        name: "who_weight_for_age_boys_0_12m",
        sex: Sex::Male,
        parameter: Parameter::Weight,
        l: 0.3487,
        s: 0.14602,
        medians: [
            3.3464, 4.4709, 5.5675, 6.3762, 7.0023, 7.5105, 7.934, 8.297, 8.6151, 8.9014, 9.1649,
            9.4122, 9.6479,
        ],
    },
    LmsSeries {
        name: "who_length_for_age_boys_0_12m",
        sex: Sex::Male,
        parameter: Parameter::Height,
        l: 1.0,
        s: 0.0364,
        medians: [
            49.8842, 54.7244, 58.4249, 61.4292, 63.886, 65.9026, 67.6236, 69.1645, 70.5994,
            71.9634, 73.2652, 74.5073, 75.6878,
        ],
    },
    LmsSeries {
        name: "who_bmi_for_age_boys_0_12m",
        sex: Sex::Male,
        parameter: Parameter::Bmi,
        l: 1.0,
        s: 0.1,
        medians: [
            13.4, 14.1, 14.5, 14.8, 15.1, 15.3, 15.5, 15.7, 15.9, 16.1, 16.3, 16.5, 16.7,
        ],
    },
    LmsSeries {
        name: "who_head_circumference_for_age_boys_0_12m",
        sex: Sex::Male,
        parameter: Parameter::HeadCircumference,
        l: 1.0,
        s: 0.04,
        medians: [
            34.5, 37.1, 39.1, 40.5, 41.7, 42.7, 43.6, 44.4, 45.1, 45.7, 46.3, 46.8, 47.3,
        ],
    },
    LmsSeries {
        name: "who_weight_for_age_girls_0_12m",
        sex: Sex::Female,
        parameter: Parameter::Weight,
        l: 0.3809,
        s: 0.14171,
        medians: [
            3.2322, 4.1873, 5.1282, 5.8458, 6.4237, 6.8985, 7.297, 7.6456, 7.958, 8.2429, 8.5071,
            8.7551, 8.9885,
        ],
    },
    LmsSeries {
        name: "who_length_for_age_girls_0_12m",
        sex: Sex::Female,
        parameter: Parameter::Height,
        l: 1.0,
        s: 0.03557,
        medians: [
            49.1477, 53.6872, 57.0673, 59.8029, 62.0899, 64.0413, 65.7263, 67.2243, 68.5994,
            69.8949, 71.131, 72.3127, 73.4443,
        ],
    },
    LmsSeries {
        name: "who_bmi_for_age_girls_0_12m",
        sex: Sex::Female,
        parameter: Parameter::Bmi,
        l: 1.0,
        s: 0.1,
        medians: [
            13.3, 13.9, 14.3, 14.6, 14.9, 15.1, 15.3, 15.5, 15.7, 15.9, 16.1, 16.3, 16.5,
        ],
    },
    LmsSeries {
        name: "who_head_circumference_for_age_girls_0_12m",
        sex: Sex::Female,
        parameter: Parameter::HeadCircumference,
        l: 1.0,
        s: 0.04,
        medians: [
            33.9, 36.6, 38.5, 39.9, 41.1, 42.1, 43.0, 43.8, 44.5, 45.1, 45.7, 46.2, 46.7,
        ],
    },
];

/// First postmenstrual week of the preterm weight band
pub const FENTON_FIRST_WEEK: u32 = 24;

/// Last postmenstrual week of the preterm weight band
pub const FENTON_LAST_WEEK: u32 = 40;

/// WHO infant LMS tables (months 0-12) for both sexes
pub fn who_infant_tables() -> Result<Vec<(ReferenceTableKey, ReferenceTable)>> {
    WHO_INFANT
        .iter()
        .map(|series| {
            let rows = series
                .medians
                .iter()
                .zip(0_u32..)
                .map(|(&m, month)| LmsRow::new(f64::from(month), series.l, m, series.s))
                .collect();
            let table = ReferenceTable::lms(
                series.name,
                AgeUnit::Months,
                series.parameter.canonical_unit(),
                rows,
            )?;
            let key = ReferenceTableKey::standard(series.sex, series.parameter, AgeDomain::Infant);
            Ok((key, table))
        })
        .collect()
}

/// Preterm weight band (grams by postmenstrual week)
///
/// The source band is not split by sex, so the same rows are registered for
/// both. There is no bundled preterm length or head circumference band; those
/// lookups fail with a configuration error until a dedicated table is
/// registered.
pub fn fenton_weight_table() -> Result<ReferenceTable> {
    let rows = (FENTON_FIRST_WEEK..=FENTON_LAST_WEEK)
        .map(|week| {
            let p50 = 600.0 + 100.0 * f64::from(week - FENTON_FIRST_WEEK);
            BandRow::new(f64::from(week), p50 - 100.0, p50, p50 + 100.0)
        })
        .collect();
    ReferenceTable::band("fenton_weight_preterm", AgeUnit::Weeks, Unit::Grams, rows)
}

/// Preterm tables keyed for both sexes
pub fn preterm_tables() -> Result<Vec<(ReferenceTableKey, ReferenceTable)>> {
    let weight = fenton_weight_table()?;
    Ok([Sex::Male, Sex::Female]
        .into_iter()
        .map(|sex| {
            let key = ReferenceTableKey::new(
                sex,
                Parameter::Weight,
                Population::Preterm,
                AgeDomain::Infant,
            );
            (key, weight.clone())
        })
        .collect())
}

/// Store holding every built-in table
pub fn builtin_store() -> Result<ReferenceTableStore> {
    let mut builder = ReferenceTableStore::builder();
    builder.extend(who_infant_tables()?)?.extend(preterm_tables()?)?;
    Ok(builder.build())
}

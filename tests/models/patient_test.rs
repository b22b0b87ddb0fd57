use chrono::NaiveDate;
use growth_curves::{
    Measurement, Parameter, PatientContext, Population, Sex, Unit, age_between,
    models::body_mass_index,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_age_from_dates() {
    let age = age_between(date(2020, 1, 15), date(2025, 7, 14)).unwrap();
    assert_eq!((age.years, age.months), (5, 5));
    assert_eq!(age.days, 2007);
    assert!((age.fractional_years - 2007.0 / 365.25).abs() < 1e-12);

    let birthday = age_between(date(2020, 2, 29), date(2021, 2, 28)).unwrap();
    assert_eq!((birthday.years, birthday.months), (0, 11));

    assert!(age_between(date(2024, 1, 2), date(2024, 1, 1)).is_err());
}

#[test]
fn test_context_deserializes_with_defaults() {
    let patient: PatientContext =
        serde_json::from_str(r#"{"sex": "female", "age_years": 4.5}"#).unwrap();
    assert_eq!(patient.population, Population::Standard);
    assert_eq!(patient.parent_heights(), None);

    let preterm: PatientContext = serde_json::from_str(
        r#"{"sex": "male", "age_years": 0.25, "population": "preterm", "gestational_age_weeks": 30}"#,
    )
    .unwrap();
    assert!(preterm.validate(0.0, 19.0).is_ok());
    assert!((preterm.postmenstrual_age_weeks().unwrap() - (30.0 + 3.0 * 4.345)).abs() < 1e-9);
}

#[test]
fn test_measurements_accept_unit_symbols() {
    let measurements: Vec<Measurement> = serde_json::from_str(
        r#"[{"parameter": "weight", "value": 3400, "unit": "g"},
            {"parameter": "height", "value": 0.52, "unit": "m"},
            {"parameter": "head_circumference", "value": 345, "unit": "mm"}]"#,
    )
    .unwrap();
    assert_eq!(measurements[0].unit, Unit::Grams);
    assert!((measurements[0].canonical_value().unwrap() - 3.4).abs() < 1e-12);
    assert!((measurements[1].canonical_value().unwrap() - 52.0).abs() < 1e-9);
    assert_eq!(measurements[2].parameter, Parameter::HeadCircumference);
    assert!((measurements[2].canonical_value().unwrap() - 34.5).abs() < 1e-9);
}

#[test]
fn test_body_mass_index() {
    let bmi = body_mass_index(20.0, 110.0).unwrap();
    assert!((bmi - 20.0 / 1.21).abs() < 1e-9);
    assert!(body_mass_index(20.0, 0.0).is_err());
}

#[test]
fn test_sex_parsing_accepts_common_forms() {
    assert_eq!("Boys".parse::<Sex>().unwrap(), Sex::Male);
    assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
}

use chrono::NaiveDate;
use growth_curves::repository::{MeasurementRecord, PatientRecord};
use growth_curves::{
    DiagnosisKind, GrowthEvaluator, InMemoryRepository, Measurement, PatientRepository, Population,
    Sex, evaluate_latest, render_summary,
};

use crate::utils::{fixture_store, test_config};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn clinic() -> InMemoryRepository {
    let mut repository = InMemoryRepository::new();
    repository.add_patient(
        PatientRecord::new("boy-10", Sex::Male, date(2014, 3, 1)).with_parents(170.0, 185.0),
    );
    repository.add_patient(
        PatientRecord::new("preterm-girl", Sex::Female, date(2025, 1, 10))
            .with_population(Population::Preterm)
            .with_gestational_age(30.0),
    );

    repository
        .add_visit(
            "boy-10",
            MeasurementRecord::new(date(2022, 3, 1), vec![Measurement::height_cm(118.0)]),
        )
        .unwrap();
    repository
        .add_visit(
            "boy-10",
            MeasurementRecord::new(
                date(2024, 3, 1),
                vec![Measurement::height_cm(125.0), Measurement::weight_kg(24.0)],
            )
            .with_bone_age(7.5),
        )
        .unwrap();
    repository
        .add_visit(
            "preterm-girl",
            MeasurementRecord::new(date(2025, 2, 10), vec![Measurement::weight_kg(1.6)]),
        )
        .unwrap();
    repository
}

#[test]
fn test_repository_listing() {
    let repository = clinic();
    assert_eq!(repository.patient_ids().unwrap(), vec!["boy-10", "preterm-girl"]);
    assert_eq!(repository.visits("boy-10").unwrap().len(), 2);
    assert!(repository.visits("nobody").unwrap().is_empty());
    assert_eq!(
        repository.latest_visit("boy-10").unwrap().unwrap().measured_on,
        date(2024, 3, 1)
    );
}

#[test]
fn test_latest_visit_missing_table_is_reported() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    // Weight at ten years has no registered table
    assert!(evaluate_latest(&clinic(), &evaluator, "boy-10").is_err());
}

#[test]
fn test_evaluate_latest_visit_end_to_end() {
    let mut repository = clinic();
    repository
        .add_visit(
            "boy-10",
            MeasurementRecord::new(date(2024, 3, 2), vec![Measurement::height_cm(125.0)])
                .with_bone_age(7.5),
        )
        .unwrap();

    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let evaluation = evaluate_latest(&repository, &evaluator, "boy-10").unwrap();

    assert_eq!(evaluation.patient_id, "boy-10");
    assert_eq!(evaluation.measured_on, date(2024, 3, 2));
    assert_eq!((evaluation.age.years, evaluation.age.months), (10, 0));

    let kinds: Vec<_> = evaluation.result.diagnoses.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosisKind::LowStature,
            DiagnosisKind::FamilyPatternDeviation,
            DiagnosisKind::DelayedBoneAge,
        ]
    );

    let summary = render_summary(&evaluation.result);
    assert!(summary.starts_with("Growth assessment\n"));
    assert!(summary.contains("Target height: 184.0 cm (175.5-192.5 cm), percentile"));
    assert!(summary.contains("Recommendation:"));
}

#[test]
fn test_preterm_record_carries_gestational_age() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let evaluation = evaluate_latest(&clinic(), &evaluator, "preterm-girl").unwrap();

    assert_eq!(evaluation.age.total_months(), 1);
    let preterm = evaluation.result.preterm.unwrap();
    assert!(preterm.preterm_tables_used);
    assert!(preterm.postmenstrual_age_weeks > 30.0 && preterm.postmenstrual_age_weeks < 35.0);

    let summary = render_summary(&evaluation.result);
    assert!(summary.contains("(preterm tables)"));
}

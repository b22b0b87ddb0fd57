use growth_curves::{
    AgeDomain, BoneAgeClassification, DiagnosisKind, EvaluationConfig, EvaluationRequest,
    ExtrapolationPolicy, GrowthError, GrowthEvaluator, Measurement,
    PARENTAL_BAND_HALF_WIDTH_WIDE_CM, Parameter, PatientContext, Sex, builtin_store,
    render_summary,
};

use crate::utils::{fixture_store, test_config};

fn school_age_boy() -> PatientContext {
    PatientContext::new(Sex::Male, 10.0)
        .with_parents(170.0, 185.0)
        .with_bone_age(7.5)
}

#[test]
fn test_full_evaluation_of_short_boy_with_tall_parents() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let result = evaluator
        .evaluate(
            &school_age_boy(),
            &[Measurement::weight_kg(24.0), Measurement::height_cm(125.0)],
        )
        .unwrap_err();
    // No child weight-for-age table is registered in the fixtures
    assert!(matches!(result, GrowthError::Configuration { .. }));

    let result = evaluator
        .evaluate(
            &school_age_boy(),
            &[Measurement::height_cm(125.0), Measurement::bmi(15.36)],
        )
        .unwrap();

    let height = result.score(Parameter::Height).unwrap();
    assert!((height.z.unwrap() - (-2.160_191_717_014_888)).abs() < 1e-9);
    assert!((height.percentile.unwrap() - 1.537_891_555_734_399_7).abs() < 1e-6);
    assert_eq!(height.table, "boys_height_5_19");

    let bmi = result.score(Parameter::Bmi).unwrap();
    assert!(!bmi.derived);
    assert!((bmi.z.unwrap() - (-0.914_857_581_336_772_6)).abs() < 1e-9);

    let target = result.parental_target.unwrap();
    assert_eq!(target.target.central, 184.0);
    assert_eq!((target.target.low, target.target.high), (175.5, 192.5));
    assert!((target.target_percentile.unwrap() - 83.847_445_560_418_04).abs() < 1e-6);

    let bone_age = result.bone_age.unwrap();
    assert_eq!(bone_age.difference_years, -2.5);
    assert_eq!(bone_age.classification, BoneAgeClassification::Delayed);

    let kinds: Vec<_> = result.diagnoses.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosisKind::LowStature,
            DiagnosisKind::FamilyPatternDeviation,
            DiagnosisKind::DelayedBoneAge,
        ]
    );
    assert!(result.advisories.is_empty());

    let summary = render_summary(&result);
    assert!(summary.contains("Low stature"));
    assert!(summary.contains("Potential for catch-up growth"));
}

#[test]
fn test_bone_age_threshold_is_caller_choice() {
    let store = fixture_store();
    let patient = PatientContext::new(Sex::Female, 8.0).with_bone_age(7.0);
    let measurements = [Measurement::height_cm(126.6)];

    let six_months = GrowthEvaluator::new(&store, EvaluationConfig::new(0.5)).unwrap();
    let result = six_months.evaluate(&patient, &measurements).unwrap();
    assert_eq!(result.diagnoses[0].kind, DiagnosisKind::DelayedBoneAge);

    let two_years = GrowthEvaluator::new(&store, EvaluationConfig::new(2.0)).unwrap();
    assert!(two_years.evaluate(&patient, &measurements).unwrap().diagnoses.is_empty());
}

#[test]
fn test_wide_target_band() {
    let store = fixture_store();
    let config = test_config().with_parental_band_half_width(PARENTAL_BAND_HALF_WIDTH_WIDE_CM);
    let evaluator = GrowthEvaluator::new(&store, config).unwrap();
    let patient = PatientContext::new(Sex::Female, 9.0).with_parents(160.0, 175.0);
    let result = evaluator
        .evaluate(&patient, &[Measurement::height_cm(132.5)])
        .unwrap();
    let target = result.parental_target.unwrap().target;
    assert_eq!((target.low, target.central, target.high), (151.0, 161.0, 171.0));
}

#[test]
fn test_target_percentile_needs_adult_reference() {
    let store = builtin_store().unwrap();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let patient = PatientContext::new(Sex::Male, 1.0).with_parents(150.0, 160.0);
    let result = evaluator
        .evaluate(&patient, &[Measurement::height_cm(71.0)])
        .unwrap();
    let assessment = result.parental_target.unwrap();
    assert_eq!(assessment.target.central, 161.5);
    assert_eq!(assessment.target_percentile, None);
}

#[test]
fn test_clamped_ages_are_flagged_not_rejected() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let patient = PatientContext::new(Sex::Male, 3.0);
    let result = evaluator
        .evaluate(&patient, &[Measurement::height_cm(95.0)])
        .unwrap();

    let height = result.score(Parameter::Height).unwrap();
    assert_eq!(height.age_index, 36.0);
    let clamp = height.clamp.unwrap();
    assert_eq!(clamp.edge_age, 12.0);
    assert!(height.z.is_some());

    let strict = GrowthEvaluator::new(
        &store,
        test_config().with_extrapolation(ExtrapolationPolicy::Reject),
    )
    .unwrap();
    let rejected = strict
        .evaluate(&patient, &[Measurement::height_cm(95.0)])
        .unwrap();
    assert_eq!(rejected.score(Parameter::Height).unwrap().z, None);
    assert!(rejected.diagnoses.is_empty());
}

#[test]
fn test_invalid_inputs_are_typed_errors() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let patient = PatientContext::new(Sex::Male, 0.5);

    for measurements in [
        vec![Measurement::weight_kg(0.0)],
        vec![Measurement::height_cm(-60.0)],
        vec![Measurement::new(Parameter::Height, 60.0, growth_curves::Unit::Kilograms)],
    ] {
        let err = evaluator.evaluate(&patient, &measurements).unwrap_err();
        assert!(matches!(err, GrowthError::InvalidInput(_)), "{err}");
    }

    let too_old = PatientContext::new(Sex::Male, 19.5);
    assert!(matches!(
        evaluator.evaluate(&too_old, &[Measurement::height_cm(176.0)]),
        Err(GrowthError::InvalidInput(_))
    ));
    assert!(GrowthEvaluator::new(&store, EvaluationConfig::new(f64::NAN)).is_err());
}

#[test]
fn test_batch_preserves_order() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();

    let requests: Vec<EvaluationRequest> = (0..24)
        .map(|i| {
            let age = 5.0 + f64::from(i) * 0.5;
            let measurements = if i == 7 {
                vec![Measurement::height_cm(-1.0)]
            } else {
                vec![Measurement::height_cm(100.0 + f64::from(i) * 3.0)]
            };
            EvaluationRequest::new(PatientContext::new(Sex::Female, age), measurements)
        })
        .collect();

    let results = evaluator.evaluate_batch(&requests);
    assert_eq!(results.len(), requests.len());
    for (i, (request, result)) in requests.iter().zip(&results).enumerate() {
        if i == 7 {
            assert!(result.is_err());
            continue;
        }
        let expected = evaluator.evaluate_request(request).unwrap();
        assert_eq!(result.as_ref().unwrap(), &expected);
    }
}

#[test]
fn test_result_serializes_to_json() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    let result = evaluator
        .evaluate(&school_age_boy(), &[Measurement::height_cm(125.0)])
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["scores"][0]["parameter"], "height");
    assert_eq!(json["diagnoses"][0]["kind"], "low_stature");
    assert_eq!(json["bone_age"]["classification"], "delayed");
}

#[test]
fn test_fifth_birthday_reads_infant_table_with_child_bmi_cut_offs() {
    let store = fixture_store();
    let evaluator = GrowthEvaluator::new(&store, test_config()).unwrap();
    // Z of about 1.5 against the 12-month row
    let bmi = [Measurement::bmi(19.2)];

    let at_five = evaluator
        .evaluate(&PatientContext::new(Sex::Male, 5.0), &bmi)
        .unwrap();
    let score = at_five.score(Parameter::Bmi).unwrap();
    assert_eq!(score.key.age_domain, AgeDomain::Infant);
    assert_eq!(score.table, "who_bmi_for_age_boys_0_12m");
    assert!((score.z.unwrap() - 1.497_006).abs() < 1e-5);
    let kinds: Vec<_> = at_five.diagnoses.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosisKind::Overweight]);

    let just_under = evaluator
        .evaluate(&PatientContext::new(Sex::Male, 4.99), &bmi)
        .unwrap();
    assert_eq!(just_under.score(Parameter::Bmi).unwrap().key.age_domain, AgeDomain::Infant);
    assert!(just_under.diagnoses.is_empty());

    let past_five = evaluator
        .evaluate(&PatientContext::new(Sex::Male, 5.01), &bmi)
        .unwrap();
    assert_eq!(
        past_five.score(Parameter::Bmi).unwrap().key.age_domain,
        AgeDomain::ChildAdolescent
    );
}

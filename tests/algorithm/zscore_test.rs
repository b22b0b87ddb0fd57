use growth_curves::algorithm::zscore::{band_standard_deviation, band_z_score, lms_z_score};
use growth_curves::reference::builtin::who_infant_tables;
use growth_curves::{CurveParams, centile_curve, value_at_z, z_score};
use proptest::prelude::*;

#[test]
fn test_lms_power_transform() {
    // WHO boys weight at 12 months, one S above the median on the power scale
    let z = lms_z_score(10.9, 0.3487, 9.6479, 0.14602).unwrap();
    let expected = ((10.9_f64 / 9.6479).powf(0.3487) - 1.0) / (0.3487 * 0.14602);
    assert!((z - expected).abs() < 1e-12);
    assert!(z > 0.0);
}

#[test]
fn test_lms_log_case() {
    let z = lms_z_score(3.3 * 1.1, 0.0, 3.3, 0.1).unwrap();
    assert!((z - 1.1_f64.ln() / 0.1).abs() < 1e-12);
}

#[test]
fn test_lms_rejects_non_positive_inputs() {
    assert!(lms_z_score(0.0, 1.0, 50.0, 0.04).is_err());
    assert!(lms_z_score(-1.0, 1.0, 50.0, 0.04).is_err());
    assert!(lms_z_score(50.0, 1.0, 0.0, 0.04).is_err());
    assert!(lms_z_score(50.0, 1.0, 50.0, 0.0).is_err());
}

#[test]
fn test_band_transform() {
    let sd = band_standard_deviation(900.0, 1100.0);
    assert!((sd - 200.0 / (2.0 * 1.959_964)).abs() < 1e-12);
    assert_eq!(band_z_score(1000.0, 900.0, 1000.0, 1100.0).unwrap(), 0.0);
    let z = band_z_score(1100.0, 900.0, 1000.0, 1100.0).unwrap();
    assert!((z - 1.959_964).abs() < 1e-12);
}

#[test]
fn test_band_rejects_inverted_spread() {
    assert!(band_z_score(1000.0, 1100.0, 1000.0, 900.0).is_err());
    assert!(band_z_score(1000.0, 1000.0, 1000.0, 1000.0).is_err());
}

#[test]
fn test_centile_curve_follows_medians() {
    let (_, table) = who_infant_tables().unwrap().remove(2);
    let curve = centile_curve(&table, 0.0).unwrap();
    assert_eq!(curve.len(), 13);
    assert!((curve[0].value - 13.4).abs() < 1e-12);
    assert!((curve[12].value - 16.7).abs() < 1e-12);
}

proptest! {
    #[test]
    fn prop_median_has_zero_score(
        l in prop_oneof![-2.0f64..-0.05, 0.05f64..2.0],
        m in 1.0f64..200.0,
        s in 0.01f64..0.3,
    ) {
        prop_assert_eq!(lms_z_score(m, l, m, s).unwrap(), 0.0);
    }

    #[test]
    fn prop_inverse_transform(
        z in -3.0f64..3.0,
        l in prop_oneof![-1.5f64..-0.05, Just(0.0), 0.05f64..1.5],
    ) {
        let params = CurveParams::Lms { l, m: 50.0, s: 0.04 };
        let value = value_at_z(z, &params).unwrap();
        prop_assert!((z_score(value, &params).unwrap() - z).abs() < 1e-9);
    }
}

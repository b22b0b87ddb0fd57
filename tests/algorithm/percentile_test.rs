use growth_curves::algorithm::percentile::{Z_P3, Z_P97, z_for_percentile};
use growth_curves::algorithm::zscore::BAND_QUANTILE;
use growth_curves::{StandardScore, percentile, standard_normal_cdf};
use proptest::prelude::*;

#[test]
fn test_percentile_of_zero_is_fifty() {
    assert_eq!(percentile(0.0), 50.0);
}

#[test]
fn test_reference_quantiles() {
    assert!((percentile(BAND_QUANTILE) - 97.5).abs() < 1e-4);
    assert!((percentile(Z_P3) - 3.0).abs() < 1e-9);
    assert!((percentile(Z_P97) - 97.0).abs() < 1e-9);
    assert!((standard_normal_cdf(-1.0) - 0.158_655_253_931_457).abs() < 1e-12);
    assert!((standard_normal_cdf(2.5) - 0.993_790_334_674_224).abs() < 1e-12);
}

#[test]
fn test_low_stature_example() {
    let z = z_for_percentile(1.5).unwrap();
    assert!((z - (-2.170_090_377_584_56)).abs() < 1e-9);
    let score = StandardScore::from_z(z);
    assert!((score.percentile - 1.5).abs() < 1e-9);
}

#[test]
fn test_extremes_saturate() {
    assert_eq!(percentile(-40.0), 0.0);
    assert_eq!(percentile(40.0), 100.0);
    assert!(percentile(-8.0) > 0.0);
    assert!(percentile(8.0) <= 100.0);
    assert!(z_for_percentile(0.0).is_err());
    assert!(z_for_percentile(100.0).is_err());
}

proptest! {
    #[test]
    fn prop_percentile_is_monotonic(a in -6.0f64..6.0, b in -6.0f64..6.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(percentile(low) <= percentile(high));
    }

    #[test]
    fn prop_percentile_is_open_interval(z in -5.0f64..5.0) {
        let p = percentile(z);
        prop_assert!(p > 0.0 && p < 100.0);
    }

    #[test]
    fn prop_symmetry(z in 0.0f64..5.0) {
        prop_assert!((percentile(z) + percentile(-z) - 100.0).abs() < 1e-9);
    }
}

use growth_curves::algorithm::interpolation::ClampSide;
use growth_curves::reference::builtin::{fenton_weight_table, who_infant_tables};
use growth_curves::{CurveParams, TableRows, interpolate};
use proptest::prelude::*;

#[test]
fn test_knots_are_exact_for_every_builtin_row() {
    for (key, table) in who_infant_tables().unwrap() {
        let TableRows::Lms(rows) = table.rows() else {
            panic!("{key} should hold LMS rows");
        };
        for row in rows {
            let interpolated = interpolate(&table, row.age).unwrap();
            assert_eq!(
                interpolated.params,
                CurveParams::Lms {
                    l: row.l,
                    m: row.m,
                    s: row.s
                },
                "{key} at month {}",
                row.age
            );
            assert!(!interpolated.is_clamped());
        }
    }
}

#[test]
fn test_band_midpoint() {
    let table = fenton_weight_table().unwrap();
    let interpolated = interpolate(&table, 30.5).unwrap();
    let CurveParams::Band { p3, p50, p97 } = interpolated.params else {
        panic!("band table should interpolate to band parameters");
    };
    assert!((p50 - 1250.0).abs() < 1e-9);
    assert!((p3 - 1150.0).abs() < 1e-9);
    assert!((p97 - 1350.0).abs() < 1e-9);
}

#[test]
fn test_non_finite_age_is_rejected() {
    let table = fenton_weight_table().unwrap();
    assert!(interpolate(&table, f64::NAN).is_err());
    assert!(interpolate(&table, f64::INFINITY).is_err());
}

proptest! {
    #[test]
    fn prop_clamps_outside_domain(offset in 0.001f64..240.0) {
        let (_, table) = who_infant_tables().unwrap().remove(1);
        let TableRows::Lms(rows) = table.rows() else { unreachable!() };
        let (first, last) = (rows[0], rows[rows.len() - 1]);

        let below = interpolate(&table, first.age - offset).unwrap();
        prop_assert_eq!(below.params.median(), first.m);
        let warning = below.clamp.unwrap();
        prop_assert_eq!(warning.side, ClampSide::BelowRange);
        prop_assert_eq!(warning.edge_age, first.age);

        let above = interpolate(&table, last.age + offset).unwrap();
        prop_assert_eq!(above.params.median(), last.m);
        prop_assert_eq!(above.clamp.unwrap().side, ClampSide::AboveRange);
    }

    #[test]
    fn prop_interior_median_lies_between_neighbours(age in 0.0f64..12.0) {
        let (_, table) = who_infant_tables().unwrap().remove(0);
        let TableRows::Lms(rows) = table.rows() else { unreachable!() };
        let lower = rows[age.floor() as usize];
        let upper = rows[(age.floor() as usize + 1).min(rows.len() - 1)];

        let interpolated = interpolate(&table, age).unwrap();
        prop_assert!(interpolated.clamp.is_none());
        let m = interpolated.params.median();
        prop_assert!(m >= lower.m - 1e-12 && m <= upper.m + 1e-12);
    }
}

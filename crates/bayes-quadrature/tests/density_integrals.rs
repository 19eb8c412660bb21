//! Integrals of common densities over their supports

use approx::assert_abs_diff_eq;
use bayes_core::Interval;
use bayes_quadrature::{split_integrate, GaussKronrod, Quadrature};
use statrs::distribution::{Beta, Continuous, ContinuousCDF, LogNormal, Normal};

#[test]
fn test_densities_integrate_to_one() {
    let gk = GaussKronrod::default();

    let normal = Normal::new(-3.0, 2.0).unwrap();
    let est = gk
        .integrate(|x| normal.pdf(x), f64::NEG_INFINITY, f64::INFINITY)
        .unwrap();
    assert_abs_diff_eq!(est.value, 1.0, epsilon = 1e-7);

    let beta = Beta::new(2.0, 5.0).unwrap();
    let est = gk.integrate(|x| beta.pdf(x), 0.0, 1.0).unwrap();
    assert_abs_diff_eq!(est.value, 1.0, epsilon = 1e-9);

    let lognormal = LogNormal::new(0.0, 0.5).unwrap();
    let est = gk
        .integrate(|x| lognormal.pdf(x), 0.0, f64::INFINITY)
        .unwrap();
    assert_abs_diff_eq!(est.value, 1.0, epsilon = 1e-7);
}

#[test]
fn test_partial_integrals_match_cdf() {
    let gk = GaussKronrod::default();
    let normal = Normal::new(10.0, 3.0).unwrap();

    for &target in &[2.0, 8.5, 10.0, 14.0, 25.0] {
        let value =
            split_integrate(&gk, |x| normal.pdf(x), 10.0, target, Interval::REAL_LINE).unwrap();
        assert_abs_diff_eq!(value, normal.cdf(target), epsilon = 1e-7);
    }
}

#[test]
fn test_first_moment() {
    let gk = GaussKronrod::default();
    let normal = Normal::new(7.0, 1.5).unwrap();
    let mean = split_integrate(
        &gk,
        |x| x * normal.pdf(x),
        7.0,
        f64::INFINITY,
        Interval::REAL_LINE,
    )
    .unwrap();
    assert_abs_diff_eq!(mean, 7.0, epsilon = 1e-6);
}

//! Behavioural properties of posterior construction, CDF caching and
//! quantile solving

use approx::assert_abs_diff_eq;
use bayes_core::{Beta, Distribution, EngineConfig, Interval, LogNormal, Normal};
use bayes_posterior::{CustomPdf, Error, Posterior, PosteriorBuilder, DEFAULT_PERCENTILES};
use bayes_quadrature::{split_integrate, CountingQuadrature, GaussKronrod};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use statrs::distribution::{self as sd, Continuous, ContinuousCDF};

fn normal(location: f64, scale: f64) -> Normal {
    Normal::new(location, scale).unwrap()
}

/// Integral of the posterior density over its whole support
fn total_mass<P: Distribution, L: Distribution>(posterior: &Posterior<'_, P, L>) -> f64 {
    split_integrate(
        &GaussKronrod::default(),
        |x| posterior.pdf(x),
        posterior.mode_estimate(),
        posterior.support().upper(),
        posterior.support(),
    )
    .unwrap()
}

#[test]
fn test_posterior_density_integrates_to_one() {
    let n01 = normal(0.0, 1.0);
    let wide = normal(3.0, 4.0);
    let narrow = normal(-2.0, 0.5);
    let beta = Beta::new(2.0, 5.0).unwrap();
    let lognormal = LogNormal::new(0.0, 0.5).unwrap();

    assert_abs_diff_eq!(total_mass(&Posterior::new(&n01, &wide).unwrap()), 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(total_mass(&Posterior::new(&wide, &narrow).unwrap()), 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(total_mass(&Posterior::new(&beta, &n01).unwrap()), 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(total_mass(&Posterior::new(&lognormal, &wide).unwrap()), 1.0, epsilon = 1e-4);
}

#[test]
fn test_standard_normals_scenario() {
    let n = normal(0.0, 1.0);
    let posterior = Posterior::new(&n, &n).unwrap();
    assert_abs_diff_eq!(posterior.expectation().unwrap(), 0.0, epsilon = 1e-8);
    assert_abs_diff_eq!(posterior.cdf(0.0).unwrap(), 0.5, epsilon = 1e-8);
}

#[test]
fn test_non_overlapping_supports() {
    let below = CustomPdf::new(|_| 1.0, Interval::new(-2.0, -1.0).unwrap());
    let above = CustomPdf::new(|_| 1.0, Interval::new(10.0, 11.0).unwrap());
    let err = Posterior::new(&below, &above).unwrap_err();
    assert!(matches!(err, Error::NoOverlap { .. }));
}

#[test]
fn test_underflowing_product_is_degenerate() {
    let left = normal(-1000.0, 0.01);
    let right = normal(1000.0, 0.01);
    assert!(matches!(
        Posterior::new(&left, &right),
        Err(Error::DegenerateNormalization { .. })
    ));
}

#[test]
fn test_cdf_matches_conjugate_normal_in_random_order() {
    let n = normal(0.0, 1.0);
    let posterior = Posterior::new(&n, &n).unwrap();
    let truth = sd::Normal::new(0.0, std::f64::consts::FRAC_1_SQRT_2).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..200 {
        let x: f64 = rng.gen_range(-6.0..6.0);
        assert_abs_diff_eq!(posterior.cdf(x).unwrap(), truth.cdf(x), epsilon = 1e-5);
    }

    let cached = posterior.cached_cdf();
    assert!(cached.len() > 100);
    assert!(cached.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn test_repeated_cdf_does_not_integrate() {
    let n = normal(0.0, 1.0);
    let wide = normal(1.0, 2.0);
    let posterior = PosteriorBuilder::<CountingQuadrature<GaussKronrod>>::new()
        .build(&n, &wide)
        .unwrap();
    let quadrature = posterior.quadrature();
    quadrature.reset();

    let first = posterior.cdf(0.3).unwrap();
    let calls = quadrature.calls();
    assert!(calls > 0);

    let second = posterior.cdf(0.3).unwrap();
    assert_eq!(first, second);
    assert_eq!(quadrature.calls(), calls);
    assert_eq!(posterior.cache_stats().hits, 1);
}

#[test]
fn test_saturated_tail_is_exactly_one() {
    let n = normal(0.0, 1.0);
    let posterior = PosteriorBuilder::<CountingQuadrature<GaussKronrod>>::new()
        .build(&n, &n)
        .unwrap();

    let tail = posterior.cdf(10.0).unwrap();
    assert_eq!((tail * 1e5).round(), 1e5);
    let calls = posterior.quadrature().calls();

    assert_eq!(posterior.cdf(20.0).unwrap(), 1.0);
    assert_eq!(posterior.cdf(10.5).unwrap(), 1.0);
    assert_eq!(posterior.quadrature().calls(), calls);
    assert_eq!(posterior.cache_stats().saturated, 2);
}

#[test]
fn test_cdf_outside_support_is_not_cached() {
    let beta = Beta::new(2.0, 2.0).unwrap();
    let n = normal(0.5, 1.0);
    let posterior = Posterior::new(&beta, &n).unwrap();
    assert_eq!(posterior.cdf(-1.0).unwrap(), 0.0);
    assert_eq!(posterior.cdf(0.0).unwrap(), 0.0);
    assert_eq!(posterior.cdf(1.0).unwrap(), 1.0);
    assert_eq!(posterior.cdf(3.0).unwrap(), 1.0);
    assert!(posterior.cached_cdf().is_empty());
    assert!(posterior.cdf(f64::NAN).is_err());
}

#[test]
fn test_default_percentiles_are_monotone_and_round_trip() {
    let n = normal(0.0, 1.0);
    let wide = normal(4.0, 3.0);
    let posterior = Posterior::new(&n, &wide).unwrap();

    let report = posterior.solve_many(&DEFAULT_PERCENTILES).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.len(), 5);

    let solved = report.solved();
    assert!(solved.windows(2).all(|w| w[0].1 < w[1].1));
    for (q, x) in solved {
        assert_abs_diff_eq!(posterior.cdf(x).unwrap(), q, epsilon = 1e-8);
    }
    assert!(posterior.cache_stats().extensions > 0);
}

#[test]
fn test_conjugate_normal_quantiles() {
    let prior = normal(0.0, 1.0);
    let likelihood = normal(2.0, 1.0);
    let posterior = Posterior::new(&prior, &likelihood).unwrap();
    let truth = sd::Normal::new(1.0, std::f64::consts::FRAC_1_SQRT_2).unwrap();

    let quantiles = [0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99];
    let report = posterior.solve_many(&quantiles).unwrap();
    for q in quantiles {
        assert_abs_diff_eq!(report.value(q).unwrap(), truth.inverse_cdf(q), epsilon = 1e-5);
    }
    assert_abs_diff_eq!(posterior.expectation().unwrap(), 1.0, epsilon = 1e-8);
}

#[test]
fn test_beta_conjugate_product() {
    // x(1-x) * x^2 is proportional to Beta(4, 2)
    let prior = Beta::new(2.0, 2.0).unwrap();
    let likelihood = Beta::new(3.0, 1.0).unwrap();
    let posterior = Posterior::new(&prior, &likelihood).unwrap();
    // closed-form CDF of Beta(4, 2)
    let beta_4_2_cdf = |x: f64| 5.0 * x.powi(4) - 4.0 * x.powi(5);

    assert_eq!(posterior.support(), Interval::UNIT);
    assert_abs_diff_eq!(posterior.expectation().unwrap(), 4.0 / 6.0, epsilon = 1e-8);
    let report = posterior.solve_many(&DEFAULT_PERCENTILES).unwrap();
    assert!(report.is_complete());
    for (q, x) in report.solved() {
        assert_abs_diff_eq!(beta_4_2_cdf(x), q, epsilon = 1e-10);
    }
    assert_abs_diff_eq!(report.value(0.1).unwrap(), 0.416_109_625_380_471, epsilon = 1e-10);
}

#[test]
fn test_posteriors_far_from_origin() {
    let spread = std::f64::consts::FRAC_1_SQRT_2;
    for location in [1_000.0, -2_500.0, 1e5] {
        let n = normal(location, 1.0);
        let posterior = Posterior::new(&n, &n).unwrap();
        let truth = sd::Normal::new(location, spread).unwrap();

        let report = posterior.solve_many(&DEFAULT_PERCENTILES).unwrap();
        assert!(report.is_complete(), "location {location}: {:?}", report.failures());
        for q in DEFAULT_PERCENTILES {
            assert_abs_diff_eq!(report.value(q).unwrap(), truth.inverse_cdf(q), epsilon = 1e-6);
        }
    }
}

#[test]
fn test_distant_cached_point_is_not_extended() {
    let n = normal(0.0, 1.0);
    let posterior = Posterior::new(&n, &n).unwrap();
    let truth = sd::Normal::new(0.0, std::f64::consts::FRAC_1_SQRT_2).unwrap();

    assert_eq!(posterior.cdf(-1e6).unwrap(), 0.0);
    assert_abs_diff_eq!(posterior.cdf(0.5).unwrap(), truth.cdf(0.5), epsilon = 1e-7);
    assert_eq!(posterior.cache_stats().extensions, 0);

    // a nearby point still extends
    assert_abs_diff_eq!(posterior.cdf(0.75).unwrap(), truth.cdf(0.75), epsilon = 1e-7);
    assert_eq!(posterior.cache_stats().extensions, 1);

    let fresh = Posterior::new(&n, &n).unwrap();
    assert_abs_diff_eq!(fresh.cdf(1e6).unwrap(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_later_saturation_keeps_cdf_monotone() {
    let prior = normal(0.5, 1.0);
    let likelihood = normal(-0.5, 2.0);
    let posterior = Posterior::new(&prior, &likelihood).unwrap();

    let far = posterior.cdf(5.53).unwrap();
    let near = posterior.cdf(4.63).unwrap();
    let between = posterior.cdf(4.70).unwrap();
    assert!(far < 1.0 && near < far);
    assert_eq!(between, 1.0);

    // the earlier point now answers from the saturated tail too
    assert_eq!(posterior.cdf(5.53).unwrap(), 1.0);
    let cached = posterior.cached_cdf();
    assert!(cached.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(cached.last(), Some(&(5.53, 1.0)));
}

#[test]
fn test_lognormal_prior_stays_positive() {
    let prior = LogNormal::new(0.0, 0.5).unwrap();
    let likelihood = normal(1.0, 0.5);
    let posterior = Posterior::new(&prior, &likelihood).unwrap();

    assert_eq!(posterior.support().lower(), 0.0);
    let report = posterior.solve_many(&DEFAULT_PERCENTILES).unwrap();
    assert!(report.is_complete());
    let solved = report.solved();
    assert!(solved[0].1 > 0.0);
    assert!(solved.windows(2).all(|w| w[0].1 < w[1].1));
}

#[test]
fn test_chained_update() {
    let n = normal(0.0, 1.0);
    let first = Posterior::new(&n, &n).unwrap();
    let second = Posterior::new(&first, &n).unwrap();
    let truth = sd::Normal::new(0.0, 1.0 / 3f64.sqrt()).unwrap();

    assert_abs_diff_eq!(second.pdf(0.0), truth.pdf(0.0), epsilon = 1e-6);
    assert_abs_diff_eq!(second.quantile(0.75).unwrap(), truth.inverse_cdf(0.75), epsilon = 1e-5);
}

#[test]
fn test_report_is_keyed_by_quantile() {
    let n = normal(0.0, 1.0);
    let posterior = Posterior::new(&n, &n).unwrap();
    let report = posterior.solve_many(&[0.9, 0.5, 0.1, 0.5]).unwrap();

    assert_eq!(report.len(), 3);
    let keys: Vec<f64> = report.iter().map(|(q, _)| q).collect();
    assert_eq!(keys, vec![0.1, 0.5, 0.9]);
    assert_abs_diff_eq!(report.value(0.5).unwrap(), 0.0, epsilon = 1e-8);
    assert_abs_diff_eq!(report.value(0.1).unwrap(), -report.value(0.9).unwrap(), epsilon = 1e-7);
}

#[test]
fn test_invalid_quantile_rejects_batch() {
    let n = normal(0.0, 1.0);
    let posterior = Posterior::new(&n, &n).unwrap();
    let err = posterior.solve_many(&[0.5, 1.0]).unwrap_err();
    assert_eq!(err, Error::InvalidProbability { p: 1.0 });
    assert!(posterior.cached_cdf().is_empty());
}

#[test]
fn test_failures_are_isolated() {
    let n = normal(0.0, 1.0);
    let mut config = EngineConfig::default();
    config.solver.max_iterations = 2;
    let posterior = Posterior::with_config(&n, &n, config).unwrap();

    let report = posterior.solve_many(&[0.2, 0.4]).unwrap();
    assert_eq!(report.len(), 2);
    assert!(!report.is_complete());
    assert!(report.failures().iter().all(|(_, e)| e.is_per_quantile()));
    assert!(matches!(
        report.get(0.2),
        Some(Err(Error::QuantileNotConverged { iterations: 2, .. }))
    ));
}

#[test]
fn test_summary_serializes() {
    let prior = Beta::new(2.0, 5.0).unwrap();
    let likelihood = normal(0.35, 0.1);
    let posterior = Posterior::new(&prior, &likelihood).unwrap();

    let summary = posterior.summarize(None).unwrap();
    assert_eq!(summary.posterior.len(), 100);
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json["domain"]["lower"].as_f64().unwrap() < json["domain"]["upper"].as_f64().unwrap());
    assert_eq!(json["prior"].as_array().unwrap().len(), 100);

    let rows = posterior.solve_many(&[0.5]).unwrap().to_rows();
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["quantile"], 0.5);
    assert!(json[0]["error"].is_null());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_cdf_is_monotone_in_any_evaluation_order(
        xs in prop::collection::vec(-8.0f64..8.0, 1..40)
    ) {
        let prior = normal(0.5, 1.0);
        let likelihood = normal(-0.5, 2.0);
        let posterior = Posterior::new(&prior, &likelihood).unwrap();

        let mut evaluated: Vec<(f64, f64)> = xs
            .iter()
            .map(|&x| (x, posterior.cdf(x).unwrap()))
            .collect();
        evaluated.sort_by(|a, b| a.0.total_cmp(&b.0));

        // a later saturation point may lift an earlier answer to exactly 1.0
        let settled: Vec<f64> = evaluated
            .iter()
            .map(|&(x, _)| posterior.cdf(x).unwrap())
            .collect();
        for (&(_, first), &last) in evaluated.iter().zip(&settled) {
            prop_assert!((0.0..=1.0).contains(&first));
            prop_assert!((first - last).abs() <= 1e-5);
        }
        for w in settled.windows(2) {
            prop_assert!(w[0] <= w[1] + 1e-12);
        }
    }
}

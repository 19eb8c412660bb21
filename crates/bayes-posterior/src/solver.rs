//! Quantile solving by bracketed inversion of the posterior CDF
//!
//! A batch of quantiles is solved extremes first, alternating between the two
//! ends of the sorted request. Each later solve reuses its already-solved
//! neighbours as bracket bounds, so interior quantiles search a narrow
//! interval whose CDF values are mostly cached already.

use crate::error::{Error, Result};
use crate::posterior::Posterior;
use crate::roots::{brentq, Root};
use bayes_core::{Distribution, Interval, SolverConfig};
use bayes_quadrature::Quadrature;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Quantiles solved when the caller asks for none
pub const DEFAULT_PERCENTILES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 0.9];

/// Order in which a batch of quantiles is solved
///
/// Sorted, deduplicated, then taken alternately from the low and high ends:
/// `[0.1, 0.25, 0.5, 0.75, 0.9]` becomes `[0.1, 0.9, 0.25, 0.75, 0.5]`.
pub fn solve_order(quantiles: &[f64]) -> Vec<f64> {
    let mut sorted = quantiles.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();

    let mut order = Vec::with_capacity(sorted.len());
    let (mut lo, mut hi) = (0, sorted.len());
    while lo < hi {
        order.push(sorted[lo]);
        lo += 1;
        if lo < hi {
            hi -= 1;
            order.push(sorted[hi]);
        }
    }
    order
}

/// Find `x` with `cdf(x) = quantile`
///
/// Sides without a caller bound are located by geometric expansion from the
/// support's finite end, or from `∓expansion_factor` when that end is
/// infinite, until `cdf(left) ≤ quantile ≤ cdf(right)`. Caller bounds replace
/// the expanded ends and must themselves bracket the root.
pub(crate) fn bracket_and_solve<F>(
    mut cdf: F,
    quantile: f64,
    support: Interval,
    left_bound: Option<f64>,
    right_bound: Option<f64>,
    config: &SolverConfig,
) -> Result<Root>
where
    F: FnMut(f64) -> Result<f64>,
{
    let factor = config.expansion_factor;
    let not_bracketed = |lower: f64, upper: f64| Error::QuantileNotBracketed {
        quantile,
        lower,
        upper,
    };

    // a point already known to lie right of the root
    let mut right_hint = None;
    let left = match left_bound {
        Some(bound) => bound,
        None if support.lower().is_finite() => support.lower(),
        None => {
            let mut left = (-factor).min(right_bound.unwrap_or(support.upper()));
            let mut expansions = 0;
            while cdf(left)? > quantile {
                if expansions == config.max_expansions {
                    return Err(not_bracketed(left, right_bound.unwrap_or(support.upper())));
                }
                right_hint = Some(left);
                left *= factor;
                expansions += 1;
            }
            debug!(quantile, left, expansions, "left bracket end located");
            left
        }
    };

    let (left, right) = match right_bound.or(right_hint) {
        Some(bound) => (left, bound),
        None if support.upper().is_finite() => (left, support.upper()),
        None => {
            let mut left = left;
            let mut right = factor.max(left);
            let mut expansions = 0;
            while cdf(right)? < quantile {
                if expansions == config.max_expansions {
                    return Err(not_bracketed(left, right));
                }
                left = right;
                right *= factor;
                expansions += 1;
            }
            debug!(quantile, right, expansions, "right bracket end located");
            (left, right)
        }
    };

    brentq(|x| Ok(cdf(x)? - quantile), left, right, config).map_err(|e| match e {
        Error::RootNotConverged { iterations, .. } => Error::QuantileNotConverged {
            quantile,
            iterations,
        },
        Error::RootNotBracketed { lower, upper, .. } => not_bracketed(lower, upper),
        other => other,
    })
}

impl<'a, P, L, Q> Posterior<'a, P, L, Q>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
    Q: Quadrature,
{
    /// Solve a single quantile, optionally inside known bounds
    pub fn solve_one(
        &self,
        quantile: f64,
        left_bound: Option<f64>,
        right_bound: Option<f64>,
    ) -> Result<f64> {
        Error::check_probability(quantile)?;
        let root = bracket_and_solve(
            |x| self.cdf(x),
            quantile,
            self.support(),
            left_bound,
            right_bound,
            &self.config().solver,
        )?;
        debug!(
            quantile,
            x = root.x,
            iterations = root.iterations,
            evaluations = root.evaluations,
            "quantile solved"
        );
        Ok(root.x)
    }

    /// Inverse CDF at `p`
    pub fn quantile(&self, p: f64) -> Result<f64> {
        self.solve_one(p, None, None)
    }

    /// Solve a batch of quantiles, narrowing each search with solved neighbours
    ///
    /// Every requested probability must lie in (0, 1), otherwise the whole
    /// batch is rejected before any solving. Failures of individual solves are
    /// recorded in the report and contribute no bound to later solves.
    #[instrument(skip(self), fields(support = %self.support()))]
    pub fn solve_many(&self, quantiles: &[f64]) -> Result<QuantileReport> {
        for &q in quantiles {
            Error::check_probability(q)?;
        }
        Ok(solve_batch(quantiles, |q, left, right| self.solve_one(q, left, right)))
    }
}

/// Run `solve` over a batch in [`solve_order`], passing each quantile the
/// solutions of its nearest solved neighbours as bounds
pub(crate) fn solve_batch<F>(quantiles: &[f64], mut solve: F) -> QuantileReport
where
    F: FnMut(f64, Option<f64>, Option<f64>) -> Result<f64>,
{
    let start_time = Instant::now();
    let mut solved: BTreeMap<OrderedFloat<f64>, f64> = BTreeMap::new();
    let mut results = BTreeMap::new();

    for q in solve_order(quantiles) {
        let key = OrderedFloat(q);
        let left = solved.range(..key).next_back().map(|(_, &x)| x);
        let right = solved.range((Excluded(key), Unbounded)).next().map(|(_, &x)| x);

        let outcome = solve(q, left, right);
        match &outcome {
            Ok(x) => {
                solved.insert(key, *x);
            }
            Err(e) => debug!("Quantile {} failed: {}", q, e),
        }
        results.insert(key, outcome);
    }

    let elapsed = start_time.elapsed();
    debug!(
        "Solved {}/{} quantiles in {:?}",
        solved.len(),
        results.len(),
        elapsed
    );
    QuantileReport { results, elapsed }
}

/// Outcome of a quantile batch, keyed by quantile in ascending order
#[derive(Debug, Clone)]
pub struct QuantileReport {
    results: BTreeMap<OrderedFloat<f64>, Result<f64>>,
    elapsed: Duration,
}

/// One flattened line of a [`QuantileReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileRow {
    pub quantile: f64,
    pub value: Option<f64>,
    pub error: Option<String>,
}

impl QuantileReport {
    /// Outcome for one requested quantile
    pub fn get(&self, quantile: f64) -> Option<&Result<f64>> {
        self.results.get(&OrderedFloat(quantile))
    }

    /// Solved value for one quantile, if it succeeded
    pub fn value(&self, quantile: f64) -> Option<f64> {
        self.get(quantile).and_then(|r| r.as_ref().ok().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &Result<f64>)> + '_ {
        self.results.iter().map(|(q, r)| (q.into_inner(), r))
    }

    /// Successful `(quantile, x)` pairs in ascending quantile order
    pub fn solved(&self) -> Vec<(f64, f64)> {
        self.iter()
            .filter_map(|(q, r)| r.as_ref().ok().map(|&x| (q, x)))
            .collect()
    }

    pub fn failures(&self) -> Vec<(f64, &Error)> {
        self.iter()
            .filter_map(|(q, r)| r.as_ref().err().map(|e| (q, e)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether every requested quantile was solved
    pub fn is_complete(&self) -> bool {
        self.results.values().all(|r| r.is_ok())
    }

    /// Wall-clock time spent on the batch
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn to_rows(&self) -> Vec<QuantileRow> {
        self.iter()
            .map(|(quantile, r)| QuantileRow {
                quantile,
                value: r.as_ref().ok().copied(),
                error: r.as_ref().err().map(|e| e.to_string()),
            })
            .collect()
    }
}

//! Call-count instrumentation for any quadrature routine

use crate::traits::{Quadrature, QuadratureEstimate};
use bayes_core::{QuadratureConfig, Result};
use std::cell::Cell;

/// Wraps a [`Quadrature`] and counts how often it is used
///
/// Counters use interior mutability so the wrapper can be shared by reference
/// the same way the wrapped routine is. Single-threaded by construction.
#[derive(Debug, Default)]
pub struct CountingQuadrature<Q> {
    inner: Q,
    calls: Cell<usize>,
    evaluations: Cell<usize>,
}

impl<Q: Quadrature> CountingQuadrature<Q> {
    pub fn new(inner: Q) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            evaluations: Cell::new(0),
        }
    }

    /// Number of integrals computed so far
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Number of integrand evaluations so far
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    pub fn reset(&self) {
        self.calls.set(0);
        self.evaluations.set(0);
    }

    pub fn inner(&self) -> &Q {
        &self.inner
    }
}

impl<Q> From<QuadratureConfig> for CountingQuadrature<Q>
where
    Q: Quadrature + From<QuadratureConfig>,
{
    fn from(config: QuadratureConfig) -> Self {
        Self::new(Q::from(config))
    }
}

impl<Q: Quadrature> Quadrature for CountingQuadrature<Q> {
    fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<QuadratureEstimate>
    where
        F: Fn(f64) -> f64,
    {
        let estimate = self.inner.integrate(f, lower, upper)?;
        self.calls.set(self.calls.get() + 1);
        self.evaluations
            .set(self.evaluations.get() + estimate.evaluations);
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GaussKronrod;

    #[test]
    fn test_counts_calls_and_evaluations() {
        let counting = CountingQuadrature::new(GaussKronrod::default());
        assert_eq!(counting.calls(), 0);

        counting.integrate(|x| x * x, 0.0, 1.0).unwrap();
        counting.integrate(|x| x * x, 0.0, 2.0).unwrap();
        assert_eq!(counting.calls(), 2);
        assert_eq!(counting.evaluations(), 30);

        counting.reset();
        assert_eq!(counting.calls(), 0);
        assert_eq!(counting.evaluations(), 0);
    }

    #[test]
    fn test_empty_range_still_counts() {
        let counting = CountingQuadrature::new(GaussKronrod::default());
        counting.integrate(|x| x, 1.0, 1.0).unwrap();
        assert_eq!(counting.calls(), 1);
        assert_eq!(counting.evaluations(), 0);
    }
}

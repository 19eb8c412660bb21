//! Core trait for numerical integration

use bayes_core::Result;

/// Outcome of one definite integral
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureEstimate {
    /// Estimated value of the integral
    pub value: f64,
    /// Estimated absolute error
    pub abs_error: f64,
    /// Number of integrand evaluations
    pub evaluations: usize,
    /// Number of interval bisections performed
    pub subdivisions: usize,
    /// Whether the error target was met within the subdivision limit
    pub converged: bool,
}

impl QuadratureEstimate {
    /// Estimate for an integral over an empty range
    pub fn zero() -> Self {
        Self {
            value: 0.0,
            abs_error: 0.0,
            evaluations: 0,
            subdivisions: 0,
            converged: true,
        }
    }

    /// Same estimate for the integral taken in the opposite direction
    pub fn negated(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }
}

/// A definite-integral routine
///
/// Implementations must accept infinite bounds and reversed bounds
/// (`lower > upper` yields the negated integral).
pub trait Quadrature {
    /// Integrate `f` from `lower` to `upper`
    fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<QuadratureEstimate>
    where
        F: Fn(f64) -> f64;
}

impl<Q: Quadrature> Quadrature for &Q {
    fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<QuadratureEstimate>
    where
        F: Fn(f64) -> f64,
    {
        (**self).integrate(f, lower, upper)
    }
}

//! Numeric outputs consumed by presentation layers

use crate::posterior::Posterior;
use crate::Result;
use bayes_core::{Distribution, Interval};
use bayes_quadrature::Quadrature;
use serde::Serialize;
use tracing::instrument;

/// `n` evenly spaced `(x, pdf(x))` pairs across `domain`
pub fn pdf_samples<D>(dist: &D, domain: Interval, n: usize) -> Result<Vec<(f64, f64)>>
where
    D: Distribution + ?Sized,
{
    Ok(domain
        .linspace(n)?
        .into_iter()
        .map(|x| (x, dist.pdf(x)))
        .collect())
}

/// Everything needed to draw one Bayesian update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateSummary {
    pub domain: Interval,
    pub prior: Vec<(f64, f64)>,
    pub likelihood: Vec<(f64, f64)>,
    pub posterior: Vec<(f64, f64)>,
    pub expectation: f64,
}

impl<'a, P, L, Q> Posterior<'a, P, L, Q>
where
    P: Distribution + ?Sized,
    L: Distribution + ?Sized,
    Q: Quadrature,
{
    /// Sample all three densities and compute the posterior mean
    ///
    /// The domain is estimated with [`Posterior::plot_domain`] unless one is
    /// supplied.
    #[instrument(skip(self))]
    pub fn summarize(&self, override_domain: Option<Interval>) -> Result<UpdateSummary> {
        let domain = match override_domain {
            Some(domain) => domain,
            None => self.plot_domain()?,
        };
        let n = self.config().domain.plot_points;

        Ok(UpdateSummary {
            domain,
            prior: pdf_samples(self.prior(), domain, n)?,
            likelihood: pdf_samples(self.likelihood(), domain, n)?,
            posterior: pdf_samples(self, domain, n)?,
            expectation: self.expectation()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bayes_core::Normal;

    #[test]
    fn test_pdf_samples() {
        let n = Normal::new(0.0, 1.0).unwrap();
        let samples = pdf_samples(&n, Interval::new(-1.0, 1.0).unwrap(), 5).unwrap();
        let xs: Vec<f64> = samples.iter().map(|&(x, _)| x).collect();
        assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_abs_diff_eq!(samples[2].1, n.pdf(0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_unbounded_domain_is_rejected() {
        let n = Normal::new(0.0, 1.0).unwrap();
        assert!(pdf_samples(&n, Interval::REAL_LINE, 10).is_err());
    }

    #[test]
    fn test_summary_with_override() {
        let n = Normal::new(0.0, 1.0).unwrap();
        let posterior = Posterior::new(&n, &n).unwrap();
        let domain = Interval::new(-3.0, 3.0).unwrap();
        let summary = posterior.summarize(Some(domain)).unwrap();

        assert_eq!(summary.domain, domain);
        assert_eq!(summary.prior.len(), 100);
        assert_eq!(summary.posterior.len(), 100);
        assert_abs_diff_eq!(summary.expectation, 0.0, epsilon = 1e-8);
        // the posterior is narrower than either input
        let peak = |s: &[(f64, f64)]| s.iter().map(|&(_, y)| y).fold(0.0, f64::max);
        assert!(peak(&summary.posterior) > peak(&summary.prior));
    }
}

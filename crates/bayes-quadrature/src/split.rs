//! Split-point integration for sharply peaked densities
//!
//! Adaptive quadrature over a range that is almost entirely zero can sample
//! only the zero region and confidently report an integral of ~0. Anchoring
//! one sub-integral at the density's approximate centre of mass guarantees
//! that the peak sits at a panel boundary of both pieces.

use crate::traits::Quadrature;
use bayes_core::{Error, Interval, Result};
use tracing::trace;

/// Integrate `f` from `support.lower()` up to `target`, splitting at `split_point`
///
/// When `target < split_point` the integral is taken in one piece; otherwise
/// it is the sum of `[lower, split_point]` and `[split_point, target]`. The
/// split point is clamped into the support, which leaves the value unchanged
/// for densities that vanish outside it.
pub fn split_integrate<Q, F>(
    quadrature: &Q,
    f: F,
    split_point: f64,
    target: f64,
    support: Interval,
) -> Result<f64>
where
    Q: Quadrature,
    F: Fn(f64) -> f64,
{
    if split_point.is_nan() || target.is_nan() {
        return Err(Error::InvalidInput(format!(
            "Split integration needs numeric points, got split={split_point} target={target}"
        )));
    }
    let lower = support.lower();
    let split = split_point.clamp(support.lower(), support.upper());

    if target < split {
        trace!(lower, target, "single-piece integral");
        return Ok(quadrature.integrate(&f, lower, target)?.value);
    }

    let left = quadrature.integrate(&f, lower, split)?;
    let right = quadrature.integrate(&f, split, target)?;
    trace!(
        lower,
        split,
        target,
        left = left.value,
        right = right.value,
        "split integral"
    );
    Ok(left.value + right.value)
}

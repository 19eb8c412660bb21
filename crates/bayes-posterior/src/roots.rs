//! Brent's method for bracketed scalar root finding
//!
//! Combines inverse quadratic interpolation, the secant step and bisection.
//! Given `f(lower)` and `f(upper)` of opposite sign it always converges: every
//! rejected interpolation step falls back to bisection of the current bracket.

use crate::{Error, Result};
use bayes_core::SolverConfig;

/// A located root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Find `x` in `[lower, upper]` with `f(x) = 0`
///
/// `f` may fail; its error aborts the search and is returned unchanged.
/// Convergence is declared once the bracket half-width drops below
/// `(xtol + rtol * |x|) / 2`.
pub fn brentq<F>(mut f: F, lower: f64, upper: f64, config: &SolverConfig) -> Result<Root>
where
    F: FnMut(f64) -> Result<f64>,
{
    let mut x_prev = lower;
    let mut x_cur = upper;
    let mut f_prev = f(x_prev)?;
    let mut f_cur = f(x_cur)?;
    let mut evaluations = 2;

    if f_prev.is_nan() || f_cur.is_nan() {
        return Err(bayes_core::Error::non_finite("root finder residual").into());
    }
    if f_prev == 0.0 {
        return Ok(Root {
            x: x_prev,
            iterations: 0,
            evaluations,
        });
    }
    if f_cur == 0.0 {
        return Ok(Root {
            x: x_cur,
            iterations: 0,
            evaluations,
        });
    }
    if f_prev.signum() == f_cur.signum() {
        return Err(Error::RootNotBracketed {
            lower,
            upper,
            f_lower: f_prev,
            f_upper: f_cur,
        });
    }

    // contrapoint: f(x_block) has the opposite sign of f(x_cur)
    let mut x_block = 0.0;
    let mut f_block = 0.0;
    let mut step_prev = 0.0;
    let mut step_cur = 0.0;

    for iteration in 1..=config.max_iterations {
        if f_prev != 0.0 && f_cur != 0.0 && f_prev.signum() != f_cur.signum() {
            x_block = x_prev;
            f_block = f_prev;
            step_prev = x_cur - x_prev;
            step_cur = step_prev;
        }
        if f_block.abs() < f_cur.abs() {
            x_prev = x_cur;
            x_cur = x_block;
            x_block = x_prev;
            f_prev = f_cur;
            f_cur = f_block;
            f_block = f_prev;
        }

        let delta = 0.5 * (config.xtol + config.rtol * x_cur.abs());
        let step_bisect = 0.5 * (x_block - x_cur);
        if f_cur == 0.0 || step_bisect.abs() < delta {
            return Ok(Root {
                x: x_cur,
                iterations: iteration,
                evaluations,
            });
        }

        if step_prev.abs() > delta && f_cur.abs() < f_prev.abs() {
            let step_try = if x_prev == x_block {
                // secant
                -f_cur * (x_cur - x_prev) / (f_cur - f_prev)
            } else {
                // inverse quadratic interpolation
                let d_prev = (f_prev - f_cur) / (x_prev - x_cur);
                let d_block = (f_block - f_cur) / (x_block - x_cur);
                -f_cur * (f_block * d_block - f_prev * d_prev)
                    / (d_block * d_prev * (f_block - f_prev))
            };

            if 2.0 * step_try.abs() < step_prev.abs().min(3.0 * step_bisect.abs() - delta) {
                step_prev = step_cur;
                step_cur = step_try;
            } else {
                step_prev = step_bisect;
                step_cur = step_bisect;
            }
        } else {
            step_prev = step_bisect;
            step_cur = step_bisect;
        }

        x_prev = x_cur;
        f_prev = f_cur;
        x_cur += if step_cur.abs() > delta {
            step_cur
        } else if step_bisect > 0.0 {
            delta
        } else {
            -delta
        };
        f_cur = f(x_cur)?;
        evaluations += 1;
        if f_cur.is_nan() {
            return Err(bayes_core::Error::non_finite("root finder residual").into());
        }
    }

    Err(Error::RootNotConverged {
        iterations: config.max_iterations,
        estimate: x_cur,
    })
}

//! Closed real intervals with possibly infinite endpoints
//!
//! Supports of densities, plotting domains and root-finding brackets are all
//! represented by [`Interval`]. The two set operations the posterior engine
//! needs are [`intersect`] (the posterior support) and [`extremities`] (a
//! generous plotting range).

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// A closed interval `[lower, upper]` with `lower <= upper`
///
/// Either endpoint may be infinite. NaN endpoints are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    /// The whole real line
    pub const REAL_LINE: Self = Self {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };

    /// The non-negative half line `[0, ∞)`
    pub const NON_NEGATIVE: Self = Self {
        lower: 0.0,
        upper: f64::INFINITY,
    };

    /// The unit interval `[0, 1]`
    pub const UNIT: Self = Self {
        lower: 0.0,
        upper: 1.0,
    };

    /// Create a new interval, rejecting NaN endpoints and reversed bounds
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(Error::InvalidInput(format!(
                "Interval endpoints must not be NaN, got ({lower}, {upper})"
            )));
        }
        if lower > upper {
            return Err(Error::InvalidInput(format!(
                "Interval lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Width of the interval (infinite if either endpoint is)
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether both endpoints are finite
    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Intersection of two intervals
    ///
    /// Fails with [`Error::EmptyIntersection`] when
    /// `max(left1, left2) > min(right1, right2)`.
    pub fn intersect(&self, other: &Interval) -> Result<Interval> {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower > upper {
            return Err(Error::EmptyIntersection { lower, upper });
        }
        Ok(Interval { lower, upper })
    }

    /// Smallest interval containing all four endpoints of `self` and `other`
    pub fn extremities(&self, other: &Interval) -> Interval {
        let endpoints = [self.lower, self.upper, other.lower, other.upper];
        let lower = endpoints.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = endpoints.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval { lower, upper }
    }

    /// Widen both sides by `fraction` of the current width
    pub fn padded(&self, fraction: f64) -> Interval {
        let pad = (fraction * self.width()).abs();
        Interval {
            lower: self.lower - pad,
            upper: self.upper + pad,
        }
    }

    /// `n` evenly spaced points from `lower` to `upper` inclusive
    ///
    /// Requires a bounded interval; an unbounded one yields an error.
    pub fn linspace(&self, n: usize) -> Result<Vec<f64>> {
        if !self.is_bounded() {
            return Err(Error::InvalidInput(format!(
                "Cannot sample unbounded interval [{}, {}]",
                self.lower, self.upper
            )));
        }
        Ok(match n {
            0 => Vec::new(),
            1 => vec![self.lower],
            _ => {
                let step = self.width() / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.upper
                        } else {
                            self.lower + step * i as f64
                        }
                    })
                    .collect()
            }
        })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Intersection of two intervals, see [`Interval::intersect`]
pub fn intersect(a: &Interval, b: &Interval) -> Result<Interval> {
    a.intersect(b)
}

/// Extent of two intervals, see [`Interval::extremities`]
pub fn extremities(a: &Interval, b: &Interval) -> Interval {
    a.extremities(b)
}

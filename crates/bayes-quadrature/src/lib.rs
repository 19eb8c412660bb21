//! Numerical integration for posterior densities
//!
//! This crate provides the integration layer of the posterior engine:
//!
//! - **Adaptive Gauss-Kronrod**: G7/K15 panels refined by largest error,
//!   with infinite bounds mapped onto the unit interval
//! - **Split integration**: integrals anchored at a density's centre of mass
//!   so sharply peaked densities are not missed
//! - **Instrumentation**: a counting wrapper to observe integration work
//!
//! # Example
//!
//! ```rust
//! use bayes_core::Interval;
//! use bayes_quadrature::{split_integrate, GaussKronrod, Quadrature};
//!
//! let gk = GaussKronrod::default();
//! let density = |x: f64| (-(x - 40.0) * (x - 40.0) / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt();
//!
//! let total = split_integrate(&gk, density, 40.0, f64::INFINITY, Interval::REAL_LINE).unwrap();
//! assert!((total - 1.0).abs() < 1e-6);
//!
//! let direct = gk.integrate(|x| x * x, 0.0, 3.0).unwrap();
//! assert!((direct.value - 9.0).abs() < 1e-12);
//! ```

pub mod counting;
pub mod gauss_kronrod;
pub mod split;
pub mod traits;

pub use counting::CountingQuadrature;
pub use gauss_kronrod::GaussKronrod;
pub use split::split_integrate;
pub use traits::{Quadrature, QuadratureEstimate};

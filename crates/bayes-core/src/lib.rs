//! Core traits and types for numerical Bayesian updates
//!
//! This crate provides the foundation shared by the quadrature and posterior
//! crates:
//!
//! - **Errors**: a single `thiserror` error type and `Result` alias
//! - **Intervals**: supports, plotting domains and brackets with set operations
//! - **Distributions**: the [`Distribution`] capability and parametric families
//! - **Configuration**: tolerances and heuristics with documented defaults
//!
//! # Example
//!
//! ```rust
//! use bayes_core::{Distribution, Interval, Normal, Beta};
//!
//! let prior = Beta::new(2.0, 5.0).unwrap();
//! let likelihood = Normal::new(0.3, 0.1).unwrap();
//!
//! let support = prior.support().intersect(&likelihood.support()).unwrap();
//! assert_eq!(support, Interval::UNIT);
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod interval;

pub use config::{CdfConfig, DomainConfig, EngineConfig, QuadratureConfig, SolverConfig};
pub use distribution::{Beta, Distribution, Family, FamilySpec, LogNormal, Normal};
pub use error::{Error, Result};
pub use interval::{extremities, intersect, Interval};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Distribution, EngineConfig, Error, Family, Interval, Result};
}

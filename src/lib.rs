//! # mcquad
//!
//! Deterministic Monte Carlo integration over bounded intervals, with
//! convergence diagnostics and repeated-trial analysis of the
//! estimator's sampling distribution.
//!
//! - One-shot estimation: scaled sample mean, standard error, and
//!   normal-approximation confidence interval
//! - Running convergence series with confidence bands, computed in a
//!   single O(m) pass
//! - Repeated trials (sequential or work-stealing parallel) with
//!   aggregate mean, histogram, and Gaussian kernel density estimate
//! - Bitwise-reproducible results from a single master seed
//!
//! ## Example
//!
//! ```rust
//! use mcquad::prelude::*;
//!
//! let mut rng = McRng::new(2023);
//! let integrator = Integrator::new(10_000)
//!     .with_bounds(0.0, std::f64::consts::PI);
//!
//! // ∫₀^π (sin x + cos x) dx = 2
//! let result = integrator.estimate(|x| x.sin() + x.cos(), &mut rng).unwrap();
//! assert!((result.estimate - 2.0).abs() < 0.1);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suspicious_operation_groupings, // False positive for variance = E[X²] - E[X]²
    clippy::suboptimal_flops,  // Numerical code choices are intentional
    clippy::imprecise_flops,
    clippy::missing_const_for_fn
)]

pub mod config;
pub mod convergence;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod export;
pub mod stats;
pub mod trials;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{McConfig, McConfigBuilder};
    pub use crate::convergence::{ConvergenceTracker, RunningSeries};
    pub use crate::engine::rng::McRng;
    pub use crate::error::{McError, McResult};
    pub use crate::estimator::{ErrorScaling, IntegralEstimate, Integrator};
    pub use crate::trials::{TrialResults, TrialRunner};
}

/// Re-export for public API
pub use error::{McError, McResult};

//! Running-convergence diagnostics for a realized sample path.
//!
//! Given one materialized evaluation sequence, computes the cumulative
//! integral estimate and a confidence band as a function of the number
//! of samples consumed so far. A single forward pass maintains running
//! sums of `g` and `g²`; full-prefix reductions at every index would be
//! O(m²) and are never performed.

use serde::{Deserialize, Serialize};

use crate::error::{McError, McResult};
use crate::stats::critical_value;

/// Three index-aligned sequences tracing the convergence of the
/// estimator: cumulative point estimate plus lower and upper confidence
/// bounds, indexed by sample count 1..=m.
///
/// Element i is computed from only the first i evaluations; there is no
/// lookahead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunningSeries {
    /// Cumulative point estimate at each sample count.
    pub estimates: Vec<f64>,
    /// Lower confidence bound at each sample count.
    pub lower: Vec<f64>,
    /// Upper confidence bound at each sample count.
    pub upper: Vec<f64>,
}

impl RunningSeries {
    /// Number of sample counts covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Check if the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// The estimate after consuming the full sequence.
    #[must_use]
    pub fn final_estimate(&self) -> Option<f64> {
        self.estimates.last().copied()
    }
}

/// Computes running estimates and confidence bands over an evaluation
/// sequence.
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    width: f64,
    confidence: f64,
}

impl ConvergenceTracker {
    /// Create a tracker for an integration interval of the given width,
    /// with a 95% confidence band.
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self {
            width,
            confidence: 0.95,
        }
    }

    /// Create a tracker for the interval [lower, upper].
    #[must_use]
    pub fn for_bounds(lower: f64, upper: f64) -> Self {
        Self::new(upper - lower)
    }

    /// Set the confidence level of the band.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Interval width used for scaling.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Compute the running series for a materialized evaluation sequence.
    ///
    /// For each prefix length i:
    /// - `est_i = (width / i) · Σ_{1..i} g`
    /// - `se_i  = width · sqrt(Σ_{1..i} g² / i − (Σ_{1..i} g / i)²)`
    /// - band   = `est_i ± z · se_i / √i`
    ///
    /// The i = 1 variance is zero by construction; floating-point
    /// cancellation can push the variance term slightly negative, so it
    /// is clamped at zero before the square root.
    ///
    /// # Errors
    ///
    /// Returns [`McError::EmptyEvaluations`] for an empty sequence,
    /// [`McError::InvalidConfidence`] for a confidence level outside
    /// (0, 1), [`McError::Config`] for a non-positive width, and
    /// [`McError::NonFiniteValue`] if the sequence contains NaN or Inf.
    pub fn running_series(&self, evaluations: &[f64]) -> McResult<RunningSeries> {
        if evaluations.is_empty() {
            return Err(McError::EmptyEvaluations);
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(McError::InvalidConfidence(self.confidence));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(McError::config(format!(
                "Interval width must be positive and finite, got {}",
                self.width
            )));
        }

        let z = critical_value(self.confidence);
        let m = evaluations.len();

        let mut estimates = Vec::with_capacity(m);
        let mut lower = Vec::with_capacity(m);
        let mut upper = Vec::with_capacity(m);

        let mut cum = 0.0_f64;
        let mut cum_sq = 0.0_f64;

        for (i, &g) in evaluations.iter().enumerate() {
            if !g.is_finite() {
                return Err(McError::non_finite(format!("evaluations[{i}]")));
            }
            cum += g;
            cum_sq += g * g;

            let n = (i + 1) as f64;
            let estimate = (self.width / n) * cum;
            let mean = cum / n;
            let variance = (cum_sq / n - mean * mean).max(0.0);
            let se = self.width * variance.sqrt();
            let half = z * se / n.sqrt();

            estimates.push(estimate);
            lower.push(estimate - half);
            upper.push(estimate + half);
        }

        Ok(RunningSeries {
            estimates,
            lower,
            upper,
        })
    }
}

//! Configuration with YAML schema and validation.
//!
//! Configurations are plain serde structs validated twice: schema
//! constraints via `validator`, then semantic constraints (bound
//! ordering, confidence range) that the schema cannot express.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::convergence::ConvergenceTracker;
use crate::error::{McError, McResult};
use crate::estimator::{ErrorScaling, Integrator};

/// Top-level configuration for an integration run.
///
/// Defaults reproduce the reference workload: seed 2023, 10 000 samples
/// for the one-shot estimate, 10 000 trials of 5 000 samples each,
/// bounds [0, π], 95% confidence, 25 histogram bins, and a 1 000-point
/// density grid over [1.9, 2.1].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct McConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Master seed for the random source.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Sample count for the one-shot estimate.
    #[validate(range(min = 1))]
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Number of repeated trials.
    #[validate(range(min = 1))]
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// Sample count per trial.
    #[validate(range(min = 1))]
    #[serde(default = "default_samples_per_trial")]
    pub samples_per_trial: usize,

    /// Integration bounds.
    #[validate(nested)]
    #[serde(default)]
    pub bounds: BoundsConfig,

    /// Confidence level for intervals and bands.
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Standard-error scaling convention.
    #[serde(default)]
    pub error_scaling: ErrorScaling,

    /// Bin count for the trial histogram.
    #[validate(range(min = 1))]
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Grid for the kernel density estimate.
    #[validate(nested)]
    #[serde(default)]
    pub density_grid: GridConfig,
}

/// Integration interval [lower, upper].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BoundsConfig {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: std::f64::consts::PI,
        }
    }
}

/// Evenly spaced evaluation grid.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Grid start.
    pub min: f64,
    /// Grid end.
    pub max: f64,
    /// Number of grid points.
    #[validate(range(min = 2))]
    pub points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min: 1.9,
            max: 2.1,
            points: 1000,
        }
    }
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

const fn default_seed() -> u64 {
    2023
}

const fn default_samples() -> usize {
    10_000
}

const fn default_trials() -> usize {
    10_000
}

const fn default_samples_per_trial() -> usize {
    5_000
}

const fn default_confidence() -> f64 {
    0.95
}

const fn default_histogram_bins() -> usize {
    25
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: default_seed(),
            samples: default_samples(),
            trials: default_trials(),
            samples_per_trial: default_samples_per_trial(),
            bounds: BoundsConfig::default(),
            confidence: default_confidence(),
            error_scaling: ErrorScaling::default(),
            histogram_bins: default_histogram_bins(),
            density_grid: GridConfig::default(),
        }
    }
}

impl McConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, YAML parsing fails,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> McResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> McResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Create a builder for programmatic construction.
    #[must_use]
    pub fn builder() -> McConfigBuilder {
        McConfigBuilder::default()
    }

    /// Validate semantic constraints beyond the schema.
    fn validate_semantic(&self) -> McResult<()> {
        let (a, b) = (self.bounds.lower, self.bounds.upper);
        if !a.is_finite() || !b.is_finite() || a >= b {
            return Err(McError::config(format!(
                "Integration bounds must be finite with lower < upper, got [{a}, {b}]"
            )));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(McError::InvalidConfidence(self.confidence));
        }
        if self.density_grid.min >= self.density_grid.max {
            return Err(McError::config(format!(
                "Density grid must satisfy min < max, got [{}, {}]",
                self.density_grid.min, self.density_grid.max
            )));
        }
        Ok(())
    }

    /// Integrator for the one-shot estimate.
    #[must_use]
    pub fn integrator(&self) -> Integrator {
        Integrator::new(self.samples)
            .with_bounds(self.bounds.lower, self.bounds.upper)
            .with_confidence(self.confidence)
            .with_scaling(self.error_scaling)
    }

    /// Integrator executed inside each repeated trial.
    #[must_use]
    pub fn trial_integrator(&self) -> Integrator {
        Integrator::new(self.samples_per_trial)
            .with_bounds(self.bounds.lower, self.bounds.upper)
            .with_confidence(self.confidence)
            .with_scaling(self.error_scaling)
    }

    /// Convergence tracker matching the configured bounds and confidence.
    #[must_use]
    pub fn tracker(&self) -> ConvergenceTracker {
        ConvergenceTracker::for_bounds(self.bounds.lower, self.bounds.upper)
            .with_confidence(self.confidence)
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct McConfigBuilder {
    seed: Option<u64>,
    samples: Option<usize>,
    trials: Option<usize>,
    samples_per_trial: Option<usize>,
    bounds: Option<(f64, f64)>,
    confidence: Option<f64>,
    error_scaling: Option<ErrorScaling>,
    histogram_bins: Option<usize>,
}

impl McConfigBuilder {
    /// Set the master seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the one-shot sample count.
    #[must_use]
    pub const fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Set the trial count.
    #[must_use]
    pub const fn trials(mut self, trials: usize) -> Self {
        self.trials = Some(trials);
        self
    }

    /// Set the per-trial sample count.
    #[must_use]
    pub const fn samples_per_trial(mut self, samples: usize) -> Self {
        self.samples_per_trial = Some(samples);
        self
    }

    /// Set the integration bounds.
    #[must_use]
    pub const fn bounds(mut self, lower: f64, upper: f64) -> Self {
        self.bounds = Some((lower, upper));
        self
    }

    /// Set the confidence level.
    #[must_use]
    pub const fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the standard-error scaling convention.
    #[must_use]
    pub const fn error_scaling(mut self, scaling: ErrorScaling) -> Self {
        self.error_scaling = Some(scaling);
        self
    }

    /// Set the histogram bin count.
    #[must_use]
    pub const fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> McConfig {
        let mut config = McConfig::default();

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(samples) = self.samples_per_trial {
            config.samples_per_trial = samples;
        }
        if let Some((lower, upper)) = self.bounds {
            config.bounds = BoundsConfig { lower, upper };
        }
        if let Some(confidence) = self.confidence {
            config.confidence = confidence;
        }
        if let Some(scaling) = self.error_scaling {
            config.error_scaling = scaling;
        }
        if let Some(bins) = self.histogram_bins {
            config.histogram_bins = bins;
        }

        config
    }
}

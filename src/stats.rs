//! Supporting statistics: normal quantiles, histograms, and kernel
//! density estimation over trial results.

use serde::{Deserialize, Serialize};

use crate::error::{McError, McResult};

/// Inverse normal CDF (quantile function) approximation.
///
/// Uses the Acklam rational approximation, accurate to ~1.15e-9. The
/// input is clamped away from {0, 1} to avoid infinities.
#[must_use]
#[allow(clippy::excessive_precision)]
pub fn normal_quantile(p: f64) -> f64 {
    let p = p.clamp(1e-15, 1.0 - 1e-15);

    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_690e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];

    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];

    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];

    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];

    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p < P_LOW {
        // Lower tail
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        // Central region
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        // Upper tail
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Two-sided normal critical value for the given confidence level.
///
/// `critical_value(0.95)` is z = Φ⁻¹(0.975) ≈ 1.959964.
#[must_use]
pub fn critical_value(confidence: f64) -> f64 {
    normal_quantile(0.5 + confidence / 2.0)
}

/// Equal-width histogram with a caller-specified bin count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, length `bins + 1`.
    edges: Vec<f64>,
    /// Per-bin counts, length `bins`.
    counts: Vec<usize>,
}

impl Histogram {
    /// Build a histogram of `data` over [min, max] with `bins` equal-width
    /// bins. Values on the upper edge land in the last bin.
    ///
    /// # Errors
    ///
    /// Returns [`McError::EmptyEvaluations`] for empty data,
    /// [`McError::InvalidBinCount`] for zero bins, and
    /// [`McError::NonFiniteValue`] if the data contains NaN or Inf.
    pub fn new(data: &[f64], bins: usize) -> McResult<Self> {
        if data.is_empty() {
            return Err(McError::EmptyEvaluations);
        }
        if bins == 0 {
            return Err(McError::InvalidBinCount { got: bins });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(McError::non_finite(format!("data[{i}]")));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in data {
            min = min.min(v);
            max = max.max(v);
        }
        // Degenerate spread: widen symmetrically so every value is binnable.
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for &v in data {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Bin edges (length `bins + 1`).
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Per-bin counts (length `bins`).
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Bin midpoints (length `bins`), for plotting counts as a series.
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        self.edges
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0)
            .collect()
    }

    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned observations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Gaussian kernel density estimate with Silverman's rule-of-thumb
/// bandwidth.
#[derive(Debug, Clone)]
pub struct KernelDensity {
    data: Vec<f64>,
    bandwidth: f64,
}

impl KernelDensity {
    /// Fit a KDE to the data, choosing the bandwidth by Silverman's rule:
    /// `h = 0.9 * min(s, IQR / 1.34) * n^(-1/5)`.
    ///
    /// Zero-spread data falls back to a small positive bandwidth rather
    /// than producing a degenerate (infinite-density) estimate.
    ///
    /// # Errors
    ///
    /// Returns [`McError::EmptyEvaluations`] for empty data and
    /// [`McError::NonFiniteValue`] if the data contains NaN or Inf.
    pub fn fit(data: &[f64]) -> McResult<Self> {
        if data.is_empty() {
            return Err(McError::EmptyEvaluations);
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(McError::non_finite(format!("data[{i}]")));
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = if data.len() > 1 {
            data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let std = variance.sqrt();

        let iqr = interquartile_range(data);
        let spread = if iqr > 0.0 {
            std.min(iqr / 1.34)
        } else {
            std
        };

        let mut bandwidth = 0.9 * spread * n.powf(-0.2);
        if !bandwidth.is_normal() || bandwidth <= 0.0 {
            bandwidth = 1e-3;
        }

        Ok(Self {
            data: data.to_vec(),
            bandwidth,
        })
    }

    /// Fit with an explicit bandwidth, bypassing Silverman's rule.
    ///
    /// # Errors
    ///
    /// Returns an error for empty data or a non-positive/non-finite
    /// bandwidth.
    pub fn with_bandwidth(data: &[f64], bandwidth: f64) -> McResult<Self> {
        if data.is_empty() {
            return Err(McError::EmptyEvaluations);
        }
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(McError::config(format!(
                "KDE bandwidth must be positive and finite, got {bandwidth}"
            )));
        }
        Ok(Self {
            data: data.to_vec(),
            bandwidth,
        })
    }

    /// The fitted bandwidth.
    #[must_use]
    pub const fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Estimated density at a single point.
    #[must_use]
    pub fn density_at(&self, x: f64) -> f64 {
        let n = self.data.len() as f64;
        let h = self.bandwidth;
        let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());
        let sum: f64 = self
            .data
            .iter()
            .map(|&xi| {
                let u = (x - xi) / h;
                (-0.5 * u * u).exp()
            })
            .sum();
        norm * sum
    }

    /// Evaluate the density on a caller-specified grid.
    #[must_use]
    pub fn evaluate(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&x| self.density_at(x)).collect()
    }
}

/// Interquartile range via linearly interpolated quartiles on a sorted copy.
fn interquartile_range(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

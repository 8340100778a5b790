//! Numeric series export for an external plotting surface.
//!
//! The core never renders anything: it emits named (x, y) series, and a
//! JSON-Lines writer hands them to whatever plotting tool the caller
//! uses. No axis labels, colors, or layout decisions live here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::convergence::RunningSeries;
use crate::error::{McError, McResult};
use crate::stats::Histogram;

/// Evenly spaced grid of `points` values from `start` to `stop`
/// inclusive.
#[must_use]
pub fn linspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (points - 1) as f64;
            (0..points).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// A named pair of equal-length numeric sequences, one plottable line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Series name, used by the plotting surface for legends.
    pub name: String,
    /// Abscissa values.
    pub x: Vec<f64>,
    /// Ordinate values.
    pub y: Vec<f64>,
}

impl Series {
    /// Create a series from matching x and y sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequences differ in length.
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> McResult<Self> {
        if x.len() != y.len() {
            return Err(McError::config(format!(
                "Series length mismatch: {} x values vs {} y values",
                x.len(),
                y.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            x,
            y,
        })
    }

    /// Sample a function on an evenly spaced grid, e.g. to plot the
    /// integrand curve itself.
    #[must_use]
    pub fn from_fn<F>(name: impl Into<String>, start: f64, stop: f64, points: usize, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let x = linspace(start, stop, points);
        let y = x.iter().map(|&v| f(v)).collect();
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Number of points in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Convert a running convergence series into three plottable lines
/// (estimate, lower bound, upper bound) against the sample count 1..=m.
#[must_use]
pub fn running_to_series(series: &RunningSeries, prefix: &str) -> Vec<Series> {
    let counts: Vec<f64> = (1..=series.len()).map(|i| i as f64).collect();
    vec![
        Series {
            name: format!("{prefix}.estimate"),
            x: counts.clone(),
            y: series.estimates.clone(),
        },
        Series {
            name: format!("{prefix}.lower"),
            x: counts.clone(),
            y: series.lower.clone(),
        },
        Series {
            name: format!("{prefix}.upper"),
            x: counts,
            y: series.upper.clone(),
        },
    ]
}

/// Convert a histogram into a series of bin centers against counts.
#[must_use]
pub fn histogram_to_series(hist: &Histogram, name: impl Into<String>) -> Series {
    Series {
        name: name.into(),
        x: hist.centers(),
        y: hist.counts().iter().map(|&c| c as f64).collect(),
    }
}

/// JSON-Lines series writer: one series object per line.
#[derive(Debug)]
pub struct SeriesWriter<W: Write> {
    inner: W,
    written: usize,
}

impl SeriesWriter<BufWriter<File>> {
    /// Create a writer backed by a file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> McResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SeriesWriter<W> {
    /// Wrap an arbitrary writer.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Write one series as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or I/O failure.
    pub fn write(&mut self, series: &Series) -> McResult<()> {
        let line = serde_json::to_string(series)
            .map_err(|e| McError::serialization(e.to_string()))?;
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Write several series in order.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or I/O failure.
    pub fn write_all(&mut self, series: &[Series]) -> McResult<()> {
        for s in series {
            self.write(s)?;
        }
        Ok(())
    }

    /// Number of series written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flush the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn flush(&mut self) -> McResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}

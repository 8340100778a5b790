//! Repeated independent estimation trials.
//!
//! Runs the estimator n times to characterize the sampling distribution
//! of the point estimate: aggregate mean, histogram, and kernel density
//! estimate over the collected estimates.
//!
//! Sequential runs draw all trials from one shared RNG stream. Parallel
//! runs give every trial its own deterministically partitioned stream,
//! so results are bitwise reproducible regardless of worker count.

use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use serde::{Deserialize, Serialize};

use crate::engine::rng::McRng;
use crate::error::{McError, McResult};
use crate::estimator::Integrator;
use crate::stats::{Histogram, KernelDensity};

/// Ordered sequence of point estimates, one per independent trial.
///
/// Order carries no meaning beyond reproducibility under a fixed seed;
/// consumers use the results only in aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResults {
    estimates: Vec<f64>,
}

impl TrialResults {
    /// The collected point estimates, in trial order.
    #[must_use]
    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    /// Number of trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Check if no trials were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Arithmetic mean of the estimates.
    ///
    /// Converges to the true integral value as the trial count grows.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.estimates.iter().sum::<f64>() / self.estimates.len() as f64
    }

    /// Histogram of the estimates with a caller-specified bin count.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero bin count.
    pub fn histogram(&self, bins: usize) -> McResult<Histogram> {
        Histogram::new(&self.estimates, bins)
    }

    /// Gaussian kernel density estimate evaluated on a caller-specified
    /// grid, with Silverman's rule bandwidth.
    ///
    /// # Errors
    ///
    /// Returns an error if the estimates are empty.
    pub fn density(&self, grid: &[f64]) -> McResult<Vec<f64>> {
        let kde = KernelDensity::fit(&self.estimates)?;
        Ok(kde.evaluate(grid))
    }
}

/// One trial scheduled on the work-stealing pool.
#[derive(Debug)]
struct TrialTask {
    index: usize,
    rng: McRng,
}

/// Runs n independent estimation trials.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    trials: usize,
    integrator: Integrator,
}

impl TrialRunner {
    /// Create a runner for `trials` repetitions of the given integrator.
    #[must_use]
    pub const fn new(trials: usize, integrator: Integrator) -> Self {
        Self { trials, integrator }
    }

    /// Configured trial count.
    #[must_use]
    pub const fn trials(&self) -> usize {
        self.trials
    }

    /// The integrator executed per trial.
    #[must_use]
    pub const fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    fn check(&self) -> McResult<()> {
        if self.trials == 0 {
            return Err(McError::InvalidTrialCount { got: 0 });
        }
        Ok(())
    }

    /// Run all trials sequentially, drawing fresh samples for each trial
    /// from the shared RNG stream.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero trial count or any estimation failure.
    pub fn run<F>(&self, f: F, rng: &mut McRng) -> McResult<TrialResults>
    where
        F: Fn(f64) -> f64,
    {
        self.check()?;

        let mut estimates = Vec::with_capacity(self.trials);
        for _ in 0..self.trials {
            let result = self.integrator.estimate(&f, rng)?;
            estimates.push(result.estimate);
        }
        Ok(TrialResults { estimates })
    }

    /// Run all trials on a work-stealing pool.
    ///
    /// Every trial draws from its own stream partitioned off the master
    /// RNG, so the collected estimates are identical whatever the worker
    /// count, and identical to [`TrialRunner::run_partitioned`].
    ///
    /// # Errors
    ///
    /// Returns an error for a zero trial count, a zero worker count, or
    /// any estimation failure.
    pub fn run_parallel<F>(&self, f: &F, rng: &mut McRng, workers: usize) -> McResult<TrialResults>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        self.check()?;
        if workers == 0 {
            return Err(McError::config("Worker count must be at least 1"));
        }

        let streams = rng.partition(self.trials);

        // Global queue feeding per-worker local queues.
        let injector: Injector<TrialTask> = Injector::new();
        for (index, rng) in streams.into_iter().enumerate() {
            injector.push(TrialTask { index, rng });
        }

        let locals: Vec<Worker<TrialTask>> =
            (0..workers).map(|_| Worker::new_fifo()).collect();
        let stealers: Vec<Stealer<TrialTask>> = locals.iter().map(Worker::stealer).collect();

        let results: std::sync::Mutex<Vec<(usize, McResult<f64>)>> =
            std::sync::Mutex::new(Vec::with_capacity(self.trials));

        std::thread::scope(|s| {
            for (worker_id, local) in locals.into_iter().enumerate() {
                let injector = &injector;
                let stealers = &stealers;
                let results = &results;
                let integrator = &self.integrator;

                s.spawn(move || loop {
                    let task = local
                        .pop()
                        .or_else(|| loop {
                            match injector.steal() {
                                Steal::Success(task) => return Some(task),
                                Steal::Empty => return None,
                                Steal::Retry => {}
                            }
                        })
                        .or_else(|| {
                            for i in 0..stealers.len() {
                                let idx = (worker_id + i + 1) % stealers.len();
                                loop {
                                    match stealers[idx].steal() {
                                        Steal::Success(task) => return Some(task),
                                        Steal::Empty => break,
                                        Steal::Retry => {}
                                    }
                                }
                            }
                            None
                        });

                    match task {
                        Some(mut task) => {
                            let outcome = integrator
                                .estimate(f, &mut task.rng)
                                .map(|r| r.estimate);
                            if let Ok(mut guard) = results.lock() {
                                guard.push((task.index, outcome));
                            }
                        }
                        None => break,
                    }
                });
            }
        });

        let mut indexed = results.into_inner().unwrap_or_default();
        indexed.sort_by_key(|(idx, _)| *idx);

        let mut estimates = Vec::with_capacity(self.trials);
        for (_, outcome) in indexed {
            estimates.push(outcome?);
        }
        Ok(TrialResults { estimates })
    }

    /// Run all trials sequentially but on partitioned streams, one per
    /// trial. This is the single-threaded reference execution that
    /// [`TrialRunner::run_parallel`] must match bitwise.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero trial count or any estimation failure.
    pub fn run_partitioned<F>(&self, f: F, rng: &mut McRng) -> McResult<TrialResults>
    where
        F: Fn(f64) -> f64,
    {
        self.check()?;

        let mut estimates = Vec::with_capacity(self.trials);
        for mut stream in rng.partition(self.trials) {
            let result = self.integrator.estimate(&f, &mut stream)?;
            estimates.push(result.estimate);
        }
        Ok(TrialResults { estimates })
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: trial count in equals estimate count out.
        #[test]
        fn prop_trial_count(seed in 0u64..10_000, n in 1usize..40) {
            let mut rng = McRng::new(seed);
            let runner = TrialRunner::new(n, Integrator::new(20));
            let results = runner.run(|x| x, &mut rng).unwrap();
            prop_assert_eq!(results.len(), n);
        }

        /// Falsification: parallel execution is reproducible for any seed
        /// and worker count.
        #[test]
        fn prop_parallel_reproducible(seed in 0u64..1_000, workers in 1usize..8) {
            let runner = TrialRunner::new(16, Integrator::new(50));
            let f = |x: f64| x * x;

            let mut rng1 = McRng::new(seed);
            let mut rng2 = McRng::new(seed);
            let r1 = runner.run_parallel(&f, &mut rng1, workers).unwrap();
            let r2 = runner.run_partitioned(f, &mut rng2).unwrap();

            for (a, b) in r1.estimates().iter().zip(r2.estimates()) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }
}

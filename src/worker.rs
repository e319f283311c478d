//! The background computation whose progress is displayed.
//!
//! Each pass draws a batch of random points in the unit square and refines a
//! Monte Carlo estimate of π, then reports how many passes are done. Like a
//! progressive renderer, the result only gets better with more passes, so the
//! iteration count is the meaningful progress measure.

use crate::event::ProgressMessage;
use crossbeam_channel::{Sender, TrySendError};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Stop after this many passes. `None` runs until shutdown.
    pub max_iterations: Option<u64>,
    /// Pause after each pass.
    pub pass_interval: Duration,
    pub samples_per_pass: u64,
}

/// Outcome of a finished worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkerReport {
    pub iterations: u64,
    /// Updates discarded because the channel was full.
    pub dropped_updates: u64,
    pub estimate: f64,
}

/// Running hit/total tally of the Monte Carlo estimate.
#[derive(Debug)]
pub struct Sampler {
    rng: fastrand::Rng,
    inside: u64,
    total: u64,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Sampler {
            rng: fastrand::Rng::with_seed(seed),
            inside: 0,
            total: 0,
        }
    }

    /// Draws `samples` points and folds them into the estimate.
    pub fn pass(&mut self, samples: u64) {
        for _ in 0..samples {
            let x = self.rng.f64();
            let y = self.rng.f64();
            if x * x + y * y <= 1.0 {
                self.inside += 1;
            }
        }
        self.total += samples;
    }

    /// Current estimate of π, or 0 before the first sample.
    pub fn estimate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            4.0 * self.inside as f64 / self.total as f64
        }
    }

    pub fn samples(&self) -> u64 {
        self.total
    }
}

/// Drives the sampler and publishes iteration counts.
pub struct Worker {
    config: WorkerConfig,
    sender: Sender<ProgressMessage>,
    running: Arc<AtomicBool>,
    sampler: Sampler,
    // Dropping streak state; the warning is logged once per streak.
    currently_dropping: bool,
    dropped_updates: u64,
}

impl Worker {
    pub fn new(
        config: WorkerConfig,
        sender: Sender<ProgressMessage>,
        running: Arc<AtomicBool>,
        seed: u64,
    ) -> Self {
        Worker {
            config,
            sender,
            running,
            sampler: Sampler::new(seed),
            currently_dropping: false,
            dropped_updates: 0,
        }
    }

    /// Runs the worker on its own thread.
    pub fn spawn(
        config: WorkerConfig,
        sender: Sender<ProgressMessage>,
        running: Arc<AtomicBool>,
    ) -> std::io::Result<JoinHandle<WorkerReport>> {
        let seed = fastrand::u64(..);
        thread::Builder::new()
            .name("worker".into())
            .spawn(move || Worker::new(config, sender, running, seed).run())
    }

    /// Runs passes until the iteration limit, shutdown, or the monitor hangs up.
    pub fn run(mut self) -> WorkerReport {
        let mut iteration = 0u64;

        while self.running.load(Ordering::SeqCst) {
            if self.config.max_iterations.is_some_and(|max| iteration >= max) {
                debug!(iteration, "Iteration limit reached");
                break;
            }

            self.sampler.pass(self.config.samples_per_pass);
            iteration += 1;

            if !self.publish(iteration) {
                debug!(iteration, "Progress channel disconnected, stopping worker");
                break;
            }

            if !self.config.pass_interval.is_zero() {
                thread::sleep(self.config.pass_interval);
            }
        }

        info!(
            iterations = iteration,
            samples = self.sampler.samples(),
            estimate = self.sampler.estimate(),
            dropped_updates = self.dropped_updates,
            "Worker finished"
        );

        WorkerReport {
            iterations: iteration,
            dropped_updates: self.dropped_updates,
            estimate: self.sampler.estimate(),
        }
    }

    /// Sends the count without blocking. Returns `false` once the receiver is gone.
    fn publish(&mut self, iteration: u64) -> bool {
        match self.sender.try_send(ProgressMessage::Iteration(iteration)) {
            Ok(()) => {
                if self.currently_dropping {
                    info!(dropped = self.dropped_updates, "Progress channel has room again");
                    self.currently_dropping = false;
                }
                true
            }
            Err(TrySendError::Full(_)) => {
                self.dropped_updates += 1;
                if !self.currently_dropping {
                    warn!(iteration, "Progress channel full, dropping updates until the display catches up");
                    self.currently_dropping = true;
                }
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn config(max: u64) -> WorkerConfig {
        WorkerConfig {
            max_iterations: Some(max),
            pass_interval: Duration::ZERO,
            samples_per_pass: 100,
        }
    }

    #[test]
    fn sampler_estimate_converges() {
        let mut s = Sampler::new(42);
        assert_eq!(s.estimate(), 0.0);
        s.pass(200_000);
        assert_eq!(s.samples(), 200_000);
        assert!((s.estimate() - std::f64::consts::PI).abs() < 0.05);
    }

    #[test]
    fn publishes_every_iteration_in_order() {
        let (tx, rx) = bounded(16);
        let report = Worker::new(config(10), tx, Arc::new(AtomicBool::new(true)), 1).run();

        let got: Vec<ProgressMessage> = rx.try_iter().collect();
        let want: Vec<ProgressMessage> = (1..=10).map(ProgressMessage::Iteration).collect();
        assert_eq!(got, want);
        assert_eq!(report.iterations, 10);
        assert_eq!(report.dropped_updates, 0);
    }

    #[test]
    fn full_channel_drops_updates() {
        let (tx, rx) = bounded(2);
        let report = Worker::new(config(5), tx, Arc::new(AtomicBool::new(true)), 1).run();

        assert_eq!(report.iterations, 5);
        assert_eq!(report.dropped_updates, 3);
        let got: Vec<ProgressMessage> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![ProgressMessage::Iteration(1), ProgressMessage::Iteration(2)]
        );
    }

    #[test]
    fn stops_when_receiver_dropped() {
        let (tx, rx) = bounded(2);
        drop(rx);
        let cfg = WorkerConfig {
            max_iterations: None,
            ..config(0)
        };
        let report = Worker::new(cfg, tx, Arc::new(AtomicBool::new(true)), 1).run();
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn stops_on_shutdown_flag() {
        let (tx, rx) = bounded(2);
        let cfg = WorkerConfig {
            max_iterations: None,
            ..config(0)
        };
        let report = Worker::new(cfg, tx, Arc::new(AtomicBool::new(false)), 1).run();
        assert_eq!(report.iterations, 0);
        assert!(rx.try_recv().is_err());
    }
}

//! When to stop iterating.

use std::time::{Duration, Instant};

use dt_config::ControllerConfig;

/// Asked before every iteration, with the index of the iteration about to
/// start.  The controller knows nothing else about the policy.
pub trait TerminationCriterion: Send {
    fn continue_iterations(&self, iteration: u32) -> bool;
}

impl<F> TerminationCriterion for F
where
    F: Fn(u32) -> bool + Send,
{
    fn continue_iterations(&self, iteration: u32) -> bool {
        self(iteration)
    }
}

/// Runs up to and including `last_iteration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIterations {
    pub last_iteration: u32,
}

impl FixedIterations {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self { last_iteration: config.last_iteration }
    }
}

impl TerminationCriterion for FixedIterations {
    fn continue_iterations(&self, iteration: u32) -> bool {
        iteration <= self.last_iteration
    }
}

/// Stops once `budget` of wall-clock time has passed since construction.
/// The first question is always answered with `true`, so at least one
/// iteration runs.
#[derive(Debug)]
pub struct WallClockBudget {
    started: Instant,
    budget:  Duration,
    asked:   std::sync::atomic::AtomicBool,
}

impl WallClockBudget {
    pub fn new(budget: Duration) -> Self {
        Self { started: Instant::now(), budget, asked: Default::default() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl TerminationCriterion for WallClockBudget {
    fn continue_iterations(&self, _iteration: u32) -> bool {
        use std::sync::atomic::Ordering;

        let first = !self.asked.swap(true, Ordering::Relaxed);
        first || self.started.elapsed() < self.budget
    }
}

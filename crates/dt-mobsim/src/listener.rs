//! Mobsim observers.

use dt_core::SimTime;

/// Callbacks invoked by an observable mobsim at key points of its run.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: step counter
///
/// ```rust
/// use dt_core::SimTime;
/// use dt_mobsim::MobsimListener;
///
/// #[derive(Default)]
/// struct StepCounter { steps: usize }
///
/// impl MobsimListener for StepCounter {
///     fn on_after_step(&mut self, _time: SimTime) {
///         self.steps += 1;
///     }
/// }
/// ```
pub trait MobsimListener: Send {
    /// Called once, after the engine has placed every agent and before the
    /// first step.
    fn on_initialized(&mut self) {}

    /// Called before the agents due at `time` are processed.
    fn on_before_step(&mut self, _time: SimTime) {}

    /// Called after the agents due at `time` are processed.
    fn on_after_step(&mut self, _time: SimTime) {}

    /// Called once after the last step, before the engine releases its state.
    fn on_before_cleanup(&mut self) {}
}

/// A [`MobsimListener`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl MobsimListener for NoopListener {}

/// Produces a fresh listener for each iteration.  No listener instance is
/// ever handed to two mobsims.
pub trait MobsimListenerProvider: Send + Sync {
    fn provide(&self) -> Box<dyn MobsimListener>;
}

impl<F> MobsimListenerProvider for F
where
    F: Fn() -> Box<dyn MobsimListener> + Send + Sync,
{
    fn provide(&self) -> Box<dyn MobsimListener> {
        self()
    }
}

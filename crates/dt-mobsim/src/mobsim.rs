//! Engine and factory traits.

use dt_config::Config;
use dt_core::Sink;
use dt_events::EventsManager;
use dt_scenario::Scenario;
use dt_spatial::LeastCostPathCalculator;

use crate::{MobsimListener, MobsimResult};

/// One iteration's simulation engine.  [`run`](Self::run) executes the
/// selected plans of the whole population to completion and returns.
pub trait Mobsim {
    fn run(&mut self) -> MobsimResult<()>;

    /// The observation capability, for engines that have one.
    fn as_observable(&mut self) -> Option<&mut dyn ObservableMobsim> {
        None
    }
}

/// A mobsim that accepts listeners before it starts.
pub trait ObservableMobsim {
    /// Fails with [`MobsimError::AlreadyStarted`](crate::MobsimError::AlreadyStarted)
    /// once `run()` has been called.
    fn add_listener(&mut self, listener: Box<dyn MobsimListener>) -> MobsimResult<()>;
}

/// Everything an engine instance is bound to for one iteration.
pub struct MobsimContext<'a> {
    pub scenario:  &'a Scenario,
    /// Receives every event the engine emits.
    pub events:    &'a mut EventsManager,
    pub config:    &'a Config,
    pub router:    &'a dyn LeastCostPathCalculator,
    pub iteration: u32,
    pub sink:      Sink,
}

/// Builds a fresh engine per iteration.
pub trait MobsimFactory: Send + Sync {
    fn create<'a>(&self, ctx: MobsimContext<'a>) -> MobsimResult<Box<dyn Mobsim + 'a>>;
}

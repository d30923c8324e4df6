//! Controller listeners and the order they are called in.
//!
//! Every phase is dispatched to the **core** listeners first, in the
//! *reverse* of the order the controller declared them, then to the
//! **extension** listeners in registration order.  The controller declares
//!
//! ```text
//! DumpDataAtEnd, PlansScoring, PlansReplanning, PlansDumping, EventsHandling
//! ```
//!
//! so events are drained before scores are read, and scores are final
//! before replanning consumes them.

use dt_config::Config;
use dt_core::Sink;
use dt_events::EventsManager;
use dt_output::ScoreStatsRow;
use dt_scenario::Scenario;
use dt_spatial::LeastCostPathCalculator;

use crate::{ControllerError, ControllerResult, OutputDirectoryHierarchy};

// ── Phase ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Startup,
    IterationStarts,
    BeforeMobsim,
    AfterMobsim,
    Scoring,
    Replanning,
    IterationPersist,
    IterationEnds,
    Shutdown,
}

impl Phase {
    /// Phases of one iteration, in execution order.
    pub const ITERATION: [Phase; 7] = [
        Phase::IterationStarts,
        Phase::BeforeMobsim,
        Phase::AfterMobsim,
        Phase::Scoring,
        Phase::Replanning,
        Phase::IterationPersist,
        Phase::IterationEnds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Startup          => "startup",
            Phase::IterationStarts  => "iteration_starts",
            Phase::BeforeMobsim     => "before_mobsim",
            Phase::AfterMobsim      => "after_mobsim",
            Phase::Scoring          => "scoring",
            Phase::Replanning       => "replanning",
            Phase::IterationPersist => "iteration_persist",
            Phase::IterationEnds    => "iteration_ends",
            Phase::Shutdown         => "shutdown",
        }
    }

    fn notify(self, listener: &mut dyn ControllerListener, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        match self {
            Phase::Startup          => listener.notify_startup(ctx),
            Phase::IterationStarts  => listener.notify_iteration_starts(ctx),
            Phase::BeforeMobsim     => listener.notify_before_mobsim(ctx),
            Phase::AfterMobsim      => listener.notify_after_mobsim(ctx),
            Phase::Scoring          => listener.notify_scoring(ctx),
            Phase::Replanning       => listener.notify_replanning(ctx),
            Phase::IterationPersist => listener.notify_iteration_persist(ctx),
            Phase::IterationEnds    => listener.notify_iteration_ends(ctx),
            Phase::Shutdown         => listener.notify_shutdown(ctx),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ControllerContext ─────────────────────────────────────────────────────────

/// What a listener sees during one dispatch.
pub struct ControllerContext<'a> {
    pub config:        &'a Config,
    pub scenario:      &'a mut Scenario,
    pub events:        &'a mut EventsManager,
    pub output:        &'a OutputDirectoryHierarchy,
    pub router:        &'a dyn LeastCostPathCalculator,
    /// Score statistics of every finished iteration, oldest first.
    pub score_history: &'a mut Vec<ScoreStatsRow>,
    /// The current iteration.  During `Shutdown` the last one that ran.
    pub iteration:     u32,
    pub sink:          &'a Sink,
}

// ── ControllerListener ────────────────────────────────────────────────────────

/// Hooks into the controller's phases.  Every hook defaults to a no-op;
/// an `Err` aborts the run.
pub trait ControllerListener: Send {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn notify_startup(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_iteration_starts(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_before_mobsim(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_after_mobsim(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_scoring(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_replanning(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_iteration_persist(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_iteration_ends(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }

    fn notify_shutdown(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        Ok(())
    }
}

// ── ListenerRegistry ──────────────────────────────────────────────────────────

/// Core indices in the order they are called: last declared first.
pub fn dispatch_order(core_len: usize) -> impl Iterator<Item = usize> {
    (0..core_len).rev()
}

#[derive(Default)]
pub struct ListenerRegistry {
    core:       Vec<Box<dyn ControllerListener>>,
    extensions: Vec<Box<dyn ControllerListener>>,
    sealed:     bool,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core listeners are declared by the controller only.
    pub(crate) fn add_core(&mut self, listener: Box<dyn ControllerListener>) {
        self.core.push(listener);
    }

    pub fn add_extension(&mut self, listener: Box<dyn ControllerListener>) -> ControllerResult<()> {
        if self.sealed {
            return Err(ControllerError::RegistrationClosed);
        }
        self.extensions.push(listener);
        Ok(())
    }

    /// Closes extension registration.  Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn core_len(&self) -> usize {
        self.core.len()
    }

    pub fn extension_len(&self) -> usize {
        self.extensions.len()
    }

    /// Listener names in call order.
    pub fn names(&self) -> Vec<&str> {
        dispatch_order(self.core.len())
            .map(|i| self.core[i].name())
            .chain(self.extensions.iter().map(|l| l.name()))
            .collect()
    }

    /// Calls `phase` on every listener.  Stops at the first error.
    pub fn dispatch(&mut self, phase: Phase, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        for i in dispatch_order(self.core.len()) {
            phase.notify(self.core[i].as_mut(), ctx)?;
        }
        for listener in &mut self.extensions {
            phase.notify(listener.as_mut(), ctx)?;
        }
        Ok(())
    }
}

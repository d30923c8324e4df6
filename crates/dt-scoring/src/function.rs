//! Scoring collaborator interfaces.

use dt_core::{AgentId, SimTime, TransportMode};

/// A performed activity.  `start` is `None` for the first activity of the
/// day and `end` is `None` for the last one.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRecord {
    pub activity_type: String,
    pub start:         Option<SimTime>,
    pub end:           Option<SimTime>,
}

/// A completed leg.
#[derive(Clone, Debug, PartialEq)]
pub struct LegRecord {
    pub mode:      TransportMode,
    pub departure: SimTime,
    pub arrival:   SimTime,
}

impl LegRecord {
    pub fn travel_secs(&self) -> u32 {
        self.arrival - self.departure
    }
}

/// Accumulates the utility of one agent's executed plan.
pub trait ScoringFunction: Send {
    fn handle_activity(&mut self, activity: &ActivityRecord);

    fn handle_leg(&mut self, leg: &LegRecord);

    /// The agent did not complete its plan before the mobsim ended.
    fn agent_stuck(&mut self, time: SimTime);

    /// No more input follows.
    fn finish(&mut self);

    fn score(&self) -> f64;
}

/// Creates one fresh scoring function per agent and iteration.
pub trait ScoringFunctionFactory: Send + Sync {
    fn create(&self, agent: AgentId) -> Box<dyn ScoringFunction>;
}

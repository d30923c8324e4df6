//! `EventsToScore`: rebuilds each agent's day from events and feeds it to
//! that agent's scoring function.
//!
//! The first activity of the day has no start event and the last one has no
//! end event.  When scoring finishes, the two are wrapped around midnight
//! into one overnight activity if they share a type; otherwise each is
//! scored on its own (`00:00 → end` and `start → 24:00`).

use std::sync::Arc;

use dt_core::{AgentId, SimTime, TransportMode};
use dt_events::{Event, EventHandler};

use crate::function::{ActivityRecord, LegRecord, ScoringFunction, ScoringFunctionFactory};
use crate::{Map, ScoringError, ScoringResult};

struct AgentDay {
    function:      Box<dyn ScoringFunction>,
    first:         Option<(String, SimTime)>,
    open_activity: Option<(String, SimTime)>,
    open_leg:      Option<(TransportMode, SimTime)>,
    stuck:         bool,
}

impl AgentDay {
    fn new(function: Box<dyn ScoringFunction>) -> Self {
        Self { function, first: None, open_activity: None, open_leg: None, stuck: false }
    }

    fn finish(&mut self) {
        let last = if self.stuck { None } else { self.open_activity.take() };
        match (self.first.take(), last) {
            (Some((first_type, end)), Some((last_type, start))) if first_type == last_type => {
                self.function.handle_activity(&ActivityRecord {
                    activity_type: first_type,
                    start:         Some(start),
                    end:           Some(end + SimTime::MIDNIGHT.seconds()),
                });
            }
            (first, last) => {
                if let Some((activity_type, end)) = first {
                    self.function.handle_activity(&ActivityRecord { activity_type, start: None, end: Some(end) });
                }
                if let Some((activity_type, start)) = last {
                    self.function.handle_activity(&ActivityRecord { activity_type, start: Some(start), end: None });
                }
            }
        }
        self.function.finish();
    }
}

/// Scores one iteration.  Register it with the events manager before the
/// events are flushed, then call [`finish_scoring`](Self::finish_scoring).
pub struct EventsToScore {
    factory:  Arc<dyn ScoringFunctionFactory>,
    agents:   Map<AgentId, AgentDay>,
    finished: bool,
}

impl EventsToScore {
    /// Creates a scoring function for each of `agents` up front, so agents
    /// that never produce an event still receive a score.
    pub fn new(factory: Arc<dyn ScoringFunctionFactory>, agents: impl IntoIterator<Item = AgentId>) -> Self {
        let agents = agents
            .into_iter()
            .map(|a| (a, AgentDay::new(factory.create(a))))
            .collect();
        Self { factory, agents, finished: false }
    }

    fn day(&mut self, agent: AgentId) -> &mut AgentDay {
        let factory = &self.factory;
        self.agents
            .entry(agent)
            .or_insert_with(|| AgentDay::new(factory.create(agent)))
    }

    /// Closes every open day and finalises all scoring functions.
    pub fn finish_scoring(&mut self) {
        if self.finished {
            return;
        }
        for day in self.agents.values_mut() {
            day.finish();
        }
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn score_of(&self, agent: AgentId) -> ScoringResult<f64> {
        if !self.finished {
            return Err(ScoringError::NotFinished);
        }
        self.agents
            .get(&agent)
            .map(|d| d.function.score())
            .ok_or(ScoringError::UnknownAgent(agent))
    }

    /// All scores, sorted by agent.
    pub fn scores(&self) -> ScoringResult<Vec<(AgentId, f64)>> {
        if !self.finished {
            return Err(ScoringError::NotFinished);
        }
        let mut out: Vec<_> = self.agents.iter().map(|(a, d)| (*a, d.function.score())).collect();
        out.sort_unstable_by_key(|(a, _)| *a);
        Ok(out)
    }
}

impl EventHandler for EventsToScore {
    fn handle(&mut self, event: &Event) {
        let day = self.day(event.agent());
        if day.stuck {
            return;
        }
        match event {
            Event::ActivityEnd { time, activity_type, .. } => match day.open_activity.take() {
                Some((open_type, start)) => day.function.handle_activity(&ActivityRecord {
                    activity_type: open_type,
                    start:         Some(start),
                    end:           Some(*time),
                }),
                None => day.first = Some((activity_type.clone(), *time)),
            },
            Event::ActivityStart { time, activity_type, .. } => {
                day.open_activity = Some((activity_type.clone(), *time));
            }
            Event::Departure { time, mode, .. } => {
                day.open_leg = Some((*mode, *time));
            }
            Event::Arrival { time, .. } => {
                if let Some((mode, departure)) = day.open_leg.take() {
                    day.function.handle_leg(&LegRecord { mode, departure, arrival: *time });
                }
            }
            Event::Stuck { time, .. } => {
                day.stuck = true;
                day.open_leg = None;
                day.function.agent_stuck(*time);
            }
        }
    }

    fn reset(&mut self, _iteration: u32) {
        let factory = &self.factory;
        for (agent, day) in self.agents.iter_mut() {
            *day = AgentDay::new(factory.create(*agent));
        }
        self.finished = false;
    }
}

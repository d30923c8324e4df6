//! `WakeQueue`: sparse per-second agent activation queue.
//!
//! Most agents spend most of the day performing an activity.  Instead of
//! visiting every agent every simulated second, an agent registers the
//! second at which it next needs attention (end of an activity, arrival of
//! a leg) and each step drains only the agents due at that second.
//!
//! `BTreeMap` gives O(log W) insert and pop where W is the number of distinct
//! wake seconds currently enqueued.

use std::collections::BTreeMap;

use dt_core::{AgentId, SimTime};

/// Priority queue mapping simulated seconds to the agents due then.
#[derive(Debug, Default)]
pub struct WakeQueue {
    inner: BTreeMap<SimTime, Vec<AgentId>>,
    /// Cached total agent count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `agent` at `time`.
    pub fn push(&mut self, time: SimTime, agent: AgentId) {
        self.inner.entry(time).or_default().push(agent);
        self.total += 1;
    }

    /// Removes and returns all agents scheduled for exactly `time`, sorted
    /// by id so each step processes agents in a fixed order.
    pub fn drain_time(&mut self, time: SimTime) -> Option<Vec<AgentId>> {
        let mut agents = self.inner.remove(&time)?;
        self.total -= agents.len();
        agents.sort_unstable();
        Some(agents)
    }

    /// The earliest second with at least one queued agent.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Drops every entry and returns the agents that were still queued.
    pub fn clear(&mut self) -> Vec<AgentId> {
        self.total = 0;
        std::mem::take(&mut self.inner).into_values().flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future seconds with at least one queued agent.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}

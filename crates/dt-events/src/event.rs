//! Event types emitted by the mobsim.

use std::fmt;

use dt_core::{AgentId, NodeId, SimTime, TransportMode};

/// Something that happened to one agent at one point in simulated time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    ActivityStart { time: SimTime, agent: AgentId, node: NodeId, activity_type: String },
    ActivityEnd   { time: SimTime, agent: AgentId, node: NodeId, activity_type: String },
    Departure     { time: SimTime, agent: AgentId, node: NodeId, mode: TransportMode },
    Arrival       { time: SimTime, agent: AgentId, node: NodeId, mode: TransportMode },
    /// The agent could not finish its plan before the mobsim ended.
    Stuck         { time: SimTime, agent: AgentId, node: NodeId, mode: Option<TransportMode> },
}

impl Event {
    pub fn time(&self) -> SimTime {
        match self {
            Event::ActivityStart { time, .. }
            | Event::ActivityEnd { time, .. }
            | Event::Departure { time, .. }
            | Event::Arrival { time, .. }
            | Event::Stuck { time, .. } => *time,
        }
    }

    pub fn agent(&self) -> AgentId {
        match self {
            Event::ActivityStart { agent, .. }
            | Event::ActivityEnd { agent, .. }
            | Event::Departure { agent, .. }
            | Event::Arrival { agent, .. }
            | Event::Stuck { agent, .. } => *agent,
        }
    }

    pub fn node(&self) -> NodeId {
        match self {
            Event::ActivityStart { node, .. }
            | Event::ActivityEnd { node, .. }
            | Event::Departure { node, .. }
            | Event::Arrival { node, .. }
            | Event::Stuck { node, .. } => *node,
        }
    }

    /// Short type label used in event output.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ActivityStart { .. } => "actstart",
            Event::ActivityEnd { .. }   => "actend",
            Event::Departure { .. }     => "departure",
            Event::Arrival { .. }       => "arrival",
            Event::Stuck { .. }         => "stuck",
        }
    }

    /// Activity type or mode, whichever the event carries.
    pub fn detail(&self) -> &str {
        match self {
            Event::ActivityStart { activity_type, .. } | Event::ActivityEnd { activity_type, .. } => {
                activity_type.as_str()
            }
            Event::Departure { mode, .. } | Event::Arrival { mode, .. } => mode.as_str(),
            Event::Stuck { mode, .. } => mode.map_or("", TransportMode::as_str),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} at {}", self.time(), self.kind(), self.agent(), self.node())?;
        match self.detail() {
            "" => Ok(()),
            d => write!(f, " ({d})"),
        }
    }
}

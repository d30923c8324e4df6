//! `TeleportationMobsim`: the default engine.
//!
//! Agents do not interact.  Each leg takes the travel time of its stored
//! route, or of a least-cost path computed at departure for network modes,
//! or of the scaled beeline at the mode's teleport speed otherwise.
//!
//! # Step
//!
//! ```text
//! drain agents due at t ──► per agent, ascending id:
//!   at activity  → ActivityEnd, Departure, schedule arrival
//!   travelling   → Arrival, ActivityStart, schedule next departure
//! ```
//!
//! Agents still travelling, or waiting at an activity that has a successor,
//! when the queue passes `end_time` are aborted with a `Stuck` event.

use dt_core::{AgentId, GeoPoint, NodeId, Sink, SinkExt, SimTime, TransportMode};
use dt_events::{Event, EventsManager};
use dt_population::{Activity, Leg, Plan, PlanElement};
use dt_scenario::Scenario;
use dt_spatial::{LeastCostPathCalculator, SpatialResult};

use crate::{
    Mobsim, MobsimContext, MobsimError, MobsimFactory, MobsimListener, MobsimResult,
    ObservableMobsim, WakeQueue,
};

const COMPONENT: &str = "mobsim";

/// Detour factor applied to beeline distances of teleported legs.
pub const BEELINE_DISTANCE_FACTOR: f32 = 1.3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AgentState {
    /// Performing the activity at this plan element index.
    AtActivity(usize),
    /// On the leg at this plan element index.
    Travelling(usize),
    Done,
}

pub struct TeleportationMobsim<'a> {
    scenario:  &'a Scenario,
    events:    &'a mut EventsManager,
    router:    &'a dyn LeastCostPathCalculator,
    sink:      Sink,
    end_time:  SimTime,
    iteration: u32,
    listeners: Vec<Box<dyn MobsimListener>>,
    started:   bool,
    /// Selected plan per agent, indexed by `AgentId`.
    plans:     Vec<Option<&'a Plan>>,
    states:    Vec<AgentState>,
    queue:     WakeQueue,
}

impl<'a> TeleportationMobsim<'a> {
    pub fn new(ctx: MobsimContext<'a>) -> Self {
        Self {
            scenario:  ctx.scenario,
            events:    ctx.events,
            router:    ctx.router,
            sink:      ctx.sink,
            end_time:  SimTime(ctx.config.mobsim.end_time),
            iteration: ctx.iteration,
            listeners: Vec::new(),
            started:   false,
            plans:     Vec::new(),
            states:    Vec::new(),
            queue:     WakeQueue::new(),
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    /// Places every agent at its first activity and schedules its first
    /// departure.
    fn initialize(&mut self) {
        let population = self.scenario.population();
        self.plans = population.iter().map(|p| p.selected_plan()).collect();
        self.states = vec![AgentState::Done; self.plans.len()];

        for (i, plan) in self.plans.iter().enumerate() {
            let Some(plan) = plan else { continue };
            let Some(first) = plan.first_activity() else { continue };
            if plan.elements.len() < 3 {
                continue;
            }
            let agent = AgentId(i as u32);
            self.states[i] = AgentState::AtActivity(0);
            if let Some(depart) = first.departure_after(SimTime::ZERO) {
                self.queue.push(depart, agent);
            }
        }
    }

    // ── Per-agent transitions ─────────────────────────────────────────────

    fn wake(&mut self, agent: AgentId, now: SimTime) {
        let Some(plan) = self.plans.get(agent.index()).copied().flatten() else {
            return;
        };
        match self.states[agent.index()] {
            AgentState::AtActivity(idx) => self.depart(agent, plan, idx, now),
            AgentState::Travelling(idx) => self.arrive(agent, plan, idx, now),
            AgentState::Done => {}
        }
    }

    fn depart(&mut self, agent: AgentId, plan: &'a Plan, idx: usize, now: SimTime) {
        let (Some(PlanElement::Activity(from)), Some(PlanElement::Leg(leg)), Some(PlanElement::Activity(to))) =
            (plan.elements.get(idx), plan.elements.get(idx + 1), plan.elements.get(idx + 2))
        else {
            self.states[agent.index()] = AgentState::Done;
            return;
        };
        let node = node_of(from);
        self.emit(Event::ActivityEnd { time: now, agent, node, activity_type: from.activity_type.clone() });
        self.emit(Event::Departure { time: now, agent, node, mode: leg.mode });

        match self.travel_secs(agent, from, leg, to, now) {
            Ok(secs) => {
                self.states[agent.index()] = AgentState::Travelling(idx + 1);
                self.queue.push(now + secs, agent);
            }
            Err(e) => {
                self.sink.warn(COMPONENT, format!("{agent} cannot travel by {}: {e}", leg.mode));
                self.emit(Event::Stuck { time: now, agent, node, mode: Some(leg.mode) });
                self.states[agent.index()] = AgentState::Done;
            }
        }
    }

    fn arrive(&mut self, agent: AgentId, plan: &'a Plan, leg_idx: usize, now: SimTime) {
        let (Some(PlanElement::Leg(leg)), Some(PlanElement::Activity(to))) =
            (plan.elements.get(leg_idx), plan.elements.get(leg_idx + 1))
        else {
            self.states[agent.index()] = AgentState::Done;
            return;
        };
        let node = node_of(to);
        self.emit(Event::Arrival { time: now, agent, node, mode: leg.mode });
        self.emit(Event::ActivityStart { time: now, agent, node, activity_type: to.activity_type.clone() });

        let act_idx = leg_idx + 1;
        if act_idx + 1 >= plan.elements.len() {
            self.states[agent.index()] = AgentState::Done;
            return;
        }
        self.states[agent.index()] = AgentState::AtActivity(act_idx);
        if let Some(depart) = to.departure_after(now) {
            self.queue.push(depart, agent);
        }
    }

    /// Aborts every agent that has not completed its plan.
    fn abort_unfinished(&mut self) {
        self.queue.clear();
        let mut stuck = 0usize;
        for i in 0..self.states.len() {
            let Some(plan) = self.plans[i] else { continue };
            let (node, mode) = match self.states[i] {
                AgentState::Done => continue,
                AgentState::AtActivity(idx) => match plan.elements.get(idx) {
                    Some(PlanElement::Activity(a)) => (node_of(a), None),
                    _ => (NodeId::INVALID, None),
                },
                AgentState::Travelling(idx) => {
                    let mode = plan.elements.get(idx).and_then(PlanElement::as_leg).map(|l| l.mode);
                    let node = plan.elements.get(idx + 1).and_then(PlanElement::as_activity).map_or(NodeId::INVALID, node_of);
                    (node, mode)
                }
            };
            self.emit(Event::Stuck { time: self.end_time, agent: AgentId(i as u32), node, mode });
            self.states[i] = AgentState::Done;
            stuck += 1;
        }
        if stuck > 0 {
            self.sink.warn(COMPONENT, format!("{stuck} agents stuck at {}", self.end_time));
        }
    }

    // ── Travel times ──────────────────────────────────────────────────────

    fn travel_secs(
        &self,
        agent: AgentId,
        from:  &Activity,
        leg:   &Leg,
        to:    &Activity,
        now:   SimTime,
    ) -> SpatialResult<u32> {
        if let Some(route) = &leg.route {
            return Ok(route.travel_time);
        }
        if leg.mode.is_network_mode() {
            if let (Some(a), Some(b)) = (from.node, to.node) {
                return self
                    .router
                    .calc_least_cost_path(self.scenario.network(), a, b, now, agent, None)
                    .map(|p| p.travel_time);
            }
        }
        Ok(self.teleport_secs(from, leg.mode, to))
    }

    fn teleport_secs(&self, from: &Activity, mode: TransportMode, to: &Activity) -> u32 {
        let distance = match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) => a.beeline_m(b, BEELINE_DISTANCE_FACTOR),
            _ => 0.0,
        };
        (distance / mode.teleport_speed_mps()).ceil() as u32
    }

    fn position(&self, activity: &Activity) -> Option<GeoPoint> {
        activity
            .node
            .and_then(|n| self.scenario.network().node_pos.get(n.index()).copied())
            .or(activity.coord)
    }

    fn emit(&mut self, event: Event) {
        self.events.process_event(event);
    }
}

fn node_of(activity: &Activity) -> NodeId {
    activity.node.unwrap_or(NodeId::INVALID)
}

impl Mobsim for TeleportationMobsim<'_> {
    fn run(&mut self) -> MobsimResult<()> {
        if self.started {
            return Err(MobsimError::AlreadyStarted);
        }
        self.started = true;
        self.initialize();
        for l in &mut self.listeners {
            l.on_initialized();
        }

        let mut steps = 0usize;
        while let Some(now) = self.queue.next_time() {
            if now > self.end_time {
                break;
            }
            for l in &mut self.listeners {
                l.on_before_step(now);
            }
            for agent in self.queue.drain_time(now).unwrap_or_default() {
                self.wake(agent, now);
            }
            for l in &mut self.listeners {
                l.on_after_step(now);
            }
            steps += 1;
        }
        self.abort_unfinished();

        for l in &mut self.listeners {
            l.on_before_cleanup();
        }
        self.sink.info(
            COMPONENT,
            format!(
                "iteration {}: {steps} steps, {} events emitted",
                self.iteration,
                self.events.pending().len()
            ),
        );
        Ok(())
    }

    fn as_observable(&mut self) -> Option<&mut dyn ObservableMobsim> {
        Some(self)
    }
}

impl ObservableMobsim for TeleportationMobsim<'_> {
    fn add_listener(&mut self, listener: Box<dyn MobsimListener>) -> MobsimResult<()> {
        if self.started {
            return Err(MobsimError::AlreadyStarted);
        }
        self.listeners.push(listener);
        Ok(())
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Builds a [`TeleportationMobsim`] per iteration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeleportationMobsimFactory;

impl MobsimFactory for TeleportationMobsimFactory {
    fn create<'a>(&self, ctx: MobsimContext<'a>) -> MobsimResult<Box<dyn Mobsim + 'a>> {
        if ctx.config.mobsim.end_time == 0 {
            return Err(MobsimError::Config("mobsim.end_time must be positive".into()));
        }
        Ok(Box::new(TeleportationMobsim::new(ctx)))
    }
}

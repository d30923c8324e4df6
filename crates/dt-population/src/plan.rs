//! Plan elements: `Activity`, `Leg`, `Route`, and the alternating `Plan`.
//!
//! # Timing
//!
//! An activity ends at its `end_time`, after `max_duration` seconds, or at
//! whichever comes first when both are given.  The last activity of a plan
//! normally has neither and lasts until the end of the simulated day.
//!
//! # Locations
//!
//! An activity may name a node directly, a facility, or only a coordinate.
//! Preparation for simulation resolves facilities and coordinates to nodes,
//! so the mobsim only ever looks at [`Activity::node`].

use dt_core::{EdgeId, FacilityId, GeoPoint, NodeId, SimTime, TransportMode};

// ── Activity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    /// Free-form type label (`home`, `work`, `pt interaction`, …).
    pub activity_type: String,
    pub node:          Option<NodeId>,
    pub facility:      Option<FacilityId>,
    pub coord:         Option<GeoPoint>,
    pub end_time:      Option<SimTime>,
    /// Maximum duration in seconds.
    pub max_duration:  Option<u32>,
}

impl Activity {
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            node:          None,
            facility:      None,
            coord:         None,
            end_time:      None,
            max_duration:  None,
        }
    }

    pub fn at_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    pub fn at_facility(mut self, facility: FacilityId) -> Self {
        self.facility = Some(facility);
        self
    }

    pub fn at_coord(mut self, coord: GeoPoint) -> Self {
        self.coord = Some(coord);
        self
    }

    pub fn with_end_time(mut self, end: SimTime) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_max_duration(mut self, secs: u32) -> Self {
        self.max_duration = Some(secs);
        self
    }

    /// When an activity started at `start` is left, or `None` if it has no
    /// end.  An `end_time` already in the past means leaving immediately.
    pub fn departure_after(&self, start: SimTime) -> Option<SimTime> {
        let by_end      = self.end_time.map(|e| e.max(start));
        let by_duration = self.max_duration.map(|d| start + d);
        match (by_end, by_duration) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

// ── Leg ───────────────────────────────────────────────────────────────────────

/// Network route of a leg.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    /// Links in travel order.  Empty for teleported legs.
    pub links:       Vec<EdgeId>,
    pub distance_m:  f32,
    /// Expected travel time in seconds.
    pub travel_time: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    pub mode:  TransportMode,
    pub route: Option<Route>,
}

impl Leg {
    pub fn new(mode: TransportMode) -> Self {
        Self { mode, route: None }
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    /// Expected travel time in seconds; zero while unrouted.
    pub fn expected_travel_time(&self) -> u32 {
        self.route.as_ref().map_or(0, |r| r.travel_time)
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum PlanElement {
    Activity(Activity),
    Leg(Leg),
}

impl PlanElement {
    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            PlanElement::Activity(a) => Some(a),
            PlanElement::Leg(_) => None,
        }
    }

    pub fn as_leg(&self) -> Option<&Leg> {
        match self {
            PlanElement::Leg(l) => Some(l),
            PlanElement::Activity(_) => None,
        }
    }
}

/// A day plan: activities and legs alternating, plus the score of its last
/// execution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    pub elements: Vec<PlanElement>,
    /// `None` until the plan has been executed and scored once.
    pub score:    Option<f64>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_activity(&mut self, activity: Activity) -> &mut Self {
        self.elements.push(PlanElement::Activity(activity));
        self
    }

    pub fn push_leg(&mut self, leg: Leg) -> &mut Self {
        self.elements.push(PlanElement::Leg(leg));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.elements.iter().filter_map(PlanElement::as_activity)
    }

    pub fn activities_mut(&mut self) -> impl Iterator<Item = &mut Activity> {
        self.elements.iter_mut().filter_map(|e| match e {
            PlanElement::Activity(a) => Some(a),
            PlanElement::Leg(_) => None,
        })
    }

    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        self.elements.iter().filter_map(PlanElement::as_leg)
    }

    pub fn first_activity(&self) -> Option<&Activity> {
        self.elements.first().and_then(PlanElement::as_activity)
    }

    pub fn last_activity(&self) -> Option<&Activity> {
        self.elements.last().and_then(PlanElement::as_activity)
    }

    /// Checks the activity/leg alternation.
    pub fn validate(&self) -> Result<(), String> {
        if self.elements.is_empty() {
            return Err("plan is empty".into());
        }
        for (i, e) in self.elements.iter().enumerate() {
            let expect_activity = i % 2 == 0;
            match (expect_activity, e) {
                (true, PlanElement::Leg(_)) => {
                    return Err(format!("element {i} is a leg, expected an activity"));
                }
                (false, PlanElement::Activity(_)) => {
                    return Err(format!("element {i} is an activity, expected a leg"));
                }
                _ => {}
            }
        }
        if self.elements.len() % 2 == 0 {
            return Err("plan ends with a leg".into());
        }
        Ok(())
    }

    /// Drops every stored route.
    pub fn clear_routes(&mut self) {
        for e in &mut self.elements {
            if let PlanElement::Leg(leg) = e {
                leg.route = None;
            }
        }
    }

    /// Visits each leg with its origin and destination activity and the
    /// planned departure time, which is derived by walking the plan from
    /// midnight with the expected travel times stored so far.
    ///
    /// Stops at the first error.
    pub fn try_for_each_trip_mut<E>(
        &mut self,
        mut f: impl FnMut(SimTime, &Activity, &mut Leg, &Activity) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut clock = SimTime::ZERO;
        for i in 1..self.elements.len().saturating_sub(1) {
            let (head, tail) = self.elements.split_at_mut(i);
            let (mid, rest) = tail.split_at_mut(1);
            let (Some(PlanElement::Activity(from)), PlanElement::Leg(leg), Some(PlanElement::Activity(to))) =
                (head.last(), &mut mid[0], rest.first())
            else {
                continue;
            };
            clock = from.departure_after(clock).unwrap_or(clock);
            f(clock, from, leg, to)?;
            clock = clock + leg.expected_travel_time();
        }
        Ok(())
    }
}

//! Optional scenario containers and their presence/creation policy.
//!
//! Households, vehicles and the transit schedule are only needed by some
//! runs.  Each lives in an [`OptionalContainer`] that is either absent or
//! present; once present, the instance is never replaced.

use std::fmt;

use dt_core::{AgentId, GeoPoint, HouseholdId, NodeId, SimTime, TransitLineId, TransitStopId, VehicleId};

// ── Presence and policy ───────────────────────────────────────────────────────

/// The optional container kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionalKind {
    Households,
    Vehicles,
    TransitSchedule,
}

impl OptionalKind {
    pub const ALL: [OptionalKind; 3] =
        [OptionalKind::Households, OptionalKind::Vehicles, OptionalKind::TransitSchedule];

    /// Configuration switch that governs this kind.
    pub fn config_flag(self) -> &'static str {
        match self {
            OptionalKind::Households      => "scenario.use_households",
            OptionalKind::Vehicles        => "scenario.use_vehicles",
            OptionalKind::TransitSchedule => "transit.use_transit",
        }
    }
}

impl fmt::Display for OptionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OptionalKind::Households      => "households",
            OptionalKind::Vehicles        => "vehicles",
            OptionalKind::TransitSchedule => "transit schedule",
        })
    }
}

/// Either no container yet, or the one stable instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OptionalContainer<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> OptionalContainer<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, OptionalContainer::Present(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            OptionalContainer::Present(t) => Some(t),
            OptionalContainer::Absent => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            OptionalContainer::Present(t) => Some(t),
            OptionalContainer::Absent => None,
        }
    }
}

/// Whether the non-creating accessor may create an absent container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContainerPolicy {
    /// The configuration flag is set: accessors create on demand.
    AutoCreateIfFlagSet,
    /// The flag is not set: accessors warn and report absence.
    NeverAutoCreate,
}

impl ContainerPolicy {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            ContainerPolicy::AutoCreateIfFlagSet
        } else {
            ContainerPolicy::NeverAutoCreate
        }
    }
}

// ── Households ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Household {
    pub id:      HouseholdId,
    pub label:   String,
    pub members: Vec<AgentId>,
    /// Monthly income, if known.
    pub income:  Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Households {
    households: Vec<Household>,
}

impl Households {
    pub fn add(&mut self, label: impl Into<String>, members: Vec<AgentId>) -> HouseholdId {
        let id = HouseholdId(self.households.len() as u32);
        self.households.push(Household { id, label: label.into(), members, income: None });
        id
    }

    pub fn get(&self, id: HouseholdId) -> Option<&Household> {
        self.households.get(id.index())
    }

    pub fn get_mut(&mut self, id: HouseholdId) -> Option<&mut Household> {
        self.households.get_mut(id.index())
    }

    /// Household that `agent` belongs to.
    pub fn of_member(&self, agent: AgentId) -> Option<&Household> {
        self.households.iter().find(|h| h.members.contains(&agent))
    }

    pub fn len(&self) -> usize {
        self.households.len()
    }

    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }
}

// ── Vehicles ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleType {
    pub name:          String,
    pub max_speed_mps: f32,
    pub seats:         u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id:           VehicleId,
    pub label:        String,
    /// Index into [`Vehicles::vehicle_types`].
    pub vehicle_type: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vehicles {
    pub vehicle_types: Vec<VehicleType>,
    vehicles:          Vec<Vehicle>,
}

impl Vehicles {
    pub fn add_type(&mut self, vehicle_type: VehicleType) -> usize {
        self.vehicle_types.push(vehicle_type);
        self.vehicle_types.len() - 1
    }

    /// Adds a vehicle of a registered type; `None` for an unknown type.
    pub fn add(&mut self, label: impl Into<String>, vehicle_type: usize) -> Option<VehicleId> {
        if vehicle_type >= self.vehicle_types.len() {
            return None;
        }
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle { id, label: label.into(), vehicle_type });
        Some(id)
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn type_of(&self, id: VehicleId) -> Option<&VehicleType> {
        self.get(id).and_then(|v| self.vehicle_types.get(v.vehicle_type))
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

// ── Transit schedule ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TransitStop {
    pub id:    TransitStopId,
    pub label: String,
    pub coord: GeoPoint,
    pub node:  Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitLine {
    pub id:         TransitLineId,
    pub label:      String,
    /// Served stops in order.
    pub stops:      Vec<TransitStopId>,
    /// Departure times from the first stop.
    pub departures: Vec<SimTime>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitSchedule {
    stops: Vec<TransitStop>,
    lines: Vec<TransitLine>,
}

impl TransitSchedule {
    pub fn add_stop(&mut self, label: impl Into<String>, coord: GeoPoint, node: Option<NodeId>) -> TransitStopId {
        let id = TransitStopId(self.stops.len() as u32);
        self.stops.push(TransitStop { id, label: label.into(), coord, node });
        id
    }

    /// Adds a line.  Returns `None` if it references an unknown stop.
    pub fn add_line(
        &mut self,
        label: impl Into<String>,
        stops: Vec<TransitStopId>,
        mut departures: Vec<SimTime>,
    ) -> Option<TransitLineId> {
        if stops.iter().any(|s| s.index() >= self.stops.len()) {
            return None;
        }
        departures.sort_unstable();
        let id = TransitLineId(self.lines.len() as u32);
        self.lines.push(TransitLine { id, label: label.into(), stops, departures });
        Some(id)
    }

    pub fn stop(&self, id: TransitStopId) -> Option<&TransitStop> {
        self.stops.get(id.index())
    }

    pub fn line(&self, id: TransitLineId) -> Option<&TransitLine> {
        self.lines.get(id.index())
    }

    pub fn stops(&self) -> &[TransitStop] {
        &self.stops
    }

    pub fn lines(&self) -> &[TransitLine] {
        &self.lines
    }
}

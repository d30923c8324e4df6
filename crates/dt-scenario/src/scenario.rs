//! The `Scenario` aggregate.
//!
//! # Lifecycle
//!
//! ```text
//! new / from_config ─► free mutation during setup ─► lock() ─► iterations
//! ```
//!
//! After [`Scenario::lock`], replacing the network, population or facilities
//! and removing registry elements fail with [`ScenarioError::StateLocked`].
//! Mutation through the sub-models' own APIs (`population_mut()` to update a
//! plan, for example) stays available; that is how scoring and replanning
//! work during iterations.
//!
//! Adding registry elements is allowed after the lock.  Extensions routinely
//! attach per-run state from their startup hooks, which run right before the
//! lock, and nothing in the core depends on the registry being frozen.

use std::any::Any;
use std::collections::HashMap;

use dt_config::Config;
use dt_core::{Sink, SinkExt};
use dt_population::{ActivityFacilities, Population};
use dt_spatial::RoadNetwork;

use crate::containers::{
    ContainerPolicy, Households, OptionalContainer, OptionalKind, TransitSchedule, Vehicles,
};
use crate::{ScenarioError, ScenarioResult};

const COMPONENT: &str = "scenario";

/// Owned value stored in the element registry.
pub type Element = Box<dyn Any + Send + Sync>;

// ── Flags ─────────────────────────────────────────────────────────────────────

/// Configuration switches for the optional containers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScenarioFlags {
    pub use_households: bool,
    pub use_vehicles:   bool,
    pub use_transit:    bool,
}

impl ScenarioFlags {
    pub fn from_config(config: &Config) -> Self {
        Self {
            use_households: config.scenario.use_households,
            use_vehicles:   config.scenario.use_vehicles,
            use_transit:    config.transit.use_transit,
        }
    }
}

// ── Optional slot ─────────────────────────────────────────────────────────────

struct Slot<T> {
    kind:      OptionalKind,
    policy:    ContainerPolicy,
    container: OptionalContainer<T>,
}

impl<T: Default> Slot<T> {
    fn new(kind: OptionalKind, enabled: bool) -> Self {
        let container = if enabled {
            OptionalContainer::Present(T::default())
        } else {
            OptionalContainer::Absent
        };
        Self { kind, policy: ContainerPolicy::from_flag(enabled), container }
    }

    /// Explicit creation: always creates when absent, warning if the flag is
    /// off.
    fn create(&mut self, sink: &Sink) -> bool {
        if self.container.is_present() {
            return false;
        }
        if self.policy == ContainerPolicy::NeverAutoCreate {
            sink.warn(
                COMPONENT,
                format!(
                    "creating {} container although {} is disabled",
                    self.kind,
                    self.kind.config_flag()
                ),
            );
        }
        self.container = OptionalContainer::Present(T::default());
        true
    }

    /// Flag-driven access: creates only under `AutoCreateIfFlagSet`.
    fn get_or_create(&mut self, sink: &Sink) -> Option<&mut T> {
        if !self.container.is_present() {
            match self.policy {
                ContainerPolicy::AutoCreateIfFlagSet => {
                    self.container = OptionalContainer::Present(T::default());
                }
                ContainerPolicy::NeverAutoCreate => {
                    sink.warn(
                        COMPONENT,
                        format!(
                            "{} requested but {} is disabled; no container is returned",
                            self.kind,
                            self.kind.config_flag()
                        ),
                    );
                    return None;
                }
            }
        }
        self.container.as_mut()
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// All simulation input and state shared by the controller's components.
pub struct Scenario {
    network:          RoadNetwork,
    population:       Population,
    facilities:       ActivityFacilities,
    households:       Slot<Households>,
    vehicles:         Slot<Vehicles>,
    transit_schedule: Slot<TransitSchedule>,
    elements:         HashMap<String, Element>,
    locked:           bool,
    sink:             Sink,
}

impl Scenario {
    /// Empty required sub-models; optional containers whose flag is set are
    /// created right away.
    pub fn new(flags: ScenarioFlags, sink: Sink) -> Self {
        Self {
            network:          RoadNetwork::empty(),
            population:       Population::new(),
            facilities:       ActivityFacilities::new(),
            households:       Slot::new(OptionalKind::Households, flags.use_households),
            vehicles:         Slot::new(OptionalKind::Vehicles, flags.use_vehicles),
            transit_schedule: Slot::new(OptionalKind::TransitSchedule, flags.use_transit),
            elements:         HashMap::new(),
            locked:           false,
            sink,
        }
    }

    pub fn from_config(config: &Config, sink: Sink) -> Self {
        Self::new(ScenarioFlags::from_config(config), sink)
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    // ── Required sub-models ───────────────────────────────────────────────

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut RoadNetwork {
        &mut self.network
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    pub fn facilities(&self) -> &ActivityFacilities {
        &self.facilities
    }

    pub fn facilities_mut(&mut self) -> &mut ActivityFacilities {
        &mut self.facilities
    }

    /// Disjoint borrows for steps that read the network and facilities while
    /// updating plans.
    pub fn split_mut(&mut self) -> (&RoadNetwork, &ActivityFacilities, &mut Population) {
        (&self.network, &self.facilities, &mut self.population)
    }

    pub fn set_network(&mut self, network: RoadNetwork) -> ScenarioResult<()> {
        self.ensure_unlocked("replace the network")?;
        self.network = network;
        Ok(())
    }

    pub fn set_population(&mut self, population: Population) -> ScenarioResult<()> {
        self.ensure_unlocked("replace the population")?;
        self.population = population;
        Ok(())
    }

    pub fn set_facilities(&mut self, facilities: ActivityFacilities) -> ScenarioResult<()> {
        self.ensure_unlocked("replace the facilities")?;
        self.facilities = facilities;
        Ok(())
    }

    // ── Optional containers ───────────────────────────────────────────────

    /// Creates the container of `kind` if absent.
    ///
    /// Returns `true` if a container was created and `false` if one already
    /// existed.  Works even when the kind's configuration flag is off, after
    /// logging a warning.
    pub fn create_optional(&mut self, kind: OptionalKind) -> bool {
        match kind {
            OptionalKind::Households      => self.households.create(&self.sink),
            OptionalKind::Vehicles        => self.vehicles.create(&self.sink),
            OptionalKind::TransitSchedule => self.transit_schedule.create(&self.sink),
        }
    }

    pub fn create_households_container(&mut self) -> bool {
        self.create_optional(OptionalKind::Households)
    }

    pub fn create_vehicle_container(&mut self) -> bool {
        self.create_optional(OptionalKind::Vehicles)
    }

    pub fn create_transit_schedule(&mut self) -> bool {
        self.create_optional(OptionalKind::TransitSchedule)
    }

    /// Households, created on first access when `scenario.use_households`
    /// is set.  With the flag off and no container, warns and returns `None`.
    pub fn households(&mut self) -> Option<&mut Households> {
        self.households.get_or_create(&self.sink)
    }

    /// See [`households`](Self::households); governed by `scenario.use_vehicles`.
    pub fn vehicles(&mut self) -> Option<&mut Vehicles> {
        self.vehicles.get_or_create(&self.sink)
    }

    /// See [`households`](Self::households); governed by `transit.use_transit`.
    pub fn transit_schedule(&mut self) -> Option<&mut TransitSchedule> {
        self.transit_schedule.get_or_create(&self.sink)
    }

    pub fn try_households(&self) -> Option<&Households> {
        self.households.container.as_ref()
    }

    pub fn try_vehicles(&self) -> Option<&Vehicles> {
        self.vehicles.container.as_ref()
    }

    pub fn try_transit_schedule(&self) -> Option<&TransitSchedule> {
        self.transit_schedule.container.as_ref()
    }

    pub fn is_present(&self, kind: OptionalKind) -> bool {
        match kind {
            OptionalKind::Households      => self.households.container.is_present(),
            OptionalKind::Vehicles        => self.vehicles.container.is_present(),
            OptionalKind::TransitSchedule => self.transit_schedule.container.is_present(),
        }
    }

    pub fn policy(&self, kind: OptionalKind) -> ContainerPolicy {
        match kind {
            OptionalKind::Households      => self.households.policy,
            OptionalKind::Vehicles        => self.vehicles.policy,
            OptionalKind::TransitSchedule => self.transit_schedule.policy,
        }
    }

    // ── Element registry ──────────────────────────────────────────────────

    /// Binds `value` under `name`.  Allowed before and after the lock.
    pub fn add_element<T: Any + Send + Sync>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> ScenarioResult<()> {
        self.insert_element(name, Some(Box::new(value)))
    }

    /// Binds an already boxed value.  `None` is rejected with
    /// [`ScenarioError::NullElement`]; an existing binding is kept and the
    /// call fails with [`ScenarioError::DuplicateElement`].
    pub fn insert_element(
        &mut self,
        name: impl Into<String>,
        value: Option<Element>,
    ) -> ScenarioResult<()> {
        let name = name.into();
        let Some(value) = value else {
            return Err(ScenarioError::NullElement(name));
        };
        if self.elements.contains_key(&name) {
            return Err(ScenarioError::DuplicateElement(name));
        }
        self.elements.insert(name, value);
        Ok(())
    }

    /// The element bound to `name`, if it exists and has type `T`.
    pub fn element<T: Any>(&self, name: &str) -> Option<&T> {
        self.elements.get(name).and_then(|e| e.downcast_ref::<T>())
    }

    pub fn element_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.elements.get_mut(name).and_then(|e| e.downcast_mut::<T>())
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Unbinds `name` and returns its value.  Fails once locked.
    pub fn remove_element(&mut self, name: &str) -> ScenarioResult<Option<Element>> {
        self.ensure_unlocked("remove a scenario element")?;
        Ok(self.elements.remove(name))
    }

    // ── Lock ──────────────────────────────────────────────────────────────

    /// Freezes the structure.  One-way; repeated calls are no-ops.
    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
            self.sink.info(
                COMPONENT,
                format!(
                    "scenario locked: {} persons, {} nodes, {} links, {} facilities",
                    self.population.len(),
                    self.network.node_count(),
                    self.network.link_count(),
                    self.facilities.len()
                ),
            );
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self, operation: &'static str) -> ScenarioResult<()> {
        if self.locked {
            Err(ScenarioError::StateLocked { operation })
        } else {
            Ok(())
        }
    }
}

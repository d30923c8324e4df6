//! Unit tests for dt-scenario.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use dt_core::{MemorySink, Sink};
    use crate::{Scenario, ScenarioFlags};

    pub fn scenario(flags: ScenarioFlags) -> (Scenario, Arc<MemorySink>) {
        let memory = MemorySink::new();
        let sink: Sink = memory.clone();
        (Scenario::new(flags, sink), memory)
    }
}

// ── Optional containers ───────────────────────────────────────────────────────

#[cfg(test)]
mod optional {
    use dt_core::AgentId;
    use crate::{ContainerPolicy, OptionalKind, ScenarioFlags};

    use super::helpers::scenario;

    #[test]
    fn create_twice_returns_true_then_false_with_stable_instance() {
        for kind in OptionalKind::ALL {
            let (mut s, _) = scenario(ScenarioFlags::default());
            assert!(s.create_optional(kind), "{kind}");
            let first = match kind {
                OptionalKind::Households      => s.try_households().map(|h| h as *const _ as usize),
                OptionalKind::Vehicles        => s.try_vehicles().map(|v| v as *const _ as usize),
                OptionalKind::TransitSchedule => s.try_transit_schedule().map(|t| t as *const _ as usize),
            };
            assert!(!s.create_optional(kind), "{kind}");
            let second = match kind {
                OptionalKind::Households      => s.try_households().map(|h| h as *const _ as usize),
                OptionalKind::Vehicles        => s.try_vehicles().map(|v| v as *const _ as usize),
                OptionalKind::TransitSchedule => s.try_transit_schedule().map(|t| t as *const _ as usize),
            };
            assert!(first.is_some());
            assert_eq!(first, second, "{kind}");
        }
    }

    #[test]
    fn second_create_keeps_contents() {
        let (mut s, _) = scenario(ScenarioFlags { use_households: true, ..Default::default() });
        assert!(!s.create_households_container(), "flag on creates eagerly");
        s.households().unwrap().add("h1", vec![AgentId(0)]);
        assert!(!s.create_households_container());
        assert_eq!(s.try_households().unwrap().len(), 1);
    }

    #[test]
    fn explicit_create_with_flag_off_warns_but_creates() {
        let (mut s, memory) = scenario(ScenarioFlags::default());
        assert_eq!(s.policy(OptionalKind::Vehicles), ContainerPolicy::NeverAutoCreate);
        assert!(s.create_vehicle_container());
        assert!(s.is_present(OptionalKind::Vehicles));
        assert!(memory.has_warning("scenario.use_vehicles is disabled"));
        // Present now, so the accessor returns it without another warning.
        let before = memory.warnings().len();
        assert!(s.vehicles().is_some());
        assert_eq!(memory.warnings().len(), before);
    }

    #[test]
    fn accessor_with_flag_off_warns_and_returns_none() {
        let (mut s, memory) = scenario(ScenarioFlags::default());
        assert!(s.households().is_none());
        assert!(s.transit_schedule().is_none());
        assert!(!s.is_present(OptionalKind::Households));
        assert!(memory.has_warning("households requested"));
        assert!(memory.has_warning("transit.use_transit"));
    }

    #[test]
    fn accessor_with_flag_on_is_present_without_warning() {
        let flags = ScenarioFlags { use_households: true, use_vehicles: true, use_transit: true };
        let (mut s, memory) = scenario(flags);
        for kind in OptionalKind::ALL {
            assert!(s.is_present(kind));
            assert_eq!(s.policy(kind), ContainerPolicy::AutoCreateIfFlagSet);
        }
        assert!(s.households().is_some());
        assert!(s.vehicles().is_some());
        assert!(s.transit_schedule().is_some());
        assert!(memory.warnings().is_empty());
    }

    #[test]
    fn from_config_reads_flags() {
        let mut config = dt_config::Config::default();
        config.transit.use_transit = true;
        let s = crate::Scenario::from_config(&config, dt_core::NoopSink::shared());
        assert!(s.is_present(OptionalKind::TransitSchedule));
        assert!(!s.is_present(OptionalKind::Households));
    }
}

// ── Element registry ──────────────────────────────────────────────────────────

#[cfg(test)]
mod elements {
    use crate::{Element, ScenarioError, ScenarioFlags};

    use super::helpers::scenario;

    #[test]
    fn duplicate_keeps_first_value() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        s.add_element("x", 1_u32).unwrap();
        let err = s.add_element("x", 2_u32).unwrap_err();
        assert!(matches!(err, ScenarioError::DuplicateElement(ref n) if n == "x"));
        assert_eq!(s.element::<u32>("x"), Some(&1));
    }

    #[test]
    fn null_value_is_rejected() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        let err = s.insert_element("empty", None).unwrap_err();
        assert!(matches!(err, ScenarioError::NullElement(ref n) if n == "empty"));
        assert!(!s.has_element("empty"));
    }

    #[test]
    fn typed_lookup() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        let boxed: Element = Box::new(String::from("tolls"));
        s.insert_element("road-pricing", Some(boxed)).unwrap();
        assert_eq!(s.element::<String>("road-pricing").map(String::as_str), Some("tolls"));
        assert!(s.element::<u32>("road-pricing").is_none());
        assert!(s.element::<String>("missing").is_none());

        s.element_mut::<String>("road-pricing").unwrap().push('!');
        assert_eq!(s.element::<String>("road-pricing").unwrap(), "tolls!");
    }

    #[test]
    fn remove_before_lock() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        s.add_element("x", 5_i64).unwrap();
        let removed = s.remove_element("x").unwrap().unwrap();
        assert_eq!(removed.downcast_ref::<i64>(), Some(&5));
        assert!(s.remove_element("x").unwrap().is_none());
        // Name is free again.
        s.add_element("x", 6_i64).unwrap();
    }
}

// ── Lock ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lock {
    use dt_population::{ActivityFacilities, Population};
    use dt_spatial::RoadNetwork;
    use crate::{ScenarioError, ScenarioFlags};

    use super::helpers::scenario;

    #[test]
    fn replacement_before_lock_succeeds() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        s.set_network(RoadNetwork::empty()).unwrap();
        s.set_population(Population::new()).unwrap();
        s.set_facilities(ActivityFacilities::new()).unwrap();
    }

    #[test]
    fn replacement_after_lock_fails() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        s.lock();
        assert!(s.is_locked());
        assert!(matches!(
            s.set_network(RoadNetwork::empty()),
            Err(ScenarioError::StateLocked { .. })
        ));
        assert!(matches!(
            s.set_population(Population::new()),
            Err(ScenarioError::StateLocked { .. })
        ));
        assert!(matches!(
            s.set_facilities(ActivityFacilities::new()),
            Err(ScenarioError::StateLocked { .. })
        ));
    }

    #[test]
    fn add_element_is_lock_exempt_but_remove_is_not() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        s.add_element("before", 1_u8).unwrap();
        s.lock();
        s.add_element("after", 2_u8).unwrap();
        assert_eq!(s.element::<u8>("after"), Some(&2));
        assert!(matches!(
            s.remove_element("before"),
            Err(ScenarioError::StateLocked { .. })
        ));
        assert!(s.has_element("before"));
    }

    #[test]
    fn lock_is_idempotent() {
        let (mut s, memory) = scenario(ScenarioFlags::default());
        s.lock();
        s.lock();
        assert!(s.is_locked());
        let locked_msgs = memory
            .entries()
            .iter()
            .filter(|d| d.message.starts_with("scenario locked"))
            .count();
        assert_eq!(locked_msgs, 1);
    }

    #[test]
    fn sub_model_mutation_stays_available_after_lock() {
        let (mut s, _) = scenario(ScenarioFlags::default());
        s.lock();
        s.population_mut().add_person("late", dt_population::Plan::new());
        assert_eq!(s.population().len(), 1);
    }
}

// ── Containers ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod containers {
    use dt_core::{AgentId, GeoPoint, SimTime, TransitStopId};
    use crate::{Households, TransitSchedule, VehicleType, Vehicles};

    #[test]
    fn household_membership() {
        let mut h = Households::default();
        let id = h.add("h1", vec![AgentId(0), AgentId(3)]);
        assert_eq!(h.of_member(AgentId(3)).map(|x| x.id), Some(id));
        assert!(h.of_member(AgentId(1)).is_none());
    }

    #[test]
    fn vehicle_needs_known_type() {
        let mut v = Vehicles::default();
        assert!(v.add("car1", 0).is_none());
        let t = v.add_type(VehicleType { name: "car".into(), max_speed_mps: 38.9, seats: 5 });
        let id = v.add("car1", t).unwrap();
        assert_eq!(v.type_of(id).unwrap().seats, 5);
    }

    #[test]
    fn transit_line_references_stops() {
        let mut ts = TransitSchedule::default();
        let a = ts.add_stop("A", GeoPoint::new(0.0, 0.0), None);
        let b = ts.add_stop("B", GeoPoint::new(0.0, 0.1), None);
        assert!(ts.add_line("bad", vec![a, TransitStopId(9)], vec![]).is_none());
        let line = ts
            .add_line("1", vec![a, b], vec![SimTime::from_hms(8, 0, 0), SimTime::from_hms(7, 0, 0)])
            .unwrap();
        assert_eq!(ts.line(line).unwrap().departures[0], SimTime::from_hms(7, 0, 0));
        assert_eq!(ts.stops().len(), 2);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use dt_config::Config;
    use dt_core::{MemorySink, NoopSink, Sink};
    use crate::{load_network_reader, ScenarioError, ScenarioLoader};

    const NODES: &str = "id,lat,lon\nn1,47.37,8.54\nn2,47.38,8.55\nn3,47.39,8.56\n";
    const LINKS: &str = "\
from,to,length_m,freespeed_mps
n1,n2,1500,13.9
n2,n1,1500,13.9
n2,n3,800,8.3
n3,n2,800,8.3
";

    #[test]
    fn network_from_readers() {
        let (net, index) = load_network_reader(Cursor::new(NODES), Cursor::new(LINKS)).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.link_count(), 4);
        let (n1, n2) = (index.get("n1").unwrap(), index.get("n2").unwrap());
        assert!(net.link_between(n1, n2).is_some());
    }

    #[test]
    fn unknown_link_endpoint_fails() {
        let links = "from,to,length_m,freespeed_mps\nn1,n9,10,1\n";
        assert!(matches!(
            load_network_reader(Cursor::new(NODES), Cursor::new(links)),
            Err(ScenarioError::Network(_))
        ));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nodes.csv"), NODES).unwrap();
        std::fs::write(dir.path().join("links.csv"), LINKS).unwrap();
        std::fs::write(
            dir.path().join("plans.csv"),
            "person,activity_type,mode,node,end_time\n\
             a,home,,n1,07:00\n\
             a,,car,,\n\
             a,work,,n3,\n\
             b,home,,n2,\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("households.csv"), "id,members\nh1,a;b;ghost\n").unwrap();

        let mut config = Config::default();
        config.scenario.use_households = true;
        let memory = MemorySink::new();
        let sink: Sink = memory.clone();
        let mut scenario = ScenarioLoader::new(dir.path()).load(&config, sink).unwrap();

        assert!(!scenario.is_locked());
        assert_eq!(scenario.population().len(), 2);
        assert_eq!(scenario.households().unwrap().get(dt_core::HouseholdId(0)).unwrap().members.len(), 2);
        assert!(memory.has_warning("facilities.csv"));
        assert!(memory.has_warning("ghost"));
    }

    #[test]
    fn missing_required_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioLoader::new(dir.path())
            .load(&Config::default(), NoopSink::shared())
            .err()
            .unwrap();
        assert!(matches!(err, ScenarioError::MissingInput(_)));
    }
}

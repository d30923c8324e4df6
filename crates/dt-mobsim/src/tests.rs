//! Unit tests for dt-mobsim.

#[cfg(test)]
mod helpers {
    use std::sync::{Arc, Mutex};

    use dt_config::Config;
    use dt_core::{GeoPoint, MemorySink, NodeId, NoopSink, Sink, SimTime, TransportMode};
    use dt_events::EventsManager;
    use dt_population::{Activity, Leg, Plan, Population};
    use dt_scenario::{Scenario, ScenarioFlags};
    use dt_spatial::{Dijkstra, RoadNetworkBuilder};

    use crate::{MobsimContext, MobsimListener, TeleportationMobsim};

    /// Straight road 0-1-2-4 of 10 s links plus a detour 0-3-4, and node 5
    /// with no links at all.
    pub fn scenario(plans: Vec<Plan>) -> Scenario {
        let mut b = RoadNetworkBuilder::new();
        let n: Vec<NodeId> = [(0.0, 0.0), (0.0, 0.01), (0.0, 0.02), (0.01, 0.0), (0.01, 0.02), (0.5, 0.5)]
            .into_iter()
            .map(|(lat, lon)| b.add_node(GeoPoint::new(lat, lon)))
            .collect();
        b.add_road(n[0], n[1], 100.0, 10.0);
        b.add_road(n[1], n[2], 100.0, 10.0);
        b.add_road(n[2], n[4], 100.0, 10.0);
        b.add_road(n[0], n[3], 500.0, 10.0);
        b.add_road(n[3], n[4], 100.0, 10.0);

        let mut population = Population::new();
        for (i, plan) in plans.into_iter().enumerate() {
            population.add_person(format!("p{i}"), plan);
        }

        let mut s = Scenario::new(ScenarioFlags::default(), NoopSink::shared());
        s.set_network(b.build()).unwrap();
        s.set_population(population).unwrap();
        s
    }

    pub fn commute(mode: TransportMode, work: NodeId) -> Plan {
        let mut plan = Plan::new();
        plan.push_activity(Activity::new("home").at_node(NodeId(0)).with_end_time(SimTime::from_hms(7, 0, 0)))
            .push_leg(Leg::new(mode))
            .push_activity(Activity::new("work").at_node(work).with_max_duration(8 * 3_600))
            .push_leg(Leg::new(mode))
            .push_activity(Activity::new("home").at_node(NodeId(0)));
        plan
    }

    pub fn run_with(
        scenario:  &Scenario,
        config:    &Config,
        listeners: Vec<Box<dyn MobsimListener>>,
    ) -> (EventsManager, Arc<MemorySink>) {
        use crate::{Mobsim, ObservableMobsim};

        let memory = MemorySink::new();
        let sink: Sink = memory.clone();
        let router = Dijkstra::new();
        let mut events = EventsManager::new();
        {
            let mut sim = TeleportationMobsim::new(MobsimContext {
                scenario,
                events: &mut events,
                config,
                router: &router,
                iteration: 0,
                sink,
            });
            for l in listeners {
                sim.add_listener(l).unwrap();
            }
            sim.run().unwrap();
        }
        (events, memory)
    }

    pub fn run(scenario: &Scenario) -> (EventsManager, Arc<MemorySink>) {
        run_with(scenario, &Config::default(), Vec::new())
    }

    /// Records hook calls as strings.
    pub struct Recorder(pub Arc<Mutex<Vec<String>>>);

    impl MobsimListener for Recorder {
        fn on_initialized(&mut self) {
            self.0.lock().unwrap().push("init".into());
        }
        fn on_before_step(&mut self, time: SimTime) {
            self.0.lock().unwrap().push(format!("before {time}"));
        }
        fn on_after_step(&mut self, time: SimTime) {
            self.0.lock().unwrap().push(format!("after {time}"));
        }
        fn on_before_cleanup(&mut self) {
            self.0.lock().unwrap().push("cleanup".into());
        }
    }
}

// ── WakeQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wake_queue {
    use dt_core::{AgentId, SimTime};
    use crate::WakeQueue;

    #[test]
    fn drains_in_time_order_with_sorted_agents() {
        let mut q = WakeQueue::new();
        q.push(SimTime(20), AgentId(1));
        q.push(SimTime(10), AgentId(7));
        q.push(SimTime(10), AgentId(3));
        assert_eq!(q.len(), 3);
        assert_eq!(q.time_count(), 2);
        assert_eq!(q.next_time(), Some(SimTime(10)));

        assert_eq!(q.drain_time(SimTime(10)), Some(vec![AgentId(3), AgentId(7)]));
        assert_eq!(q.drain_time(SimTime(10)), None);
        assert_eq!(q.next_time(), Some(SimTime(20)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn clear_returns_leftovers() {
        let mut q = WakeQueue::new();
        q.push(SimTime(5), AgentId(0));
        q.push(SimTime(9), AgentId(1));
        let mut left = q.clear();
        left.sort();
        assert_eq!(left, vec![AgentId(0), AgentId(1)]);
        assert!(q.is_empty());
        assert_eq!(q.next_time(), None);
    }
}

// ── TeleportationMobsim ───────────────────────────────────────────────────────

#[cfg(test)]
mod teleport {
    use std::sync::{Arc, Mutex};

    use dt_config::Config;
    use dt_core::{AgentId, NodeId, SimTime, TransportMode};
    use dt_events::Event;

    use super::helpers::{commute, run, run_with, scenario, Recorder};

    fn t(h: u32, m: u32, s: u32) -> SimTime {
        SimTime::from_hms(h, m, s)
    }

    #[test]
    fn car_commute_follows_least_cost_path() {
        let s = scenario(vec![commute(TransportMode::Car, NodeId(4))]);
        let (events, memory) = run(&s);

        let kinds: Vec<_> = events.pending().iter().map(|e| (e.time(), e.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                (t(7, 0, 0), "actend"),
                (t(7, 0, 0), "departure"),
                (t(7, 0, 30), "arrival"),
                (t(7, 0, 30), "actstart"),
                (t(15, 0, 30), "actend"),
                (t(15, 0, 30), "departure"),
                (t(15, 1, 0), "arrival"),
                (t(15, 1, 0), "actstart"),
            ]
        );
        assert_eq!(events.pending()[3].node(), NodeId(4));
        assert!(memory.warnings().is_empty());
    }

    #[test]
    fn stored_route_wins_over_routing() {
        let mut plan = commute(TransportMode::Car, NodeId(4));
        plan.try_for_each_trip_mut(|_, _, leg, _| {
            leg.route = Some(dt_population::Route { links: vec![], distance_m: 0.0, travel_time: 600 });
            Ok::<(), ()>(())
        })
        .unwrap();
        let s = scenario(vec![plan]);
        let (events, _) = run(&s);
        assert_eq!(events.pending()[2].time(), t(7, 10, 0));
    }

    #[test]
    fn walk_is_teleported_on_the_beeline() {
        let s = scenario(vec![commute(TransportMode::Walk, NodeId(1))]);
        let (events, _) = run(&s);

        let net = s.network();
        let distance = net.node_pos[0].beeline_m(net.node_pos[1], crate::teleport::BEELINE_DISTANCE_FACTOR);
        let secs = (distance / TransportMode::Walk.teleport_speed_mps()).ceil() as u32;
        assert_eq!(events.pending()[2].time(), t(7, 0, 0) + secs);
    }

    #[test]
    fn unfinished_agents_are_stuck_at_end_time() {
        let s = scenario(vec![commute(TransportMode::Car, NodeId(4))]);
        let mut config = Config::default();
        config.mobsim.end_time = t(8, 0, 0).seconds();
        let (events, memory) = run_with(&s, &config, Vec::new());

        let last = events.pending().last().unwrap();
        assert_eq!(
            *last,
            Event::Stuck { time: t(8, 0, 0), agent: AgentId(0), node: NodeId(4), mode: None }
        );
        assert!(memory.has_warning("1 agents stuck"));
    }

    #[test]
    fn unroutable_leg_aborts_agent() {
        let s = scenario(vec![commute(TransportMode::Car, NodeId(5))]);
        let (events, memory) = run(&s);

        let kinds: Vec<_> = events.pending().iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["actend", "departure", "stuck"]);
        assert!(memory.has_warning("cannot travel by car"));
    }

    #[test]
    fn single_activity_plan_emits_nothing() {
        let mut plan = dt_population::Plan::new();
        plan.push_activity(dt_population::Activity::new("home").at_node(NodeId(0)));
        let s = scenario(vec![plan]);
        let (events, _) = run(&s);
        assert!(events.pending().is_empty());
    }

    #[test]
    fn listener_hooks_wrap_every_step() {
        let s = scenario(vec![commute(TransportMode::Car, NodeId(4))]);
        let log = Arc::new(Mutex::new(Vec::new()));
        run_with(&s, &Config::default(), vec![Box::new(Recorder(log.clone()))]);

        let log = log.lock().unwrap();
        assert_eq!(log.first().map(String::as_str), Some("init"));
        assert_eq!(log.last().map(String::as_str), Some("cleanup"));
        assert_eq!(log[1], "before 07:00:00");
        assert_eq!(log[2], "after 07:00:00");
        // Four distinct seconds, two hooks each.
        assert_eq!(log.len(), 2 + 4 * 2);
    }
}

// ── Observability & factory ───────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dt_config::Config;
    use dt_core::NoopSink;
    use dt_events::EventsManager;
    use dt_spatial::Dijkstra;

    use crate::{
        MobsimContext, MobsimError, MobsimFactory, MobsimListener, MobsimListenerProvider,
        NoopListener, TeleportationMobsimFactory,
    };

    use super::helpers::scenario;

    #[test]
    fn listeners_rejected_after_start() {
        let s = scenario(Vec::new());
        let config = Config::default();
        let router = Dijkstra::new();
        let mut events = EventsManager::new();
        let mut sim = TeleportationMobsimFactory
            .create(MobsimContext {
                scenario:  &s,
                events:    &mut events,
                config:    &config,
                router:    &router,
                iteration: 3,
                sink:      NoopSink::shared(),
            })
            .unwrap_or_else(|e| panic!("{e}"));

        sim.as_observable().unwrap().add_listener(Box::new(NoopListener)).unwrap();
        sim.run().unwrap();
        let late = sim.as_observable().unwrap().add_listener(Box::new(NoopListener));
        assert!(matches!(late, Err(MobsimError::AlreadyStarted)));
        assert!(matches!(sim.run(), Err(MobsimError::AlreadyStarted)));
    }

    #[test]
    fn zero_end_time_is_a_config_error() {
        let s = scenario(Vec::new());
        let mut config = Config::default();
        config.mobsim.end_time = 0;
        let router = Dijkstra::new();
        let mut events = EventsManager::new();
        let result = TeleportationMobsimFactory.create(MobsimContext {
            scenario:  &s,
            events:    &mut events,
            config:    &config,
            router:    &router,
            iteration: 0,
            sink:      NoopSink::shared(),
        });
        assert!(matches!(result, Err(MobsimError::Config(_))));
    }

    #[test]
    fn closure_provider_is_called_per_request() {
        let calls = AtomicUsize::new(0);
        let provider = || -> Box<dyn MobsimListener> {
            calls.fetch_add(1, Ordering::Relaxed);
            Box::new(NoopListener)
        };
        let _first = provider.provide();
        let _second = provider.provide();
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }
}

//! Unit tests for dt-replanning.

#[cfg(test)]
mod helpers {
    use dt_core::{AgentId, AgentRng, GeoPoint, NodeId, SimTime, TransportMode};
    use dt_population::{Activity, Leg, Person, Plan};
    use dt_spatial::{Dijkstra, RoadNetwork, RoadNetworkBuilder};

    use crate::StrategyContext;

    /// 0 ─10s─ 1 ─10s─ 2, plus isolated node 3.
    pub fn line_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 0.001));
        let n2 = b.add_node(GeoPoint::new(0.0, 0.002));
        b.add_node(GeoPoint::new(1.0, 1.0));
        b.add_road(n0, n1, 100.0, 10.0);
        b.add_road(n1, n2, 100.0, 10.0);
        b.build()
    }

    pub fn trip(mode: TransportMode, to: NodeId) -> Plan {
        let mut plan = Plan::new();
        plan.push_activity(Activity::new("home").at_node(NodeId(0)).with_end_time(SimTime::from_hms(8, 0, 0)))
            .push_leg(Leg::new(mode))
            .push_activity(Activity::new("work").at_node(to));
        plan
    }

    /// A person whose plans carry the given scores; plan 0 is selected.
    pub fn person_with_scores(scores: &[Option<f64>]) -> Person {
        let mut person = Person::new(AgentId(0), "p0");
        for &score in scores {
            let mut plan = trip(TransportMode::Car, NodeId(2));
            plan.score = score;
            person.add_plan(plan);
        }
        person
    }

    pub fn ctx<'a>(network: &'a RoadNetwork, router: &'a Dijkstra, seed: u64) -> StrategyContext<'a> {
        StrategyContext { network, router, rng: AgentRng::for_iteration(seed, AgentId(0), 1), iteration: 1 }
    }
}

// ── Selectors ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selectors {
    use dt_spatial::Dijkstra;
    use crate::{BestScore, ExpBetaSelector, KeepLastSelected, PlanStrategy};

    use super::helpers::{ctx, line_network, person_with_scores};

    #[test]
    fn keep_last_selected_does_nothing() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut p = person_with_scores(&[Some(1.0), Some(5.0)]);
        KeepLastSelected.run(&mut p, &mut ctx(&net, &router, 1)).unwrap();
        assert_eq!(p.selected_index(), Some(0));
    }

    #[test]
    fn best_score_picks_maximum() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut p = person_with_scores(&[Some(1.0), Some(5.0), Some(3.0)]);
        BestScore.run(&mut p, &mut ctx(&net, &router, 1)).unwrap();
        assert_eq!(p.selected_index(), Some(1));
    }

    #[test]
    fn unscored_plans_are_tried_first() {
        let (net, router) = (line_network(), Dijkstra::new());
        for seed in 0..20 {
            let mut p = person_with_scores(&[Some(100.0), None]);
            ExpBetaSelector::new(1.0).run(&mut p, &mut ctx(&net, &router, seed)).unwrap();
            assert_eq!(p.selected_index(), Some(1));

            let mut p = person_with_scores(&[Some(100.0), None]);
            BestScore.run(&mut p, &mut ctx(&net, &router, seed)).unwrap();
            assert_eq!(p.selected_index(), Some(1));
        }
    }

    #[test]
    fn exp_beta_weights_follow_logit() {
        let w = ExpBetaSelector::new(2.0).weights(&[0.0, 1.0]);
        assert!((w[1] - 1.0).abs() < 1e-12);
        assert!((w[0] - (-2.0f64).exp()).abs() < 1e-12);
        // Shifting by the maximum keeps large scores finite.
        assert!(ExpBetaSelector::new(1.0).weights(&[1e4, 1e4 + 1.0]).iter().all(|w| w.is_finite()));
    }

    #[test]
    fn exp_beta_strongly_prefers_better_plan() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut picked_better = 0;
        for seed in 0..200 {
            let mut p = person_with_scores(&[Some(0.0), Some(10.0)]);
            ExpBetaSelector::new(1.0).run(&mut p, &mut ctx(&net, &router, seed)).unwrap();
            picked_better += usize::from(p.selected_index() == Some(1));
        }
        assert!(picked_better > 190, "picked better plan {picked_better} times");
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reroute {
    use dt_core::{AgentId, NodeId, TransportMode};
    use dt_spatial::Dijkstra;
    use crate::{route_all_legs, route_missing_legs, PlanStrategy, ReRoute};

    use super::helpers::{ctx, line_network, person_with_scores, trip};

    #[test]
    fn network_legs_get_routes() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut plan = trip(TransportMode::Car, NodeId(2));
        assert_eq!(route_all_legs(&mut plan, &net, &router, AgentId(0)).unwrap(), 1);

        let route = plan.legs().next().unwrap().route.as_ref().unwrap();
        assert_eq!(route.links.len(), 2);
        assert_eq!(route.travel_time, 20);
        assert!((route.distance_m - 200.0).abs() < 1e-3);
    }

    #[test]
    fn teleported_and_unreachable_legs_stay_unrouted() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut walk = trip(TransportMode::Walk, NodeId(2));
        assert_eq!(route_all_legs(&mut walk, &net, &router, AgentId(0)).unwrap(), 0);
        assert!(walk.legs().all(|l| l.route.is_none()));

        let mut island = trip(TransportMode::Car, NodeId(3));
        assert_eq!(route_all_legs(&mut island, &net, &router, AgentId(0)).unwrap(), 0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut plan = trip(TransportMode::Car, NodeId(99));
        assert!(matches!(
            route_all_legs(&mut plan, &net, &router, AgentId(4)),
            Err(crate::ReplanningError::Routing { agent: AgentId(4), .. })
        ));
    }

    #[test]
    fn missing_only_keeps_existing_routes() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut plan = trip(TransportMode::Car, NodeId(2));
        route_all_legs(&mut plan, &net, &router, AgentId(0)).unwrap();
        assert_eq!(route_missing_legs(&mut plan, &net, &router, AgentId(0)).unwrap(), 0);
        assert!(plan.legs().all(|l| l.route.is_some()));
    }

    #[test]
    fn reroute_adds_and_selects_unscored_copy() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut p = person_with_scores(&[Some(3.0)]);
        ReRoute.run(&mut p, &mut ctx(&net, &router, 1)).unwrap();

        assert_eq!(p.plan_count(), 2);
        assert_eq!(p.selected_index(), Some(1));
        let selected = p.selected_plan().unwrap();
        assert_eq!(selected.score, None);
        assert!(selected.legs().all(|l| l.route.is_some()));
        assert_eq!(p.plans()[0].score, Some(3.0));
    }
}

// ── StrategyManager ───────────────────────────────────────────────────────────

#[cfg(test)]
mod manager {
    use dt_config::{Config, StrategySettings};
    use dt_core::{NodeId, TransportMode};
    use dt_population::Population;
    use dt_spatial::Dijkstra;
    use crate::manager::remove_surplus_plans;
    use crate::{KeepLastSelected, ReRoute, ReplanningError, StrategyManager};

    use super::helpers::{line_network, person_with_scores, trip};

    fn population(n: usize) -> Population {
        let mut pop = Population::new();
        for i in 0..n {
            pop.add_person(format!("p{i}"), trip(TransportMode::Car, NodeId(2)));
        }
        pop
    }

    #[test]
    fn builds_from_config_names() {
        let manager = StrategyManager::from_config(&Config::default()).unwrap();
        let names: Vec<_> = manager.strategy_names().collect();
        assert_eq!(names, vec!["exp_beta", "reroute"]);
        assert_eq!(manager.max_plans(), 5);

        let mut config = Config::default();
        config.replanning.strategies.push(StrategySettings::new("time_mutator", 1.0));
        assert!(matches!(
            StrategyManager::from_config(&config),
            Err(ReplanningError::UnknownStrategy(name)) if name == "time_mutator"
        ));
    }

    #[test]
    fn surplus_removal_spares_selected_and_drops_unscored_first() {
        let mut p = person_with_scores(&[Some(-5.0), Some(1.0), None, Some(2.0)]);
        p.select_plan(0);
        assert_eq!(remove_surplus_plans(&mut p, 2), 2);
        let scores: Vec<_> = p.plans().iter().map(|pl| pl.score).collect();
        assert_eq!(scores, vec![Some(-5.0), Some(2.0)]);
        assert_eq!(p.selected_index(), Some(0));
    }

    #[test]
    fn same_seed_same_outcome() {
        let (net, router) = (line_network(), Dijkstra::new());
        let run = || {
            let mut manager = StrategyManager::new(42, 3);
            manager.add_strategy(Box::new(KeepLastSelected), 0.5);
            manager.add_strategy(Box::new(ReRoute), 0.5);
            let mut pop = population(50);
            let summary = manager.run(&mut pop, &net, &router, 3).unwrap();
            let counts: Vec<_> = pop.iter().map(|p| p.plan_count()).collect();
            (summary, counts)
        };
        let (a, counts_a) = run();
        let (b, counts_b) = run();
        assert_eq!(a, b);
        assert_eq!(counts_a, counts_b);
        assert_eq!(a.per_strategy.iter().map(|(_, n)| n).sum::<usize>(), 50);
        assert!(a.per_strategy.iter().all(|(_, n)| *n > 0));
    }

    #[test]
    fn plan_memory_is_bounded_across_iterations() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut manager = StrategyManager::new(7, 2);
        manager.add_strategy(Box::new(ReRoute), 1.0);
        let mut pop = population(3);
        for it in 1..=5 {
            for person in pop.iter_mut() {
                if let Some(plan) = person.selected_plan_mut() {
                    plan.score = Some(it as f64);
                }
            }
            manager.run(&mut pop, &net, &router, it).unwrap();
            // At most the memory size plus the plan just added.
            assert!(pop.iter().all(|p| p.plan_count() <= 3));
        }
    }

    #[test]
    fn zero_weights_replan_nobody() {
        let (net, router) = (line_network(), Dijkstra::new());
        let mut manager = StrategyManager::new(1, 5);
        manager.add_strategy(Box::new(ReRoute), 0.0);
        let mut pop = population(4);
        let summary = manager.run(&mut pop, &net, &router, 1).unwrap();
        assert_eq!(summary.per_strategy, vec![("reroute".to_owned(), 0)]);
        assert!(pop.iter().all(|p| p.plan_count() == 1));
    }
}

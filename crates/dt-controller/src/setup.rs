//! One-time steps run before the first iteration.

use std::collections::BTreeSet;

use dt_config::{ActivityParams, Config, TRANSIT_ACTIVITY_TYPE};
use dt_core::{NodeId, Sink, SinkExt};
use dt_population::{Activity, ActivityFacilities};
use dt_replanning::route_missing_legs;
use dt_scenario::Scenario;
use dt_spatial::{LeastCostPathCalculator, RoadNetwork};

use crate::ControllerResult;

const COMPONENT: &str = "setup";

/// Typical duration of the transit interaction activity, in seconds.
pub const TRANSIT_INTERACTION_DURATION: f64 = 120.0;

// ── Config preprocessing ──────────────────────────────────────────────────────

/// Adjusts `config` for enabled features.  With transit on, warns when the
/// vehicles file is missing and adds unscored `pt interaction` activity
/// parameters unless they already exist.  Returns `true` if the parameters
/// were added.
pub fn preprocess_config(config: &mut Config, sink: &Sink) -> bool {
    if !config.transit.use_transit {
        return false;
    }
    match &config.transit.vehicles_file {
        None => sink.warn(COMPONENT, "transit is enabled but no transit vehicles file is configured"),
        Some(path) if !path.exists() => sink.warn(
            COMPONENT,
            format!("transit is enabled but the transit vehicles file {} does not exist", path.display()),
        ),
        Some(_) => {}
    }
    config.scoring.add_activity_params(
        ActivityParams::new(TRANSIT_ACTIVITY_TYPE, TRANSIT_INTERACTION_DURATION)
            .with_opening_time(0.0)
            .with_closing_time(0.0),
    )
}

// ── Consistency checks ────────────────────────────────────────────────────────

/// A check run once before the first iteration.  Any problem aborts the
/// run with `ConfigError::Inconsistent`.
pub trait ConfigConsistencyChecker: Send {
    fn name(&self) -> &str;

    /// Problems found, one message each.  Empty when consistent.
    fn check(&self, config: &Config, scenario: &Scenario) -> Vec<String>;
}

/// Every activity type used in a plan needs scoring parameters, and every
/// configured typical duration must be positive.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivityParamsChecker;

impl ConfigConsistencyChecker for ActivityParamsChecker {
    fn name(&self) -> &str {
        "activity_params"
    }

    fn check(&self, config: &Config, scenario: &Scenario) -> Vec<String> {
        let used: BTreeSet<&str> = scenario
            .population()
            .iter()
            .flat_map(|p| p.plans())
            .flat_map(|plan| plan.activities())
            .map(|a| a.activity_type.as_str())
            .collect();
        let missing = used
            .into_iter()
            .filter(|t| config.scoring.activity_params(t).is_none())
            .map(|t| format!("activity type {t:?} has no scoring parameters"));
        let degenerate = config
            .scoring
            .all_activity_params()
            .iter()
            .filter(|p| !(p.typical_duration.is_finite() && p.typical_duration > 0.0))
            .map(|p| format!("activity type {:?} has invalid typical duration {}", p.activity_type, p.typical_duration));
        missing.chain(degenerate).collect()
    }
}

/// Replanning must have something to draw from.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrategyWeightsChecker;

impl ConfigConsistencyChecker for StrategyWeightsChecker {
    fn name(&self) -> &str {
        "strategy_weights"
    }

    fn check(&self, config: &Config, _scenario: &Scenario) -> Vec<String> {
        let strategies = &config.replanning.strategies;
        let mut problems: Vec<String> = strategies
            .iter()
            .filter(|s| !(s.weight >= 0.0 && s.weight.is_finite()))
            .map(|s| format!("strategy {:?} has invalid weight {}", s.name, s.weight))
            .collect();
        if !strategies.is_empty() && strategies.iter().all(|s| s.weight == 0.0) {
            problems.push("all replanning strategy weights are zero".to_owned());
        }
        problems
    }
}

// ── Prepare for simulation ────────────────────────────────────────────────────

/// What [`prepare_for_sim`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub facilities_snapped:   usize,
    pub activities_located:   usize,
    pub activities_unplaced:  usize,
    pub legs_routed:          usize,
}

fn locate(activity: &Activity, network: &RoadNetwork, facilities: &ActivityFacilities) -> Option<NodeId> {
    activity
        .facility
        .and_then(|f| facilities.get(f))
        .and_then(|f| f.node)
        .or_else(|| activity.coord.and_then(|c| network.snap_to_node(c)))
}

/// Places facilities and activities on network nodes and routes every leg
/// that has no route yet.
///
/// Activities take their facility's node when they have one, otherwise the
/// node nearest to their coordinate.  Activities that end up without a node
/// are reported and left as they are.
pub fn prepare_for_sim(
    scenario: &mut Scenario,
    router:   &dyn LeastCostPathCalculator,
    sink:     &Sink,
) -> ControllerResult<PrepareSummary> {
    let mut summary = PrepareSummary::default();

    let snaps: Vec<_> = scenario
        .facilities()
        .iter()
        .filter(|f| f.node.is_none())
        .filter_map(|f| scenario.network().snap_to_node(f.coord).map(|n| (f.id, n)))
        .collect();
    for (id, node) in snaps {
        if let Some(f) = scenario.facilities_mut().get_mut(id) {
            f.node = Some(node);
            summary.facilities_snapped += 1;
        }
    }

    let (network, facilities, population) = scenario.split_mut();
    for person in population.iter_mut() {
        let agent = person.id;
        for plan in person.plans_mut() {
            for activity in plan.activities_mut().filter(|a| a.node.is_none()) {
                match locate(activity, network, facilities) {
                    Some(node) => {
                        activity.node = Some(node);
                        summary.activities_located += 1;
                    }
                    None => summary.activities_unplaced += 1,
                }
            }
            summary.legs_routed += route_missing_legs(plan, network, router, agent)?;
        }
    }

    if summary.activities_unplaced > 0 {
        sink.warn(
            COMPONENT,
            format!("{} activities could not be placed on the network", summary.activities_unplaced),
        );
    }
    sink.info(
        COMPONENT,
        format!(
            "prepared for simulation: {} facilities snapped, {} activities located, {} legs routed",
            summary.facilities_snapped, summary.activities_located, summary.legs_routed
        ),
    );
    Ok(summary)
}

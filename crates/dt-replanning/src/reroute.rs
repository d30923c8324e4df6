//! Re-routing of network legs.

use dt_core::AgentId;
use dt_population::{Person, Plan, Route};
use dt_spatial::{LeastCostPathCalculator, RoadNetwork, SpatialError};

use crate::{PlanStrategy, ReplanningError, ReplanningResult, StrategyContext};

/// Routes every network-mode leg of `plan` whose activities have nodes,
/// replacing stored routes.  Returns the number of legs routed.
///
/// Unreachable destinations leave the leg unrouted; the mobsim then aborts
/// the agent at departure.
pub fn route_all_legs(
    plan:    &mut Plan,
    network: &RoadNetwork,
    router:  &dyn LeastCostPathCalculator,
    agent:   AgentId,
) -> ReplanningResult<usize> {
    route_legs(plan, network, router, agent, true)
}

/// Like [`route_all_legs`] but keeps routes that are already stored.
pub fn route_missing_legs(
    plan:    &mut Plan,
    network: &RoadNetwork,
    router:  &dyn LeastCostPathCalculator,
    agent:   AgentId,
) -> ReplanningResult<usize> {
    route_legs(plan, network, router, agent, false)
}

fn route_legs(
    plan:      &mut Plan,
    network:   &RoadNetwork,
    router:    &dyn LeastCostPathCalculator,
    agent:     AgentId,
    overwrite: bool,
) -> ReplanningResult<usize> {
    let mut routed = 0;
    plan.try_for_each_trip_mut(|depart, from, leg, to| {
        if leg.route.is_some() && !overwrite {
            return Ok(());
        }
        leg.route = None;
        if !leg.mode.is_network_mode() {
            return Ok(());
        }
        let (Some(a), Some(b)) = (from.node, to.node) else {
            return Ok(());
        };
        match router.calc_least_cost_path(network, a, b, depart, agent, None) {
            Ok(path) => {
                let distance_m = network.path_length_m(&path.links)?;
                leg.route = Some(Route { links: path.links, distance_m, travel_time: path.travel_time });
                routed += 1;
                Ok(())
            }
            Err(SpatialError::NoPath { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    })
    .map_err(|source| ReplanningError::Routing { agent, source })?;
    Ok(routed)
}

/// Copies the selected plan, selects the copy and re-routes it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReRoute;

impl PlanStrategy for ReRoute {
    fn name(&self) -> &str {
        "reroute"
    }

    fn run(&self, person: &mut Person, ctx: &mut StrategyContext<'_>) -> ReplanningResult<()> {
        let agent = person.id;
        person.copy_selected_plan().ok_or(ReplanningError::NoPlan(agent))?;
        let plan = person.selected_plan_mut().ok_or(ReplanningError::NoPlan(agent))?;
        plan.score = None;
        route_all_legs(plan, ctx.network, ctx.router, agent)?;
        Ok(())
    }
}

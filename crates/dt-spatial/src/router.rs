//! Least-cost paths over the road network.
//!
//! Plan preparation and re-routing ask for paths through the
//! [`LeastCostPathCalculator`] trait, so a contraction hierarchy or a
//! congestion-aware router can replace the default [`Dijkstra`] without
//! touching the controller.
//!
//! # Cost units
//!
//! Link costs are traversal times in milliseconds.  [`LeastCostPath`] reports
//! whole seconds (rounded up) so arrivals never precede the true time.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use dt_core::{AgentId, EdgeId, NodeId, SimTime, VehicleId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── LeastCostPath ─────────────────────────────────────────────────────────────

/// Result of a path query.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastCostPath {
    /// Visited nodes, origin and destination included.
    pub nodes: Vec<NodeId>,
    /// Links in travel order.
    pub links: Vec<EdgeId>,
    /// Travel time in seconds.
    pub travel_time: u32,
}

impl LeastCostPath {
    /// `true` when origin and destination coincide.
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }
}

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// `Send + Sync` so one calculator can be shared by the replanning workers.
pub trait LeastCostPathCalculator: Send + Sync {
    /// Cheapest path from `from` to `to` departing at `time`.
    ///
    /// `agent` and `vehicle` let personalised implementations vary costs;
    /// the default ignores them.
    fn calc_least_cost_path(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        time: SimTime,
        agent: AgentId,
        vehicle: Option<VehicleId>,
    ) -> SpatialResult<LeastCostPath>;
}

/// Time-dependent link traversal times.
pub trait TravelTime: Send + Sync {
    /// Milliseconds needed to traverse `link` when entering it at `enter`.
    fn link_travel_ms(&self, network: &RoadNetwork, link: EdgeId, enter: SimTime) -> u32;
}

/// Free-flow travel times straight from the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpeedTravelTime;

impl TravelTime for FreeSpeedTravelTime {
    #[inline]
    fn link_travel_ms(&self, network: &RoadNetwork, link: EdgeId, _enter: SimTime) -> u32 {
        network.link_freespeed_ms[link.index()]
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Label-setting Dijkstra over the CSR graph.
///
/// Link entry times are accumulated from the departure time, so a
/// time-dependent [`TravelTime`] sees the clock at which each link is
/// actually entered.
#[derive(Debug, Clone, Default)]
pub struct Dijkstra<T = FreeSpeedTravelTime> {
    travel_time: T,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: TravelTime> Dijkstra<T> {
    pub fn with_travel_time(travel_time: T) -> Self {
        Self { travel_time }
    }
}

impl<T: TravelTime> LeastCostPathCalculator for Dijkstra<T> {
    fn calc_least_cost_path(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        time: SimTime,
        _agent: AgentId,
        _vehicle: Option<VehicleId>,
    ) -> SpatialResult<LeastCostPath> {
        for node in [from, to] {
            if !network.contains_node(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        if from == to {
            return Ok(LeastCostPath { nodes: vec![from], links: vec![], travel_time: 0 });
        }

        let n = network.node_count();
        let mut best      = vec![u32::MAX; n];
        let mut prev_link = vec![EdgeId::INVALID; n];
        best[from.index()] = 0;

        // Ties break on NodeId for reproducible paths.
        let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                return Ok(trace_back(network, &prev_link, from, to, cost));
            }
            if cost > best[node.index()] {
                continue;
            }
            let enter = time + cost.div_ceil(1_000);
            for link in network.out_links(node) {
                let next = network.link_to[link.index()];
                let step = self.travel_time.link_travel_ms(network, link, enter);
                let candidate = cost.saturating_add(step);
                if candidate < best[next.index()] {
                    best[next.index()] = candidate;
                    prev_link[next.index()] = link;
                    heap.push(Reverse((candidate, next)));
                }
            }
        }

        Err(SpatialError::NoPath { from, to })
    }
}

fn trace_back(
    network: &RoadNetwork,
    prev_link: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_ms: u32,
) -> LeastCostPath {
    let mut links = Vec::new();
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let link = prev_link[cur.index()];
        links.push(link);
        cur = network.link_from[link.index()];
        nodes.push(cur);
    }
    links.reverse();
    nodes.reverse();
    LeastCostPath { nodes, links, travel_time: total_ms.div_ceil(1_000) }
}

//! Unit tests for dt-spatial.
//!
//! All tests run on hand-built networks.

#[cfg(test)]
mod helpers {
    use dt_core::{GeoPoint, NodeId};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Small grid:
    ///
    /// ```text
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    /// ```
    ///
    /// Roads 0-1, 1-2, 2-4 take 10 s each; 0-3 takes 50 s, 3-4 takes 10 s,
    /// so the fastest 0→4 path is 0→1→2→4 (30 s).
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_road(n0, n1, 100.0, 10.0);
        b.add_road(n1, n2, 100.0, 10.0);
        b.add_road(n2, n4, 100.0, 10.0);
        b.add_road(n0, n3, 500.0, 10.0);
        b.add_road(n3, n4, 100.0, 10.0);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use dt_core::{GeoPoint, NodeId};
    use crate::{RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.link_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_out_links_start_at_their_node() {
        let (net, nodes) = super::helpers::grid_network();
        for n in nodes {
            assert_eq!(net.out_degree(n), 2);
            for l in net.out_links(n) {
                assert_eq!(net.link_from[l.index()], n);
            }
        }
        assert_eq!(net.link_count(), 10);
    }

    #[test]
    fn freespeed_is_rounded_up_to_ms() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_link(a, c, 100.0, 3.0).unwrap();
        let net = b.build();
        let link = net.link_between(a, c).unwrap();
        assert_eq!(net.link_freespeed_ms[link.index()], 33_334);
        assert_eq!(net.link_travel_secs(link), 34);
        assert!(net.link_between(c, a).is_none());
    }

    #[test]
    fn add_link_rejects_unknown_node() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let err = b.add_link(a, NodeId(7), 10.0, 1.0).unwrap_err();
        assert!(matches!(err, SpatialError::NodeNotFound(NodeId(7))));
    }

    #[test]
    fn link_between_prefers_fastest_parallel_link() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_timed_link(a, c, 100.0, 9_000);
        b.add_timed_link(a, c, 120.0, 4_000);
        let net = b.build();
        let fastest = net.link_between(a, c).unwrap();
        assert_eq!(net.link_freespeed_ms[fastest.index()], 4_000);
    }

    #[test]
    fn path_length_checks_connectivity() {
        let (net, [n0, n1, n2, n3, _]) = super::helpers::grid_network();
        let l01 = net.link_between(n0, n1).unwrap();
        let l12 = net.link_between(n1, n2).unwrap();
        let l03 = net.link_between(n0, n3).unwrap();
        assert_eq!(net.path_length_m(&[l01, l12]).unwrap(), 200.0);
        assert!(matches!(
            net.path_length_m(&[l01, l03]),
            Err(SpatialError::DisconnectedPath { .. })
        ));
        assert_eq!(net.path_length_m(&[]).unwrap(), 0.0);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use dt_core::GeoPoint;
    use crate::RoadNetwork;

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.4)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        assert!(RoadNetwork::empty().snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (net, nodes) = super::helpers::grid_network();
        let nearest = net.k_nearest_nodes(GeoPoint::new(0.0, 0.0), 2);
        assert_eq!(nearest[0], nodes[0]);
        // n1 and n3 are equidistant in lat/lon.
        assert!(nearest[1] == nodes[1] || nearest[1] == nodes[3]);
    }
}

// ── Least-cost paths ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use dt_core::{AgentId, EdgeId, GeoPoint, NodeId, SimTime};
    use crate::{
        Dijkstra, LeastCostPathCalculator, RoadNetwork, RoadNetworkBuilder, SpatialError,
        TravelTime,
    };

    fn route(
        net: &RoadNetwork,
        from: NodeId,
        to: NodeId,
    ) -> Result<crate::LeastCostPath, SpatialError> {
        Dijkstra::new().calc_least_cost_path(net, from, to, SimTime::ZERO, AgentId(0), None)
    }

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let p = route(&net, n0, n0).unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.nodes, vec![n0]);
        assert_eq!(p.travel_time, 0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let p = route(&net, n0, n4).unwrap();
        assert_eq!(p.travel_time, 30);
        assert_eq!(p.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(p.links.len(), 3);
        assert_eq!(net.link_from[p.links[0].index()], n0);
        assert_eq!(net.link_to[p.links[2].index()], n4);
    }

    #[test]
    fn no_path_between_disconnected_nodes() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build();
        assert!(matches!(route(&net, a, c), Err(SpatialError::NoPath { .. })));
    }

    #[test]
    fn unknown_node_is_an_error() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert!(matches!(
            route(&net, n0, NodeId(99)),
            Err(SpatialError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_timed_link(a, c, 100.0, 10_000);
        let net = b.build();
        assert!(route(&net, a, c).is_ok());
        assert!(route(&net, c, a).is_err());
    }

    /// Makes links out of node 1 very slow after 07:00.
    struct RushHour;

    impl TravelTime for RushHour {
        fn link_travel_ms(&self, net: &RoadNetwork, link: EdgeId, enter: SimTime) -> u32 {
            let base = net.link_freespeed_ms[link.index()];
            if net.link_from[link.index()] == NodeId(1) && enter >= SimTime::from_hms(7, 0, 0) {
                base * 100
            } else {
                base
            }
        }
    }

    #[test]
    fn time_dependent_travel_time_changes_the_path() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::grid_network();
        let router = Dijkstra::with_travel_time(RushHour);

        let night = router
            .calc_least_cost_path(&net, n0, n4, SimTime::from_hms(3, 0, 0), AgentId(0), None)
            .unwrap();
        assert_eq!(night.travel_time, 30);

        let rush = router
            .calc_least_cost_path(&net, n0, n4, SimTime::from_hms(8, 0, 0), AgentId(0), None)
            .unwrap();
        assert_eq!(rush.nodes, vec![n0, n3, n4]);
        assert_eq!(rush.travel_time, 60);
    }
}

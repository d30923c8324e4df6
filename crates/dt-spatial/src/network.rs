//! Road network representation and builder.
//!
//! # Data layout
//!
//! Links are stored in **Compressed Sparse Row (CSR)** order: all link arrays
//! are sorted by source node and indexed by `EdgeId`, and the outgoing links
//! of node `n` are the contiguous id range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n + 1]
//! ```
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! when preparing plans to attach coordinate-only activities to the network.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use dt_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space; good enough for ranking
    /// candidates within one urban area.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR layout plus a spatial index for node snapping.
///
/// Fields are `pub` for indexed access from the router and the mobsim.  Build
/// one with [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Position of each node, indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer; length is `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each link.
    pub link_from: Vec<NodeId>,

    /// Destination node of each link.
    pub link_to: Vec<NodeId>,

    /// Link length in metres.
    pub link_length_m: Vec<f32>,

    /// Free-flow traversal time in milliseconds.
    pub link_freespeed_ms: Vec<u32>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network without nodes.  Every path query against it fails.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    pub fn contains_link(&self, link: EdgeId) -> bool {
        link.index() < self.link_count()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing links of `node` as a contiguous id range.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()];
        let end   = self.node_out_start[node.index() + 1];
        (start..end).map(EdgeId)
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    /// The fastest direct link from `from` to `to`, if any.
    pub fn link_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains_node(from) {
            return None;
        }
        self.out_links(from)
            .filter(|l| self.link_to[l.index()] == to)
            .min_by_key(|l| self.link_freespeed_ms[l.index()])
    }

    /// Free-flow traversal time of `link`, rounded up to whole seconds.
    pub fn link_travel_secs(&self, link: EdgeId) -> u32 {
        self.link_freespeed_ms[link.index()].div_ceil(1_000)
    }

    /// Total length of a link sequence, checking that consecutive links
    /// connect.
    pub fn path_length_m(&self, links: &[EdgeId]) -> SpatialResult<f32> {
        let mut total = 0.0;
        let mut at: Option<NodeId> = None;
        for &link in links {
            if !self.contains_link(link) {
                return Err(SpatialError::LinkNotFound(link));
            }
            if at.is_some_and(|n| n != self.link_from[link.index()]) {
                return Err(SpatialError::DisconnectedPath { link });
            }
            total += self.link_length_m[link.index()];
            at = Some(self.link_to[link.index()]);
        }
        Ok(total)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`; `None` only for an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, closest first.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.node_count())
            .field("links", &self.link_count())
            .finish()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and directed links, then lays them out with
/// [`build`](Self::build).
///
/// Link ids are assigned by `build()` after sorting by source node, so ids
/// are only meaningful on the finished [`RoadNetwork`].
///
/// # Example
///
/// ```
/// use dt_core::GeoPoint;
/// use dt_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let home = b.add_node(GeoPoint::new(47.37, 8.54));
/// let work = b.add_node(GeoPoint::new(47.38, 8.55));
/// b.add_road(home, work, 1_500.0, 13.9); // 1.5 km at 50 km/h
/// let net = b.build();
/// assert_eq!(net.link_count(), 2);
/// assert!(net.link_between(home, work).is_some());
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    links: Vec<PendingLink>,
}

struct PendingLink {
    from:         NodeId,
    to:           NodeId,
    length_m:     f32,
    freespeed_ms: u32,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
        }
    }

    /// Adds a node; ids are sequential from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Adds a one-way link with the given free speed in m/s.
    pub fn add_link(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f32,
        freespeed_mps: f32,
    ) -> SpatialResult<()> {
        for node in [from, to] {
            if node.index() >= self.nodes.len() {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        let freespeed_ms = if freespeed_mps > 0.0 {
            (length_m / freespeed_mps * 1_000.0).ceil() as u32
        } else {
            u32::MAX
        };
        self.links.push(PendingLink { from, to, length_m, freespeed_ms });
        Ok(())
    }

    /// Adds a one-way link with an explicit traversal time in milliseconds.
    pub fn add_timed_link(&mut self, from: NodeId, to: NodeId, length_m: f32, freespeed_ms: u32) {
        self.links.push(PendingLink { from, to, length_m, freespeed_ms });
    }

    /// Adds links in both directions.  Panics on unknown nodes in debug
    /// builds only; use [`add_link`](Self::add_link) for checked input.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f32, freespeed_mps: f32) {
        debug_assert!(a.index() < self.nodes.len() && b.index() < self.nodes.len());
        let ms = (length_m / freespeed_mps.max(f32::EPSILON) * 1_000.0).ceil() as u32;
        self.add_timed_link(a, b, length_m, ms);
        self.add_timed_link(b, a, length_m, ms);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Sorts links by source node, fills the CSR arrays and bulk-loads the
    /// R-tree.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        let mut links = self.links;
        // Stable sort keeps insertion order among a node's out-links.
        links.sort_by_key(|l| l.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for l in &links {
            node_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let entries = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();

        RoadNetwork {
            node_pos:          self.nodes,
            node_out_start,
            link_from:         links.iter().map(|l| l.from).collect(),
            link_to:           links.iter().map(|l| l.to).collect(),
            link_length_m:     links.iter().map(|l| l.length_m).collect(),
            link_freespeed_ms: links.iter().map(|l| l.freespeed_ms).collect(),
            spatial_idx:       RTree::bulk_load(entries),
        }
    }
}

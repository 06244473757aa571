//! Per-request weighted road graph.
//!
//! # Data layout
//!
//! Nodes are road-network coordinates, numbered in first-seen order.
//! Outgoing edges are stored in **CSR** form: the directed edges leaving
//! node `n` occupy
//!
//! ```text
//! edge_*[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every undirected road contributes two directed edges with equal
//! attributes.  Within a node's slice, edges keep insertion order.

use rustc_hash::FxHashMap;

use sf_core::{EdgeId, EdgeMerge, GridPos, NodeId, RoadId};

// ── WeightedGraph ─────────────────────────────────────────────────────────────

/// Undirected weighted graph in CSR format.  Build with
/// [`WeightedGraphBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedGraph {
    /// Coordinate of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GridPos>,

    /// CSR row pointer, length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    pub edge_from:      Vec<NodeId>,
    pub edge_to:        Vec<NodeId>,
    /// Policy weight; the solver's cost.
    pub edge_weight:    Vec<f64>,
    pub edge_length_km: Vec<f64>,
    /// Effective (floored) speed used for the weight, km/h.
    pub edge_speed:     Vec<f64>,
    /// Segment that produced the edge (the last one for merged pairs).
    pub edge_road:      Vec<RoadId>,

    node_index: FxHashMap<GridPos, NodeId>,
}

impl WeightedGraph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Directed edge count (twice the undirected count).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn node_id(&self, pos: GridPos) -> Option<NodeId> {
        self.node_index.get(&pos).copied()
    }

    #[inline]
    pub fn pos(&self, node: NodeId) -> GridPos {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Weight of the edge joining `a` and `b`, if any.
    pub fn weight_between(&self, a: GridPos, b: GridPos) -> Option<f64> {
        let (a, b) = (self.node_id(a)?, self.node_id(b)?);
        self.out_edges(a)
            .find(|e| self.edge_to[e.index()] == b)
            .map(|e| self.edge_weight[e.index()])
    }
}

// ── WeightedGraphBuilder ──────────────────────────────────────────────────────

/// Attributes of one undirected edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    pub weight:    f64,
    pub length_km: f64,
    pub speed:     f64,
    pub road:      RoadId,
}

/// Collects nodes and undirected edges, then lays them out as CSR.
///
/// A second edge between the same pair of nodes (in either direction) is
/// merged into the first according to [`EdgeMerge`]: `Overwrite` keeps the
/// later attributes, `KeepMinimum` the lower weight.
///
/// # Example
///
/// ```
/// use sf_core::{EdgeMerge, GridPos, RoadId};
/// use sf_routing::{EdgeAttrs, WeightedGraphBuilder};
///
/// let attrs = |w| EdgeAttrs { weight: w, length_km: 0.1, speed: 30.0, road: RoadId(0) };
/// let mut b = WeightedGraphBuilder::new(EdgeMerge::KeepMinimum);
/// b.add_edge(GridPos::new(0, 0), GridPos::new(1, 0), attrs(2.0));
/// b.add_edge(GridPos::new(1, 0), GridPos::new(0, 0), attrs(1.0));
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2);
/// assert_eq!(g.weight_between(GridPos::new(0, 0), GridPos::new(1, 0)), Some(1.0));
/// ```
pub struct WeightedGraphBuilder {
    merge:      EdgeMerge,
    nodes:      Vec<GridPos>,
    node_index: FxHashMap<GridPos, NodeId>,
    edges:      Vec<(NodeId, NodeId, EdgeAttrs)>,
    pair_index: FxHashMap<(NodeId, NodeId), usize>,
    merged:     usize,
}

impl WeightedGraphBuilder {
    pub fn new(merge: EdgeMerge) -> Self {
        Self {
            merge,
            nodes:      Vec::new(),
            node_index: FxHashMap::default(),
            edges:      Vec::new(),
            pair_index: FxHashMap::default(),
            merged:     0,
        }
    }

    /// Return the node at `pos`, adding it if unseen.
    pub fn add_node(&mut self, pos: GridPos) -> NodeId {
        if let Some(&id) = self.node_index.get(&pos) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.node_index.insert(pos, id);
        id
    }

    /// Add an undirected edge.  Returns `true` if it merged into an existing
    /// edge between the same nodes.
    pub fn add_edge(&mut self, a: GridPos, b: GridPos, attrs: EdgeAttrs) -> bool {
        let (na, nb) = (self.add_node(a), self.add_node(b));
        let key = (na.min(nb), na.max(nb));
        match self.pair_index.get(&key) {
            Some(&i) => {
                let existing = &mut self.edges[i].2;
                let replace = match self.merge {
                    EdgeMerge::Overwrite   => true,
                    EdgeMerge::KeepMinimum => attrs.weight < existing.weight,
                };
                log::debug!(
                    "duplicate edge {a}-{b}: {} {} (weight {} vs {})",
                    attrs.road,
                    if replace { "replaces" } else { "ignored for" },
                    attrs.weight,
                    existing.weight,
                );
                if replace {
                    *existing = attrs;
                }
                self.merged += 1;
                true
            }
            None => {
                self.pair_index.insert(key, self.edges.len());
                self.edges.push((na, nb, attrs));
                false
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Undirected edges added so far, after merging.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// How many `add_edge` calls merged into an existing edge.
    pub fn merged_count(&self) -> usize {
        self.merged
    }

    pub fn build(self) -> WeightedGraph {
        let node_count = self.nodes.len();

        // Both directions, then a stable sort by source keeps per-node
        // insertion order.
        let mut directed: Vec<(NodeId, NodeId, EdgeAttrs)> = Vec::with_capacity(self.edges.len() * 2);
        for &(a, b, attrs) in &self.edges {
            directed.push((a, b, attrs));
            directed.push((b, a, attrs));
        }
        directed.sort_by_key(|&(from, _, _)| from);

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &directed {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, directed.len());

        WeightedGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from:      directed.iter().map(|e| e.0).collect(),
            edge_to:        directed.iter().map(|e| e.1).collect(),
            edge_weight:    directed.iter().map(|e| e.2.weight).collect(),
            edge_length_km: directed.iter().map(|e| e.2.length_km).collect(),
            edge_speed:     directed.iter().map(|e| e.2.speed).collect(),
            edge_road:      directed.iter().map(|e| e.2.road).collect(),
            node_index: self.node_index,
        }
    }
}

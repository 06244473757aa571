//! Routing trait and default Dijkstra implementation.
//!
//! # Preconditions
//!
//! Edge weights must be non-negative.  [`RouteGraphBuilder`] rejects
//! negative and non-finite weights, so graphs it builds always qualify.
//!
//! [`RouteGraphBuilder`]: crate::RouteGraphBuilder

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use sf_core::{EdgeId, NodeId};

use crate::{RoutingError, RoutingResult, WeightedGraph};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A solved path: nodes from source to destination, the edges between
/// them, and the summed weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub cost:  f64,
}

impl Route {
    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path solver.
pub trait Router: Send + Sync {
    /// Minimum-weight route from `from` to `to`.
    ///
    /// Fails with [`RoutingError::NoPath`] when `to` is unreachable.
    /// `from == to` yields an empty route of cost 0.
    fn route(&self, graph: &WeightedGraph, from: NodeId, to: NodeId) -> RoutingResult<Route>;
}

/// Dijkstra's algorithm over the CSR graph, binary-heap frontier.
///
/// Ties on cost are popped in ascending `NodeId` order, so equal-cost
/// alternatives always resolve the same way.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &WeightedGraph, from: NodeId, to: NodeId) -> RoutingResult<Route> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered by cost, then node.
#[derive(Copy, Clone, PartialEq)]
struct Candidate {
    cost: f64,
    node: NodeId,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &WeightedGraph, from: NodeId, to: NodeId) -> RoutingResult<Route> {
    let n = graph.node_count();
    if from.index() >= n || to.index() >= n {
        return Err(RoutingError::InvalidRequest(format!(
            "node {from} or {to} outside graph of {n} nodes"
        )));
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], cost: 0.0 });
    }

    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    heap.push(Reverse(Candidate { cost: 0.0, node: from }));

    while let Some(Reverse(Candidate { cost, node })) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }
        // Stale entry.
        if cost > dist[node.index()] {
            continue;
        }
        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_weight[edge.index()];
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_edge[next.index()] = edge;
                heap.push(Reverse(Candidate { cost: new_cost, node: next }));
            }
        }
    }

    Err(RoutingError::NoPath { from: graph.pos(from), to: graph.pos(to) })
}

fn reconstruct(graph: &WeightedGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId, cost: f64) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));
    Route { nodes, edges, cost }
}

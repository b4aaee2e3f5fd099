//! Residual capacity bookkeeping for a single solve
//!
//! The residual graph stores one arc per direction of every vertex pair that
//! carries an original edge in either direction. Each arc knows its twin in
//! the opposite direction, so pushing flow along an arc is a decrement on it
//! and an increment on its twin. An anti-parallel pair `(u, v)` / `(v, u)`
//! shares a single twin pair: the arc `u → v` starts at `capacity(u, v)` and
//! the arc `v → u` starts at `capacity(v, u)`, which keeps original reverse
//! capacity and augmentation-created reverse capacity in one counter without
//! double-counting.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, FlowError, FlowResult, Vertex};
use crate::data_structures::graph::CapacityGraph;

/// Index of an arc inside a [`ResidualGraph`]
pub type ArcId = usize;

/// Directed residual arc with a link to its opposite-direction twin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualArc {
    pub from: Vertex,
    pub to: Vertex,
    residual: Capacity,
    twin: ArcId,
}

impl ResidualArc {
    #[inline]
    pub fn residual(&self) -> Capacity {
        self.residual
    }

    #[inline]
    pub fn twin(&self) -> ArcId {
        self.twin
    }
}

/// Persisted form of a residual graph: vertex count plus the arc list.
/// Adjacency is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualDocument {
    pub vertex_count: usize,
    pub arcs: Vec<ResidualArc>,
}

/// Mutable working state derived from a [`CapacityGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResidualDocument", into = "ResidualDocument")]
pub struct ResidualGraph {
    /// Arc ids leaving each vertex, ascending by destination
    adjacency: Vec<Vec<ArcId>>,
    arcs: Vec<ResidualArc>,
}

impl ResidualGraph {
    /// Initialize residual capacities from the original capacities.
    ///
    /// Every edge `(u, v, c)` yields `residual[u][v] = c`, and `residual[v][u]`
    /// exists, starting at `capacity(v, u)` (0 unless anti-parallel).
    pub fn from_capacity_graph(graph: &CapacityGraph) -> Self {
        let vertex_count = graph.vertex_count();
        let mut adjacency: Vec<Vec<ArcId>> = vec![Vec::new(); vertex_count];
        let mut arcs: Vec<ResidualArc> = Vec::with_capacity(2 * graph.edge_count());
        let mut index: HashMap<(Vertex, Vertex), ArcId> = HashMap::with_capacity(2 * graph.edge_count());

        for (from, to, capacity) in graph.edges() {
            if let Some(&existing) = index.get(&(from, to)) {
                // Created earlier as the twin of the anti-parallel edge
                arcs[existing].residual = capacity;
                continue;
            }

            let forward = arcs.len();
            let backward = forward + 1;
            arcs.push(ResidualArc { from, to, residual: capacity, twin: backward });
            arcs.push(ResidualArc { from: to, to: from, residual: 0, twin: forward });

            adjacency[from].push(forward);
            adjacency[to].push(backward);
            index.insert((from, to), forward);
            index.insert((to, from), backward);
        }

        Self::with_sorted_adjacency(adjacency, arcs)
    }

    fn with_sorted_adjacency(mut adjacency: Vec<Vec<ArcId>>, arcs: Vec<ResidualArc>) -> Self {
        for arc_ids in &mut adjacency {
            arc_ids.sort_unstable_by_key(|&arc| arcs[arc].to);
        }
        Self { adjacency, arcs }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn arc(&self, arc: ArcId) -> &ResidualArc {
        &self.arcs[arc]
    }

    /// Every residual arc, including zero-capacity ones
    pub fn arcs(&self) -> impl Iterator<Item = &ResidualArc> + '_ {
        self.arcs.iter()
    }

    /// Arcs leaving `vertex`, ascending by destination. Empty for vertices
    /// outside the graph.
    pub fn arcs_from(&self, vertex: Vertex) -> impl Iterator<Item = (ArcId, &ResidualArc)> + '_ {
        self.adjacency
            .get(vertex)
            .into_iter()
            .flatten()
            .map(move |&arc| (arc, &self.arcs[arc]))
    }

    /// Arc for the ordered pair, if the pair was ever related by an edge
    pub fn find_arc(&self, from: Vertex, to: Vertex) -> Option<ArcId> {
        let arc_ids = self.adjacency.get(from)?;
        arc_ids
            .binary_search_by_key(&to, |&arc| self.arcs[arc].to)
            .ok()
            .map(|position| arc_ids[position])
    }

    /// Current residual capacity of the ordered pair; 0 for pairs never seen
    pub fn residual_capacity(&self, from: Vertex, to: Vertex) -> Capacity {
        self.find_arc(from, to)
            .map(|arc| self.arcs[arc].residual)
            .unwrap_or(0)
    }

    /// Push `amount` along every arc in `arcs`, moving that much residual
    /// capacity onto each arc's twin.
    ///
    /// The caller guarantees `amount` does not exceed the residual capacity
    /// of any arc on the path (it is the path bottleneck).
    pub fn apply_flow<I>(&mut self, arcs: I, amount: Capacity)
    where
        I: IntoIterator<Item = ArcId>,
    {
        for arc in arcs {
            let twin = self.arcs[arc].twin;
            debug_assert!(
                self.arcs[arc].residual >= amount,
                "pushing {} over arc {:?} exceeds its residual capacity",
                amount,
                self.arcs[arc]
            );
            self.arcs[arc].residual -= amount;
            self.arcs[twin].residual += amount;
        }
    }

    /// Smallest residual capacity among `arcs`, `None` for an empty path
    pub fn bottleneck<I>(&self, arcs: I) -> Option<Capacity>
    where
        I: IntoIterator<Item = ArcId>,
    {
        arcs.into_iter().map(|arc| self.arcs[arc].residual).min()
    }

    /// Whether every residual value is non-negative
    pub fn is_non_negative(&self) -> bool {
        self.arcs.iter().all(|arc| arc.residual >= 0)
    }
}

impl TryFrom<ResidualDocument> for ResidualGraph {
    type Error = FlowError;

    /// Rebuild a residual graph, checking every arc: endpoints in range and
    /// distinct, non-negative residual, one arc per ordered pair, and a twin
    /// that points back in the opposite direction with a pair total that
    /// fits in `Capacity`.
    fn try_from(document: ResidualDocument) -> FlowResult<Self> {
        let vertex_count = document.vertex_count;
        let arcs = document.arcs;
        let mut adjacency: Vec<Vec<ArcId>> = vec![Vec::new(); vertex_count];
        let mut seen: HashMap<(Vertex, Vertex), ArcId> = HashMap::with_capacity(arcs.len());

        for (id, arc) in arcs.iter().enumerate() {
            for vertex in [arc.from, arc.to] {
                if vertex >= vertex_count {
                    return Err(FlowError::InvalidVertex { vertex, vertex_count });
                }
            }
            if arc.from == arc.to {
                return Err(FlowError::SelfLoop { vertex: arc.from });
            }
            if arc.residual < 0 {
                return Err(FlowError::InvalidCapacity {
                    from: arc.from,
                    to: arc.to,
                    capacity: arc.residual,
                });
            }
            if seen.insert((arc.from, arc.to), id).is_some() {
                return Err(FlowError::DuplicateEdge { from: arc.from, to: arc.to });
            }

            let twin = arcs.get(arc.twin).ok_or(FlowError::InvalidResidualArc {
                arc: id,
                reason: "twin index out of range",
            })?;
            if twin.twin != id || twin.from != arc.to || twin.to != arc.from {
                return Err(FlowError::InvalidResidualArc {
                    arc: id,
                    reason: "twin does not mirror the arc",
                });
            }
            if arc.residual.checked_add(twin.residual).is_none() {
                return Err(FlowError::CapacityOverflow { from: arc.from, to: arc.to });
            }

            adjacency[arc.from].push(id);
        }

        Ok(Self::with_sorted_adjacency(adjacency, arcs))
    }
}

impl From<ResidualGraph> for ResidualDocument {
    fn from(residual: ResidualGraph) -> Self {
        ResidualDocument {
            vertex_count: residual.adjacency.len(),
            arcs: residual.arcs,
        }
    }
}

//! Static capacity graph
//!
//! Immutable input to every solve: a fixed vertex count and a set of
//! directed edges with non-negative integer capacities. All validation
//! happens at construction; once built, a `CapacityGraph` is read-only and
//! can be shared freely between concurrent solves.
//!
//! Outgoing edges of each vertex are stored sorted by destination, which
//! fixes the scan order used by the path finder and makes solves
//! reproducible.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, FlowError, FlowResult, Vertex};

/// Persisted form of a capacity graph: vertex count plus `[u, v, c]` triples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub vertex_count: usize,
    pub edges: Vec<(Vertex, Vertex, Capacity)>,
}

/// Validated directed graph with integer capacities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphDocument", into = "GraphDocument")]
pub struct CapacityGraph {
    vertex_count: usize,
    /// Per-vertex `(destination, capacity)` lists, ascending by destination
    outgoing: Vec<Vec<(Vertex, Capacity)>>,
    edge_count: usize,
}

impl CapacityGraph {
    /// Validate and build a graph from `(u, v, capacity)` triples.
    ///
    /// A second triple for an ordered pair already present is rejected with
    /// `DuplicateEdge`; use [`CapacityGraphBuilder::add_or_merge_edge`] to
    /// sum parallel capacities instead.
    pub fn new<I>(vertex_count: usize, edges: I) -> FlowResult<Self>
    where
        I: IntoIterator<Item = (Vertex, Vertex, Capacity)>,
    {
        let mut builder = CapacityGraphBuilder::new(vertex_count);
        for (from, to, capacity) in edges {
            builder.add_edge(from, to, capacity)?;
        }
        builder.build()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn contains_vertex(&self, vertex: Vertex) -> bool {
        vertex < self.vertex_count
    }

    /// Outgoing `(destination, capacity)` pairs of `vertex`, ascending by
    /// destination. Empty for vertices outside the graph.
    pub fn outgoing(&self, vertex: Vertex) -> &[(Vertex, Capacity)] {
        self.outgoing.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Capacity of the ordered pair, 0 if no such edge exists
    pub fn capacity(&self, from: Vertex, to: Vertex) -> Capacity {
        let edges = self.outgoing(from);
        edges
            .binary_search_by_key(&to, |&(dest, _)| dest)
            .map(|index| edges[index].1)
            .unwrap_or(0)
    }

    /// All edges as `(u, v, capacity)`, ordered by `(u, v)`
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex, Capacity)> + '_ {
        self.outgoing
            .iter()
            .enumerate()
            .flat_map(|(from, edges)| edges.iter().map(move |&(to, capacity)| (from, to, capacity)))
    }

    /// Dense `n × n` capacity matrix, zero where no edge exists
    pub fn to_matrix(&self) -> Vec<Vec<Capacity>> {
        let mut matrix = vec![vec![0; self.vertex_count]; self.vertex_count];
        for (from, to, capacity) in self.edges() {
            matrix[from][to] = capacity;
        }
        matrix
    }
}

impl TryFrom<GraphDocument> for CapacityGraph {
    type Error = FlowError;

    fn try_from(document: GraphDocument) -> FlowResult<Self> {
        CapacityGraph::new(document.vertex_count, document.edges)
    }
}

impl From<CapacityGraph> for GraphDocument {
    fn from(graph: CapacityGraph) -> Self {
        GraphDocument {
            vertex_count: graph.vertex_count,
            edges: graph.edges().collect(),
        }
    }
}

/// Incremental, validating builder for [`CapacityGraph`]
///
/// Each edge is checked when it is added, in the order vertex range,
/// capacity sign, self loop, duplicate. A rejected edge leaves the builder
/// unchanged.
#[derive(Debug, Clone)]
pub struct CapacityGraphBuilder {
    vertex_count: usize,
    edges: BTreeMap<(Vertex, Vertex), Capacity>,
}

impl CapacityGraphBuilder {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: BTreeMap::new(),
        }
    }

    /// Add an edge, rejecting a second edge for the same ordered pair
    pub fn add_edge(&mut self, from: Vertex, to: Vertex, capacity: Capacity) -> FlowResult<&mut Self> {
        self.validate(from, to, capacity)?;
        if self.edges.contains_key(&(from, to)) {
            return Err(FlowError::DuplicateEdge { from, to });
        }
        self.edges.insert((from, to), capacity);
        Ok(self)
    }

    /// Add an edge, summing capacity into an existing edge for the same pair
    pub fn add_or_merge_edge(&mut self, from: Vertex, to: Vertex, capacity: Capacity) -> FlowResult<&mut Self> {
        self.validate(from, to, capacity)?;
        let existing = self.edges.get(&(from, to)).copied().unwrap_or(0);
        let merged = existing
            .checked_add(capacity)
            .ok_or(FlowError::CapacityOverflow { from, to })?;
        self.edges.insert((from, to), merged);
        Ok(self)
    }

    /// Build the graph.
    ///
    /// Fails with `CapacityOverflow` when the sum of all capacities exceeds
    /// `Capacity::MAX`. Total flow, every residual value, and every cut are
    /// bounded by that sum, so solving an accepted graph cannot overflow.
    pub fn build(&self) -> FlowResult<CapacityGraph> {
        if self.vertex_count == 0 {
            return Err(FlowError::EmptyGraph);
        }

        let mut outgoing = vec![Vec::new(); self.vertex_count];
        let mut total: Capacity = 0;
        // BTreeMap iteration is ordered by (from, to), so each list is sorted
        for (&(from, to), &capacity) in &self.edges {
            total = total
                .checked_add(capacity)
                .ok_or(FlowError::CapacityOverflow { from, to })?;
            outgoing[from].push((to, capacity));
        }

        Ok(CapacityGraph {
            vertex_count: self.vertex_count,
            outgoing,
            edge_count: self.edges.len(),
        })
    }

    fn validate(&self, from: Vertex, to: Vertex, capacity: Capacity) -> FlowResult<()> {
        for vertex in [from, to] {
            if vertex >= self.vertex_count {
                return Err(FlowError::InvalidVertex {
                    vertex,
                    vertex_count: self.vertex_count,
                });
            }
        }
        if capacity < 0 {
            return Err(FlowError::InvalidCapacity { from, to, capacity });
        }
        if from == to {
            return Err(FlowError::SelfLoop { vertex: from });
        }
        Ok(())
    }
}

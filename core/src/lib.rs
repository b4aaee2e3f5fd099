//! Maximum flow engine
//!
//! Computes the maximum flow between a source and a sink in a capacitated
//! directed graph by repeatedly augmenting along shortest paths in the
//! residual graph (Edmonds-Karp).
//!
//! ```
//! let graph = maxflow_core::build_graph(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)])?;
//! let result = maxflow_core::max_flow(&graph, 0, 3)?;
//! assert_eq!(result.total_flow, 4);
//! assert_eq!(result.flow_on(1, 3), 2);
//! # Ok::<(), maxflow_core::FlowError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod validation;

pub use crate::algorithm::graph::{
    Augmentation, AugmentingPath, AugmentingPathFinder, EdgeFlow, MaxFlowResult, MaxFlowSolver, MinCut,
    SolverConfig,
};
pub use crate::algorithm::traits::{Algorithm, Capacity, FlowError, FlowResult, SolveMetrics, Vertex};
pub use crate::data_structures::{CapacityGraph, CapacityGraphBuilder, GraphDocument, ResidualGraph};

/// Validate `(u, v, capacity)` triples into a [`CapacityGraph`]
pub fn build_graph<I>(vertex_count: usize, edges: I) -> FlowResult<CapacityGraph>
where
    I: IntoIterator<Item = (Vertex, Vertex, Capacity)>,
{
    CapacityGraph::new(vertex_count, edges)
}

/// Maximum flow from `source` to `sink` with the default solver configuration
pub fn max_flow(graph: &CapacityGraph, source: Vertex, sink: Vertex) -> FlowResult<MaxFlowResult> {
    MaxFlowSolver::new().solve(graph, source, sink)
}

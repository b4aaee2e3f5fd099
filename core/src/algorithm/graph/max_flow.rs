//! Maximum Flow Algorithm Implementation
//!
//! This module implements the Edmonds-Karp specialization of Ford-Fulkerson:
//! augmenting paths are discovered by breadth-first search in the residual
//! graph and saturated one at a time until the sink becomes unreachable.
//!
//! # Algorithmic Complexity
//!
//! - **Augmentations**: at most `O(V·E)`, since shortest augmenting path
//!   lengths never decrease and each length class saturates an arc per round
//! - **Per augmentation**: `O(E)` for the search plus `O(V)` to apply flow
//! - **Total**: `O(V·E²)` time, `O(V + E)` space
//!
//! # Correctness Guarantees
//!
//! Residual capacities never drop below zero, flow is conserved at every
//! intermediate vertex after each augmentation, and on termination the
//! source side of the final residual graph is a minimum cut whose capacity
//! equals the flow value.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::augmenting_path::AugmentingPathFinder;
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmParameter, AlgorithmProfiler, Capacity, FlowError,
    FlowResult, ParameterConstraints, ParameterType, SolveMetrics, Vertex,
};
use crate::data_structures::graph::CapacityGraph;
use crate::data_structures::residual::ResidualGraph;

const MAX_AUGMENTATIONS: &str = "max_augmentations";
const RECORD_TRACE: &str = "record_trace";

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Abort with `FlowError::Aborted` once this many augmentations have
    /// been applied and another path is still available
    pub max_augmentations: Option<usize>,
    /// Keep the ordered list of augmentations in the result
    pub record_trace: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_augmentations: None,
            record_trace: true,
        }
    }
}

/// One applied augmenting path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
    /// Path vertices, source first
    pub path: Vec<Vertex>,
    pub bottleneck: Capacity,
    /// Total flow after this augmentation
    pub total_after: Capacity,
}

/// Flow assigned to one original edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow {
    pub from: Vertex,
    pub to: Vertex,
    pub capacity: Capacity,
    pub flow: Capacity,
}

/// Minimum s-t cut read off the final residual graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// Vertices reachable from the source, ascending
    pub source_side: Vec<Vertex>,
    /// Original edges leaving the source side, all saturated
    pub cut_edges: Vec<(Vertex, Vertex)>,
    pub capacity: Capacity,
}

/// Maximum flow result with the final residual graph
///
/// Serialize-only: a result is produced by a solve, never loaded back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaxFlowResult {
    pub source: Vertex,
    pub sink: Vertex,
    pub total_flow: Capacity,
    /// Per-edge assignment for every original edge, ordered by `(from, to)`
    pub edge_flows: Vec<EdgeFlow>,
    pub residual: ResidualGraph,
    /// Empty when tracing is disabled
    pub augmentations: Vec<Augmentation>,
    pub metrics: SolveMetrics,
}

impl MaxFlowResult {
    /// Flow on the original edge `(from, to)`, 0 if no such edge
    pub fn flow_on(&self, from: Vertex, to: Vertex) -> Capacity {
        self.edge_flows
            .binary_search_by_key(&(from, to), |edge| (edge.from, edge.to))
            .map(|index| self.edge_flows[index].flow)
            .unwrap_or(0)
    }

    /// Source side of the cut and the saturated edges crossing it
    pub fn min_cut(&self) -> MinCut {
        let mut reachable = vec![false; self.residual.vertex_count()];
        let mut queue = VecDeque::from([self.source]);
        reachable[self.source] = true;

        while let Some(vertex) = queue.pop_front() {
            for (_, arc) in self.residual.arcs_from(vertex) {
                if arc.residual() > 0 && !reachable[arc.to] {
                    reachable[arc.to] = true;
                    queue.push_back(arc.to);
                }
            }
        }

        let cut: Vec<&EdgeFlow> = self
            .edge_flows
            .iter()
            .filter(|edge| reachable[edge.from] && !reachable[edge.to])
            .collect();

        MinCut {
            source_side: (0..reachable.len()).filter(|&v| reachable[v]).collect(),
            cut_edges: cut.iter().map(|edge| (edge.from, edge.to)).collect(),
            capacity: cut.iter().map(|edge| edge.capacity).sum(),
        }
    }
}

/// Lifecycle of one solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initialized,
    Running,
    Terminated,
}

/// Working state owned by a single solve
struct Solve<'g> {
    graph: &'g CapacityGraph,
    source: Vertex,
    sink: Vertex,
    residual: ResidualGraph,
    finder: AugmentingPathFinder,
    total_flow: Capacity,
    augmentations: Vec<Augmentation>,
    profiler: AlgorithmProfiler,
    phase: Phase,
}

impl<'g> Solve<'g> {
    fn new(graph: &'g CapacityGraph, source: Vertex, sink: Vertex) -> Self {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();

        Self {
            graph,
            source,
            sink,
            residual: ResidualGraph::from_capacity_graph(graph),
            finder: AugmentingPathFinder::new(),
            total_flow: 0,
            augmentations: Vec::new(),
            profiler,
            phase: Phase::Initialized,
        }
    }

    /// Perform one search and, if a path exists, one augmentation
    fn step(&mut self, config: &SolverConfig) -> FlowResult<Phase> {
        self.phase = Phase::Running;

        let found = self.finder.find(&self.residual, self.source, self.sink).is_some();
        self.profiler.record_exploration(self.finder.last_explored());

        if !found {
            self.phase = Phase::Terminated;
            return Ok(self.phase);
        }

        if let Some(limit) = config.max_augmentations {
            if self.profiler.augmentations() >= limit {
                warn!(
                    "max flow {} -> {} aborted after {} augmentations",
                    self.source, self.sink, limit
                );
                return Err(FlowError::Aborted { limit });
            }
        }

        let path = self.finder.path();
        // A found path has at least one arc, each with positive residual
        let bottleneck = self.residual.bottleneck(path.arcs()).unwrap_or(0);
        self.residual.apply_flow(path.arcs(), bottleneck);
        self.total_flow += bottleneck;
        self.profiler.record_augmentation();

        trace!(
            "augmentation {}: path {:?}, bottleneck {}, total {}",
            self.profiler.augmentations(),
            path.vertices(),
            bottleneck,
            self.total_flow
        );

        if config.record_trace {
            self.augmentations.push(Augmentation {
                path: path.vertices(),
                bottleneck,
                total_after: self.total_flow,
            });
        }

        Ok(self.phase)
    }

    fn finish(mut self) -> MaxFlowResult {
        self.profiler.stop();

        // Net flow on u -> v is capacity(u, v) - residual(u, v); for an
        // anti-parallel pair only the positive direction carries flow.
        let edge_flows = self
            .graph
            .edges()
            .map(|(from, to, capacity)| EdgeFlow {
                from,
                to,
                capacity,
                flow: (capacity - self.residual.residual_capacity(from, to)).max(0),
            })
            .collect();

        MaxFlowResult {
            source: self.source,
            sink: self.sink,
            total_flow: self.total_flow,
            edge_flows,
            residual: self.residual,
            augmentations: self.augmentations,
            metrics: self.profiler.get_metrics(),
        }
    }
}

/// Edmonds-Karp maximum flow solver
///
/// The solver itself holds configuration only; every call to
/// [`MaxFlowSolver::solve`] builds its own residual graph, so one solver can
/// serve many solves, including concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    config: SolverConfig,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Compute a maximum flow from `source` to `sink`.
    ///
    /// Fails with `InvalidEndpoints` before any work if `source == sink` or
    /// either lies outside the graph. An unreachable sink is not an error and
    /// yields a total flow of zero.
    pub fn solve(&self, graph: &CapacityGraph, source: Vertex, sink: Vertex) -> FlowResult<MaxFlowResult> {
        if source == sink || !graph.contains_vertex(source) || !graph.contains_vertex(sink) {
            return Err(FlowError::InvalidEndpoints {
                source_vertex: source,
                sink_vertex: sink,
                vertex_count: graph.vertex_count(),
            });
        }

        debug!(
            "max flow {} -> {} on {} vertices, {} edges",
            source,
            sink,
            graph.vertex_count(),
            graph.edge_count()
        );

        let mut solve = Solve::new(graph, source, sink);
        while solve.step(&self.config)? != Phase::Terminated {}

        let result = solve.finish();
        debug!(
            "max flow {} -> {} = {} after {} augmentations",
            source, sink, result.total_flow, result.metrics.augmentations
        );
        Ok(result)
    }

    /// Solve several independent source/sink pairs on a shared graph in
    /// parallel. Results are returned in input order.
    pub fn solve_many(
        &self,
        graph: &CapacityGraph,
        pairs: &[(Vertex, Vertex)],
    ) -> Vec<FlowResult<MaxFlowResult>> {
        pairs
            .par_iter()
            .map(|&(source, sink)| self.solve(graph, source, sink))
            .collect()
    }
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        "Ford-Fulkerson maximum flow with breadth-first augmenting paths (Edmonds-Karp), \
         O(V·E²) time on integer capacities."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V·E²)".to_string(),
            space_complexity: "O(V + E)".to_string(),
            iteration_bound: "O(V·E) augmentations".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: MAX_AUGMENTATIONS.to_string(),
                value: self.get_parameter(MAX_AUGMENTATIONS).unwrap_or_default(),
                value_type: ParameterType::OptionalInteger,
                constraints: Some(ParameterConstraints {
                    min: Some(0.0),
                    max: None,
                    allowed_values: None,
                }),
            },
            AlgorithmParameter {
                name: RECORD_TRACE.to_string(),
                value: self.get_parameter(RECORD_TRACE).unwrap_or_default(),
                value_type: ParameterType::Boolean,
                constraints: Some(ParameterConstraints {
                    min: None,
                    max: None,
                    allowed_values: Some(vec!["true".to_string(), "false".to_string()]),
                }),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()> {
        match name {
            MAX_AUGMENTATIONS => {
                self.config.max_augmentations = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    let limit = value.parse::<usize>().map_err(|_| FlowError::InvalidParameter {
                        name: name.to_string(),
                        reason: "must be a non-negative integer or `none`".to_string(),
                    })?;
                    Some(limit)
                };
                Ok(())
            }
            RECORD_TRACE => {
                self.config.record_trace = value.parse::<bool>().map_err(|_| FlowError::InvalidParameter {
                    name: name.to_string(),
                    reason: "must be `true` or `false`".to_string(),
                })?;
                Ok(())
            }
            _ => Err(FlowError::InvalidParameter {
                name: name.to_string(),
                reason: "unknown parameter".to_string(),
            }),
        }
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            MAX_AUGMENTATIONS => Some(
                self.config
                    .max_augmentations
                    .map_or_else(|| "none".to_string(), |limit| limit.to_string()),
            ),
            RECORD_TRACE => Some(self.config.record_trace.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_network() -> CapacityGraph {
        CapacityGraph::new(
            6,
            [
                (0, 1, 16),
                (0, 2, 13),
                (1, 2, 10),
                (1, 3, 12),
                (2, 1, 4),
                (2, 4, 14),
                (3, 2, 9),
                (3, 5, 20),
                (4, 3, 7),
                (4, 5, 4),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_reference_network() {
        let result = MaxFlowSolver::new().solve(&reference_network(), 0, 5).unwrap();
        assert_eq!(result.total_flow, 23);
        assert_eq!(result.augmentations.len(), result.metrics.augmentations);
        assert_eq!(result.augmentations.last().map(|a| a.total_after), Some(23));
    }

    #[test]
    fn test_first_augmentation_is_shortest_lowest_index_path() {
        let result = MaxFlowSolver::new().solve(&reference_network(), 0, 5).unwrap();
        let first = &result.augmentations[0];
        assert_eq!(first.path, vec![0, 1, 3, 5]);
        assert_eq!(first.bottleneck, 12);
        assert_eq!(first.total_after, 12);
    }

    #[test]
    fn test_augmentation_paths_never_shrink() {
        let result = MaxFlowSolver::new().solve(&reference_network(), 0, 5).unwrap();
        let lengths: Vec<usize> = result.augmentations.iter().map(|a| a.path.len()).collect();
        assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", lengths);
    }

    #[test]
    fn test_anti_parallel_edges() {
        let graph = CapacityGraph::new(3, [(0, 1, 5), (1, 0, 3), (1, 2, 5)]).unwrap();
        let result = MaxFlowSolver::new().solve(&graph, 0, 2).unwrap();

        assert_eq!(result.total_flow, 5);
        assert_eq!(result.residual.residual_capacity(1, 0), 8);
        assert_eq!(result.residual.residual_capacity(0, 1), 0);
        assert_eq!(result.flow_on(0, 1), 5);
        assert_eq!(result.flow_on(1, 0), 0);
        assert_eq!(result.flow_on(1, 2), 5);
    }

    #[test]
    fn test_invalid_endpoints() {
        let graph = reference_network();
        let solver = MaxFlowSolver::new();

        for (source, sink) in [(2, 2), (6, 5), (0, 6)] {
            let err = solver.solve(&graph, source, sink).unwrap_err();
            assert_eq!(
                err,
                FlowError::InvalidEndpoints {
                    source_vertex: source,
                    sink_vertex: sink,
                    vertex_count: 6
                }
            );
        }
    }

    #[test]
    fn test_unreachable_sink_is_zero_flow() {
        let graph = CapacityGraph::new(4, [(0, 1, 3), (2, 3, 3)]).unwrap();
        let result = MaxFlowSolver::new().solve(&graph, 0, 3).unwrap();

        assert_eq!(result.total_flow, 0);
        assert!(result.augmentations.is_empty());
        assert!(result.edge_flows.iter().all(|edge| edge.flow == 0));
    }

    #[test]
    fn test_min_cut_matches_flow() {
        let result = MaxFlowSolver::new().solve(&reference_network(), 0, 5).unwrap();
        let cut = result.min_cut();

        assert_eq!(cut.capacity, result.total_flow);
        assert!(cut.source_side.contains(&0));
        assert!(!cut.source_side.contains(&5));
        for &(from, to) in &cut.cut_edges {
            let edge = result.edge_flows.iter().find(|e| e.from == from && e.to == to).unwrap();
            assert_eq!(edge.flow, edge.capacity);
        }
    }

    #[test]
    fn test_augmentation_limit_aborts() {
        let mut solver = MaxFlowSolver::new();
        solver.set_parameter("max_augmentations", "1").unwrap();

        let err = solver.solve(&reference_network(), 0, 5).unwrap_err();
        assert_eq!(err, FlowError::Aborted { limit: 1 });
    }

    #[test]
    fn test_augmentation_limit_not_hit() {
        let graph = CapacityGraph::new(2, [(0, 1, 9)]).unwrap();
        let solver = MaxFlowSolver::with_config(SolverConfig {
            max_augmentations: Some(1),
            ..SolverConfig::default()
        });

        assert_eq!(solver.solve(&graph, 0, 1).unwrap().total_flow, 9);
    }

    #[test]
    fn test_trace_can_be_disabled() {
        let mut solver = MaxFlowSolver::new();
        solver.set_parameter("record_trace", "false").unwrap();

        let result = solver.solve(&reference_network(), 0, 5).unwrap();
        assert_eq!(result.total_flow, 23);
        assert!(result.augmentations.is_empty());
        assert!(result.metrics.augmentations > 0);
    }

    #[test]
    fn test_parameter_setting() {
        let mut solver = MaxFlowSolver::new();
        assert_eq!(solver.name(), "Edmonds-Karp");
        assert_eq!(solver.category(), "max_flow");
        assert_eq!(solver.get_parameter("max_augmentations"), Some("none".to_string()));
        assert_eq!(solver.get_parameter("record_trace"), Some("true".to_string()));

        assert!(solver.set_parameter("max_augmentations", "50").is_ok());
        assert_eq!(solver.get_parameter("max_augmentations"), Some("50".to_string()));
        assert!(solver.set_parameter("max_augmentations", "None").is_ok());
        assert_eq!(solver.config().max_augmentations, None);

        // Test invalid parameters
        assert!(solver.set_parameter("invalid_param", "value").is_err());
        assert!(solver.set_parameter("max_augmentations", "-3").is_err());
        assert!(solver.set_parameter("record_trace", "maybe").is_err());
        assert_eq!(solver.get_parameter("invalid_param"), None);

        let names: Vec<String> = solver.parameters().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["max_augmentations", "record_trace"]);
    }

    #[test]
    fn test_descriptors() {
        let solver = MaxFlowSolver::new();
        assert!(solver.description().contains("Edmonds-Karp"));

        let complexity = solver.complexity();
        assert_eq!(complexity.time_complexity, "O(V·E²)");
        assert_eq!(complexity.space_complexity, "O(V + E)");
        assert_eq!(complexity.iteration_bound, "O(V·E) augmentations");

        let parameters = solver.parameters();
        assert_eq!(parameters[0].value_type, ParameterType::OptionalInteger);
        assert_eq!(parameters[0].value, "none");
        assert_eq!(parameters[1].value_type, ParameterType::Boolean);
        assert_eq!(parameters[1].value, "true");
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"max_augmentations":10}"#).unwrap();
        assert_eq!(config.max_augmentations, Some(10));
        assert!(config.record_trace);
    }

    #[test]
    fn test_solve_many_preserves_order() {
        let graph = reference_network();
        let results = MaxFlowSolver::new().solve_many(&graph, &[(0, 5), (1, 5), (3, 3), (5, 0)]);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().total_flow, 23);
        assert_eq!(results[1].as_ref().unwrap().total_flow, 22);
        assert!(matches!(results[2], Err(FlowError::InvalidEndpoints { .. })));
        assert_eq!(results[3].as_ref().unwrap().total_flow, 0);
    }

    #[test]
    fn test_result_serializes() {
        let graph = CapacityGraph::new(2, [(0, 1, 4)]).unwrap();
        let result = MaxFlowSolver::new().solve(&graph, 0, 1).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["total_flow"], 4);
        assert_eq!(json["edge_flows"][0]["flow"], 4);
        assert_eq!(json["augmentations"][0]["path"], serde_json::json!([0, 1]));
    }
}

//! Core trait definitions and shared vocabulary for the flow solvers
//!
//! This module establishes the types every other component speaks in:
//! vertex and capacity aliases, the error taxonomy, the `Algorithm`
//! descriptor trait with string-typed parameters, and the lightweight
//! profiler that produces per-solve metrics.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::Debug;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Vertex identifier in `[0, n)`
pub type Vertex = usize;

/// Integer edge capacity. Signed so that negative input can be rejected
/// rather than silently wrapped.
pub type Capacity = i64;

/// Result alias used throughout the crate
pub type FlowResult<T> = Result<T, FlowError>;

/// Comprehensive error types for graph construction and solving
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid vertex: {vertex} is outside [0, {vertex_count})")]
    InvalidVertex { vertex: Vertex, vertex_count: usize },

    #[error("Invalid capacity: edge ({from}, {to}) has negative capacity {capacity}")]
    InvalidCapacity { from: Vertex, to: Vertex, capacity: Capacity },

    #[error("Self loop on vertex {vertex}")]
    SelfLoop { vertex: Vertex },

    #[error("Duplicate edge ({from}, {to})")]
    DuplicateEdge { from: Vertex, to: Vertex },

    #[error("Summed capacity overflows at edge ({from}, {to})")]
    CapacityOverflow { from: Vertex, to: Vertex },

    #[error("Invalid residual arc {arc}: {reason}")]
    InvalidResidualArc { arc: usize, reason: &'static str },

    #[error("Graph must contain at least one vertex")]
    EmptyGraph,

    #[error("Invalid endpoints: source {source_vertex}, sink {sink_vertex} in a graph of {vertex_count} vertices")]
    InvalidEndpoints { source_vertex: Vertex, sink_vertex: Vertex, vertex_count: usize },

    #[error("Aborted after reaching the augmentation limit of {limit}")]
    Aborted { limit: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub constraints: Option<ParameterConstraints>,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
    /// Integer that may also be the literal `none`
    OptionalInteger,
}

/// Parameter constraints for validating algorithm parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed_values: Option<Vec<String>>,
}

/// Algorithm complexity information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
    /// Upper bound on the number of outer iterations
    pub iteration_bound: String,
}

/// Descriptor and configuration surface shared by solver implementations
///
/// # Invariants
/// - State isolation between runs
/// - Deterministic behavior for given inputs
pub trait Algorithm: Debug + Send + Sync {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., max_flow)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description with complexity guarantees
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;
}

/// Execution metrics for a single solve
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveMetrics {
    /// Augmenting paths applied
    pub augmentations: usize,
    /// Vertices dequeued across every breadth-first pass
    pub vertices_explored: usize,
    pub execution_time: Duration,
}

/// Performance profiling integration
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: SolveMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_augmentation(&mut self) {
        self.metrics.augmentations += 1;
    }

    pub fn record_exploration(&mut self, vertices: usize) {
        self.metrics.vertices_explored += vertices;
    }

    pub fn augmentations(&self) -> usize {
        self.metrics.augmentations
    }

    pub fn get_metrics(&self) -> SolveMetrics {
        self.metrics.clone()
    }
}

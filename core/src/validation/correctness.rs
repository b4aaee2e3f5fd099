//! Correctness verification for computed flows
//!
//! Checks a finished [`MaxFlowResult`] against the graph it was computed on:
//! capacity bounds, conservation at intermediate vertices, consistency of the
//! final residual graph with the reported flows, and the Edmonds-Karp bound
//! on the number of augmentations. An empty report means the flow is valid.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::graph::max_flow::MaxFlowResult;
use crate::algorithm::traits::{Capacity, Vertex};
use crate::data_structures::graph::CapacityGraph;

/// A single violated flow property
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Violation {
    #[error("edge ({from}, {to}) carries {flow}, outside [0, {capacity}]")]
    CapacityBound { from: Vertex, to: Vertex, flow: Capacity, capacity: Capacity },

    #[error("vertex {vertex} receives {inflow} but sends {outflow}")]
    Conservation { vertex: Vertex, inflow: Capacity, outflow: Capacity },

    #[error("edge ({from}, {to}): residual {residual} + net flow {net_flow} != capacity {capacity}")]
    ResidualMismatch {
        from: Vertex,
        to: Vertex,
        residual: Capacity,
        net_flow: Capacity,
        capacity: Capacity,
    },

    #[error("residual arc ({from}, {to}) is negative: {residual}")]
    NegativeResidual { from: Vertex, to: Vertex, residual: Capacity },

    #[error("vertex {vertex} has net flow {net}, expected {expected}")]
    FlowValue { vertex: Vertex, net: Capacity, expected: Capacity },

    #[error("{augmentations} augmentations exceed the bound {bound}")]
    AugmentationBound { augmentations: usize, bound: usize },
}

/// Verify `result` against `graph`, returning every violation found
pub fn verify(graph: &CapacityGraph, result: &MaxFlowResult) -> Vec<Violation> {
    let mut violations = Vec::new();
    let vertex_count = graph.vertex_count();
    let mut inflow: Vec<Capacity> = vec![0; vertex_count];
    let mut outflow: Vec<Capacity> = vec![0; vertex_count];

    for (from, to, capacity) in graph.edges() {
        let flow = result.flow_on(from, to);
        if flow < 0 || flow > capacity {
            violations.push(Violation::CapacityBound { from, to, flow, capacity });
        }

        let net_flow = flow - result.flow_on(to, from);
        let residual = result.residual.residual_capacity(from, to);
        if residual + net_flow != capacity {
            violations.push(Violation::ResidualMismatch { from, to, residual, net_flow, capacity });
        }

        outflow[from] += flow;
        inflow[to] += flow;
    }

    for arc in result.residual.arcs() {
        if arc.residual() < 0 {
            violations.push(Violation::NegativeResidual {
                from: arc.from,
                to: arc.to,
                residual: arc.residual(),
            });
        }
    }

    for vertex in (0..vertex_count).filter(|&v| v != result.source && v != result.sink) {
        if inflow[vertex] != outflow[vertex] {
            violations.push(Violation::Conservation {
                vertex,
                inflow: inflow[vertex],
                outflow: outflow[vertex],
            });
        }
    }

    let source_net = outflow[result.source] - inflow[result.source];
    if source_net != result.total_flow {
        violations.push(Violation::FlowValue {
            vertex: result.source,
            net: source_net,
            expected: result.total_flow,
        });
    }
    let sink_net = inflow[result.sink] - outflow[result.sink];
    if sink_net != result.total_flow {
        violations.push(Violation::FlowValue {
            vertex: result.sink,
            net: sink_net,
            expected: result.total_flow,
        });
    }

    let bound = vertex_count * graph.edge_count();
    if result.metrics.augmentations > bound {
        violations.push(Violation::AugmentationBound {
            augmentations: result.metrics.augmentations,
            bound,
        });
    }

    violations
}

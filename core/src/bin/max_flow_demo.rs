//! Demonstration driver: solves the classic six-vertex network and narrates
//! each augmentation. Set `RUST_LOG=debug` (or `trace`) for solver internals.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use env_logger::Env;
use log::info;

use maxflow_core::{build_graph, max_flow, validation, CapacityGraph, FlowResult};

const SOURCE: usize = 0;
const SINK: usize = 5;

fn render_matrix(graph: &CapacityGraph) -> String {
    let mut out = String::from("Input Graph (Capacity Matrix):\n     ");
    for column in 0..graph.vertex_count() {
        out.push_str(&format!("{:>4}", column));
    }
    out.push('\n');

    for (row, capacities) in graph.to_matrix().iter().enumerate() {
        out.push_str(&format!("{:>3}: ", row));
        for &capacity in capacities {
            if capacity == 0 {
                out.push_str("   -");
            } else {
                out.push_str(&format!("{:>4}", capacity));
            }
        }
        out.push('\n');
    }
    out
}

fn main() -> FlowResult<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let graph = build_graph(
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
    )?;

    println!("{}", render_matrix(&graph));
    info!("source vertex {}, sink vertex {}", SOURCE, SINK);

    let result = max_flow(&graph, SOURCE, SINK)?;
    for (iteration, step) in result.augmentations.iter().enumerate() {
        let path: Vec<String> = step.path.iter().map(ToString::to_string).collect();
        info!(
            "iteration {}: path {}, bottleneck {}, total {}",
            iteration + 1,
            path.join(" -> "),
            step.bottleneck,
            step.total_after
        );
    }

    let cut = result.min_cut();
    info!("minimum cut {:?} with capacity {}", cut.cut_edges, cut.capacity);

    let violations = validation::verify(&graph, &result);
    for violation in &violations {
        log::error!("{}", violation);
    }

    println!(
        "Maximum flow from vertex {} to vertex {}: {} ({} augmentations, {:?})",
        SOURCE, SINK, result.total_flow, result.metrics.augmentations, result.metrics.execution_time
    );
    Ok(())
}

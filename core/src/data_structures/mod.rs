//! Graph representations used by the solvers
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;
pub mod residual;

pub use self::graph::{CapacityGraph, CapacityGraphBuilder, GraphDocument};
pub use self::residual::{ArcId, ResidualArc, ResidualDocument, ResidualGraph};

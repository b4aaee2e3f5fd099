//! Maximum flow over capacitated directed graphs
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod augmenting_path;
pub mod max_flow;

pub use self::augmenting_path::{AugmentingPath, AugmentingPathFinder};
pub use self::max_flow::{Augmentation, EdgeFlow, MaxFlowResult, MaxFlowSolver, MinCut, SolverConfig};

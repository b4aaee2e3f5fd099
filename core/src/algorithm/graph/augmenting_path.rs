//! Breadth-first augmenting path search
//!
//! Finds a path of strictly positive residual capacity from source to sink.
//! Breadth-first order guarantees the path found has the fewest arcs, which
//! bounds the number of augmentations by `O(V·E)` (Edmonds-Karp).
//!
//! The path is kept as a parent map rather than a vertex list: each reached
//! vertex records the arc it was first discovered through. Scanning arcs in
//! ascending destination order makes the recorded parents, and therefore the
//! path, deterministic.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use crate::algorithm::traits::Vertex;
use crate::data_structures::residual::{ArcId, ResidualGraph};

/// Parent map describing one augmenting path
#[derive(Debug, Clone, Default)]
pub struct AugmentingPath {
    source: Vertex,
    sink: Vertex,
    /// `parent[v]` = `(predecessor, arc into v)` for every reached vertex
    parent: Vec<Option<(Vertex, ArcId)>>,
}

impl AugmentingPath {
    #[inline]
    pub fn source(&self) -> Vertex {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> Vertex {
        self.sink
    }

    /// Predecessor of `vertex` in the search tree
    pub fn predecessor(&self, vertex: Vertex) -> Option<Vertex> {
        self.parent.get(vertex).copied().flatten().map(|(pred, _)| pred)
    }

    /// Arcs of the path, walked backwards from sink to source
    pub fn arcs(&self) -> PathArcs<'_> {
        PathArcs {
            path: self,
            current: self.sink,
        }
    }

    /// Vertices of the path in source-to-sink order
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut vertices = vec![self.sink];
        let mut current = self.sink;
        while let Some(pred) = self.predecessor(current) {
            vertices.push(pred);
            current = pred;
        }
        vertices.reverse();
        vertices
    }

    fn reset(&mut self, vertex_count: usize, source: Vertex, sink: Vertex) {
        self.source = source;
        self.sink = sink;
        self.parent.clear();
        self.parent.resize(vertex_count, None);
    }
}

/// Backward iterator over the arcs of an [`AugmentingPath`]
#[derive(Debug)]
pub struct PathArcs<'a> {
    path: &'a AugmentingPath,
    current: Vertex,
}

impl Iterator for PathArcs<'_> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        if self.current == self.path.source {
            return None;
        }
        let (pred, arc) = self.path.parent.get(self.current).copied().flatten()?;
        self.current = pred;
        Some(arc)
    }
}

/// Reusable breadth-first path finder
///
/// Buffers are kept between calls so repeated searches during one solve do
/// not reallocate.
#[derive(Debug, Default)]
pub struct AugmentingPathFinder {
    path: AugmentingPath,
    visited: Vec<bool>,
    queue: VecDeque<Vertex>,
    last_explored: usize,
}

impl AugmentingPathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path recorded by the most recent successful search
    pub fn path(&self) -> &AugmentingPath {
        &self.path
    }

    /// Vertices dequeued by the most recent search
    pub fn last_explored(&self) -> usize {
        self.last_explored
    }

    /// Search for an augmenting path from `source` to `sink`.
    ///
    /// Returns `None` when the sink is unreachable through positive residual
    /// arcs, including when `source == sink` or either endpoint lies outside
    /// the residual graph.
    pub fn find(&mut self, residual: &ResidualGraph, source: Vertex, sink: Vertex) -> Option<&AugmentingPath> {
        let vertex_count = residual.vertex_count();
        self.path.reset(vertex_count, source, sink);
        self.visited.clear();
        self.visited.resize(vertex_count, false);
        self.queue.clear();
        self.last_explored = 0;

        if source >= vertex_count || sink >= vertex_count || source == sink {
            return None;
        }

        self.visited[source] = true;
        self.queue.push_back(source);

        while let Some(vertex) = self.queue.pop_front() {
            self.last_explored += 1;

            for (arc_id, arc) in residual.arcs_from(vertex) {
                if self.visited[arc.to] || arc.residual() <= 0 {
                    continue;
                }

                self.visited[arc.to] = true;
                self.path.parent[arc.to] = Some((vertex, arc_id));

                // First discovery of the sink already fixes a shortest path
                if arc.to == sink {
                    return Some(&self.path);
                }
                self.queue.push_back(arc.to);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::CapacityGraph;

    #[test]
    fn test_finds_shortest_path() {
        // 0 -> 1 -> 2 -> 3 and a direct 0 -> 3
        let graph = CapacityGraph::new(4, [(0, 1, 1), (1, 2, 1), (2, 3, 1), (0, 3, 1)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&graph);
        let mut finder = AugmentingPathFinder::new();

        let path = finder.find(&residual, 0, 3).unwrap();
        assert_eq!(path.vertices(), vec![0, 3]);
        assert_eq!(path.arcs().count(), 1);
    }

    #[test]
    fn test_ascending_scan_order_breaks_ties() {
        // Two equally short routes 0 -> 1 -> 3 and 0 -> 2 -> 3
        let graph = CapacityGraph::new(4, [(0, 2, 1), (0, 1, 1), (2, 3, 1), (1, 3, 1)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&graph);
        let mut finder = AugmentingPathFinder::new();

        let path = finder.find(&residual, 0, 3).unwrap();
        assert_eq!(path.vertices(), vec![0, 1, 3]);
        assert_eq!(path.predecessor(3), Some(1));
        assert_eq!(path.predecessor(0), None);
    }

    #[test]
    fn test_zero_capacity_arcs_are_not_traversed() {
        let graph = CapacityGraph::new(3, [(0, 1, 4), (1, 2, 0)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&graph);
        let mut finder = AugmentingPathFinder::new();

        assert!(finder.find(&residual, 0, 2).is_none());
        assert_eq!(finder.last_explored(), 2);
    }

    #[test]
    fn test_arcs_walk_back_to_source() {
        let graph = CapacityGraph::new(3, [(0, 1, 4), (1, 2, 3)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&graph);
        let mut finder = AugmentingPathFinder::new();

        let path = finder.find(&residual, 0, 2).unwrap();
        let pairs: Vec<(Vertex, Vertex)> = path
            .arcs()
            .map(|arc| (residual.arc(arc).from, residual.arc(arc).to))
            .collect();
        assert_eq!(pairs, vec![(1, 2), (0, 1)]);
        assert_eq!(residual.bottleneck(path.arcs()), Some(3));
    }

    #[test]
    fn test_out_of_range_endpoints_find_nothing() {
        let graph = CapacityGraph::new(3, [(0, 1, 4), (1, 2, 3)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&graph);
        let mut finder = AugmentingPathFinder::new();

        assert!(finder.find(&residual, 3, 2).is_none());
        assert!(finder.find(&residual, 0, 17).is_none());
        assert!(finder.find(&residual, 1, 1).is_none());
        assert_eq!(finder.last_explored(), 0);
        assert!(finder.find(&residual, 0, 2).is_some());
    }

    #[test]
    fn test_finder_reuse_across_graph_sizes() {
        let mut finder = AugmentingPathFinder::new();

        let large = CapacityGraph::new(5, [(0, 4, 1)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&large);
        assert!(finder.find(&residual, 0, 4).is_some());

        let small = CapacityGraph::new(2, [(1, 0, 1)]).unwrap();
        let residual = ResidualGraph::from_capacity_graph(&small);
        assert!(finder.find(&residual, 0, 1).is_none());
    }
}

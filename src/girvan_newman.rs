use std::collections::HashSet;

use anyhow::{bail, Result};
use log::{debug, info};

use crate::betweenness::BetweennessCalculator;
use crate::config::DetectorOptions;
use crate::graph::{Graph, VInt};

/// A community structure: one vertex list per community.
pub type CommStructure = Vec<Vec<VInt>>;

/// The two states of the detection loop. `Searching` keeps removing edges;
/// `Split` is terminal once the graph falls apart into two or more pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Searching,
    Split,
}

/// Girvan-Newman community detection.
///
/// Scores every live edge with betweenness centrality, removes the edges
/// tied at the maximum, and re-checks connectivity. Repeats until the
/// graph splits into two or more components. The detector owns the graph
/// and mutates it exclusively; the calculator only reads it, so the score
/// and removal phases of one round never overlap.
pub struct CommunityDetector {
    graph: Graph,
    calculator: BetweennessCalculator,
    state: DetectorState,
}

/// The outcome of a run: communities, the residual graph after all
/// removals, and how many removal rounds it took.
pub struct Detection {
    pub communities: CommStructure,
    pub graph: Graph,
    pub rounds: u32,
}

#[allow(dead_code)]
impl CommunityDetector {
    pub fn new(graph: Graph) -> CommunityDetector {
        Self::with_options(graph, &DetectorOptions::default())
    }

    pub fn with_options(graph: Graph, options: &DetectorOptions) -> CommunityDetector {
        CommunityDetector {
            graph,
            calculator: BetweennessCalculator::with_parallel(options.parallel),
            state: DetectorState::Searching,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    /// Run the loop to the first split, however many pieces it produces.
    ///
    /// Every edge tied at the maximum score is removed in the same round,
    /// so a single round can fracture the graph into more than two
    /// communities. A graph that cannot split further (no edges left while
    /// still forming fewer than two components) is an error rather than an
    /// endless loop.
    pub fn detect(mut self) -> Result<Detection> {
        let mut communities: CommStructure = vec![];
        let mut rounds = 0u32;
        while communities.len() < 2 {
            let scores = self.calculator.execute(&self.graph);
            if scores.is_empty() {
                bail!("graph has no edges left to remove and still forms fewer than two communities");
            }
            let max_score = scores.values().fold(f64::NEG_INFINITY, |acc, &s| acc.max(s));
            // The score table is a snapshot of the live edges, so every
            // removal below must succeed; a miss is a contract violation.
            let to_remove: Vec<(VInt, VInt)> = scores
                .iter()
                .filter(|(_, &score)| score == max_score)
                .map(|(&key, _)| key)
                .collect();
            for (u, v) in &to_remove {
                self.graph.remove_edge(*u, *v)?;
            }
            rounds += 1;
            debug!(
                "round {}: removed {} edge(s) at score {:.2}",
                rounds,
                to_remove.len(),
                max_score
            );
            communities = Self::connected_components(&self.graph);
        }
        self.state = DetectorState::Split;
        info!(
            "split into {} communities after {} round(s)",
            communities.len(),
            rounds
        );
        Ok(Detection {
            communities,
            graph: self.graph,
            rounds,
        })
    }

    /// Connected components by iterative depth-first traversal. The
    /// explicit stack keeps elongated graphs off the call stack; every
    /// unvisited vertex (ascending id) seeds a new component.
    pub fn connected_components(graph: &Graph) -> CommStructure {
        let mut visited = HashSet::<VInt>::new();
        let mut components: CommStructure = vec![];
        for &seed in graph.adj_map.keys() {
            if visited.contains(&seed) {
                continue;
            }
            let mut component = vec![];
            let mut stack = vec![seed];
            visited.insert(seed);
            while let Some(vertex) = stack.pop() {
                component.push(vertex);
                for neighbor in graph.get_neighbor(&vertex) {
                    if !visited.contains(&neighbor) {
                        visited.insert(neighbor);
                        stack.push(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

#[cfg(test)]
mod test_girvan_newman {
    use crate::girvan_newman::{CommStructure, CommunityDetector, DetectorState};
    use crate::graph::Graph;

    fn sorted(mut communities: CommStructure) -> CommStructure {
        for community in communities.iter_mut() {
            community.sort_unstable();
        }
        communities.sort();
        communities
    }

    #[test]
    fn test_bridge_graph_splits_in_one_round() {
        let g = Graph::from_edges(vec![
            (1, 2),
            (2, 3),
            (3, 1),
            (4, 5),
            (5, 6),
            (6, 4),
            (3, 4),
        ]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        assert_eq!(detection.rounds, 1);
        assert_eq!(
            sorted(detection.communities),
            vec![vec![1, 2, 3], vec![4, 5, 6]]
        );
        // Only the bridge came out.
        assert_eq!(detection.graph.get_edge_count(), 6);
        assert!(!detection.graph.has_edge(&3, &4));
    }

    #[test]
    fn test_minimal_two_vertex_graph() {
        let g = Graph::from_edges(vec![(1, 2)]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        assert_eq!(detection.rounds, 1);
        assert_eq!(sorted(detection.communities), vec![vec![1], vec![2]]);
        assert_eq!(detection.graph.get_edge_count(), 0);
    }

    #[test]
    fn test_star_ties_fracture_past_two() {
        // Three equal arms around vertex 0; all three edges tie at the
        // maximum and leave in the same round.
        let g = Graph::from_edges(vec![(0, 1), (0, 2), (0, 3)]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        assert_eq!(detection.rounds, 1);
        assert_eq!(detection.communities.len(), 4);
        assert_eq!(
            sorted(detection.communities),
            vec![vec![0], vec![1], vec![2], vec![3]]
        );
    }

    #[test]
    fn test_already_disconnected_input_still_runs_one_round() {
        // The loop body executes at least once even when the input already
        // has two components.
        let g = Graph::from_edges(vec![(1, 2), (3, 4)]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        assert_eq!(detection.rounds, 1);
        assert_eq!(detection.communities.len(), 4);
    }

    #[test]
    fn test_path_graph_splits_at_middle_edge() {
        let g = Graph::from_edges(vec![(1, 2), (2, 3), (3, 4)]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        assert_eq!(detection.rounds, 1);
        assert_eq!(
            sorted(detection.communities),
            vec![vec![1, 2], vec![3, 4]]
        );
    }

    #[test]
    fn test_empty_graph_is_an_error() {
        let g = Graph::from_edges(vec![]);
        assert!(CommunityDetector::new(g).detect().is_err());
    }

    #[test]
    fn test_detector_starts_searching() {
        let g = Graph::from_edges(vec![(1, 2)]);
        let detector = CommunityDetector::new(g);
        assert_eq!(detector.state(), DetectorState::Searching);
    }

    #[test]
    fn test_components_iterative_on_long_path() {
        // Deep enough that a recursive traversal would overflow the stack.
        let edges: Vec<(u32, u32)> = (0..200_000).map(|i| (i, i + 1)).collect();
        let g = Graph::from_edges(edges);
        let components = CommunityDetector::connected_components(&g);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 200_001);
    }
}

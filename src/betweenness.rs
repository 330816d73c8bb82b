use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, VecDeque};

use fixedbitset::FixedBitSet;
use itertools::Itertools;
use rayon::prelude::*;

use crate::graph::{edge_key, Graph, VInt};
use crate::util::round2;

/// Edge-betweenness scores keyed by canonical edge.
pub type EbcTable = BTreeMap<(VInt, VInt), f64>;

/// Computes edge-betweenness centrality for every live edge of a graph.
///
/// One BFS-and-accumulate pass per root vertex, Brandes style: count the
/// shortest paths on the way down, then push dependency credit back up the
/// predecessor edges in decreasing depth order. Each unordered vertex pair
/// is counted from both endpoints, so the accumulated scores are halved
/// before the final 2-decimal rounding.
pub struct BetweennessCalculator {
    parallel: bool,
}

/// The result of one BFS pass: depth, shortest-path counts and predecessor
/// sets for every vertex reachable from the root. Unreached vertices keep
/// depth -1.
struct BfsPass {
    depth: Vec<i64>,
    paths: Vec<f64>,
    predecessors: Vec<Vec<usize>>,
}

#[allow(dead_code)]
impl BetweennessCalculator {
    pub fn new() -> BetweennessCalculator {
        BetweennessCalculator { parallel: false }
    }

    /// Fan the per-root passes out with rayon. Off by default. Root-local
    /// tables are reduced in ascending root order, so the merged table
    /// matches the sequential one after the final rounding.
    pub fn with_parallel(parallel: bool) -> BetweennessCalculator {
        BetweennessCalculator { parallel }
    }

    /// Compute the score table for every currently-existing edge.
    pub fn execute(&self, graph: &Graph) -> EbcTable {
        let (nodes, adj) = build_index(graph);

        // Every live edge gets an entry, so edges in components the current
        // root never reaches still show up with score 0.00.
        let mut table: EbcTable = graph
            .edge_keys()
            .into_iter()
            .map(|key| (key, 0.0))
            .collect();

        if self.parallel {
            let locals: Vec<EbcTable> = (0..nodes.len())
                .into_par_iter()
                .map(|root| {
                    let mut local = EbcTable::new();
                    accumulate_root(&nodes, &adj, root, &mut local);
                    local
                })
                .collect();
            // Ascending root order, same summation order as the loop below.
            for local in locals {
                for (key, value) in local {
                    *table.entry(key).or_insert(0.0) += value;
                }
            }
        } else {
            for root in 0..nodes.len() {
                accumulate_root(&nodes, &adj, root, &mut table);
            }
        }

        for value in table.values_mut() {
            *value = round2(*value / 2.0);
        }
        table
    }
}

/// Map the sparse vertex ids onto a dense index and rebuild the adjacency
/// lists over it. Key order of the adjacency map fixes the index order.
fn build_index(graph: &Graph) -> (Vec<VInt>, Vec<Vec<usize>>) {
    let nodes: Vec<VInt> = graph.adj_map.keys().copied().collect();
    let index: HashMap<VInt, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, &vertex_id)| (vertex_id, idx))
        .collect();
    let adj = graph
        .adj_map
        .values()
        .map(|neighbors| neighbors.iter().map(|v| index[v]).collect())
        .collect();
    (nodes, adj)
}

/// Breadth-first pass from the root, producing depth, shortest-path counts
/// and predecessor sets. A vertex rediscovered through another vertex one
/// level up accumulates that parent's path count and gains it as another
/// predecessor; duplicate adjacency entries count once per occurrence.
fn bfs_pass(adj: &[Vec<usize>], root: usize) -> BfsPass {
    let vertex_count = adj.len();
    let mut depth = vec![-1i64; vertex_count];
    let mut paths = vec![0.0f64; vertex_count];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    let mut visited = FixedBitSet::with_capacity(vertex_count);
    let mut queue = VecDeque::new();

    depth[root] = 0;
    paths[root] = 1.0;
    visited.insert(root);
    queue.push_back(root);

    while let Some(parent) = queue.pop_front() {
        for &child in &adj[parent] {
            if !visited.contains(child) {
                visited.insert(child);
                depth[child] = depth[parent] + 1;
                queue.push_back(child);
            }
            // On a shortest path: the parent sits exactly one level up.
            if depth[child] == depth[parent] + 1 {
                paths[child] += paths[parent];
                predecessors[child].push(parent);
            }
        }
    }

    BfsPass {
        depth,
        paths,
        predecessors,
    }
}

/// Back-propagate one root's pass into the score table and return the
/// dependency credit accumulated per vertex. Vertices are processed in
/// strictly decreasing depth, ties broken by ascending vertex id, so the
/// summation order is reproducible.
fn accumulate_root(
    nodes: &[VInt],
    adj: &[Vec<usize>],
    root: usize,
    table: &mut EbcTable,
) -> Vec<f64> {
    let pass = bfs_pass(adj, root);
    let mut dependency = vec![0.0f64; adj.len()];

    let order = (0..adj.len())
        .filter(|&u| u != root && pass.depth[u] > 0)
        .sorted_by_key(|&u| (Reverse(pass.depth[u]), u))
        .collect_vec();

    for u in order {
        for &p in &pass.predecessors[u] {
            let contribution = (1.0 + dependency[u]) / pass.paths[u] * pass.paths[p];
            let key = edge_key(nodes[p], nodes[u]);
            *table.entry(key).or_insert(0.0) += contribution;
            dependency[p] += contribution;
        }
    }
    dependency
}

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};

#[allow(dead_code)]
pub type VInt = u32;

/// Canonical undirected edge key, smaller endpoint first.
pub fn edge_key(u: VInt, v: VInt) -> (VInt, VInt) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// An undirected graph stored as an adjacency list.
///
/// Each neighbor list is an ordered multiset: duplicate edges in the input
/// produce duplicate entries, and removal takes out a single instance.
#[derive(Default)]
pub struct Graph {
    pub(crate) adj_map: BTreeMap<VInt, Vec<VInt>>,
    initial_edges: Vec<(VInt, VInt)>,
}

#[allow(dead_code)]
impl Graph {
    pub fn new() -> Graph {
        Graph {
            adj_map: BTreeMap::new(),
            initial_edges: Vec::new(),
        }
    }

    /// Build a graph from an edge list. The vertex set is the union of all
    /// edge endpoints; vertices never gain or disappear afterwards.
    pub fn from_edges(edges: Vec<(VInt, VInt)>) -> Graph {
        let mut adj_map = BTreeMap::<VInt, Vec<VInt>>::new();
        for (u, v) in &edges {
            adj_map.entry(*u).or_insert_with(Vec::new);
            adj_map.entry(*v).or_insert_with(Vec::new);
        }
        let mut graph = Graph {
            adj_map,
            initial_edges: edges.clone(),
        };
        for (u, v) in edges {
            graph.insert_edge(u, v);
        }
        graph
    }

    /// Append v to u's neighbor list and u to v's list. No self-loop or
    /// duplicate check.
    pub fn insert_edge(&mut self, u: VInt, v: VInt) {
        self.adj_map.entry(u).or_insert_with(Vec::new).push(v);
        self.adj_map.entry(v).or_insert_with(Vec::new).push(u);
    }

    /// Remove an existing edge from the graph.
    ///
    /// Removal contract: takes out the first occurrence of v in u's list and
    /// the first occurrence of u in v's list, leaving any duplicates behind.
    /// Fails if the edge is not present.
    pub fn remove_edge(&mut self, u: VInt, v: VInt) -> Result<()> {
        let pos_v = self
            .adj_map
            .get(&u)
            .and_then(|neighbors| neighbors.iter().position(|&n| n == v));
        let pos_u = self
            .adj_map
            .get(&v)
            .and_then(|neighbors| neighbors.iter().position(|&n| n == u));
        match (pos_v, pos_u) {
            (Some(i), Some(j)) => {
                self.adj_map.get_mut(&u).unwrap().remove(i);
                self.adj_map.get_mut(&v).unwrap().remove(j);
                Ok(())
            }
            _ => bail!("edge ({}, {}) not found in graph", u, v),
        }
    }

    pub fn get_vertex_count(&self) -> u32 {
        self.adj_map.len() as u32
    }

    /// Live undirected edge count, recomputed from the adjacency lists.
    /// Tracks removals, unlike the construction-time figure below.
    pub fn get_edge_count(&self) -> u32 {
        let degree_sum: usize = self.adj_map.values().map(|neighbors| neighbors.len()).sum();
        (degree_sum / 2) as u32
    }

    /// Number of edges the graph was constructed with. Not kept in sync
    /// with later removals.
    pub fn get_initial_edge_count(&self) -> u32 {
        self.initial_edges.len() as u32
    }

    pub fn get_initial_edges(&self) -> &[(VInt, VInt)] {
        &self.initial_edges
    }

    pub fn get_neighbor(&self, u: &VInt) -> Vec<VInt> {
        if self.adj_map.contains_key(u) {
            self.adj_map.get(u).unwrap().clone()
        } else {
            vec![]
        }
    }

    /// If an edge exists in this graph.
    pub fn has_edge(&self, u: &VInt, v: &VInt) -> bool {
        if self.adj_map.contains_key(u) {
            self.adj_map.get(u).unwrap().contains(v)
        } else {
            false
        }
    }

    /// The canonical keys of every live edge, duplicates collapsed.
    pub fn edge_keys(&self) -> BTreeSet<(VInt, VInt)> {
        let mut keys = BTreeSet::new();
        for (u, neighbors) in &self.adj_map {
            for v in neighbors {
                keys.insert(edge_key(*u, *v));
            }
        }
        keys
    }

    pub fn print_graph(&self) {
        for (u, neighbors) in self.adj_map.iter() {
            print!("{} -> ", u);
            for v in neighbors.iter() {
                print!("{} ", v);
            }
            println!();
        }
    }
}

//! Girvan-Newman community detection over undirected graphs.
//!
//! Repeatedly scores every live edge with edge-betweenness centrality,
//! removes the edges tied at the maximum and re-checks connectivity until
//! the graph falls apart into two or more communities.

pub mod betweenness;
pub mod config;
pub mod girvan_newman;
pub mod graph;
pub mod loader;
pub mod logger;
pub mod report;
pub mod util;

pub use crate::betweenness::{BetweennessCalculator, EbcTable};
pub use crate::config::DetectorOptions;
pub use crate::girvan_newman::{CommStructure, CommunityDetector, Detection, DetectorState};
pub use crate::graph::{Graph, VInt};

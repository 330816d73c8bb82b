use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::girvan_newman::Detection;
use crate::loader::NodeLabels;

/// The JSON artifact handed to rendering: communities over the residual
/// graph, plus the original edges to draw them over.
#[derive(Debug, Serialize)]
pub struct CommunityReport {
    pub community_count: usize,
    pub rounds: u32,
    pub communities: Vec<Vec<String>>,
    pub residual_edges: Vec<(String, String)>,
    pub original_edges: Vec<(String, String)>,
}

impl CommunityReport {
    pub fn build(detection: &Detection, labels: &NodeLabels) -> CommunityReport {
        let communities: Vec<Vec<String>> = detection
            .communities
            .iter()
            .map(|community| community.iter().map(|&v| labels.render(v)).collect())
            .collect();
        let residual_edges = detection
            .graph
            .edge_keys()
            .into_iter()
            .map(|(u, v)| (labels.render(u), labels.render(v)))
            .collect();
        let original_edges = detection
            .graph
            .get_initial_edges()
            .iter()
            .map(|&(u, v)| (labels.render(u), labels.render(v)))
            .collect();
        CommunityReport {
            community_count: detection.communities.len(),
            rounds: detection.rounds,
            communities,
            residual_edges,
            original_edges,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("failed to serialize report {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod test_report {
    use crate::girvan_newman::CommunityDetector;
    use crate::graph::Graph;
    use crate::loader::NodeLabels;
    use crate::report::CommunityReport;

    #[test]
    fn test_build_report_from_bridge_graph() {
        let g = Graph::from_edges(vec![
            (0, 1),
            (1, 2),
            (2, 0),
            (3, 4),
            (4, 5),
            (5, 3),
            (2, 3),
        ]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        let labels = NodeLabels::Text(
            ["a", "b", "c", "d", "e", "f"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let report = CommunityReport::build(&detection, &labels);
        assert_eq!(report.community_count, 2);
        assert_eq!(report.rounds, 1);
        // The bridge stays in the original edges but not the residual ones.
        assert!(report
            .original_edges
            .contains(&("c".to_string(), "d".to_string())));
        assert!(!report
            .residual_edges
            .contains(&("c".to_string(), "d".to_string())));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let g = Graph::from_edges(vec![(1, 2)]);
        let detection = CommunityDetector::new(g).detect().unwrap();
        let report = CommunityReport::build(&detection, &NodeLabels::Numeric);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["community_count"], 2);
        assert_eq!(json["residual_edges"].as_array().unwrap().len(), 0);
        assert_eq!(json["original_edges"].as_array().unwrap().len(), 1);
    }
}

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::warn;

use crate::config::READ_BUFFER_SIZE;
use crate::graph::{Graph, VInt};

/// How the vertex ids of a loaded graph map back to the input file.
pub enum NodeLabels {
    /// Identifiers were numeric and are used as-is.
    Numeric,
    /// Identifiers were textual; vertex v renders as the v-th label, in
    /// first-appearance order.
    Text(Vec<String>),
}

impl NodeLabels {
    pub fn render(&self, vertex_id: VInt) -> String {
        match self {
            NodeLabels::Numeric => vertex_id.to_string(),
            NodeLabels::Text(labels) => labels[vertex_id as usize].clone(),
        }
    }
}

pub struct LoadedGraph {
    pub graph: Graph,
    pub labels: NodeLabels,
}

/// Read an edge-list file, one `u v` pair per line.
///
/// The identifier type is decided once, by the first character of the
/// first record: a digit means the whole file is numeric, anything else
/// means textual ids, interned to dense vertex ids. Duplicate records are
/// rejected before the graph is built; malformed lines are errors.
pub fn load_edge_list(path: impl AsRef<Path>) -> Result<LoadedGraph> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open edge list {}", path.display()))?;
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    let mut numeric: Option<bool> = None;
    let mut seen_records = HashSet::<String>::new();
    let mut label_index = HashMap::<String, VInt>::new();
    let mut labels: Vec<String> = vec![];
    let mut edges: Vec<(VInt, VInt)> = vec![];

    for (line_idx, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("failed to read {} line {}", path.display(), line_idx + 1))?;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }
        if !seen_records.insert(record.to_string()) {
            warn!("line {}: duplicate record '{}' rejected", line_idx + 1, record);
            continue;
        }
        let tokens: Vec<&str> = record.split_whitespace().collect();
        if tokens.len() != 2 {
            bail!(
                "line {}: expected two identifiers, found {}",
                line_idx + 1,
                tokens.len()
            );
        }
        let is_numeric =
            *numeric.get_or_insert_with(|| record.chars().next().unwrap().is_ascii_digit());
        let (u, v) = if is_numeric {
            (
                parse_vertex(tokens[0], line_idx)?,
                parse_vertex(tokens[1], line_idx)?,
            )
        } else {
            (
                intern_label(tokens[0], &mut label_index, &mut labels),
                intern_label(tokens[1], &mut label_index, &mut labels),
            )
        };
        edges.push((u, v));
    }

    if edges.is_empty() {
        bail!("edge list {} holds no records", path.display());
    }

    let labels = if labels.is_empty() {
        NodeLabels::Numeric
    } else {
        NodeLabels::Text(labels)
    };
    Ok(LoadedGraph {
        graph: Graph::from_edges(edges),
        labels,
    })
}

fn parse_vertex(token: &str, line_idx: usize) -> Result<VInt> {
    token.parse::<VInt>().with_context(|| {
        format!(
            "line {}: invalid numeric identifier '{}'",
            line_idx + 1,
            token
        )
    })
}

fn intern_label(token: &str, index: &mut HashMap<String, VInt>, labels: &mut Vec<String>) -> VInt {
    if let Some(&id) = index.get(token) {
        return id;
    }
    let id = labels.len() as VInt;
    labels.push(token.to_string());
    index.insert(token.to_string(), id);
    id
}

#[cfg(test)]
mod test_loader {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::loader::{load_edge_list, NodeLabels};

    fn write_edge_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_numeric_edges() {
        let file = write_edge_file("1 2\n2 3\n\n3 1\n");
        let loaded = load_edge_list(file.path()).unwrap();
        assert_eq!(loaded.graph.get_vertex_count(), 3);
        assert_eq!(loaded.graph.get_edge_count(), 3);
        assert!(matches!(loaded.labels, NodeLabels::Numeric));
        assert_eq!(loaded.labels.render(2), "2");
    }

    #[test]
    fn test_load_textual_edges_round_trips_labels() {
        let file = write_edge_file("alice bob\nbob carol\n");
        let loaded = load_edge_list(file.path()).unwrap();
        assert_eq!(loaded.graph.get_vertex_count(), 3);
        assert_eq!(loaded.labels.render(0), "alice");
        assert_eq!(loaded.labels.render(1), "bob");
        assert_eq!(loaded.labels.render(2), "carol");
    }

    #[test]
    fn test_duplicate_records_rejected() {
        let file = write_edge_file("1 2\n1 2\n2 3\n");
        let loaded = load_edge_list(file.path()).unwrap();
        // The duplicate never reaches the graph.
        assert_eq!(loaded.graph.get_edge_count(), 2);
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let file = write_edge_file("1 2\n3\n");
        assert!(load_edge_list(file.path()).is_err());

        let file = write_edge_file("1 2\n3 4 5\n");
        assert!(load_edge_list(file.path()).is_err());

        let file = write_edge_file("1 2\n3 x\n");
        assert!(load_edge_list(file.path()).is_err());
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = write_edge_file("\n\n");
        assert!(load_edge_list(file.path()).is_err());
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub(crate) const READ_BUFFER_SIZE: usize = 128 * 1024 * 1024;

/// Scale of the fixed 2-decimal output precision of the score table.
pub(crate) const EBC_SCALE: f64 = 100.0;

/// Options for a detection run, optionally loaded from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorOptions {
    /// Fan the per-root betweenness passes out with rayon.
    #[serde(default)]
    pub parallel: bool,
}

impl DetectorOptions {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<DetectorOptions> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse options file {}", path.display()))
    }
}

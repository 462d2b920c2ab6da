// ============================================================
// Layer 4: Subgraph Dataset Loader
// ============================================================
// Reads a precomputed subgraph dataset from disk.
//
// Dataset directory layout:
//   {data_root}/_{name}_{hops}_hop_node2vecWindowSize={w}_{shuffled|notShuffled}_dataset/
//     subgraphs.jsonl   ← one JSON SubgraphSample per line
//
// Example line:
//   {"node_features":[[0.1,0.3],[0.2,0.0]],"edges":[[0,1]],"label":1,
//    "lncrna":"n1234","protein":"P0001"}
//
// Every sample is validated as it is read and all samples
// must share one node feature width. Errors carry the file
// path and the 1-based line number.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::subgraph::SubgraphSample;
use crate::domain::traits::SubgraphSource;

/// File name of the sample list inside a dataset directory
pub const SAMPLES_FILE: &str = "subgraphs.jsonl";

/// Build the dataset directory for a given interaction dataset,
/// hop count and node2vec window.
pub fn dataset_dir(
    data_root:    impl AsRef<Path>,
    dataset_name: &str,
    hop_number:   usize,
    window_size:  usize,
    shuffled:     bool,
) -> PathBuf {
    let order = if shuffled { "shuffled" } else { "notShuffled" };
    data_root.as_ref().join(format!(
        "_{dataset_name}_{hop_number}_hop_node2vecWindowSize={window_size}_{order}_dataset"
    ))
}

/// Loads the `subgraphs.jsonl` file of one dataset directory.
pub struct JsonlSubgraphLoader {
    dir: PathBuf,
}

impl JsonlSubgraphLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn samples_path(&self) -> PathBuf {
        self.dir.join(SAMPLES_FILE)
    }
}

impl SubgraphSource for JsonlSubgraphLoader {
    fn load_all(&self) -> Result<Vec<SubgraphSample>> {
        let path = self.samples_path();
        let file = File::open(&path).with_context(|| {
            format!(
                "Cannot open dataset '{}'. Build the subgraph dataset first.",
                path.display()
            )
        })?;

        let mut samples: Vec<SubgraphSample> = Vec::new();
        let mut width: Option<usize> = None;

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line_no = idx + 1;
            let line = line
                .with_context(|| format!("Cannot read '{}' line {line_no}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }

            let sample: SubgraphSample = serde_json::from_str(&line).with_context(|| {
                format!("Malformed sample in '{}' line {line_no}", path.display())
            })?;

            if let Err(reason) = sample.validate() {
                bail!("Invalid sample in '{}' line {line_no}: {reason}", path.display());
            }

            let w = sample.num_node_features();
            match width {
                None => width = Some(w),
                Some(expected) if expected != w => bail!(
                    "Invalid sample in '{}' line {line_no}: {w} node features, \
                     the dataset uses {expected}",
                    path.display()
                ),
                Some(_) => {}
            }

            samples.push(sample);
        }

        if samples.is_empty() {
            bail!("Dataset '{}' contains no samples", path.display());
        }

        tracing::info!(
            "Loaded {} subgraphs ({} node features) from '{}'",
            samples.len(),
            width.unwrap_or(0),
            path.display()
        );
        Ok(samples)
    }
}

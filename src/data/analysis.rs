// ============================================================
// Layer 4: Dataset Analysis
// ============================================================
// Summarises a set of subgraphs: how many positives and
// negatives it holds and how large the subgraphs are.
// Printed for the train and test part of every fold and by
// the `analyze` command.

use serde::Serialize;

use crate::domain::subgraph::SubgraphSample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetAnalysis {
    pub samples:        usize,
    pub positives:      usize,
    pub negatives:      usize,
    pub mean_nodes:     f64,
    pub mean_edges:     f64,
    pub max_nodes:      usize,
}

impl DatasetAnalysis {
    pub fn of(samples: &[SubgraphSample]) -> Self {
        let n = samples.len();
        let positives = samples.iter().filter(|s| s.is_positive()).count();
        let nodes: usize = samples.iter().map(SubgraphSample::num_nodes).sum();
        let edges: usize = samples.iter().map(SubgraphSample::num_edges).sum();
        let mean = |total: usize| if n == 0 { 0.0 } else { total as f64 / n as f64 };

        Self {
            samples:    n,
            positives,
            negatives:  n - positives,
            mean_nodes: mean(nodes),
            mean_edges: mean(edges),
            max_nodes:  samples.iter().map(SubgraphSample::num_nodes).max().unwrap_or(0),
        }
    }
}

impl std::fmt::Display for DatasetAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "samples: {}, positive: {}, negative: {}, mean nodes: {:.2}, mean edges: {:.2}, max nodes: {}",
            self.samples, self.positives, self.negatives,
            self.mean_nodes, self.mean_edges, self.max_nodes,
        )
    }
}

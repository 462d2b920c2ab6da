use burn::data::dataset::Dataset;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::subgraph::SubgraphSample;

/// An ordered collection of labelled subgraphs.
///
/// Order matters: the fold partition cuts contiguous ranges,
/// so shuffling (if any) must happen before splitting.
#[derive(Debug, Clone, Default)]
pub struct SubgraphDataset {
    samples: Vec<SubgraphSample>,
}

impl SubgraphDataset {
    pub fn new(samples: Vec<SubgraphSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[SubgraphSample] { &self.samples }

    /// Width of the node feature vectors (0 when empty)
    pub fn num_node_features(&self) -> usize {
        self.samples.first().map_or(0, SubgraphSample::num_node_features)
    }

    /// Reorder the samples with a seeded Fisher-Yates shuffle
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.samples.shuffle(&mut rng);
    }

    /// Copy the samples at `indices`, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self::new(indices.iter().map(|&i| self.samples[i].clone()).collect())
    }
}

impl Dataset<SubgraphSample> for SubgraphDataset {
    fn get(&self, index: usize) -> Option<SubgraphSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(n: usize) -> SubgraphDataset {
        SubgraphDataset::new(
            (0..n).map(|i| SubgraphSample::new(vec![vec![i as f32]], vec![], i % 2)).collect(),
        )
    }

    #[test]
    fn test_shuffle_is_seeded_permutation() {
        let mut a = labelled(20);
        let mut b = labelled(20);
        a.shuffle(7);
        b.shuffle(7);
        assert_eq!(a.samples(), b.samples());

        let mut seen: Vec<f32> = a.samples().iter().map(|s| s.node_features[0][0]).collect();
        seen.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(seen, (0..20).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let ds = labelled(5);
        let picked = ds.select(&[4, 0, 2]);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked.get(0).unwrap().node_features[0][0], 4.0);
        assert_eq!(picked.get(2).unwrap().node_features[0][0], 2.0);
        assert!(picked.get(3).is_none());
        assert_eq!(picked.num_node_features(), 1);
    }
}

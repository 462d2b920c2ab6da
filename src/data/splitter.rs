// ============================================================
// Layer 4: Fold Partitioner and Holdout Splitter
// ============================================================
// k-fold cross-validation cuts the (already ordered) dataset
// into k contiguous test ranges of equal length:
//
//   step = len / k
//   fold i: test  = [i·step, (i+1)·step)
//           train = [0, i·step) ++ [(i+1)·step, len)
//
// The last `len mod k` samples never land in a test range,
// they are always part of the training set.
//
// The holdout split shuffles with a seeded RNG and keeps
// `train_fraction` of the samples for training.
//
// Reference: Rust Book §8 (Vectors), rand crate documentation

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::ops::Range;

/// Index sets of one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// 0-based fold number
    pub index: usize,
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

impl Fold {
    /// Contiguous test range of fold `index` for `len` samples split `k` ways
    pub fn test_range(index: usize, k: usize, len: usize) -> Range<usize> {
        let step = len / k;
        index * step..(index + 1) * step
    }
}

/// Partition `len` ordered samples into `k` folds.
///
/// Fails when `k < 2` or when there are fewer samples than folds
/// (every test range would be empty).
pub fn k_fold(len: usize, k: usize) -> Result<Vec<Fold>> {
    if k < 2 {
        bail!("Cross validation needs at least 2 folds, got {k}");
    }
    if len < k {
        bail!("Cannot split {len} samples into {k} folds");
    }

    let folds = (0..k)
        .map(|index| {
            let test_range = Fold::test_range(index, k, len);
            let train = (0..test_range.start).chain(test_range.end..len).collect();
            Fold { index, train, test: test_range.collect() }
        })
        .collect();

    Ok(folds)
}

/// Randomly shuffle `samples` and split into (train, test).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed, the same seed gives the same split
pub fn split_train_test<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // After this: samples = [0..split_at], test = [split_at..total]
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Holdout split: {} training, {} test ({}% / {}%)",
        samples.len(),
        test.len(),
        (samples.len() * 100) / total.max(1),
        (test.len()    * 100) / total.max(1),
    );

    (samples, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_ranges_are_contiguous_and_disjoint() {
        let folds = k_fold(23, 5).unwrap();
        assert_eq!(folds.len(), 5);

        // step = 4, samples 20..23 are never tested
        assert_eq!(folds[0].test, vec![0, 1, 2, 3]);
        assert_eq!(folds[4].test, vec![16, 17, 18, 19]);

        let mut tested: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        tested.sort_unstable();
        assert_eq!(tested, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_train_is_complement_of_test_in_order() {
        for fold in k_fold(23, 5).unwrap() {
            assert_eq!(fold.train.len() + fold.test.len(), 23);
            assert!(fold.train.windows(2).all(|w| w[0] < w[1]));
            assert!(fold.train.iter().all(|i| !fold.test.contains(i)));
            // The remainder always trains
            assert!(fold.train.ends_with(&[20, 21, 22]));
        }
    }

    #[test]
    fn test_middle_fold_layout() {
        let fold = &k_fold(10, 5).unwrap()[2];
        assert_eq!(fold.test, vec![4, 5]);
        assert_eq!(fold.train, vec![0, 1, 2, 3, 6, 7, 8, 9]);
    }

    #[test]
    fn test_invalid_fold_counts() {
        assert!(k_fold(10, 1).is_err());
        assert!(k_fold(10, 0).is_err());
        assert!(k_fold(3, 5).is_err());
        assert!(k_fold(5, 5).is_ok());
    }

    #[test]
    fn test_holdout_sizes_and_determinism() {
        let items: Vec<usize> = (0..100).collect();
        let (train, test) = split_train_test(items.clone(), 0.8, 3);
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(),  20);

        let (train2, _) = split_train_test(items, 0.8, 3);
        assert_eq!(train, train2);
    }

    #[test]
    fn test_holdout_empty_and_full() {
        let (train, test) = split_train_test(Vec::<usize>::new(), 0.8, 0);
        assert!(train.is_empty() && test.is_empty());

        let (train, test) = split_train_test((0..10).collect::<Vec<_>>(), 1.0, 0);
        assert_eq!(train.len(), 10);
        assert!(test.is_empty());
    }
}

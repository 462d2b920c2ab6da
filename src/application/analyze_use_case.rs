// ============================================================
// Layer 2: AnalyzeUseCase
// ============================================================
// Loads a dataset exactly as training would (including the
// in-memory shuffle of unshuffled datasets) and reports its
// class balance and subgraph sizes, overall and per fold.

use anyhow::Result;

use crate::application::train_use_case::TrainConfig;
use crate::data::analysis::DatasetAnalysis;

pub struct AnalyzeUseCase {
    config: TrainConfig,
}

/// Statistics of a dataset and of each of its folds.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub overall: DatasetAnalysis,
    /// (training part, test part) per fold
    pub folds:   Vec<(DatasetAnalysis, DatasetAnalysis)>,
}

impl AnalyzeUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<AnalysisReport> {
        let cfg = &self.config;
        cfg.validate()?;
        let dataset = cfg.load_dataset()?;
        let folds = cfg
            .partition(&dataset)?
            .iter()
            .map(|f| {
                (
                    DatasetAnalysis::of(f.train.samples()),
                    DatasetAnalysis::of(f.test.samples()),
                )
            })
            .collect();

        Ok(AnalysisReport {
            overall: DatasetAnalysis::of(dataset.samples()),
            folds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::data::loader::SAMPLES_FILE;
    use crate::domain::subgraph::SubgraphSample;

    #[test]
    fn test_fold_statistics_cover_dataset() {
        let root = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_root: root.path().display().to_string(),
            fold_number: 2,
            ..TrainConfig::default()
        };
        let dir = cfg.dataset_path();
        fs::create_dir_all(&dir).unwrap();
        let lines: Vec<String> = (0..9)
            .map(|i| serde_json::to_string(&SubgraphSample::new(vec![vec![0.0]; 2], vec![], usize::from(i < 3))).unwrap())
            .collect();
        fs::write(dir.join(SAMPLES_FILE), lines.join("\n")).unwrap();

        let report = AnalyzeUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.overall.samples, 9);
        assert_eq!(report.overall.positives, 3);
        assert_eq!(report.folds.len(), 2);
        for (train, test) in &report.folds {
            assert_eq!(train.samples + test.samples, 9);
            assert_eq!(test.samples, 4);
        }
        // First fold tests samples 0..4, which hold every positive
        assert_eq!(report.folds[0].1.positives, 3);
    }
}

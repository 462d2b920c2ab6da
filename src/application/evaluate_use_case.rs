// ============================================================
// Layer 2: EvaluateUseCase
// ============================================================
// Rescores a checkpoint of a finished run:
//
//   Step 1: Read train_config.json of the run   (Layer 6 - infra)
//   Step 2: Load the dataset and rebuild folds  (Layer 4 - data)
//   Step 3: Rebuild the model, load weights     (Layer 5 / 6)
//   Step 4: Evaluate on the fold's train + test (Layer 5 - ml)
//
// The fold partition is deterministic (seeded shuffle, fixed
// ranges), so the test part seen here is the one the model
// was held out from during training.

use anyhow::{bail, Result};
use burn::{data::dataloader::DataLoaderBuilder, tensor::backend::AutodiffBackend};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::SubgraphBatcher, dataset::SubgraphDataset};
use crate::domain::metrics::ClassificationMetrics;
use crate::infra::checkpoint::RunDirectory;
use crate::ml::{
    backend::{BackendJob, DeviceKind},
    evaluator::evaluate,
    model::SubgraphClassifier,
    trainer::FoldData,
};

#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub result_root: String,
    pub name:        String,
    /// 0-based fold whose checkpoint is scored
    pub fold:        usize,
    /// Checkpoint epoch; the run's final epoch when None
    pub epoch:       Option<usize>,
    pub device:      DeviceKind,
}

#[derive(Debug, Clone, Copy)]
pub struct EvaluationReport {
    pub fold:  usize,
    pub epoch: usize,
    pub train: ClassificationMetrics,
    pub test:  ClassificationMetrics,
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EvaluationReport> {
        let ev = &self.config;

        let run = RunDirectory::open(&ev.result_root, &ev.name)?;
        let train_cfg = run.load_config()?;
        let epoch = ev.epoch.unwrap_or(train_cfg.epoch_number);

        let dataset = train_cfg.load_dataset()?;
        let Some(fold) = train_cfg
            .partition(&dataset)?
            .into_iter()
            .find(|f| f.index == ev.fold)
        else {
            bail!("Run '{}' has no fold {}", ev.name, ev.fold + 1);
        };

        ev.device.dispatch(CheckpointScorer {
            cfg: &train_cfg,
            run: &run,
            fold,
            epoch,
        })
    }
}

struct CheckpointScorer<'a> {
    cfg:   &'a TrainConfig,
    run:   &'a RunDirectory,
    fold:  FoldData,
    epoch: usize,
}

impl BackendJob for CheckpointScorer<'_> {
    type Output = EvaluationReport;

    fn run<B: AutodiffBackend>(self, device: B::Device) -> Result<EvaluationReport> {
        let CheckpointScorer { cfg, run, fold, epoch } = self;

        // Inference only, so the model lives on the inner backend
        let model: SubgraphClassifier<B::InnerBackend> =
            cfg.model_config(fold.train.num_node_features()).init(&device);
        let model = run.load_model(model, fold.index, epoch, &device)?;

        let score = |data: SubgraphDataset| {
            let loader = DataLoaderBuilder::new(SubgraphBatcher::<B::InnerBackend>::new(device.clone()))
                .batch_size(cfg.batch_size)
                .build(data);
            evaluate(&model, &loader).metrics()
        };

        Ok(EvaluationReport {
            fold:  fold.index,
            epoch,
            train: score(fold.train),
            test:  score(fold.test),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::application::train_use_case::TrainUseCase;
    use crate::data::loader::SAMPLES_FILE;
    use crate::domain::subgraph::SubgraphSample;

    #[test]
    fn test_rescores_final_and_intermediate_checkpoints() {
        let root = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            name:          "scored".into(),
            shuffle:       false,
            fold_number:   2,
            epoch_number:  2,
            eval_interval: 1,
            batch_size:    3,
            hidden_size:   4,
            num_layers:    1,
            data_root:     root.path().join("data").display().to_string(),
            result_root:   root.path().join("result").display().to_string(),
            device:        DeviceKind::Cpu,
            ..TrainConfig::default()
        };
        let dir = cfg.dataset_path();
        fs::create_dir_all(&dir).unwrap();
        let lines: Vec<String> = (0..8)
            .map(|i| serde_json::to_string(&SubgraphSample::new(vec![vec![(i % 2) as f32, 1.0]; 2], vec![[0, 1]], i % 2)).unwrap())
            .collect();
        fs::write(dir.join(SAMPLES_FILE), lines.join("\n")).unwrap();

        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let ev = EvaluateConfig {
            result_root: cfg.result_root.clone(),
            name:        cfg.name.clone(),
            fold:        1,
            epoch:       None,
            device:      DeviceKind::Cpu,
        };
        let report = EvaluateUseCase::new(ev.clone()).execute().unwrap();
        assert_eq!(report.epoch, 2);
        assert_eq!(report.fold, 1);
        assert!((0.0..=1.0).contains(&report.test.specificity));

        let early = EvaluateUseCase::new(EvaluateConfig { epoch: Some(1), ..ev.clone() }).execute();
        assert!(early.is_ok());

        assert!(EvaluateUseCase::new(EvaluateConfig { fold: 5, ..ev.clone() }).execute().is_err());
        assert!(EvaluateUseCase::new(EvaluateConfig { epoch: Some(7), ..ev }).execute().is_err());
    }
}

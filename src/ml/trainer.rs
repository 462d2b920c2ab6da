// ============================================================
// Layer 5: Fold Training Loop
// ============================================================
// Trains one fold from scratch:
//
//   1. fresh model, fresh Adam (L2 weight decay), fresh schedule
//   2. epoch loop over the training part, in dataset order
//        loss = Σ(graphs in batch × batch NLL) / training size
//        lr decays by `lr_decay` when loss > previous epoch loss
//   3. every `eval_interval` epochs (not the last one):
//        evaluate train + test, report, checkpoint
//   4. after the last epoch:
//        evaluate train + test, report fold result, checkpoint
//
// Training runs on the autodiff backend B; evaluation runs on
// B::InnerBackend through `model.valid()` (no autodiff, no dropout).
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    data::dataset::Dataset,
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{SubgraphBatch, SubgraphBatcher},
    dataset::SubgraphDataset,
};
use crate::domain::metrics::ClassificationMetrics;
use crate::infra::{
    checkpoint::RunDirectory,
    run_log::{Evaluation, RunLog, Split},
};
use crate::ml::{
    evaluator::evaluate,
    model::SubgraphClassifier,
    schedule::{ExponentialDecay, LossIncreaseDecay},
};

/// The two parts of one fold.
pub struct FoldData {
    /// 0-based fold number
    pub index: usize,
    pub train: SubgraphDataset,
    pub test:  SubgraphDataset,
}

/// Final evaluation of a trained fold.
#[derive(Debug, Clone, Copy)]
pub struct FoldOutcome {
    pub fold:          usize,
    pub train:         ClassificationMetrics,
    pub test:          ClassificationMetrics,
    pub train_loss:    f64,
    pub learning_rate: f64,
}

/// True for the epochs that get an intermediate evaluation
/// and checkpoint. The final epoch is handled by the fold end.
pub fn is_evaluation_epoch(epoch: usize, interval: usize, total: usize) -> bool {
    interval > 0 && epoch % interval == 0 && epoch != total
}

type EvalLoader<B> = Arc<dyn DataLoader<SubgraphBatch<<B as AutodiffBackend>::InnerBackend>>>;

pub fn train_fold<B: AutodiffBackend>(
    cfg:    &TrainConfig,
    fold:   FoldData,
    device: &B::Device,
    run:    &RunDirectory,
    log:    &mut RunLog,
) -> Result<FoldOutcome> {
    let fold_idx  = fold.index;
    let train_len = fold.train.len();
    if train_len == 0 || fold.test.len() == 0 {
        bail!(
            "Fold {} has {} training and {} test samples, both must be non-empty",
            fold_idx + 1, train_len, fold.test.len()
        );
    }

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = cfg.model_config(fold.train.num_node_features());
    let mut model: SubgraphClassifier<B> = model_cfg.init(device);
    tracing::info!(
        "Fold {}: model ready, {} graph conv layers, hidden={}",
        fold_idx + 1, model_cfg.num_layers, model_cfg.hidden_size
    );

    // ── Adam optimiser with L2 penalty ────────────────────────────────────────
    let optim_cfg = AdamConfig::new()
        .with_weight_decay(Some(WeightDecayConfig::new(cfg.l2_weight_decay as f32)));
    let mut optim = optim_cfg.init();
    let mut schedule = LossIncreaseDecay::new(
        ExponentialDecay::new(cfg.initial_learning_rate, cfg.lr_decay)
    );

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(SubgraphBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .build(fold.train.clone());

    let train_eval_loader: EvalLoader<B> =
        DataLoaderBuilder::new(SubgraphBatcher::<B::InnerBackend>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .build(fold.train);

    let test_loader: EvalLoader<B> =
        DataLoaderBuilder::new(SubgraphBatcher::<B::InnerBackend>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .build(fold.test);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut epoch_loss = f64::NAN;
    for epoch in 1..=cfg.epoch_number {
        let lr = schedule.learning_rate();
        let mut loss_sum = 0.0f64;

        for batch in train_loader.iter() {
            let graphs = batch.num_graphs as f64;
            let (loss, _) = model.forward_loss(&batch);
            loss_sum += graphs * loss.clone().into_scalar().elem::<f64>();

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        epoch_loss = loss_sum / train_len as f64;
        if schedule.observe(epoch_loss) {
            tracing::debug!(
                "Fold {} epoch {}: loss rose, learning rate now {:.6}",
                fold_idx + 1, epoch, schedule.learning_rate()
            );
        }
        tracing::info!(
            "Fold {} epoch {:>3}/{} | loss={:.5} | lr={:.6}",
            fold_idx + 1, epoch, cfg.epoch_number, epoch_loss, lr
        );

        if is_evaluation_epoch(epoch, cfg.eval_interval, cfg.epoch_number) {
            let valid = model.valid();
            for (split, loader) in [(Split::Train, &train_eval_loader), (Split::Test, &test_loader)] {
                log.epoch_evaluation(&Evaluation {
                    fold: fold_idx,
                    epoch,
                    split,
                    metrics: evaluate(&valid, loader).metrics(),
                    train_loss: epoch_loss,
                    learning_rate: schedule.learning_rate(),
                })?;
            }
            run.save_model(&model, fold_idx, epoch)?;
        }
    }

    // ── End of fold ───────────────────────────────────────────────────────────
    let valid = model.valid();
    let mut outcome = FoldOutcome {
        fold:          fold_idx,
        train:         ClassificationMetrics::default(),
        test:          ClassificationMetrics::default(),
        train_loss:    epoch_loss,
        learning_rate: schedule.learning_rate(),
    };
    for (split, loader) in [(Split::Train, &train_eval_loader), (Split::Test, &test_loader)] {
        let metrics = evaluate(&valid, loader).metrics();
        log.fold_evaluation(&Evaluation {
            fold: fold_idx,
            epoch: cfg.epoch_number,
            split,
            metrics,
            train_loss: epoch_loss,
            learning_rate: outcome.learning_rate,
        })?;
        match split {
            Split::Train => outcome.train = metrics,
            Split::Test  => outcome.test  = metrics,
        }
    }
    run.save_model(&model, fold_idx, cfg.epoch_number)?;

    tracing::info!(
        "Fold {} complete, learning rate decayed {} times",
        fold_idx + 1, schedule.decays()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use std::fs;

    use crate::domain::subgraph::SubgraphSample;
    use crate::infra::run_log::{LOG_FILE, METRICS_FILE};

    type TestBackend = Autodiff<NdArray>;

    fn toy_samples(n: usize) -> Vec<SubgraphSample> {
        // Positives carry a strong first feature, negatives a strong second one
        (0..n)
            .map(|i| {
                let label = i % 2;
                let row = if label == 1 { vec![1.0, 0.0] } else { vec![0.0, 1.0] };
                SubgraphSample::new(vec![row; 3], vec![[0, 1], [1, 2]], label)
            })
            .collect()
    }

    #[test]
    fn test_evaluation_epochs() {
        let picked: Vec<usize> = (1..=30).filter(|&e| is_evaluation_epoch(e, 10, 30)).collect();
        assert_eq!(picked, vec![10, 20]);
        assert!(!is_evaluation_epoch(5, 0, 30));
        assert!(is_evaluation_epoch(5, 1, 30));
    }

    #[test]
    fn test_fold_run_writes_checkpoints_and_reports() {
        let root = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            name:          "toy".into(),
            epoch_number:  4,
            eval_interval: 2,
            batch_size:    4,
            hidden_size:   8,
            num_layers:    2,
            l2_weight_decay: 0.01,
            ..TrainConfig::default()
        };
        let run = RunDirectory::create(root.path(), &cfg.name).unwrap();
        run.create_fold_dir(0).unwrap();
        let mut log = RunLog::create(run.path()).unwrap();

        let samples = toy_samples(12);
        let fold = FoldData {
            index: 0,
            train: SubgraphDataset::new(samples[..8].to_vec()),
            test:  SubgraphDataset::new(samples[8..].to_vec()),
        };

        let outcome = train_fold::<TestBackend>(&cfg, fold, &Default::default(), &run, &mut log).unwrap();
        drop(log);

        assert_eq!(outcome.fold, 0);
        assert!(outcome.train_loss.is_finite());
        assert!(outcome.learning_rate <= cfg.initial_learning_rate);
        assert!((0.0..=1.0).contains(&outcome.test.sensitivity));

        // Epoch 2 (intermediate) and epoch 4 (final)
        assert_eq!(fs::read_dir(run.fold_dir(0)).unwrap().count(), 2);

        let text = fs::read_to_string(run.path().join(LOG_FILE)).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("Epoch: 002,")).count(), 2);
        assert_eq!(text.lines().filter(|l| l.starts_with("Fold 001 result,")).count(), 2);

        let csv = fs::read_to_string(run.path().join(METRICS_FILE)).unwrap();
        assert_eq!(csv.lines().count(), 1 + 4);
    }

    #[test]
    fn test_empty_test_part_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let cfg = TrainConfig::default();
        let run = RunDirectory::create(root.path(), "empty").unwrap();
        let mut log = RunLog::create(run.path()).unwrap();
        let fold = FoldData {
            index: 0,
            train: SubgraphDataset::new(toy_samples(4)),
            test:  SubgraphDataset::default(),
        };
        assert!(train_fold::<TestBackend>(&cfg, fold, &Default::default(), &run, &mut log).is_err());
    }
}

// ============================================================
// Layer 2: TrainUseCase (cross-validation driver)
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Load the subgraph dataset       (Layer 4 - data)
//   Step 2: Shuffle it if stored unshuffled (Layer 4 - data)
//   Step 3: Partition into folds            (Layer 4 - data)
//   Step 4: Create the run directory        (Layer 6 - infra)
//   Step 5: Write log header + config       (Layer 6 - infra)
//   Step 6: Train every fold from scratch   (Layer 5 - ml)
//   Step 7: Average the folds' test metrics, write summary
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Instant};
use burn::tensor::backend::AutodiffBackend;

use crate::data::{
    analysis::DatasetAnalysis,
    dataset::SubgraphDataset,
    loader::{dataset_dir, JsonlSubgraphLoader},
    splitter::{k_fold, split_train_test},
};
use crate::domain::{metrics::ClassificationMetrics, traits::SubgraphSource};
use crate::infra::{
    checkpoint::{RunDirectory, SUMMARY_FILE},
    run_log::{final_line, RunLog},
};
use crate::ml::{
    backend::{BackendJob, DeviceKind},
    model::SubgraphClassifierConfig,
    trainer::{train_fold, FoldData, FoldOutcome},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings of a training run. Serialisable so it is stored
// in the run directory and reloaded by `evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub name:                  String,
    pub dataset_name:          String,
    pub hop_number:            usize,
    pub node2vec_window_size:  usize,
    /// The dataset on disk was shuffled when it was built
    pub shuffle:               bool,
    pub cross_validation:      bool,
    pub fold_number:           usize,
    pub epoch_number:          usize,
    pub initial_learning_rate: f64,
    pub l2_weight_decay:       f64,
    pub lr_decay:              f64,
    pub batch_size:            usize,
    pub eval_interval:         usize,
    pub hidden_size:           usize,
    pub num_layers:            usize,
    pub dropout:               f64,
    pub seed:                  u64,
    /// Holdout only: share of samples used for training
    pub train_fraction:        f64,
    pub data_root:             String,
    pub result_root:           String,
    pub device:                DeviceKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            name:                  "RPI369_windowSize=5_0703".to_string(),
            dataset_name:          "RPI369".to_string(),
            hop_number:            2,
            node2vec_window_size:  5,
            shuffle:               true,
            cross_validation:      true,
            fold_number:           5,
            epoch_number:          200,
            initial_learning_rate: 0.005,
            l2_weight_decay:       0.0005,
            lr_decay:              0.95,
            batch_size:            60,
            eval_interval:         10,
            hidden_size:           64,
            num_layers:            3,
            dropout:               0.5,
            seed:                  42,
            train_fraction:        0.8,
            data_root:             "data/dataset".to_string(),
            result_root:           "result".to_string(),
            device:                DeviceKind::Wgpu,
        }
    }
}

impl TrainConfig {
    /// Reject settings the model or the splitter cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.num_layers == 0 {
            bail!("The model needs at least one graph convolution layer");
        }
        if self.batch_size == 0 {
            bail!("Batch size must be at least 1");
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("Dropout must be in [0, 1), got {}", self.dropout);
        }
        if !self.cross_validation && !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            bail!("Train fraction must be strictly between 0 and 1, got {}", self.train_fraction);
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> PathBuf {
        dataset_dir(
            &self.data_root,
            &self.dataset_name,
            self.hop_number,
            self.node2vec_window_size,
            self.shuffle,
        )
    }

    pub fn model_config(&self, num_node_features: usize) -> SubgraphClassifierConfig {
        SubgraphClassifierConfig::new(num_node_features)
            .with_hidden_size(self.hidden_size)
            .with_num_layers(self.num_layers)
            .with_dropout(self.dropout)
    }

    /// Load the dataset in training order: datasets stored
    /// unshuffled are shuffled in memory with the run seed.
    pub fn load_dataset(&self) -> Result<SubgraphDataset> {
        let loader = JsonlSubgraphLoader::new(self.dataset_path());
        let mut dataset = SubgraphDataset::new(loader.load_all()?);
        if !self.shuffle {
            dataset.shuffle(self.seed);
            tracing::info!("Shuffled {} samples with seed {}", dataset.sample_count(), self.seed);
        }
        Ok(dataset)
    }

    /// Split the ordered dataset into the folds of this run.
    ///
    /// Cross validation yields `fold_number` folds; otherwise a
    /// single seeded holdout split is returned as fold 0.
    ///
    /// Fails when any fold would have an empty training or test
    /// part, so nothing is written for a run that cannot train.
    pub fn partition(&self, dataset: &SubgraphDataset) -> Result<Vec<FoldData>> {
        let len = dataset.sample_count();
        let folds: Vec<FoldData> = if self.cross_validation {
            k_fold(len, self.fold_number)?
                .into_iter()
                .map(|f| FoldData {
                    index: f.index,
                    train: dataset.select(&f.train),
                    test:  dataset.select(&f.test),
                })
                .collect()
        } else {
            let (train, test) =
                split_train_test((0..len).collect(), self.train_fraction, self.seed);
            vec![FoldData {
                index: 0,
                train: dataset.select(&train),
                test:  dataset.select(&test),
            }]
        };

        for fold in &folds {
            let (train, test) = (fold.train.sample_count(), fold.test.sample_count());
            if train == 0 || test == 0 {
                bail!(
                    "Fold {} has {} training and {} test samples, both must be non-empty",
                    fold.index + 1, train, test
                );
            }
        }
        Ok(folds)
    }
}

// ─── Run Summary ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldSummary {
    pub fold:          usize,
    pub train:         ClassificationMetrics,
    pub test:          ClassificationMetrics,
    /// Training loss of the last epoch
    pub train_loss:    f64,
    /// Learning rate reached by the end of the fold
    pub learning_rate: f64,
}

/// Written to `summary.json` at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationSummary {
    pub name:         String,
    pub dataset:      String,
    pub folds:        Vec<FoldSummary>,
    /// Mean of the folds' test metrics
    pub average:      ClassificationMetrics,
    pub elapsed_secs: f64,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full cross-validation run end to end
    pub fn execute(&self) -> Result<CrossValidationSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Steps 1-3: dataset and folds ──────────────────────────────────────
        tracing::info!("Loading dataset '{}'", cfg.dataset_path().display());
        let dataset = cfg.load_dataset()?;
        let folds = cfg.partition(&dataset)?;
        tracing::info!("Dataset: {}", DatasetAnalysis::of(dataset.samples()));
        drop(dataset);

        // ── Steps 4-5: run directory, config and log header ───────────────────
        let run = RunDirectory::create(&cfg.result_root, &cfg.name)?;
        run.save_config(cfg)?;
        let mut log = RunLog::create(run.path())?;
        log.write_header(cfg)?;

        // ── Step 6: train every fold ──────────────────────────────────────────
        let start = Instant::now();
        let outcomes = cfg.device.dispatch(FoldRunner {
            cfg,
            folds,
            run: &run,
            log: &mut log,
        })?;
        let elapsed_secs = start.elapsed().as_secs_f64();
        log.report(&format!("elapsed: {elapsed_secs:.2}s"))?;

        // ── Step 7: aggregate ─────────────────────────────────────────────────
        let tests: Vec<ClassificationMetrics> = outcomes.iter().map(|o| o.test).collect();
        let average = ClassificationMetrics::mean(&tests)
            .context("No fold finished training")?;
        log.report(&final_line(&average))?;

        let summary = CrossValidationSummary {
            name:    cfg.name.clone(),
            dataset: cfg.dataset_name.clone(),
            folds:   outcomes
                .iter()
                .map(|o| FoldSummary {
                    fold:          o.fold,
                    train:         o.train,
                    test:          o.test,
                    train_loss:    o.train_loss,
                    learning_rate: o.learning_rate,
                })
                .collect(),
            average,
            elapsed_secs,
        };
        run.write_json(SUMMARY_FILE, &summary)?;
        tracing::info!("Run '{}' complete, results in '{}'", cfg.name, run.path().display());

        Ok(summary)
    }
}

/// Trains the folds one after another on the selected backend.
/// Each fold's model and optimiser are dropped before the next
/// fold starts.
struct FoldRunner<'a> {
    cfg:   &'a TrainConfig,
    folds: Vec<FoldData>,
    run:   &'a RunDirectory,
    log:   &'a mut RunLog,
}

impl BackendJob for FoldRunner<'_> {
    type Output = Vec<FoldOutcome>;

    fn run<B: AutodiffBackend>(self, device: B::Device) -> Result<Self::Output> {
        let FoldRunner { cfg, folds, run, log } = self;
        let mut outcomes = Vec::with_capacity(folds.len());

        for fold in folds {
            println!("Fold {} started", fold.index + 1);
            run.create_fold_dir(fold.index)?;

            println!(
                "training samples: {}, test samples: {}",
                fold.train.sample_count(),
                fold.test.sample_count()
            );
            println!("training set: {}", DatasetAnalysis::of(fold.train.samples()));
            println!("test set:     {}", DatasetAnalysis::of(fold.test.samples()));

            outcomes.push(train_fold::<B>(cfg, fold, &device, run, log)?);
        }

        Ok(outcomes)
    }
}

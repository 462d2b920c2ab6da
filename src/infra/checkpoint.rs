// ============================================================
// Layer 6: Run Directory and Checkpoints
// ============================================================
// Every training run owns one directory under the result
// root, named after the run:
//
//   result/{name}/
//     train_config.json    ← run configuration
//     log.txt              ← written by RunLog
//     metrics.csv          ← written by RunLog
//     summary.json         ← fold and average test metrics
//     model_0_fold/
//       10.mpk             ← weights after epoch 10
//       20.mpk
//       ...
//     model_1_fold/
//       ...
//
// Creating a run refuses an existing directory so a run can
// never overwrite another one. Weights are written with
// Burn's CompactRecorder (named MessagePack, half precision).
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::SubgraphClassifier;

const CONFIG_FILE: &str = "train_config.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Manages the files of one training run.
pub struct RunDirectory {
    dir: PathBuf,
}

impl RunDirectory {
    /// Create `{result_root}/{name}`. Fails if it already exists.
    pub fn create(result_root: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = result_root.as_ref().join(name);
        if dir.exists() {
            bail!(
                "A training run named '{name}' already exists at '{}'",
                dir.display()
            );
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create run directory '{}'", dir.display()))?;
        tracing::debug!("Created run directory '{}'", dir.display());
        Ok(Self { dir })
    }

    /// Open the directory of a finished run.
    pub fn open(result_root: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = result_root.as_ref().join(name);
        if !dir.is_dir() {
            bail!("No training run named '{name}' under '{}'", result_root.as_ref().display());
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn fold_dir(&self, fold: usize) -> PathBuf {
        self.dir.join(format!("model_{fold}_fold"))
    }

    /// Create the checkpoint directory of a fold
    pub fn create_fold_dir(&self, fold: usize) -> Result<PathBuf> {
        let dir = self.fold_dir(fold);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create fold directory '{}'", dir.display()))?;
        Ok(dir)
    }

    /// Save model weights of `fold` after `epoch`.
    ///
    /// The recorder appends its own file extension to the path.
    pub fn save_model<B: Backend>(
        &self,
        model: &SubgraphClassifier<B>,
        fold:  usize,
        epoch: usize,
    ) -> Result<PathBuf> {
        let path = self.fold_dir(fold).join(epoch.to_string());

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        tracing::debug!("Saved checkpoint: fold {} epoch {}", fold, epoch);
        Ok(path)
    }

    /// Load weights of `fold` after `epoch` into `model`.
    ///
    /// The model must have the architecture the checkpoint was
    /// written with or loading fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  SubgraphClassifier<B>,
        fold:   usize,
        epoch:  usize,
        device: &B::Device,
    ) -> Result<SubgraphClassifier<B>> {
        let path = self.fold_dir(fold).join(epoch.to_string());

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'", path.display())
            })?;

        tracing::info!("Loaded checkpoint: fold {} epoch {}", fold, epoch);
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    /// Serialise `value` as pretty JSON into a file of the run
    pub fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    pub fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::ml::model::SubgraphClassifierConfig;

    type TestBackend = NdArray;

    #[test]
    fn test_existing_run_is_refused() {
        let root = tempfile::tempdir().unwrap();
        RunDirectory::create(root.path(), "run").unwrap();
        let err = RunDirectory::create(root.path(), "run").err().unwrap();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_open_requires_existing_run() {
        let root = tempfile::tempdir().unwrap();
        assert!(RunDirectory::open(root.path(), "missing").is_err());
        RunDirectory::create(root.path(), "done").unwrap();
        assert!(RunDirectory::open(root.path(), "done").is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let run = RunDirectory::create(root.path(), "cfg").unwrap();
        let cfg = TrainConfig { fold_number: 3, name: "cfg".into(), ..TrainConfig::default() };
        run.save_config(&cfg).unwrap();
        let loaded = run.load_config().unwrap();
        assert_eq!(loaded.fold_number, 3);
        assert_eq!(loaded.name, "cfg");
    }

    #[test]
    fn test_model_checkpoint_is_written_per_fold_and_epoch() {
        let root = tempfile::tempdir().unwrap();
        let run = RunDirectory::create(root.path(), "ckpt").unwrap();
        run.create_fold_dir(1).unwrap();

        let device = Default::default();
        let cfg = SubgraphClassifierConfig::new(4).with_hidden_size(8);
        let model: SubgraphClassifier<TestBackend> = cfg.init(&device);

        run.save_model(&model, 1, 20).unwrap();
        let written: Vec<_> = fs::read_dir(run.fold_dir(1)).unwrap().collect();
        assert_eq!(written.len(), 1);

        let fresh: SubgraphClassifier<TestBackend> = cfg.init(&device);
        assert!(run.load_model(fresh, 1, 20, &device).is_ok());

        let fresh: SubgraphClassifier<TestBackend> = cfg.init(&device);
        assert!(run.load_model(fresh, 1, 30, &device).is_err());
    }
}

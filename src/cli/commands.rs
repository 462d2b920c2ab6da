// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate` and
// `analyze`, and all their configurable flags. Defaults
// reproduce the reference RPI369 experiment.
//
// Boolean options take an explicit value so the defaults can
// be switched off: `--shuffle false`, `--cross-validation false`.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{builder::RangedU64ValueParser, ArgAction, Args, Subcommand};

use crate::application::{
    evaluate_use_case::EvaluateConfig,
    train_use_case::TrainConfig,
};
use crate::ml::backend::DeviceKind;

/// Counts that must be positive: layers, batch size, fold number.
fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the interaction classifier with k-fold cross validation
    Train(TrainArgs),

    /// Rescore a saved fold checkpoint of a finished run
    Evaluate(EvaluateArgs),

    /// Print class balance and subgraph statistics of a dataset
    Analyze(AnalyzeArgs),
}

/// Which precomputed subgraph dataset to read.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Raw interactions dataset the subgraphs were extracted from
    #[arg(long, default_value = "RPI369")]
    pub dataset_name: String,

    /// Hop number of the enclosing subgraphs
    #[arg(long, default_value_t = 2)]
    pub hop_number: usize,

    /// node2vec window size used for the node features
    #[arg(long, default_value_t = 5)]
    pub node2vec_window_size: usize,

    /// Whether interactions were shuffled when the dataset was built.
    /// Unshuffled datasets are shuffled in memory before splitting.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub shuffle: bool,

    /// Directory holding the dataset directories
    #[arg(long, default_value = "data/dataset")]
    pub data_root: String,

    /// Seed for every in-memory shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// How the dataset is split into training and test parts.
#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Do k-fold cross validation; a single holdout split otherwise
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub cross_validation: bool,

    /// Fold number of cross validation
    #[arg(long, default_value_t = 5)]
    pub fold_number: usize,

    /// Share of samples used for training in holdout mode
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Name of this run; results go to <result-root>/<name>
    #[arg(long, default_value = "RPI369_windowSize=5_0703")]
    pub name: String,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub split: SplitArgs,

    /// Number of training epochs per fold
    #[arg(long, default_value_t = 200)]
    pub epoch_number: usize,

    /// Initial learning rate of Adam
    #[arg(long, default_value_t = 0.005)]
    pub initial_learning_rate: f64,

    /// L2 weight decay of Adam
    #[arg(long, default_value_t = 0.0005)]
    pub l2_weight_decay: f64,

    /// Factor applied to the learning rate whenever the epoch loss rises
    #[arg(long, default_value_t = 0.95)]
    pub lr_decay: f64,

    /// Subgraphs per batch
    #[arg(long, default_value_t = 60, value_parser = at_least_one())]
    pub batch_size: usize,

    /// Evaluate and checkpoint every this many epochs
    #[arg(long, default_value_t = 10)]
    pub eval_interval: usize,

    /// Width of the graph convolution layers
    #[arg(long, default_value_t = 64, value_parser = at_least_one())]
    pub hidden_size: usize,

    /// Number of graph convolution layers
    #[arg(long, default_value_t = 3, value_parser = at_least_one())]
    pub num_layers: usize,

    /// Dropout probability before the output layer
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Directory receiving one sub-directory per run
    #[arg(long, default_value = "result")]
    pub result_root: String,

    #[arg(long, value_enum, default_value_t = DeviceKind::Wgpu)]
    pub device: DeviceKind,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            name:                  a.name,
            dataset_name:          a.dataset.dataset_name,
            hop_number:            a.dataset.hop_number,
            node2vec_window_size:  a.dataset.node2vec_window_size,
            shuffle:               a.dataset.shuffle,
            cross_validation:      a.split.cross_validation,
            fold_number:           a.split.fold_number,
            epoch_number:          a.epoch_number,
            initial_learning_rate: a.initial_learning_rate,
            l2_weight_decay:       a.l2_weight_decay,
            lr_decay:              a.lr_decay,
            batch_size:            a.batch_size,
            eval_interval:         a.eval_interval,
            hidden_size:           a.hidden_size,
            num_layers:            a.num_layers,
            dropout:               a.dropout,
            seed:                  a.dataset.seed,
            train_fraction:        a.split.train_fraction,
            data_root:             a.dataset.data_root,
            result_root:           a.result_root,
            device:                a.device,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Name of the finished run
    #[arg(long)]
    pub name: String,

    /// 1-based fold whose checkpoint is scored
    #[arg(long, default_value_t = 1, value_parser = at_least_one())]
    pub fold: usize,

    /// Checkpoint epoch (defaults to the final epoch of the run)
    #[arg(long)]
    pub epoch: Option<usize>,

    #[arg(long, default_value = "result")]
    pub result_root: String,

    #[arg(long, value_enum, default_value_t = DeviceKind::Wgpu)]
    pub device: DeviceKind,
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvaluateConfig {
            result_root: a.result_root,
            name:        a.name,
            fold:        a.fold.saturating_sub(1),
            epoch:       a.epoch,
            device:      a.device,
        }
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub split: SplitArgs,
}

impl From<AnalyzeArgs> for TrainConfig {
    fn from(a: AnalyzeArgs) -> Self {
        TrainConfig {
            dataset_name:         a.dataset.dataset_name,
            hop_number:           a.dataset.hop_number,
            node2vec_window_size: a.dataset.node2vec_window_size,
            shuffle:              a.dataset.shuffle,
            data_root:            a.dataset.data_root,
            seed:                 a.dataset.seed,
            cross_validation:     a.split.cross_validation,
            fold_number:          a.split.fold_number,
            train_fraction:       a.split.train_fraction,
            ..TrainConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["lpi-gnn", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let d = TrainConfig::default();
        assert_eq!(cfg.name, d.name);
        assert_eq!(cfg.fold_number, 5);
        assert_eq!(cfg.epoch_number, 200);
        assert_eq!(cfg.initial_learning_rate, 0.005);
        assert_eq!(cfg.l2_weight_decay, 0.0005);
        assert_eq!(cfg.batch_size, 60);
        assert!(cfg.shuffle && cfg.cross_validation);
        assert_eq!(cfg.dataset_path(), d.dataset_path());
    }

    #[test]
    fn test_boolean_flags_take_values() {
        let cli = Cli::try_parse_from([
            "lpi-gnn", "train", "--shuffle", "false", "--cross-validation", "false",
            "--device", "cpu", "--fold-number", "10",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert!(!cfg.shuffle);
        assert!(!cfg.cross_validation);
        assert_eq!(cfg.device, DeviceKind::Cpu);
        assert_eq!(cfg.fold_number, 10);
    }

    #[test]
    fn test_evaluate_fold_is_one_based_on_the_command_line() {
        let cli = Cli::try_parse_from(["lpi-gnn", "evaluate", "--name", "run", "--fold", "3"]).unwrap();
        let Commands::Evaluate(args) = cli.command else { panic!("expected evaluate") };
        let ev: EvaluateConfig = args.into();
        assert_eq!(ev.fold, 2);
        assert!(ev.epoch.is_none());
    }

    #[test]
    fn test_zero_counts_are_rejected() {
        for flag in ["--num-layers", "--batch-size", "--hidden-size"] {
            assert!(
                Cli::try_parse_from(["lpi-gnn", "train", flag, "0"]).is_err(),
                "{flag} 0 accepted"
            );
        }
        assert!(Cli::try_parse_from(["lpi-gnn", "evaluate", "--name", "run", "--fold", "0"]).is_err());

        let cli = Cli::try_parse_from(["lpi-gnn", "train", "--num-layers", "1", "--batch-size", "1"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!((cfg.num_layers, cfg.batch_size), (1, 1));
    }
}

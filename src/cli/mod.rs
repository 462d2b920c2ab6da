// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses command line arguments with `clap` and routes each
// subcommand to its use case in Layer 2. Only the `evaluate`
// and `analyze` results are printed here; training prints
// its own report lines as it goes.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AnalyzeArgs, Commands, EvaluateArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "lpi-gnn",
    version = "0.1.0",
    about = "Cross-validated graph neural network training for lncRNA-protein interaction prediction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Evaluate(args) => Self::run_evaluate(args),
            Commands::Analyze(args)  => Self::run_analyze(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting run '{}' on dataset {}", args.name, args.dataset.dataset_name);

        let summary = TrainUseCase::new(args.into()).execute()?;
        println!(
            "Training complete: {} fold(s) in {:.1}s.",
            summary.folds.len(),
            summary.elapsed_secs
        );
        Ok(())
    }

    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;
        use crate::infra::run_log::{fold_line, Split};

        let report = EvaluateUseCase::new(args.into()).execute()?;
        println!("Checkpoint of epoch {}", report.epoch);
        println!("{}", fold_line(report.fold, Split::Train, &report.train));
        println!("{}", fold_line(report.fold, Split::Test, &report.test));
        Ok(())
    }

    fn run_analyze(args: AnalyzeArgs) -> Result<()> {
        use crate::application::analyze_use_case::AnalyzeUseCase;

        let report = AnalyzeUseCase::new(args.into()).execute()?;
        println!("dataset: {}", report.overall);
        for (i, (train, test)) in report.folds.iter().enumerate() {
            println!("fold {:03} training set: {}", i + 1, train);
            println!("fold {:03} test set:     {}", i + 1, test);
        }
        Ok(())
    }
}

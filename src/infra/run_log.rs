// ============================================================
// Layer 6: Run Log
// ============================================================
// Two records of every training run, both inside the run
// directory:
//
//   log.txt      human readable report; every line is also
//                printed to stdout and flushed immediately, so
//                an interrupted run keeps what it produced
//
//   metrics.csv  one row per evaluation, for plotting:
//
//     fold,epoch,split,sensitivity,precision,recall,specificity,mcc,train_loss,learning_rate
//     0,10,train,0.812500,0.790000,0.812500,0.770000,0.583100,0.431200,0.005000
//     0,10,test,0.700000,0.720000,0.700000,0.730000,0.430500,0.431200,0.005000
//
// Report line formats:
//   Epoch: 010, train, Sensitivity: 0.81250, Precision: ..., MCC: ...
//   Fold 001 result, test, Sensitivity: ...
//   Final result, Sensitivity: ...

use anyhow::{Context, Result};
use std::{
    fmt,
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::metrics::ClassificationMetrics;

pub const LOG_FILE: &str = "log.txt";
pub const METRICS_FILE: &str = "metrics.csv";

/// Which part of a fold an evaluation ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Split::Train => "train",
            Split::Test  => "test",
        })
    }
}

/// One evaluation of a model during or after a fold.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub fold:          usize,
    pub epoch:         usize,
    pub split:         Split,
    pub metrics:       ClassificationMetrics,
    pub train_loss:    f64,
    pub learning_rate: f64,
}

pub fn epoch_line(epoch: usize, split: Split, m: &ClassificationMetrics) -> String {
    format!("Epoch: {epoch:03}, {split}, {m}")
}

/// `fold` is 0-based; the report numbers folds from 1
pub fn fold_line(fold: usize, split: Split, m: &ClassificationMetrics) -> String {
    format!("Fold {:03} result, {split}, {m}", fold + 1)
}

pub fn final_line(m: &ClassificationMetrics) -> String {
    format!("Final result, {m}")
}

/// Writes `log.txt` and `metrics.csv` of one run.
pub struct RunLog {
    text: LineWriter<File>,
    csv:  LineWriter<File>,
    dir:  PathBuf,
}

impl RunLog {
    /// Create both files (truncating) inside `dir`
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        let text_path = dir.join(LOG_FILE);
        let text = File::create(&text_path)
            .with_context(|| format!("Cannot create '{}'", text_path.display()))?;

        let csv_path = dir.join(METRICS_FILE);
        let mut csv = LineWriter::new(
            File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?,
        );
        writeln!(
            csv,
            "fold,epoch,split,sensitivity,precision,recall,specificity,mcc,train_loss,learning_rate"
        )?;

        Ok(Self { text: LineWriter::new(text), csv, dir })
    }

    /// Describe the run at the top of `log.txt`
    pub fn write_header(&mut self, cfg: &TrainConfig) -> Result<()> {
        let lines = [
            format!("database: {}", cfg.dataset_name),
            format!("node2vec_windowSize = {}", cfg.node2vec_window_size),
            if cfg.cross_validation {
                format!("{}-fold cross validation", cfg.fold_number)
            } else {
                format!("holdout validation, {:.0}% training", cfg.train_fraction * 100.0)
            },
            format!("epochs: {}", cfg.epoch_number),
            format!(
                "learning rate: initial {}, multiplied by {} whenever the training loss increases",
                cfg.initial_learning_rate, cfg.lr_decay
            ),
            format!("L2 regularization, weight {}", cfg.l2_weight_decay),
        ];
        for line in lines {
            writeln!(self.text, "{line}")?;
        }
        Ok(())
    }

    /// Print a report line and append it to `log.txt`
    pub fn report(&mut self, line: &str) -> Result<()> {
        println!("{line}");
        writeln!(self.text, "{line}")
            .with_context(|| format!("Cannot write to '{}'", self.dir.join(LOG_FILE).display()))
    }

    /// Append one evaluation to `metrics.csv`
    pub fn record(&mut self, e: &Evaluation) -> Result<()> {
        let m = &e.metrics;
        writeln!(
            self.csv,
            "{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            e.fold, e.epoch, e.split,
            m.sensitivity, m.precision, m.recall, m.specificity, m.mcc,
            e.train_loss, e.learning_rate,
        )
        .with_context(|| format!("Cannot write to '{}'", self.dir.join(METRICS_FILE).display()))
    }

    /// Report an in-training evaluation and record it
    pub fn epoch_evaluation(&mut self, e: &Evaluation) -> Result<()> {
        self.report(&epoch_line(e.epoch, e.split, &e.metrics))?;
        self.record(e)
    }

    /// Report an end-of-fold evaluation and record it
    pub fn fold_evaluation(&mut self, e: &Evaluation) -> Result<()> {
        self.report(&fold_line(e.fold, e.split, &e.metrics))?;
        self.record(e)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn metrics() -> ClassificationMetrics {
        ClassificationMetrics { sensitivity: 0.8125, precision: 0.79, recall: 0.8125, specificity: 0.77, mcc: 0.5831 }
    }

    #[test]
    fn test_line_formats() {
        assert_eq!(
            epoch_line(10, Split::Train, &metrics()),
            "Epoch: 010, train, Sensitivity: 0.81250, Precision: 0.79000, Recall: 0.81250, Specificity: 0.77000, MCC: 0.58310"
        );
        assert!(fold_line(0, Split::Test, &metrics()).starts_with("Fold 001 result, test, Sensitivity: 0.81250"));
        assert!(final_line(&metrics()).starts_with("Final result, Sensitivity"));
    }

    #[test]
    fn test_header_report_and_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RunLog::create(dir.path()).unwrap();
        log.write_header(&TrainConfig::default()).unwrap();

        let e = Evaluation {
            fold: 0, epoch: 10, split: Split::Test, metrics: metrics(),
            train_loss: 0.4312, learning_rate: 0.005,
        };
        log.epoch_evaluation(&e).unwrap();
        log.fold_evaluation(&Evaluation { epoch: 200, ..e }).unwrap();
        drop(log);

        let text = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "database: RPI369");
        assert_eq!(lines[2], "5-fold cross validation");
        assert!(lines[6].starts_with("Epoch: 010, test,"));
        assert!(lines[7].starts_with("Fold 001 result, test,"));

        let csv = fs::read_to_string(dir.path().join(METRICS_FILE)).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "0,10,test,0.812500,0.790000,0.812500,0.770000,0.583100,0.431200,0.005000");
        assert!(rows[2].starts_with("0,200,test,"));
    }
}

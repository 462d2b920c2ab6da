// ============================================================
// Layer 5: Evaluator
// ============================================================
// Runs a model (already switched to its inference backend
// with `.valid()`, so dropout is off) over every batch of a
// loader and tallies a binary confusion matrix from the
// argmax predictions. Counting happens on the device; only
// three scalars per batch come back to the host.

use std::sync::Arc;

use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::SubgraphBatch;
use crate::domain::metrics::ConfusionMatrix;
use crate::domain::subgraph::POSITIVE;
use crate::ml::model::SubgraphClassifier;

pub fn evaluate<B: Backend>(
    model:  &SubgraphClassifier<B>,
    loader: &Arc<dyn DataLoader<SubgraphBatch<B>>>,
) -> ConfusionMatrix {
    let mut cm = ConfusionMatrix::default();

    for batch in loader.iter() {
        let log_probs = model.forward(&batch);

        // argmax(1) returns shape [batch, 1], flatten to [batch]
        let predicted = log_probs.argmax(1).flatten::<1>(0, 1);

        let predicted_pos = predicted.equal_elem(POSITIVE as i32).int();
        let actual_pos    = batch.labels.equal_elem(POSITIVE as i32).int();

        let tp: i64 = (predicted_pos.clone() * actual_pos.clone())
            .sum().into_scalar().elem::<i64>();
        let pp: i64 = predicted_pos.sum().into_scalar().elem::<i64>();
        let ap: i64 = actual_pos.sum().into_scalar().elem::<i64>();

        cm.accumulate(batch.num_graphs as u64, tp as u64, pp as u64, ap as u64);
    }

    tracing::debug!("Evaluated {} subgraphs: {:?}", cm.total(), cm);
    cm
}

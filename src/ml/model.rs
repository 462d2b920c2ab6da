use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{log_softmax, relu},
};

use crate::data::batcher::{EdgeIndex, SubgraphBatch};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally; do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SubgraphClassifierConfig {
    pub num_node_features: usize,
    #[config(default = 2)]
    pub num_classes: usize,
    #[config(default = 64)]
    pub hidden_size: usize,
    #[config(default = 3)]
    pub num_layers: usize,
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl SubgraphClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SubgraphClassifier<B> {
        let convs = (0..self.num_layers)
            .map(|layer| {
                let d_in = if layer == 0 { self.num_node_features } else { self.hidden_size };
                GraphConv {
                    root:      LinearConfig::new(d_in, self.hidden_size).init(device),
                    neighbour: LinearConfig::new(d_in, self.hidden_size).with_bias(false).init(device),
                }
            })
            .collect();
        let hidden  = LinearConfig::new(self.hidden_size * self.num_layers, self.hidden_size).init(device);
        let output  = LinearConfig::new(self.hidden_size, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        SubgraphClassifier { convs, hidden, output, dropout }
    }
}

/// Graph convolution: h'ᵢ = W₁hᵢ + W₂ Σⱼ∈N(i) hⱼ
#[derive(Module, Debug)]
pub struct GraphConv<B: Backend> {
    pub root:      Linear<B>,
    pub neighbour: Linear<B>,
}

impl<B: Backend> GraphConv<B> {
    pub fn forward(&self, x: Tensor<B, 2>, edges: Option<&EdgeIndex<B>>) -> Tensor<B, 2> {
        let own = self.root.forward(x.clone());
        let Some(edges) = edges else {
            return own;
        };

        // Sum incoming messages: agg[target] += x[source]
        let messages = x.clone().select(0, edges.source.clone());
        let aggregated = x.zeros_like().select_assign(0, edges.target.clone(), messages);
        own + self.neighbour.forward(aggregated)
    }
}

#[derive(Module, Debug)]
pub struct SubgraphClassifier<B: Backend> {
    pub convs:   Vec<GraphConv<B>>,
    pub hidden:  Linear<B>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> SubgraphClassifier<B> {
    /// Class log-probabilities, [num_graphs, num_classes]
    pub fn forward(&self, batch: &SubgraphBatch<B>) -> Tensor<B, 2> {
        let mut h = batch.node_features.clone();
        let mut layer_states = Vec::with_capacity(self.convs.len());
        for conv in &self.convs {
            h = relu(conv.forward(h, batch.edges.as_ref()));
            layer_states.push(h.clone());
        }
        let nodes = Tensor::cat(layer_states, 1); // [total_nodes, layers · hidden]

        // Global mean pooling per graph
        let [_, width] = nodes.dims();
        let pooled = Tensor::<B, 2>::zeros([batch.num_graphs, width], &nodes.device())
            .select_assign(0, batch.graph_index.clone(), nodes)
            / batch.graph_sizes.clone();

        let x = self.dropout.forward(relu(self.hidden.forward(pooled)));
        log_softmax(self.output.forward(x), 1)
    }

    /// Negative log-likelihood of the labels, averaged over the batch
    pub fn forward_loss(&self, batch: &SubgraphBatch<B>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let log_probs = self.forward(batch);
        let targets = batch.labels.clone().reshape([batch.num_graphs, 1]);
        let loss = log_probs.clone().gather(1, targets).mean().neg();
        (loss, log_probs)
    }
}

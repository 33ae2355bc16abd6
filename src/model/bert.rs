use candle_core::{IndexOp, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};

use crate::error::Result;

/// BERT backbone with the checkpoint's pooler and classification head.
pub struct BertClassifier {
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
}

impl BertClassifier {
    pub fn load(
        vb: VarBuilder,
        config_json: &str,
        hidden_size: usize,
        num_labels: usize,
    ) -> Result<Self> {
        let config: Config = serde_json::from_str(config_json)?;
        // Classification checkpoints keep the backbone under `bert.`; plain
        // encoder checkpoints store it at the root.
        let model = BertModel::load(vb.pp("bert"), &config)
            .or_else(|_| BertModel::load(vb.clone(), &config))?;
        let pooler = linear(
            hidden_size,
            hidden_size,
            vb.pp("bert").pp("pooler").pp("dense"),
        )?;
        let classifier = linear(hidden_size, num_labels, vb.pp("classifier"))?;
        Ok(Self {
            model,
            pooler,
            classifier,
        })
    }

    /// Forward pass over a `(batch, seq_len)` tensor of token ids, producing
    /// `(batch, num_labels)` logits from the pooled `[CLS]` state.
    pub fn forward(&self, input_ids: &Tensor) -> candle_core::Result<Tensor> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(input_ids, &token_type_ids, None)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        self.classifier.forward(&pooled)
    }
}

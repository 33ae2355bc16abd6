use candle_core::{DType, IndexOp, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config, DistilBertModel};

use crate::error::Result;

/// DistilBERT backbone with the checkpoint's pre-classifier and
/// classification head.
pub struct DistilBertClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
}

impl DistilBertClassifier {
    pub fn load(vb: VarBuilder, config_json: &str, dim: usize, num_labels: usize) -> Result<Self> {
        let config: Config = serde_json::from_str(config_json)?;
        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .or_else(|_| DistilBertModel::load(vb.clone(), &config))?;
        let pre_classifier = linear(dim, dim, vb.pp("pre_classifier"))?;
        let classifier = linear(dim, num_labels, vb.pp("classifier"))?;
        Ok(Self {
            model,
            pre_classifier,
            classifier,
        })
    }

    pub fn forward(&self, input_ids: &Tensor) -> candle_core::Result<Tensor> {
        let (_batch, seq_len) = input_ids.dims2()?;
        // Nothing is masked: a zero entry keeps the position attendable.
        let attention_mask = Tensor::zeros((seq_len, seq_len), DType::U8, input_ids.device())?;
        let hidden = self.model.forward(input_ids, &attention_mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        self.classifier.forward(&pooled)
    }
}

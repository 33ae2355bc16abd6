mod bert;
mod distilbert;
mod paths;

pub use paths::ModelPaths;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::error::{Result, ServerError};

use bert::BertClassifier;
use distilbert::DistilBertClassifier;

/// The slice of a checkpoint's `config.json` the server reads. Everything
/// else in the file is consumed by the architecture-specific loaders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubModelConfig {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub id2label: Option<HashMap<String, String>>,
    #[serde(default)]
    pub hidden_size: Option<usize>,
    #[serde(default)]
    pub dim: Option<usize>,
    #[serde(default)]
    pub max_position_embeddings: Option<usize>,
}

impl HubModelConfig {
    pub fn num_labels(&self) -> usize {
        match &self.id2label {
            Some(labels) if !labels.is_empty() => labels.len(),
            _ => 2,
        }
    }

    /// Label table keyed by class index. Entries with non-numeric keys are
    /// dropped.
    pub fn labels(&self) -> HashMap<usize, String> {
        self.id2label
            .iter()
            .flatten()
            .filter_map(|(k, v)| Some((k.parse().ok()?, v.clone())))
            .collect()
    }

    pub fn max_input_len(&self) -> usize {
        self.max_position_embeddings.unwrap_or(512)
    }
}

enum ClassifierModel {
    Bert(BertClassifier),
    DistilBert(DistilBertClassifier),
}

/// A single classification result.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub class: usize,
    pub confidence: f32,
    pub label: String,
}

/// Loaded model, tokenizer and label table. Built once at startup, immutable
/// afterwards, shared read-only across in-flight requests.
pub struct TextClassifier {
    model: ClassifierModel,
    tokenizer: Tokenizer,
    labels: HashMap<usize, String>,
    device: Device,
}

impl TextClassifier {
    /// Locate the checkpoint artifacts and construct the classifier. Any
    /// failure here aborts startup; there is no retry and no fallback model.
    pub fn load(model_id: &str, weight_path: Option<&Path>, device: &Device) -> Result<Self> {
        let paths = match weight_path {
            Some(dir) => ModelPaths::from_dir(dir)?,
            None => ModelPaths::fetch(model_id)?,
        };

        let config_json = fs::read_to_string(&paths.config)?;
        let hub_config: HubModelConfig = serde_json::from_str(&config_json)?;

        let mut tokenizer = Tokenizer::from_file(&paths.tokenizer)
            .map_err(|e| ServerError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: hub_config.max_input_len(),
                ..Default::default()
            }))
            .map_err(|e| ServerError::Tokenizer(e.to_string()))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[paths.weights.clone()], DType::F32, device)?
        };

        let num_labels = hub_config.num_labels();
        let model = match hub_config.model_type.as_deref() {
            Some("distilbert") => ClassifierModel::DistilBert(DistilBertClassifier::load(
                vb,
                &config_json,
                hub_config.dim.unwrap_or(768),
                num_labels,
            )?),
            Some("bert") | None => ClassifierModel::Bert(BertClassifier::load(
                vb,
                &config_json,
                hub_config.hidden_size.unwrap_or(768),
                num_labels,
            )?),
            Some(other) => return Err(ServerError::UnsupportedArchitecture(other.to_string())),
        };

        info!(
            "Loaded {} classifier with {} labels",
            hub_config.model_type.as_deref().unwrap_or("bert"),
            num_labels
        );

        Ok(Self {
            model,
            tokenizer,
            labels: hub_config.labels(),
            device: device.clone(),
        })
    }

    /// Tokenize one text (truncating to the model's maximum input length) and
    /// run a single forward pass, returning the arg-max class with its
    /// softmax probability.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ServerError::Tokenizer(e.to_string()))?;
        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;

        let logits = match &self.model {
            ClassifierModel::Bert(model) => model.forward(&input_ids)?,
            ClassifierModel::DistilBert(model) => model.forward(&input_ids)?,
        };
        let probs = candle_nn::ops::softmax_last_dim(&logits)?
            .squeeze(0)?
            .to_vec1::<f32>()?;
        let (class, confidence) = argmax(&probs)
            .ok_or_else(|| ServerError::Inference("model produced no logits".to_string()))?;

        Ok(Prediction {
            class,
            confidence,
            label: resolve_label(&self.labels, class),
        })
    }
}

fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .enumerate()
        .fold(None, |best, (class, &p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((class, p)),
        })
}

fn resolve_label(labels: &HashMap<usize, String>, class: usize) -> String {
    labels
        .get(&class)
        .cloned()
        .unwrap_or_else(|| format!("LABEL_{class}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sentiment_checkpoint_config() {
        let json = r#"{
            "model_type": "distilbert",
            "dim": 768,
            "max_position_embeddings": 512,
            "id2label": {"0": "NEGATIVE", "1": "POSITIVE"}
        }"#;
        let config: HubModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.model_type.as_deref(), Some("distilbert"));
        assert_eq!(config.num_labels(), 2);
        assert_eq!(config.max_input_len(), 512);
        assert_eq!(
            config.labels().get(&1).map(String::as_str),
            Some("POSITIVE")
        );
    }

    #[test]
    fn config_defaults_when_fields_are_absent() {
        let config: HubModelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.num_labels(), 2);
        assert_eq!(config.max_input_len(), 512);
        assert!(config.labels().is_empty());
    }

    #[test]
    fn non_numeric_label_keys_are_dropped() {
        let json = r#"{"id2label": {"0": "NEGATIVE", "one": "POSITIVE"}}"#;
        let config: HubModelConfig = serde_json::from_str(json).unwrap();
        let labels = config.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get(&0).map(String::as_str), Some("NEGATIVE"));
    }

    #[test]
    fn argmax_picks_the_highest_probability() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(argmax(&[0.9]), Some((0, 0.9)));
    }

    #[test]
    fn argmax_of_empty_slice_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_breaks_ties_towards_the_first_class() {
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
    }

    #[test]
    fn missing_labels_fall_back_to_the_class_index() {
        let mut labels = HashMap::new();
        labels.insert(0, "NEGATIVE".to_string());
        assert_eq!(resolve_label(&labels, 0), "NEGATIVE");
        assert_eq!(resolve_label(&labels, 3), "LABEL_3");
    }
}

use std::sync::Arc;

use crate::error::ServerError;
use crate::model::TextClassifier;

/// Shared handler state. The classifier slot is filled once at startup and
/// never mutated afterwards; an empty slot means the model has not been
/// loaded, and every inference request against it is rejected as retryable.
#[derive(Clone, Default)]
pub struct AppState {
    classifier: Option<Arc<TextClassifier>>,
}

impl AppState {
    /// State without a model, as observed before startup completes.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: Arc<TextClassifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    pub fn classifier(&self) -> Result<&TextClassifier, ServerError> {
        self.classifier
            .as_deref()
            .ok_or(ServerError::ModelNotLoaded)
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, ServerError>;

// Error handling for model loading and inference
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("model loading failed: {0}")]
    ModelLoad(String),
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
    #[error("inference error: {0}")]
    Inference(String),
    #[error("unsupported model architecture: {0}")]
    UnsupportedArchitecture(String),
    #[error("model not loaded")]
    ModelNotLoaded,
    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),
    #[error("hub error: {0}")]
    Hub(#[from] hf_hub::api::sync::ApiError),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            // The model has not finished loading; the client may retry later.
            ServerError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Prediction error: {}", self);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_loaded_maps_to_service_unavailable() {
        let response = ServerError::ModelNotLoaded.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn inference_errors_map_to_internal_error() {
        let response = ServerError::Inference("shape mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_messages_are_passed_through() {
        let err = ServerError::Tokenizer("unknown token".to_string());
        assert_eq!(err.to_string(), "tokenizer error: unknown token");
    }
}

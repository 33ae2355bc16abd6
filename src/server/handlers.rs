use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::state::AppState;
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: f32,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub label: String,
    pub score: f32,
}

/// Liveness probe. Reports healthy as soon as the route is reachable; it does
/// not check whether the model finished loading.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Classify one text and return the arg-max class index with its softmax
/// probability.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    let classifier = state.classifier()?;
    let prediction = classifier.predict(&request.text)?;
    Ok(Json(PredictResponse {
        prediction: prediction.class as f32,
        confidence: prediction.confidence,
    }))
}

/// Classify one text and return the label resolved through the checkpoint's
/// label table.
pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<ClassifyResponse>> {
    let classifier = state.classifier()?;
    let prediction = classifier.predict(&request.text)?;
    Ok(Json(ClassifyResponse {
        label: prediction.label,
        score: prediction.confidence,
    }))
}

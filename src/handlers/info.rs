//! Service and model info handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::inference::pipeline::{self, InferenceStats};
use crate::models::patient::FEATURE_LAYOUT;
use crate::{AppError, AppResult, AppState};

/// Root endpoint with API information
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Heart Disease Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": state.artifacts.is_some(),
        "model_name": state.artifacts.as_ref().map(|a| a.model_name.clone()),
        "endpoints": {
            "/predict": "POST - Single prediction",
            "/predict/batch": "POST - Batch predictions",
            "/health": "GET - Health check",
            "/model/info": "GET - Model information"
        }
    }))
}

#[derive(Serialize)]
pub struct ModelInfoResponse {
    model_name: String,
    model_type: &'static str,
    model_sha256: String,
    scaler_sha256: String,
    features: Vec<&'static str>,
    stats: InferenceStats,
}

/// Information about the loaded model, or 503 before artifacts are loaded.
pub async fn model_info(State(state): State<AppState>) -> AppResult<Json<ModelInfoResponse>> {
    let artifacts = state.artifacts.as_ref().ok_or(AppError::ModelNotLoaded)?;

    Ok(Json(ModelInfoResponse {
        model_name: artifacts.model_name.clone(),
        model_type: artifacts.classifier.model_type(),
        model_sha256: artifacts.model_sha256.clone(),
        scaler_sha256: artifacts.scaler_sha256.clone(),
        features: FEATURE_LAYOUT.to_vec(),
        stats: pipeline::stats(),
    }))
}

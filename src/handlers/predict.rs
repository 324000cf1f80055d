//! Prediction handlers

use axum::{extract::State, Json};
use serde_json::Value;

use crate::inference::pipeline;
use crate::models::patient::PatientRecord;
use crate::models::prediction::{BatchPredictionRequest, BatchPredictionResponse, PredictionResult};
use crate::{AppError, AppResult, AppState};

/// Predict heart disease for a single patient.
///
/// The payload is validated field-by-field before any model code runs, so
/// a 422 always names the offending field.
pub async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<PredictionResult>> {
    let artifacts = state.artifacts.as_ref().ok_or_else(|| {
        tracing::error!("prediction attempted with no model loaded");
        AppError::ModelNotLoaded
    })?;

    let record = PatientRecord::validate(&payload)?;
    let result = pipeline::run(&record, artifacts)?;

    tracing::info!(
        prediction = result.prediction,
        confidence = result.confidence,
        model_name = %result.model_name,
        "prediction served"
    );

    Ok(Json(result))
}

/// Predict heart disease for multiple patients.
///
/// Every element is validated and predicted independently; a bad record
/// becomes an inline error descriptor while its siblings still predict.
/// The response always has one entry per input, in input order.
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchPredictionRequest>,
) -> AppResult<Json<BatchPredictionResponse>> {
    let artifacts = state.artifacts.as_ref().ok_or_else(|| {
        tracing::error!("batch prediction attempted with no model loaded");
        AppError::ModelNotLoaded
    })?;

    let outcomes = PatientRecord::validate_batch(&req.patients)
        .into_iter()
        .map(|validated| {
            validated
                .map_err(AppError::from)
                .and_then(|record| pipeline::run(&record, artifacts).map_err(AppError::from))
        })
        .collect();

    let response = BatchPredictionResponse::assemble(outcomes);
    tracing::info!(count = response.count, "batch prediction served");

    Ok(Json(response))
}

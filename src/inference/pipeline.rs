//! Inference pipeline
//!
//! Preprocess -> predict for one record, plus process-wide serving
//! statistics. Every call is pure with respect to the artifact bundle; the
//! only state written here is the pair of monotonic stats counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use ndarray::Array1;
use serde::Serialize;

use crate::models::patient::PatientRecord;
use crate::models::prediction::PredictionResult;

use super::artifacts::ModelArtifacts;
use super::classifier::InferenceError;

/// Latency stats
static LATENCY_SUM_US: AtomicU64 = AtomicU64::new(0);
static PREDICTION_COUNT: AtomicU64 = AtomicU64::new(0);

/// Serving statistics for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct InferenceStats {
    pub prediction_count: u64,
    pub avg_latency_ms: f32,
}

/// Snapshot of the process-wide counters.
pub fn stats() -> InferenceStats {
    let sum = LATENCY_SUM_US.load(Ordering::Relaxed);
    let count = PREDICTION_COUNT.load(Ordering::Relaxed);
    let avg = if count > 0 {
        (sum as f32 / count as f32) / 1000.0
    } else {
        0.0
    };

    InferenceStats {
        prediction_count: count,
        avg_latency_ms: avg,
    }
}

/// Build the scaled feature vector for one record.
///
/// Values are pulled by name in the order the scaler serialized at training
/// time; a name the record schema does not know is a hard error, never a
/// silently misaligned column.
pub fn preprocess(
    record: &PatientRecord,
    artifacts: &ModelArtifacts,
) -> Result<Array1<f64>, InferenceError> {
    let names = artifacts.feature_names();
    let mut raw = Vec::with_capacity(names.len());
    for name in names {
        let value = record
            .get(name)
            .ok_or_else(|| InferenceError::UnknownFeature(name.clone()))?;
        raw.push(value);
    }
    Ok(artifacts.scaler.transform(&Array1::from(raw)))
}

/// Run a preprocessed vector through the classifier.
pub fn predict(
    vector: &Array1<f64>,
    artifacts: &ModelArtifacts,
) -> Result<PredictionResult, InferenceError> {
    let (label, confidence) = artifacts.classifier.predict(vector)?;
    Ok(PredictionResult {
        prediction: label,
        confidence,
        model_name: artifacts.model_name.clone(),
    })
}

/// Full pipeline for one record: preprocess, predict, record stats.
pub fn run(
    record: &PatientRecord,
    artifacts: &ModelArtifacts,
) -> Result<PredictionResult, InferenceError> {
    let start = Instant::now();

    let vector = preprocess(record, artifacts)?;
    let result = predict(&vector, artifacts)?;

    let elapsed_us = start.elapsed().as_micros() as u64;
    LATENCY_SUM_US.fetch_add(elapsed_us, Ordering::Relaxed);
    PREDICTION_COUNT.fetch_add(1, Ordering::Relaxed);

    tracing::debug!(
        prediction = result.prediction,
        confidence = result.confidence,
        elapsed_us,
        "prediction computed"
    );

    Ok(result)
}

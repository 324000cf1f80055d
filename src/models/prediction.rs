//! Prediction wire shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// One prediction: binary label, confidence, and the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted class (0 = no disease, 1 = disease)
    pub prediction: u8,
    /// Probability of the predicted class, in [0, 1]
    pub confidence: f64,
    /// Name of the model used
    pub model_name: String,
}

/// Batch request: raw records, validated per-item after extraction so one
/// malformed element cannot reject its siblings.
#[derive(Debug, Deserialize)]
pub struct BatchPredictionRequest {
    pub patients: Vec<Value>,
}

/// Inline error descriptor for a failed batch item.
#[derive(Debug, Serialize)]
pub struct BatchItemError {
    pub error: String,
    pub status: u16,
}

/// One entry of a batch response: a prediction or an error descriptor.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Prediction(PredictionResult),
    Error(BatchItemError),
}

#[derive(Debug, Serialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<BatchItem>,
    pub count: usize,
}

impl BatchPredictionResponse {
    /// Assemble per-item outcomes into the batch response.
    ///
    /// The response always has exactly one entry per input, in input order;
    /// failures become inline descriptors, never silent drops.
    pub fn assemble(outcomes: Vec<Result<PredictionResult, AppError>>) -> Self {
        let predictions: Vec<BatchItem> = outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Ok(result) => BatchItem::Prediction(result),
                Err(err) => {
                    let (status, message) = err.parts();
                    BatchItem::Error(BatchItemError {
                        error: message,
                        status: status.as_u16(),
                    })
                }
            })
            .collect();
        let count = predictions.len();

        Self { predictions, count }
    }
}

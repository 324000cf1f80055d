//! Standard scaler
//!
//! Per-feature mean/variance normalization captured at training time and
//! replayed verbatim at inference: `scaled[i] = (raw[i] - mean[i]) / scale[i]`.
//! The feature-name list is serialized alongside the statistics so the
//! column order is part of the artifact, never re-derived at request time.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Fitted normalization parameters from training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Feature names in the order the statistics were fit
    pub feature_names: Vec<String>,
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature standard deviation
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Number of features this scaler was fit on.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Check internal consistency of a freshly deserialized scaler.
    ///
    /// Lengths must agree; every scale entry must be finite and non-zero.
    pub fn check(&self) -> Result<(), String> {
        if self.mean.len() != self.feature_names.len() || self.scale.len() != self.feature_names.len() {
            return Err(format!(
                "length disagreement: {} names, {} means, {} scales",
                self.feature_names.len(),
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("mean[{}] ({}) is not finite", i, self.mean[i]));
        }
        if let Some(i) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(format!("scale[{}] ({}) is not finite and non-zero", i, self.scale[i]));
        }
        Ok(())
    }

    /// Apply the stored transform to a raw feature vector.
    ///
    /// Pure and deterministic: identical input always yields an identical
    /// vector. The caller guarantees `raw` is in `feature_names` order.
    pub fn transform(&self, raw: &Array1<f64>) -> Array1<f64> {
        let mean = ArrayView1::from(self.mean.as_slice());
        let scale = ArrayView1::from(self.scale.as_slice());
        (raw - &mean) / &scale
    }
}

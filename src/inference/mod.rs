//! Inference core: artifact loading, preprocessing, and prediction.

pub mod artifacts;
pub mod classifier;
pub mod pipeline;
pub mod scaler;

pub use artifacts::{load_artifacts, LoadError, ModelArtifacts};
pub use classifier::{Classifier, InferenceError};
pub use scaler::StandardScaler;

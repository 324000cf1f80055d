//! Artifact loader
//!
//! Deserializes the trained classifier and its paired scaler once at
//! process startup. The loaded bundle is immutable and shared read-only by
//! every request handler; a failed load leaves the process serving in a
//! not-ready state instead of crash-looping.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::patient::FEATURE_LAYOUT;

use super::classifier::Classifier;
use super::scaler::StandardScaler;

/// Startup failure while loading the artifact pair.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("artifact {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("scaler expects {scaler_features} features but classifier expects {classifier_features}")]
    SchemaMismatch {
        scaler_features: usize,
        classifier_features: usize,
    },

    #[error("scaler feature order {got:?} disagrees with the record schema {expected:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("scaler artifact is inconsistent: {0}")]
    InvalidScaler(String),
}

/// The immutable (classifier, scaler) pair plus load-time metadata.
///
/// Constructed exactly once at startup and shared via `Arc`; never mutated,
/// so concurrent request handlers read it without synchronization.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    /// Artifact file stem, reported back in every prediction
    pub model_name: String,
    pub classifier: Classifier,
    pub scaler: StandardScaler,
    /// SHA-256 of the classifier file
    pub model_sha256: String,
    /// SHA-256 of the scaler file
    pub scaler_sha256: String,
}

impl ModelArtifacts {
    /// Feature names in the order the scaler was fit.
    pub fn feature_names(&self) -> &[String] {
        &self.scaler.feature_names
    }
}

/// Load and cross-check the classifier/scaler pair.
///
/// Beyond deserialization this enforces the two schema couplings the
/// artifacts carry: the scaler's feature count must equal the classifier's
/// input width, and the scaler's serialized feature-name order must equal
/// the record schema's column order. Either mismatch is fatal at load.
pub fn load_artifacts(model_path: &Path, scaler_path: &Path) -> Result<ModelArtifacts, LoadError> {
    let classifier: Classifier = read_json(model_path)?;
    let scaler: StandardScaler = read_json(scaler_path)?;

    scaler.check().map_err(LoadError::InvalidScaler)?;

    if scaler.n_features() != classifier.n_features() {
        return Err(LoadError::SchemaMismatch {
            scaler_features: scaler.n_features(),
            classifier_features: classifier.n_features(),
        });
    }

    if scaler
        .feature_names
        .iter()
        .map(String::as_str)
        .ne(FEATURE_LAYOUT.iter().copied())
    {
        return Err(LoadError::FeatureOrderMismatch {
            expected: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            got: scaler.feature_names.clone(),
        });
    }

    let model_name = model_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();

    let model_sha256 = file_sha256(model_path)?;
    let scaler_sha256 = file_sha256(scaler_path)?;

    tracing::info!(
        model_name = %model_name,
        model_type = classifier.model_type(),
        features = scaler.n_features(),
        model_sha256 = %model_sha256,
        "model artifacts loaded"
    );

    Ok(ModelArtifacts {
        model_name,
        classifier,
        scaler,
        model_sha256,
        scaler_sha256,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|e| LoadError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

fn file_sha256(path: &Path) -> Result<String, LoadError> {
    let map_io = |e: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::open(path).map_err(map_io)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(map_io)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

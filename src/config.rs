//! Configuration module

use std::env;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Serialized classifier artifact
    pub model_path: PathBuf,

    /// Serialized scaler artifact, paired with the classifier
    pub scaler_path: PathBuf,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let model_path = PathBuf::from(
            env::var("MODEL_PATH")
                .unwrap_or_else(|_| "artifacts/logistic_regression.json".to_string()),
        );

        let scaler_path = env::var("SCALER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_scaler_path(&model_path));

        Self {
            model_path,
            scaler_path,

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Derive the conventional scaler path from the model file stem:
/// `artifacts/foo.json` pairs with `artifacts/foo_scaler.json`.
fn default_scaler_path(model_path: &Path) -> PathBuf {
    let stem = model_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    model_path.with_file_name(format!("{}_scaler.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_path_derivation() {
        assert_eq!(
            default_scaler_path(Path::new("artifacts/logistic_regression.json")),
            PathBuf::from("artifacts/logistic_regression_scaler.json")
        );
        assert_eq!(
            default_scaler_path(Path::new("random_forest.json")),
            PathBuf::from("random_forest_scaler.json")
        );
    }
}

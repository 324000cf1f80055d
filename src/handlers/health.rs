//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    model_name: Option<String>,
    version: &'static str,
    timestamp: i64,
}

/// Readiness reflects the artifact load: a process that failed to load its
/// model still answers here, but reports degraded and refuses predictions.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_name = state.artifacts.as_ref().map(|a| a.model_name.clone());

    Json(HealthResponse {
        status: if state.artifacts.is_some() {
            "healthy"
        } else {
            "degraded"
        },
        model_loaded: state.artifacts.is_some(),
        model_name,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::inference::testutil;
    use crate::{create_router, AppState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get_health(state: AppState) -> (StatusCode, Value) {
        let app = create_router(state);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_with_artifacts() {
        let state = AppState {
            artifacts: Some(Arc::new(testutil::artifacts())),
            config: Config::from_env(),
        };

        let (status, body) = get_health(state).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_loaded"], true);
        assert_eq!(body["model_name"], "logistic_regression");
    }

    #[tokio::test]
    async fn test_health_without_artifacts() {
        let state = AppState {
            artifacts: None,
            config: Config::from_env(),
        };

        let (status, body) = get_health(state).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["model_loaded"], false);
        assert!(body["model_name"].is_null());
    }
}

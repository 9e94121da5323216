use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::features::ApplicationPayload;
use super::model::RiskModel;
use super::service::{ScoringError, ScoringService};

pub const BANNER: &str = "AI Credit Evaluation API is running";

/// Router exposing the banner and the scoring endpoint.
pub fn scoring_router<M>(service: Arc<ScoringService<M>>) -> Router
where
    M: RiskModel + 'static,
{
    Router::new()
        .route("/", get(banner_handler))
        .route("/predict", post(predict_handler::<M>))
        .with_state(service)
}

pub(crate) async fn banner_handler() -> &'static str {
    BANNER
}

pub(crate) async fn predict_handler<M>(
    State(service): State<Arc<ScoringService<M>>>,
    payload: Result<Json<ApplicationPayload>, JsonRejection>,
) -> Response
where
    M: RiskModel + 'static,
{
    let result = payload
        .map_err(|rejection| ScoringError::InvalidInput(rejection.body_text()))
        .and_then(|Json(payload)| service.score_payload(payload));

    match result {
        Ok(score) => (StatusCode::OK, Json(score)).into_response(),
        Err(err) => {
            let status = if err.is_client_error() {
                warn!(error = %err, "rejected loan application");
                StatusCode::BAD_REQUEST
            } else {
                error!(error = %err, "failed to score loan application");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            let payload = json!({
                "error": err.to_string(),
            });
            (status, Json(payload)).into_response()
        }
    }
}

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::api::ApiResponse;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct Readiness {
    model: String,
}

/// GET /livez
pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// GET /readyz
///
/// The upstream is resolved before the listener binds, so answering at all means
/// ready. Reports which deployment requests go to.
pub async fn readyz(State(state): State<AppState>) -> Json<ApiResponse<Readiness>> {
    Json(ApiResponse::success(Readiness {
        model: state.orchestrator.current_model().to_string(),
    }))
}

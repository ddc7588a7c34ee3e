//! Session boundary: session start begins auto-search for the user, session
//! end stops it. Credential verification lives outside this service; callers
//! hand us an authenticated user id.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SessionRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/sessions/start
pub async fn handle_session_start(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<StatusCode, AppError> {
    state.scheduler.start(req.user_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/end
pub async fn handle_session_end(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<StatusCode, AppError> {
    state.scheduler.stop(req.user_id).await;
    Ok(StatusCode::NO_CONTENT)
}

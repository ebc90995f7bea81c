//! # REST API for Edit History

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history))
        .route("/history/undo", post(undo))
        .route("/history/redo", post(redo))
}

pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.student_service.history_status()))
}

pub async fn undo(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/history/undo");

    match state.student_service.undo() {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response("undo", e),
    }
}

pub async fn redo(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/history/redo");

    match state.student_service.redo() {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response("redo", e),
    }
}

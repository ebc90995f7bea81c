//! # REST API for Data Export
//!
//! JSON export of the whole collection, the roster CSV, and JSON import.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use shared::ImportResponse;
use tracing::info;

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export/json", get(export_json))
        .route("/export/csv", get(export_csv))
        .route("/import/json", post(import_json))
}

fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

pub async fn export_json(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/json");

    let students = state.student_service.list_students();
    match state.export_service.export_json(&students) {
        Ok(body) => {
            let filename = state.export_service.export_filename("json", Utc::now());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, attachment(&filename)),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => error_response("export students", e),
    }
}

pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");

    let students = state.student_service.list_students();
    match state.export_service.export_roster_csv(&students) {
        Ok(body) => {
            let filename = state.export_service.export_filename("csv", Utc::now());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, attachment(&filename)),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => error_response("export roster", e),
    }
}

/// Replace the collection with an exported document. Clears undo history.
pub async fn import_json(State(state): State<AppState>, body: String) -> impl IntoResponse {
    info!("POST /api/import/json - {} bytes", body.len());

    let students = match state.export_service.parse_json(&body) {
        Ok(students) => students,
        // malformed documents are the caller's fault
        Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
            return (StatusCode::BAD_REQUEST, format!("{:#}", e)).into_response();
        }
        Err(e) => return error_response("parse import", e),
    };

    match state.student_service.replace_all(students) {
        Ok(imported_count) => (
            StatusCode::OK,
            Json(ImportResponse {
                imported_count,
                success_message: format!("Imported {} students", imported_count),
            }),
        )
            .into_response(),
        Err(e) => error_response("import students", e),
    }
}

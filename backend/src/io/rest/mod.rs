//! # REST API Interface Layer
//!
//! HTTP endpoints for the school dashboard, all nested under `/api`.
//! Handlers translate requests into service calls and service errors into
//! status codes; they hold no business logic.
//!
//! Error mapping:
//!
//! - student not found: 404
//! - duplicate student, empty undo/redo history: 409
//! - any other domain validation failure: 400
//! - everything else: 500

pub mod catalog_apis;
pub mod export_apis;
pub mod history_apis;
pub mod student_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::domain::DomainError;

pub(crate) fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::StudentNotFound(_)) => StatusCode::NOT_FOUND,
        Some(DomainError::DuplicateStudent(_))
        | Some(DomainError::NothingToUndo)
        | Some(DomainError::NothingToRedo) => StatusCode::CONFLICT,
        Some(_) => StatusCode::BAD_REQUEST,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed operation and turn it into a plain-text error response
pub(crate) fn error_response(operation: &str, err: anyhow::Error) -> Response {
    let status = status_for(&err);
    error!("Failed to {}: {:#}", operation, err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        (status, format!("Error trying to {}", operation)).into_response()
    } else {
        (status, err.to_string()).into_response()
    }
}

//! # REST API for the School Catalog

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/catalog", get(get_catalog))
}

/// Subjects and grades offered by the school
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.student_service.catalog().to_response()))
}

//! # REST API for Student Management
//!
//! Roster, student CRUD, quick score edits and the student dashboard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use shared::{
    BulkUpdateRequest, CreateStudentRequest, QuickScoreRequest, StudentListResponse,
    StudentUpdate, Subject,
};
use tracing::{info, warn};

use super::error_response;
use crate::domain::views::RecordFilter;
use crate::domain::{GradeFilter, RosterQuery, SortKey, SubjectFilter};
use crate::AppState;

/// Roster query string: `?search=&grade=&sort=&subject=`
#[derive(Debug, Default, Deserialize)]
pub struct RosterParams {
    pub search: Option<String>,
    pub grade: Option<String>,
    pub sort: Option<SortKey>,
    /// Subject whose monthly exam score fills the score column
    pub subject: Option<String>,
}

/// Record filter query string: `?subject=&from=&to=`
#[derive(Debug, Default, Deserialize)]
pub struct RecordParams {
    pub subject: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Reference date for "new" announcements; defaults to the local date
    pub today: Option<NaiveDate>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_roster).post(create_student))
        .route("/students/all", get(list_students))
        .route("/students/bulk", post(bulk_update))
        .route("/students/highlights", get(get_highlights))
        .route(
            "/students/:id",
            get(get_student).patch(update_student).delete(delete_student),
        )
        .route("/students/:id/dashboard", get(get_dashboard))
        .route("/students/:id/records", get(get_records))
        .route(
            "/students/:id/monthly-exams/:subject",
            put(set_monthly_score),
        )
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Roster rows with search, grade filter, sort and optional subject column
pub async fn list_roster(
    State(state): State<AppState>,
    Query(params): Query<RosterParams>,
) -> impl IntoResponse {
    info!("GET /api/students - query: {:?}", params);

    let subject = match params.subject.as_deref().map(str::parse::<SubjectFilter>) {
        None | Some(Ok(SubjectFilter::All)) => None,
        Some(Ok(SubjectFilter::Only(subject))) => Some(subject),
        Some(Err(e)) => {
            warn!("Rejected roster query: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let query = RosterQuery {
        search: params.search,
        grade: params
            .grade
            .as_deref()
            .map(GradeFilter::parse)
            .unwrap_or_default(),
        sort: params.sort,
    };

    (StatusCode::OK, Json(state.student_service.roster(&query, subject))).into_response()
}

/// Every student with full records, in collection order
pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students/all");
    let response = StudentListResponse {
        students: state.student_service.list_students(),
    };
    (StatusCode::OK, Json(response))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - request: {:?}", request);

    match state.student_service.create_student(request) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("create student", e),
    }
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", student_id);

    match state.student_service.get_student(&student_id) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => error_response("get student", e),
    }
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(update): Json<StudentUpdate>,
) -> impl IntoResponse {
    info!("PATCH /api/students/{} - {}", student_id, update.kind());

    match state.student_service.update_student(&student_id, update) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("update student", e),
    }
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/students/{}", student_id);

    match state.student_service.delete_student(&student_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete student", e),
    }
}

pub async fn bulk_update(
    State(state): State<AppState>,
    Json(request): Json<BulkUpdateRequest>,
) -> impl IntoResponse {
    info!("POST /api/students/bulk - {} changes", request.updates.len());

    match state.student_service.bulk_update(request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("apply bulk update", e),
    }
}

/// Quick-edit of one monthly exam score
pub async fn set_monthly_score(
    State(state): State<AppState>,
    Path((student_id, subject)): Path<(String, String)>,
    Json(request): Json<QuickScoreRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/students/{}/monthly-exams/{} - score: {:?}",
        student_id, subject, request.score
    );

    let subject: Subject = match subject.parse() {
        Ok(subject) => subject,
        Err(e) => {
            warn!("Rejected monthly score edit: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state
        .student_service
        .set_monthly_score(&student_id, subject, &request, local_today())
    {
        Ok(response) => {
            let status = if response.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(response)).into_response()
        }
        Err(e) => error_response("set monthly score", e),
    }
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(params): Query<DashboardParams>,
) -> impl IntoResponse {
    info!("GET /api/students/{}/dashboard", student_id);

    let today = params.today.unwrap_or_else(local_today);
    match state.student_service.student_dashboard(&student_id, today) {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(e) => error_response("build dashboard", e),
    }
}

/// The student's records narrowed by subject and inclusive date range
pub async fn get_records(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(params): Query<RecordParams>,
) -> impl IntoResponse {
    info!("GET /api/students/{}/records - query: {:?}", student_id, params);

    let subject = match params.subject.as_deref().map(str::parse::<SubjectFilter>) {
        None => SubjectFilter::All,
        Some(Ok(filter)) => filter,
        Some(Err(e)) => {
            warn!("Rejected records query: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    let filter = RecordFilter {
        subject,
        from: params.from,
        to: params.to,
    };

    match state.student_service.student_records(&student_id, &filter) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => error_response("get student records", e),
    }
}

/// Students saved within the last couple of seconds
pub async fn get_highlights(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.student_service.highlights()))
}

//! # School Dashboard Backend
//!
//! Derives teacher and student dashboard views from raw student records and
//! serves them over a REST API.
//!
//! ## Layers
//!
//! - **domain**: Derivation functions, the student store with undo/redo, services
//! - **storage**: The `StudentStorage` trait with JSON-file and in-memory backends
//! - **io**: Axum REST handlers
//! - **config**: YAML configuration with environment overrides
//!
//! The domain layer never touches HTTP or the filesystem directly; services
//! depend on storage only through the trait.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::{AppConfig, ServerConfig, StorageBackend};
use crate::domain::{ExportService, StudentService};
use crate::io::rest;
use crate::storage::{
    JsonConnection, JsonStudentRepository, MemoryStudentRepository, StudentStorage,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
    pub export_service: ExportService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage ({:?})", config.storage.backend);
    let storage: Arc<dyn StudentStorage> = match config.storage.backend {
        StorageBackend::Json => {
            let connection = JsonConnection::new(&config.storage.data_directory)?;
            info!("Using JSON storage in {}", connection.base_directory().display());
            Arc::new(JsonStudentRepository::new(connection))
        }
        StorageBackend::Memory => Arc::new(MemoryStudentRepository::new()),
    };

    info!("Setting up domain services");
    let student_service =
        StudentService::new(storage, config.catalog.clone(), config.history_limit);
    student_service.load().await?;

    Ok(AppState {
        student_service,
        export_service: ExportService::new(),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);
    let cors = match &server.allowed_origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {}", origin))?,
        ),
        None => cors.allow_origin(Any),
    };

    let api_routes = Router::new()
        .merge(rest::student_apis::router())
        .merge(rest::history_apis::router())
        .merge(rest::export_apis::router())
        .merge(rest::catalog_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

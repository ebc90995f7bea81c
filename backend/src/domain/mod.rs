//! # Domain Module
//!
//! Contains the business logic of the school dashboard.
//!
//! Everything the dashboards show is derived on demand from the raw student
//! records; nothing derived is stored. The derivations are plain synchronous
//! functions. The services on top own the state and talk to storage.
//!
//! ## Module Organization
//!
//! - **statistics**: Percentages, present-only averages, subject rollups, weekly trend
//! - **classifier**: Attendance risk tiers, achievements, the roster at-risk flag
//! - **roster_filter**: Subject, date range, grade and search filters; roster sorting
//! - **announcements**: Audience filtering and the "new" marker
//! - **validation**: Score parsing and the score policies
//! - **mutations**: Pure edits of students and the collection
//! - **student_store**: The authoritative collection with undo/redo
//! - **save_highlight**: Timed "just saved" marks
//! - **views**: Student dashboard and roster row assembly
//! - **student_service**: Orchestrates edits, persistence and views
//! - **export_service**: JSON export/import and the roster CSV
//!
//! ## Business Rules
//!
//! - Only records with status `present` count toward averages
//! - In rollups a non-present record earns 0 but its max score still counts
//! - A zero max score yields 0%; an empty average is 0
//! - Subject rollups sum scores and maxima before dividing
//! - The allowance is 30 absences; 7 or fewer remaining is a warning, none is critical
//! - The roster flags a student when the weekly average is below 50% or absences exceed 6
//! - Quick-edit monthly scores must lie within 0-100

pub mod announcements;
pub mod classifier;
pub mod commands;
pub mod errors;
pub mod export_service;
pub mod mutations;
pub mod roster_filter;
pub mod save_highlight;
pub mod statistics;
pub mod student_service;
pub mod student_store;
pub mod validation;
pub mod views;

pub use commands::StoreAction;
pub use errors::DomainError;
pub use export_service::ExportService;
pub use roster_filter::{GradeFilter, RosterQuery, SortKey, SubjectFilter};
pub use student_service::StudentService;
pub use student_store::StudentStore;
pub use validation::{ScorePolicy, ScoreValidationError};

//! Domain-level commands accepted by the student store.
//! These are internal to the backend; the REST layer builds them from the
//! request DTOs in the `shared` crate.

use shared::{BulkUpdateEntry, Student, StudentUpdate};

/// A state transition of the student collection
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Replace the whole collection (startup fetch or import). Clears history.
    Load(Vec<Student>),
    /// Add a new student at the end of the collection
    Create(Student),
    /// Apply one change to one student
    Update {
        student_id: String,
        update: StudentUpdate,
    },
    /// Apply several changes as a single transition
    BulkUpdate(Vec<BulkUpdateEntry>),
    /// Remove a student from the collection
    Delete(String),
}

impl StoreAction {
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::Load(_) => "load",
            StoreAction::Create(_) => "create",
            StoreAction::Update { .. } => "update",
            StoreAction::BulkUpdate(_) => "bulk_update",
            StoreAction::Delete(_) => "delete",
        }
    }
}

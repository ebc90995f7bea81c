//! # Storage Traits
//!
//! The persistence boundary for the student collection. The domain layer only
//! talks to [`StudentStorage`]; the configured backend decides where the data lives.

use anyhow::Result;
use async_trait::async_trait;
use shared::{BulkUpdateEntry, Student, StudentUpdate};

#[async_trait]
pub trait StudentStorage: Send + Sync {
    /// Load every stored student in stored order
    async fn fetch_all_students(&self) -> Result<Vec<Student>>;

    /// Insert a student, replacing any stored student with the same id
    async fn store_student(&self, student: &Student) -> Result<()>;

    /// Apply one change to a stored student. Fails when the id is unknown.
    async fn update_student(&self, student_id: &str, update: &StudentUpdate) -> Result<()>;

    /// Remove a student. Removing an unknown id is not an error.
    async fn delete_student(&self, student_id: &str) -> Result<()>;

    /// Apply several changes in one write. Fails without writing when any id is unknown.
    async fn bulk_update(&self, updates: &[BulkUpdateEntry]) -> Result<()>;
}

/// Apply `updates` to `students` in order, or report the first unknown id
pub(crate) fn apply_stored_updates(
    students: &mut [Student],
    updates: &[BulkUpdateEntry],
) -> Result<()> {
    if let Some(missing) = updates
        .iter()
        .find(|entry| !students.iter().any(|s| s.id == entry.student_id))
    {
        anyhow::bail!("Student not found in storage: {}", missing.student_id);
    }

    for entry in updates {
        if let Some(student) = students.iter_mut().find(|s| s.id == entry.student_id) {
            entry.update.apply_to(student);
        }
    }
    Ok(())
}

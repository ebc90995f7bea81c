//! JSON document repository for students.
//!
//! The whole collection lives in one `students.json` file as a pretty-printed
//! array, the same shape as the JSON export. Every write rewrites the document
//! through a temp file followed by a rename. Writes are serialized by an async
//! mutex so concurrent read-modify-write cycles cannot interleave.

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::{BulkUpdateEntry, Student, StudentUpdate};
use std::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::connection::JsonConnection;
use crate::storage::traits::{apply_stored_updates, StudentStorage};

pub struct JsonStudentRepository {
    connection: JsonConnection,
    write_lock: Mutex<()>,
}

impl JsonStudentRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self {
            connection,
            write_lock: Mutex::new(()),
        }
    }

    fn read_students(&self) -> Result<Vec<Student>> {
        let path = self.connection.students_file_path();
        if !path.exists() {
            debug!("No student document at {}, starting empty", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse student document {}", path.display()))
    }

    fn write_students(&self, students: &[Student]) -> Result<()> {
        let path = self.connection.students_file_path();
        let content = serde_json::to_string_pretty(students)?;

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} students to {}", students.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl StudentStorage for JsonStudentRepository {
    async fn fetch_all_students(&self) -> Result<Vec<Student>> {
        let students = self.read_students()?;
        info!("Loaded {} students from JSON storage", students.len());
        Ok(students)
    }

    async fn store_student(&self, student: &Student) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut students = self.read_students()?;
        shared::upsert_by_id(&mut students, student.clone());
        self.write_students(&students)?;
        info!("Stored student {}", student.id);
        Ok(())
    }

    async fn update_student(&self, student_id: &str, update: &StudentUpdate) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut students = self.read_students()?;
        let student = students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| anyhow::anyhow!("Student not found in storage: {}", student_id))?;
        update.apply_to(student);
        self.write_students(&students)?;
        info!("Updated student {} ({})", student_id, update.kind());
        Ok(())
    }

    async fn delete_student(&self, student_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut students = self.read_students()?;
        let before = students.len();
        students.retain(|s| s.id != student_id);

        if students.len() == before {
            warn!("Delete requested for unknown student {}", student_id);
            return Ok(());
        }

        self.write_students(&students)?;
        info!("Deleted student {}", student_id);
        Ok(())
    }

    async fn bulk_update(&self, updates: &[BulkUpdateEntry]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut students = self.read_students()?;
        apply_stored_updates(&mut students, updates)?;
        self.write_students(&students)?;
        info!("Applied bulk update of {} changes", updates.len());
        Ok(())
    }
}

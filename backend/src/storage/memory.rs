//! In-memory student storage, used for the `memory` backend and in service tests.

use anyhow::Result;
use async_trait::async_trait;
use shared::{BulkUpdateEntry, Student, StudentUpdate};
use tokio::sync::RwLock;
use tracing::debug;

use super::traits::{apply_stored_updates, StudentStorage};

#[derive(Default)]
pub struct MemoryStudentRepository {
    students: RwLock<Vec<Student>>,
}

impl MemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: RwLock::new(students),
        }
    }
}

#[async_trait]
impl StudentStorage for MemoryStudentRepository {
    async fn fetch_all_students(&self) -> Result<Vec<Student>> {
        Ok(self.students.read().await.clone())
    }

    async fn store_student(&self, student: &Student) -> Result<()> {
        shared::upsert_by_id(&mut *self.students.write().await, student.clone());
        debug!("Stored student {} in memory", student.id);
        Ok(())
    }

    async fn update_student(&self, student_id: &str, update: &StudentUpdate) -> Result<()> {
        let mut students = self.students.write().await;
        let student = students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| anyhow::anyhow!("Student not found in storage: {}", student_id))?;
        update.apply_to(student);
        Ok(())
    }

    async fn delete_student(&self, student_id: &str) -> Result<()> {
        self.students.write().await.retain(|s| s.id != student_id);
        Ok(())
    }

    async fn bulk_update(&self, updates: &[BulkUpdateEntry]) -> Result<()> {
        let mut students = self.students.write().await;
        let mut next = students.clone();
        apply_stored_updates(&mut next, updates)?;
        *students = next;
        Ok(())
    }
}

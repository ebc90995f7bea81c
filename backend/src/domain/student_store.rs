//! The authoritative student collection and its edit history.
//!
//! Every accepted [`StoreAction`] except `Load` snapshots the previous
//! collection onto a bounded undo stack and clears the redo stack. `Load`
//! replaces the collection and starts a fresh history.

use std::collections::VecDeque;

use shared::{HistoryStatus, Student};
use tracing::debug;

use super::commands::StoreAction;
use super::errors::DomainError;
use super::mutations;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct StudentStore {
    students: Vec<Student>,
    undo_stack: VecDeque<Vec<Student>>,
    redo_stack: Vec<Vec<Student>>,
    history_limit: usize,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl StudentStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            students: Vec::new(),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            history_limit,
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    /// Apply `action`. On error the collection and history are untouched.
    pub fn dispatch(&mut self, action: StoreAction) -> Result<(), DomainError> {
        debug!("Dispatching store action: {}", action.name());

        let next = match action {
            StoreAction::Load(students) => {
                self.students = students;
                self.undo_stack.clear();
                self.redo_stack.clear();
                return Ok(());
            }
            StoreAction::Create(student) => mutations::insert_student(&self.students, student)?,
            StoreAction::Update { student_id, update } => {
                mutations::apply_update(&self.students, &student_id, &update)?
            }
            StoreAction::BulkUpdate(updates) => mutations::apply_bulk(&self.students, &updates)?,
            StoreAction::Delete(student_id) => {
                mutations::remove_student(&self.students, &student_id)?
            }
        };

        let previous = std::mem::replace(&mut self.students, next);
        self.push_undo(previous);
        self.redo_stack.clear();
        Ok(())
    }

    fn push_undo(&mut self, snapshot: Vec<Student>) {
        if self.history_limit == 0 {
            return;
        }
        if self.undo_stack.len() == self.history_limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(snapshot);
    }

    /// Step back one transition. Returns the collection as it was before the step.
    pub fn undo(&mut self) -> Result<Vec<Student>, DomainError> {
        let restored = self.undo_stack.pop_back().ok_or(DomainError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.students, restored);
        self.redo_stack.push(current.clone());
        Ok(current)
    }

    /// Re-apply the last undone transition. Returns the collection as it was before the step.
    pub fn redo(&mut self) -> Result<Vec<Student>, DomainError> {
        let restored = self.redo_stack.pop().ok_or(DomainError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.students, restored);
        self.push_undo(current.clone());
        Ok(current)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn history_status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
        }
    }
}

use shared::Subject;

use super::validation::ScoreValidationError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),
    #[error("Student already exists: {0}")]
    DuplicateStudent(String),
    #[error("Student ID cannot be empty")]
    EmptyStudentId,
    #[error("Student name cannot be empty")]
    EmptyStudentName,
    #[error("Unknown grade: {0}")]
    UnknownGrade(String),
    #[error("Subject is not offered: {0}")]
    SubjectNotOffered(Subject),
    #[error(transparent)]
    InvalidScore(#[from] ScoreValidationError),
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

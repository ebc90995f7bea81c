//! File-backed storage: one JSON document per data directory.

pub mod connection;
pub mod student_repository;

pub use connection::JsonConnection;
pub use student_repository::JsonStudentRepository;

//! # Storage Module
//!
//! Handles persistence of the student collection.
//!
//! The domain layer depends on the [`StudentStorage`] trait only. Two backends
//! implement it:
//!
//! - **JSON**: one `students.json` document in the configured data directory,
//!   rewritten atomically on every change
//! - **Memory**: a process-local collection for demos and tests
//!
//! Which one is used is decided by the `storage.backend` configuration value.
//! Services write through a [`WriteQueue`] so they never wait on storage.

pub mod json;
pub mod memory;
pub mod traits;
pub mod write_queue;

pub use json::{JsonConnection, JsonStudentRepository};
pub use memory::MemoryStudentRepository;
pub use traits::StudentStorage;
pub use write_queue::{StorageWrite, WriteQueue};

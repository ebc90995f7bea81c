//! Ordered background writer in front of a [`StudentStorage`].
//!
//! Callers enqueue writes without waiting; a single task drains the queue so
//! writes reach storage in the order they were issued. Failed writes are logged
//! and dropped.

use shared::{BulkUpdateEntry, Student, StudentUpdate};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use super::traits::StudentStorage;

#[derive(Debug)]
pub enum StorageWrite {
    Store(Student),
    Update {
        student_id: String,
        update: StudentUpdate,
    },
    Delete(String),
    Bulk(Vec<BulkUpdateEntry>),
}

impl StorageWrite {
    fn describe(&self) -> String {
        match self {
            StorageWrite::Store(student) => format!("store student {}", student.id),
            StorageWrite::Update { student_id, update } => {
                format!("update student {} ({})", student_id, update.kind())
            }
            StorageWrite::Delete(student_id) => format!("delete student {}", student_id),
            StorageWrite::Bulk(updates) => format!("bulk update of {} changes", updates.len()),
        }
    }
}

enum QueueMessage {
    Write(StorageWrite),
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<QueueMessage>,
}

impl WriteQueue {
    /// Spawn the writer task. Must be called from within a tokio runtime.
    pub fn spawn(storage: Arc<dyn StudentStorage>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(Self::writer_task(storage, receiver));
        Self { sender }
    }

    async fn writer_task(
        storage: Arc<dyn StudentStorage>,
        mut receiver: mpsc::UnboundedReceiver<QueueMessage>,
    ) {
        while let Some(message) = receiver.recv().await {
            match message {
                QueueMessage::Write(write) => {
                    let description = write.describe();
                    let result = match write {
                        StorageWrite::Store(student) => storage.store_student(&student).await,
                        StorageWrite::Update { student_id, update } => {
                            storage.update_student(&student_id, &update).await
                        }
                        StorageWrite::Delete(student_id) => {
                            storage.delete_student(&student_id).await
                        }
                        StorageWrite::Bulk(updates) => storage.bulk_update(&updates).await,
                    };
                    match result {
                        Ok(()) => debug!("Persisted: {}", description),
                        Err(e) => error!("Failed to persist {}: {:#}", description, e),
                    }
                }
                QueueMessage::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("Storage writer stopped");
    }

    pub fn enqueue(&self, write: StorageWrite) {
        if let Err(e) = self.sender.send(QueueMessage::Write(write)) {
            warn!("Storage writer is gone, dropping write: {}", e.0.describe_dropped());
        }
    }

    /// Wait until every write enqueued before this call has been attempted
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(QueueMessage::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

impl QueueMessage {
    fn describe_dropped(&self) -> String {
        match self {
            QueueMessage::Write(write) => write.describe(),
            QueueMessage::Flush(_) => "flush".to_string(),
        }
    }
}

//! Short-lived "just saved" marks for roster rows.
//!
//! Each mark owns a timer task that clears it after [`SAVED_HIGHLIGHT_DURATION`].
//! Marking a student again aborts the old timer and starts a new one. Must be
//! used from within a tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

pub const SAVED_HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);

#[derive(Default)]
struct HighlightState {
    next_generation: u64,
    marks: HashMap<String, Mark>,
}

struct Mark {
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Clone)]
pub struct SaveHighlighter {
    state: Arc<Mutex<HighlightState>>,
    duration: Duration,
}

impl Default for SaveHighlighter {
    fn default() -> Self {
        Self::new(SAVED_HIGHLIGHT_DURATION)
    }
}

fn lock(state: &Mutex<HighlightState>) -> MutexGuard<'_, HighlightState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SaveHighlighter {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(HighlightState::default())),
            duration,
        }
    }

    pub fn mark_saved(&self, student_id: &str) {
        let mut state = lock(&self.state);
        state.next_generation += 1;
        let generation = state.next_generation;

        let shared_state = Arc::clone(&self.state);
        let id = student_id.to_string();
        let duration = self.duration;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut state = lock(&shared_state);
            // a newer mark may have replaced ours between wake-up and lock
            if state.marks.get(&id).map(|m| m.generation) == Some(generation) {
                state.marks.remove(&id);
                debug!("Cleared saved highlight for student {}", id);
            }
        });

        if let Some(previous) = state
            .marks
            .insert(student_id.to_string(), Mark { generation, timer })
        {
            previous.timer.abort();
        }
    }

    pub fn is_highlighted(&self, student_id: &str) -> bool {
        lock(&self.state).marks.contains_key(student_id)
    }

    /// Currently highlighted student ids, sorted
    pub fn highlighted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.state).marks.keys().cloned().collect();
        ids.sort();
        ids
    }
}

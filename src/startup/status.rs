use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{KernelError, Result};

/// Status recorded for a task that reported none.
pub const DEFAULT_TASK_STATUS: &str = "task run but no status given";

/// Process-wide task identity to status message map, in run order.
///
/// Written during startup, read afterwards. Re-recording a task replaces its
/// message in place.
#[derive(Debug, Default)]
pub struct TaskStatusRecord {
    entries: RwLock<IndexMap<String, String>>,
}

impl TaskStatusRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_status(&self, key: &str, message: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(KernelError::InvalidArgument(
                "status key must be a non empty string".to_string(),
            ));
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), message.to_string());
        Ok(())
    }

    #[must_use]
    pub fn status(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Snapshot of all entries.
    #[must_use]
    pub fn list(&self) -> IndexMap<String, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Operator reset.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority, TaskStatus};

/// Structured filter criteria for store queries.
///
/// Each present criterion narrows the result by exact equality; absent
/// criteria are not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Require an exact status.
    pub status: Option<TaskStatus>,
    /// Require an exact priority.
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Create an empty filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the given status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Require the given priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns true when no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }

    /// Whether `task` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::task::{Task, TaskPriority, TaskStatus};

/// Patch for a single optional field.
///
/// Distinguishes "set to a value" from "clear" so that an omitted field
/// (`None` at the [`TaskPatch`] level) can mean "leave unchanged".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPatch<T> {
    /// Overwrite with the provided value.
    Set(T),
    /// Reset the field to its empty/absent default.
    Clear,
}

impl<T> FieldPatch<T> {
    /// Resolve the patch into the value the target field should take.
    #[must_use]
    pub fn resolve(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }
}

/// Partial update applied to an existing [`Task`].
///
/// Only present fields are applied; `id`, `owner` and `created_at` are never
/// touched. The store refreshes `updated_at` after every successful merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replace the title.
    pub title: Option<String>,
    /// Replace the description.
    pub description: Option<String>,
    /// Set or clear the deadline.
    pub due_date: Option<FieldPatch<OffsetDateTime>>,
    /// Replace the priority.
    pub priority: Option<TaskPriority>,
    /// Replace the status.
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Returns true when the patch would change no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Merge the present fields onto `task`.
    ///
    /// Timestamps are left alone here; the store owns `updated_at`.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date.resolve();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

use crate::id::{OwnerId, TaskId};

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has not been started.
    Pending,
    /// Task is actively being worked on.
    InProgress,
    /// Task is finished.
    Completed,
    /// Task was abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Canonical token used in serialized data and parsing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label for presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Hex color associated with the status in presentation layers.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "#FFA500",
            Self::InProgress => "#3498db",
            Self::Completed => "#2ecc71",
            Self::Cancelled => "#e74c3c",
        }
    }

    /// Every status in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Completed, Self::Cancelled];
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid task status: {token}")]
pub struct ParseTaskStatusError {
    /// The rejected token.
    pub token: String,
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            token => Err(ParseTaskStatusError {
                token: token.to_owned(),
            }),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Canonical token used in serialized data and parsing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human-readable label for presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Hex color associated with the priority in presentation layers.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#95a5a6",
            Self::Medium => "#f1c40f",
            Self::High => "#e74c3c",
        }
    }

    /// Every priority in declaration order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a priority token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid task priority: {token}")]
pub struct ParseTaskPriorityError {
    /// The rejected token.
    pub token: String,
}

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            token => Err(ParseTaskPriorityError {
                token: token.to_owned(),
            }),
        }
    }
}

/// One task record as held by the store.
///
/// `id`, `owner` and `created_at` are fixed at creation; `updated_at` is
/// refreshed by the store on every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, allocated by the store.
    pub id: TaskId,
    /// Short summary line.
    pub title: String,
    /// Free-text body.
    pub description: String,
    /// Optional deadline.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    /// Urgency.
    pub priority: TaskPriority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Owning principal; partitions visibility of records.
    pub owner: OwnerId,
    /// Creation timestamp, set once.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Timestamp of the most recent mutation. Always `>= created_at`.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Creation payload: every [`Task`] field the caller provides, minus the
/// system-assigned id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Short summary line.
    pub title: String,
    /// Free-text body.
    pub description: String,
    /// Optional deadline.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    /// Urgency.
    pub priority: TaskPriority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Owning principal.
    pub owner: OwnerId,
}

impl TaskDraft {
    /// Materialize the draft into a stored record with system fields set.
    #[must_use]
    pub fn into_task(self, id: TaskId, now: OffsetDateTime) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            owner: self.owner,
            created_at: now,
            updated_at: now,
        }
    }
}

//! Domain types for the taskdeck data layer.

/// Filter criteria applied to task queries.
pub mod filter;
/// Identifier types.
pub mod id;
/// Partial-update payloads.
pub mod patch;
/// The task record and its closed enumerations.
pub mod task;
/// Case-insensitive text matching.
pub mod text_matcher;

pub use filter::TaskFilter;
pub use id::{OwnerId, TaskId};
pub use patch::{FieldPatch, TaskPatch};
pub use task::{
    ParseTaskPriorityError, ParseTaskStatusError, Task, TaskDraft, TaskPriority, TaskStatus,
};
pub use text_matcher::TextMatcher;

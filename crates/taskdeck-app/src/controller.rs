//! Reactive state layer over a [`TaskStore`].
//!
//! The controller holds a derived, possibly stale copy of one user's tasks.
//! It is not authoritative; an explicit [`fetch_tasks`](TaskController::fetch_tasks)
//! invalidates and replaces the cache.

use serde::{Deserialize, Serialize};
use taskdeck_core::{
    FieldPatch, OwnerId, Task, TaskDraft, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStatus,
    TextMatcher,
};
use tracing::error;

use crate::store::TaskStore;

const FETCH_ERROR: &str = "Failed to load tasks";
const CREATE_ERROR: &str = "Failed to create task";
const UPDATE_ERROR: &str = "Failed to update task";
const DELETE_ERROR: &str = "Failed to delete task";

/// Client-side view criteria, independent of the store's own queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilters {
    /// Status equality filter.
    pub status: Option<TaskStatus>,
    /// Priority equality filter.
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring query; empty means no search.
    pub search_query: String,
}

/// Partial update for [`ViewFilters`]; only present fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilterPatch {
    /// Set or clear the status criterion.
    pub status: Option<FieldPatch<TaskStatus>>,
    /// Set or clear the priority criterion.
    pub priority: Option<FieldPatch<TaskPriority>>,
    /// Replace the search query.
    pub search_query: Option<String>,
}

impl ViewFilters {
    fn apply(&mut self, patch: ViewFilterPatch) {
        if let Some(status) = patch.status {
            self.status = status.resolve();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority.resolve();
        }
        if let Some(search_query) = patch.search_query {
            self.search_query = search_query;
        }
    }
}

/// Caches a working copy of tasks, derives filtered views, and tracks
/// loading/error status around every store call.
///
/// Actions take `&mut self`, so two actions on the same controller cannot
/// interleave; the exclusive borrow serializes the store calls. The
/// replace-in-place cache reconciliation is still not safe against a backend
/// mutated concurrently from outside this process.
pub struct TaskController<S> {
    store: S,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    selected: Option<Task>,
    filters: ViewFilters,
}

impl<S> TaskController<S> {
    /// Wrap a store with empty observable state.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            loading: false,
            error: None,
            selected: None,
            filters: ViewFilters::default(),
        }
    }

    /// Last-fetched snapshot of the user's tasks, in cache order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// True only while an action is in flight.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// Error message from the most recent attempt, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Locally managed single-record focus; never synced to the store.
    #[must_use]
    pub const fn selected_task(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    /// Current client-side view criteria.
    #[must_use]
    pub const fn filters(&self) -> &ViewFilters {
        &self.filters
    }

    /// Tasks passing the status filter, then the priority filter, then the
    /// search query, in that fixed order. Each stage only narrows.
    #[must_use]
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let criteria = TaskFilter {
            status: self.filters.status,
            priority: self.filters.priority,
        };
        let matcher = TextMatcher::new(&self.filters.search_query);
        self.tasks
            .iter()
            .filter(|task| criteria.matches(task))
            .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
            .collect()
    }

    /// Tasks with the given status, independent of [`filters`](Self::filters).
    #[must_use]
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.status == status).collect()
    }

    /// Merge the present fields of `patch` into the view criteria.
    pub fn set_filters(&mut self, patch: ViewFilterPatch) {
        self.filters.apply(patch);
    }

    /// Reset all view criteria to their defaults.
    pub fn clear_filters(&mut self) {
        self.filters = ViewFilters::default();
    }

    /// Pure local assignment of the focused task.
    pub fn set_selected_task(&mut self, task: Option<Task>) {
        self.selected = task;
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, message: &'static str, err: impl Into<anyhow::Error>) {
        let err = err.into();
        error!(error = %err, "{message}");
        self.error = Some(message.to_owned());
    }
}

impl<S: TaskStore> TaskController<S> {
    /// Replace the local cache with the store's records for `owner`.
    ///
    /// On failure the previous cache is kept and [`error`](Self::error) is set.
    pub async fn fetch_tasks(&mut self, owner: &OwnerId) {
        self.begin();
        match self.store.list_by_owner(owner).await {
            Ok(tasks) => self.tasks = tasks,
            Err(err) => self.fail(FETCH_ERROR, err),
        }
        self.loading = false;
    }

    /// Create a record and append it to the end of the local cache.
    pub async fn create_task(&mut self, draft: TaskDraft) {
        self.begin();
        match self.store.create(draft).await {
            Ok(task) => self.tasks.push(task),
            Err(err) => self.fail(CREATE_ERROR, err),
        }
        self.loading = false;
    }

    /// Patch a record, replacing it in place at its existing cache position.
    ///
    /// An unknown id is a quiet no-op, matching the store's absence contract.
    pub async fn update_task(&mut self, id: TaskId, patch: TaskPatch) {
        self.begin();
        match self.store.update(id, patch).await {
            Ok(Some(updated)) => {
                if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
                    *slot = updated;
                }
            }
            Ok(None) => {}
            Err(err) => self.fail(UPDATE_ERROR, err),
        }
        self.loading = false;
    }

    /// Delete a record, preserving the relative order of the remainder.
    pub async fn delete_task(&mut self, id: TaskId) {
        self.begin();
        match self.store.delete(id).await {
            Ok(true) => self.tasks.retain(|task| task.id != id),
            Ok(false) => {}
            Err(err) => self.fail(DELETE_ERROR, err),
        }
        self.loading = false;
    }
}

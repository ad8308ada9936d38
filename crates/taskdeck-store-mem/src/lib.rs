//! In-memory storage implementation for taskdeck.
//!
//! `MemoryStore` owns the canonical record set. Every query and mutation is
//! infallible; absence is signalled with `Option`/`bool`, never an error.

use std::collections::BTreeMap;

use taskdeck_core::{OwnerId, Task, TaskDraft, TaskFilter, TaskId, TaskPatch, TextMatcher};
use time::OffsetDateTime;
use tracing::debug;

/// Storage backed by an in-process map keyed by task id.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tasks: BTreeMap<TaskId, Task>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given drafts, in order.
    #[must_use]
    pub fn with_tasks(drafts: impl IntoIterator<Item = TaskDraft>) -> Self {
        let mut store = Self::new();
        for draft in drafts {
            store.create(draft);
        }
        store
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All records owned by `owner`. Iteration order is id order, which for
    /// v7 ids tracks creation order.
    #[must_use]
    pub fn list_by_owner(&self, owner: &OwnerId) -> Vec<Task> {
        self.tasks
            .values()
            .filter(|task| task.owner == *owner)
            .cloned()
            .collect()
    }

    /// The record with the given id, if any.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    /// Allocate a fresh id, stamp `created_at = updated_at = now`, store the
    /// record, and return the stored copy.
    pub fn create(&mut self, draft: TaskDraft) -> Task {
        let mut id = TaskId::new();
        while self.tasks.contains_key(&id) {
            id = TaskId::new();
        }
        let task = draft.into_task(id, OffsetDateTime::now_utc());
        debug!(task = %id, owner = %task.owner, "Created task");
        self.tasks.insert(id, task.clone());
        task
    }

    /// Merge the present patch fields onto the record with the given id and
    /// refresh `updated_at`. Returns `None` with no side effect when the id
    /// is unknown.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Option<Task> {
        let task = self.tasks.get_mut(&id)?;
        patch.apply(task);
        // Wall clock may stand still or step backwards; updated_at must not.
        task.updated_at = OffsetDateTime::now_utc().max(task.updated_at);
        debug!(task = %id, "Updated task");
        Some(task.clone())
    }

    /// Remove the record with the given id. Returns true iff a record was
    /// actually removed.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let removed = self.tasks.remove(&id).is_some();
        if removed {
            debug!(task = %id, "Deleted task");
        }
        removed
    }

    /// Case-insensitive substring search over title and description,
    /// restricted to `owner`. An empty query matches every owned record.
    #[must_use]
    pub fn search(&self, owner: &OwnerId, query: &str) -> Vec<Task> {
        let matcher = TextMatcher::new(query);
        self.tasks
            .values()
            .filter(|task| task.owner == *owner)
            .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
            .cloned()
            .collect()
    }

    /// Owned records satisfying every present criterion of `filter`.
    #[must_use]
    pub fn filter(&self, owner: &OwnerId, filter: &TaskFilter) -> Vec<Task> {
        self.tasks
            .values()
            .filter(|task| task.owner == *owner)
            .filter(|task| filter.matches(task))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::{FieldPatch, TaskPriority, TaskStatus};
    use time::macros::datetime;

    fn draft(owner: &str, title: &str, description: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: description.into(),
            due_date: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            owner: OwnerId::from(owner),
        }
    }

    fn seeded() -> MemoryStore {
        MemoryStore::with_tasks([
            TaskDraft {
                title: "Complete Project Documentation".into(),
                description: "Write comprehensive documentation for the current project".into(),
                due_date: Some(datetime!(2024-05-01 0:00 UTC)),
                priority: TaskPriority::High,
                status: TaskStatus::Pending,
                owner: OwnerId::from("user1"),
            },
            TaskDraft {
                title: "Review Pull Requests".into(),
                description: "Review and merge pending pull requests".into(),
                due_date: Some(datetime!(2024-04-30 0:00 UTC)),
                priority: TaskPriority::Medium,
                status: TaskStatus::InProgress,
                owner: OwnerId::from("user1"),
            },
        ])
    }

    #[test]
    fn create_allocates_unique_ids_with_equal_timestamps() {
        let mut store = MemoryStore::new();
        let first = store.create(draft("user1", "a", ""));
        let second = store.create(draft("user1", "b", ""));
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(second.created_at, second.updated_at);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn created_records_are_visible_to_all_queries() {
        let mut store = MemoryStore::new();
        let owner = OwnerId::from("user1");
        let task = store.create(draft("user1", "Ship release", "cut the tag"));

        assert_eq!(store.get(task.id), Some(task.clone()));
        assert_eq!(store.list_by_owner(&owner), vec![task.clone()]);
        assert_eq!(store.search(&owner, "ship"), vec![task.clone()]);
        assert_eq!(
            store.filter(&owner, &TaskFilter::new().with_status(TaskStatus::Pending)),
            vec![task]
        );
    }

    #[test]
    fn list_by_owner_partitions_by_owner() {
        let mut store = seeded();
        store.create(draft("user2", "Other", ""));

        assert_eq!(store.list_by_owner(&OwnerId::from("user1")).len(), 2);
        assert_eq!(store.list_by_owner(&OwnerId::from("user2")).len(), 1);
        assert!(store.list_by_owner(&OwnerId::from("nobody")).is_empty());
    }

    #[test]
    fn update_merges_only_present_fields_and_refreshes_updated_at() {
        let mut store = seeded();
        let owner = OwnerId::from("user1");
        let review = store
            .list_by_owner(&owner)
            .into_iter()
            .find(|task| task.title == "Review Pull Requests")
            .unwrap_or_else(|| panic!("seeded task must exist"));

        let updated = store
            .update(
                review.id,
                TaskPatch {
                    status: Some(TaskStatus::Completed),
                    ..TaskPatch::default()
                },
            )
            .unwrap_or_else(|| panic!("update of live id must succeed"));

        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.priority, TaskPriority::Medium);
        assert_eq!(updated.title, review.title);
        assert_eq!(updated.created_at, review.created_at);
        assert!(updated.updated_at >= review.updated_at);
        assert_eq!(store.get(review.id), Some(updated));
    }

    #[test]
    fn update_can_clear_due_date() {
        let mut store = seeded();
        let owner = OwnerId::from("user1");
        let task = store.list_by_owner(&owner).remove(0);
        assert!(task.due_date.is_some());

        let updated = store
            .update(
                task.id,
                TaskPatch {
                    due_date: Some(FieldPatch::Clear),
                    ..TaskPatch::default()
                },
            )
            .unwrap_or_else(|| panic!("update of live id must succeed"));
        assert_eq!(updated.due_date, None);
    }

    #[test]
    fn absent_ids_are_no_ops() {
        let mut store = seeded();
        let before: Vec<Task> = store.list_by_owner(&OwnerId::from("user1"));
        let ghost = TaskId::new();

        assert_eq!(store.get(ghost), None);
        assert_eq!(store.update(ghost, TaskPatch::default()), None);
        assert!(!store.delete(ghost));
        assert_eq!(store.list_by_owner(&OwnerId::from("user1")), before);
    }

    #[test]
    fn delete_then_get_returns_absent() {
        let mut store = seeded();
        let task = store.list_by_owner(&OwnerId::from("user1")).remove(0);
        assert!(store.delete(task.id));
        assert_eq!(store.get(task.id), None);
        assert!(!store.delete(task.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_substring_over_title_or_description() {
        let store = seeded();
        let owner = OwnerId::from("user1");

        let hits = store.search(&owner, "doc");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Complete Project Documentation");

        // "merge" only appears in a description.
        assert_eq!(store.search(&owner, "MERGE").len(), 1);
        assert!(store.search(&owner, "nonexistent").is_empty());
    }

    #[test]
    fn empty_search_query_matches_every_owned_record() {
        let store = seeded();
        assert_eq!(store.search(&OwnerId::from("user1"), "").len(), 2);
        assert!(store.search(&OwnerId::from("user2"), "").is_empty());
    }

    #[test]
    fn filter_criteria_narrow_monotonically() {
        let store = seeded();
        let owner = OwnerId::from("user1");

        let all = store.filter(&owner, &TaskFilter::new());
        let by_status = store.filter(&owner, &TaskFilter::new().with_status(TaskStatus::Pending));
        let by_both = store.filter(
            &owner,
            &TaskFilter::new()
                .with_status(TaskStatus::Pending)
                .with_priority(TaskPriority::High),
        );

        assert_eq!(all.len(), 2);
        assert!(by_status.len() <= all.len());
        assert!(by_both.len() <= by_status.len());
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].title, "Complete Project Documentation");

        let none = store.filter(
            &owner,
            &TaskFilter::new()
                .with_status(TaskStatus::Pending)
                .with_priority(TaskPriority::Low),
        );
        assert!(none.is_empty());
    }
}

//! Per-task workflow status, held in an explicit store that the page reads
//! from instead of ambient session state.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::notifications::{NotificationCenter, NotificationId, NotificationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey {
    pub case_id: String,
    pub stage_id: String,
    pub task_id: String,
}

impl TaskKey {
    pub fn new(
        case_id: impl Into<String>,
        stage_id: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            stage_id: stage_id.into(),
            task_id: task_id.into(),
        }
    }

    /// Flat key used by exported session dumps.
    pub fn storage_key(&self) -> String {
        format!("taskStatus_{}_{}_{}", self.case_id, self.stage_id, self.task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub started_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// A record stamped the way a status change at `now` would stamp it.
    pub fn at(status: TaskStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            started_date: (status == TaskStatus::InProgress).then_some(now),
            completed_date: (status == TaskStatus::Completed).then_some(now),
        }
    }
}

pub trait TaskStatusStore: Send + Sync {
    fn get(&self, key: &TaskKey) -> Option<TaskRecord>;

    fn set(&self, key: TaskKey, record: TaskRecord);

    /// Remove every task entry; returns how many were removed.
    fn clear(&self) -> usize;

    fn tasks_for_case(&self, case_id: &str) -> Vec<(TaskKey, TaskRecord)>;

    /// Record that demo data has been seeded. `true` only on the first call;
    /// `clear` does not reset it.
    fn mark_seeded(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStatusStore {
    tasks: DashMap<TaskKey, TaskRecord>,
    seeded: AtomicBool,
}

impl InMemoryTaskStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskStatusStore for InMemoryTaskStatusStore {
    fn get(&self, key: &TaskKey) -> Option<TaskRecord> {
        self.tasks.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: TaskKey, record: TaskRecord) {
        tracing::debug!(key = %key.storage_key(), status = ?record.status, "task status set");
        self.tasks.insert(key, record);
    }

    fn clear(&self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }

    fn tasks_for_case(&self, case_id: &str) -> Vec<(TaskKey, TaskRecord)> {
        let mut tasks: Vec<_> = self
            .tasks
            .iter()
            .filter(|entry| entry.key().case_id == case_id)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        tasks.sort_by(|a, b| a.0.cmp(&b.0));
        tasks
    }

    fn mark_seeded(&self) -> bool {
        !self.seeded.swap(true, Ordering::SeqCst)
    }
}

/// Status shown in the case header. Work recorded against an `Open` or `New`
/// case promotes it to `In progress`.
pub fn display_status(store: &dyn TaskStatusStore, case_id: &str, base_status: &str) -> String {
    let started = store
        .tasks_for_case(case_id)
        .iter()
        .any(|(_, record)| record.status != TaskStatus::NotStarted);
    if started && matches!(base_status, "Open" | "New") {
        "In progress".to_string()
    } else {
        base_status.to_string()
    }
}

/// Demo seed: `{ "taskStatuses": { "<case>": { "<stage>_<task>": "<status>" } } }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededTasks {
    #[serde(default)]
    pub task_statuses: BTreeMap<String, BTreeMap<String, TaskStatus>>,
}

/// Load seeded statuses into `store`, stamping dates with `now`. Entries
/// whose key has no `_` separator are skipped. Returns the number written.
pub fn seed_task_statuses(
    store: &dyn TaskStatusStore,
    seed: &SeededTasks,
    now: DateTime<Utc>,
) -> usize {
    let mut written = 0;
    for (case_id, tasks) in &seed.task_statuses {
        for (task_key, status) in tasks {
            let Some((stage_id, task_id)) = task_key.split_once('_') else {
                tracing::warn!(case_id = %case_id, task_key = %task_key, "skipping malformed seeded task key");
                continue;
            };
            store.set(
                TaskKey::new(case_id.as_str(), stage_id, task_id),
                TaskRecord::at(*status, now),
            );
            written += 1;
        }
    }
    written
}

/// Seed at most once per store. `None` when the store was already seeded.
pub fn seed_task_statuses_once(
    store: &dyn TaskStatusStore,
    seed: &SeededTasks,
    now: DateTime<Utc>,
) -> Option<usize> {
    if !store.mark_seeded() {
        tracing::debug!("seeded task data already loaded");
        return None;
    }
    let written = seed_task_statuses(store, seed, now);
    tracing::info!(written, "seeded task data loaded");
    Some(written)
}

/// Clear the store and tell the user how much went.
pub fn clear_task_data(store: &dyn TaskStatusStore, center: &NotificationCenter) -> NotificationId {
    let removed = store.clear();
    tracing::info!(removed, "cleared task data");
    center.notify(
        NotificationKind::Success,
        "Session data cleared",
        Some(format!(
            "Cleared {} task data entries from session storage.",
            removed
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let record: TaskRecord = serde_json::from_str(
            r#"{"status": "completed", "startedDate": null, "completedDate": "2024-05-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record, TaskRecord::at(TaskStatus::Completed, now()));
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(
            TaskKey::new("CASE-1", "triage", "review").storage_key(),
            "taskStatus_CASE-1_triage_review"
        );
    }

    #[test]
    fn test_display_status() {
        let store = InMemoryTaskStatusStore::new();
        assert_eq!(display_status(&store, "CASE-1", "Open"), "Open");

        store.set(
            TaskKey::new("CASE-1", "triage", "review"),
            TaskRecord::at(TaskStatus::NotStarted, now()),
        );
        assert_eq!(display_status(&store, "CASE-1", "Open"), "Open");

        store.set(
            TaskKey::new("CASE-1", "triage", "assess"),
            TaskRecord::at(TaskStatus::InProgress, now()),
        );
        assert_eq!(display_status(&store, "CASE-1", "Open"), "In progress");
        assert_eq!(display_status(&store, "CASE-1", "New"), "In progress");
        assert_eq!(display_status(&store, "CASE-1", "Closed"), "Closed");
        assert_eq!(display_status(&store, "CASE-2", "Open"), "Open");
    }

    #[test]
    fn test_seed_and_clear() {
        let seed: SeededTasks = serde_json::from_str(
            r#"{"taskStatuses": {"CASE-1": {"triage_review": "completed", "triage_assess": "in-progress", "broken": "completed"}}}"#,
        )
        .unwrap();
        let store = InMemoryTaskStatusStore::new();
        assert_eq!(seed_task_statuses(&store, &seed, now()), 2);

        let review = store.get(&TaskKey::new("CASE-1", "triage", "review")).unwrap();
        assert_eq!(review.completed_date, Some(now()));
        assert_eq!(review.started_date, None);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.clear(), 0);
    }

    #[test]
    fn test_seed_once_survives_clear() {
        let seed: SeededTasks =
            serde_json::from_str(r#"{"taskStatuses": {"CASE-1": {"triage_review": "in-progress"}}}"#)
                .unwrap();
        let store = InMemoryTaskStatusStore::new();
        assert_eq!(seed_task_statuses_once(&store, &seed, now()), Some(1));
        assert_eq!(seed_task_statuses_once(&store, &seed, now()), None);

        store.clear();
        assert_eq!(seed_task_statuses_once(&store, &seed, now()), None);
        assert!(store.is_empty());
    }
}

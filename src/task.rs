//! Task entity and its CRUD service.
//!
//! Tasks carry both a `parent_task_id` reference and an independent
//! `is_subtask` flag. The two are stored separately on purpose and may
//! diverge after partial updates; nothing in this module derives one from
//! the other. Parent references are advisory: the referenced task is not
//! required to exist and cycles are not rejected.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{Priority, Status};
use crate::store::{self, Bucket, Store};

/// A task record as persisted in the tasks bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
    pub project_id: Option<u64>,
    pub parent_task_id: Option<u64>,
    pub is_subtask: bool,
    pub created_at_utc: i64,
    pub completed_at_utc: Option<i64>,
}

/// Input for [`TaskService::create`].
///
/// Whatever the caller supplies, a new task always starts `pending` with no
/// completion timestamp; the service forces those.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub parent_task_id: Option<u64>,
    #[serde(default)]
    pub is_subtask: bool,
}

/// Partial update for [`TaskService::update`].
///
/// `parent_task_id` and `is_subtask` fall back to the stored values when
/// omitted, so a plain status toggle can never drop subtask linkage. There
/// is deliberately no way to clear `parent_task_id` through a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub project_id: Option<u64>,
    pub parent_task_id: Option<u64>,
    pub is_subtask: Option<bool>,
}

/// CRUD over the tasks bucket, plus project-scoped reads.
///
/// Operations are async and may suspend for the configured simulated
/// latency; the substrate underneath is synchronous and single-writer.
pub struct TaskService {
    store: Arc<dyn Store>,
    latency: Duration,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        TaskService {
            store,
            latency: Duration::ZERO,
        }
    }

    /// Simulated per-operation latency. Zero by default.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn load(&self) -> Result<Vec<Task>> {
        store::load_or_seed(self.store.as_ref(), Bucket::Tasks, store::seed::tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        store::persist(self.store.as_ref(), Bucket::Tasks, tasks)
    }

    /// Full collection in stored order: newest first, since creates prepend.
    pub async fn get_all(&self) -> Result<Vec<Task>> {
        self.pause().await;
        self.load()
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Task> {
        self.pause().await;
        let tasks = self.load()?;
        tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Tasks associated with the given project, stored order. A project id
    /// with no tasks (or no project behind it) yields an empty list, never
    /// an error.
    pub async fn get_by_project(&self, project_id: u64) -> Result<Vec<Task>> {
        self.pause().await;
        let tasks = self.load()?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.project_id == Some(project_id))
            .collect())
    }

    /// Allocate `max(existing ids, 0) + 1` (recomputed each call, not a
    /// counter) and prepend. Status and completion timestamp are forced to
    /// their initial values regardless of input.
    pub async fn create(&self, data: NewTask) -> Result<Task> {
        self.pause().await;
        let mut tasks = self.load()?;
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task {
            id,
            title: data.title,
            description: data.description.unwrap_or_default(),
            due: data.due,
            priority: data.priority,
            status: Status::Pending,
            project_id: data.project_id,
            parent_task_id: data.parent_task_id,
            is_subtask: data.is_subtask,
            created_at_utc: Utc::now().timestamp(),
            completed_at_utc: None,
        };
        tasks.insert(0, task.clone());
        self.save(&tasks)?;
        tracing::debug!(id, subtask = task.is_subtask, "created task");
        Ok(task)
    }

    /// Merge the patch over the stored record. A status transition drives
    /// `completed_at_utc`: entering `completed` stamps the current instant,
    /// leaving it clears the stamp.
    pub async fn update(&self, id: u64, patch: TaskPatch) -> Result<Task> {
        self.pause().await;
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(due) = patch.due {
            task.due = Some(due);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            if status != task.status {
                task.completed_at_utc = match status {
                    Status::Completed => Some(Utc::now().timestamp()),
                    Status::Pending => None,
                };
            }
            task.status = status;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = Some(project_id);
        }
        // Fallback-to-previous: omitted linkage fields keep stored values.
        if let Some(parent_task_id) = patch.parent_task_id {
            task.parent_task_id = Some(parent_task_id);
        }
        if let Some(is_subtask) = patch.is_subtask {
            task.is_subtask = is_subtask;
        }
        let updated = task.clone();
        self.save(&tasks)?;
        tracing::debug!(id, "updated task");
        Ok(updated)
    }

    /// Remove and return the record. Tasks referencing the removed id keep
    /// their references; parent links are advisory.
    pub async fn delete(&self, id: u64) -> Result<Task> {
        self.pause().await;
        let mut tasks = self.load()?;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        let removed = tasks.remove(idx);
        self.save(&tasks)?;
        tracing::debug!(id, "deleted task");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryStore::empty()))
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            due: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_from_one() {
        let svc = service();
        for expected in 1..=4 {
            let t = svc.create(new_task("t")).await.unwrap();
            assert_eq!(t.id, expected);
        }
    }

    #[tokio::test]
    async fn create_forces_pending_and_defaults() {
        let svc = service();
        let t = svc
            .create(NewTask {
                title: "bare".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(t.status, Status::Pending);
        assert_eq!(t.description, "");
        assert_eq!(t.due, None);
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.project_id, None);
        assert_eq!(t.parent_task_id, None);
        assert!(!t.is_subtask);
        assert_eq!(t.completed_at_utc, None);
    }

    #[tokio::test]
    async fn empty_patch_changes_nothing() {
        let svc = service();
        let created = svc.create(new_task("keep")).await.unwrap();
        let updated = svc.update(created.id, TaskPatch::default()).await.unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn completing_stamps_and_reopening_clears_completed_at() {
        let svc = service();
        let t = svc.create(new_task("toggle")).await.unwrap();

        let done = svc
            .update(
                t.id,
                TaskPatch {
                    status: Some(Status::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(done.status, Status::Completed);
        assert!(done.completed_at_utc.is_some());

        let reopened = svc
            .update(
                t.id,
                TaskPatch {
                    status: Some(Status::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(reopened.status, Status::Pending);
        assert_eq!(reopened.completed_at_utc, None);
    }

    #[tokio::test]
    async fn status_toggle_never_drops_subtask_linkage() {
        let svc = service();
        let parent = svc.create(new_task("parent")).await.unwrap();
        let sub = svc
            .create(NewTask {
                title: "child".to_string(),
                parent_task_id: Some(parent.id),
                is_subtask: true,
                ..Default::default()
            })
            .await
            .unwrap();

        let toggled = svc
            .update(
                sub.id,
                TaskPatch {
                    status: Some(Status::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(toggled.parent_task_id, Some(parent.id));
        assert!(toggled.is_subtask);
    }

    #[tokio::test]
    async fn linkage_fields_stay_independently_mutable() {
        let svc = service();
        let t = svc
            .create(NewTask {
                title: "diverge".to_string(),
                parent_task_id: Some(42),
                is_subtask: true,
                ..Default::default()
            })
            .await
            .unwrap();

        // Flag off while the reference stays: allowed, both fields stored
        // as given.
        let diverged = svc
            .update(
                t.id,
                TaskPatch {
                    is_subtask: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(diverged.parent_task_id, Some(42));
        assert!(!diverged.is_subtask);
    }

    #[tokio::test]
    async fn get_by_project_returns_only_that_projects_tasks() {
        let svc = service();
        let t1 = svc
            .create(NewTask {
                title: "in".to_string(),
                project_id: Some(7),
                ..Default::default()
            })
            .await
            .unwrap();
        svc.create(new_task("out")).await.unwrap();

        let scoped = svc.get_by_project(7).await.unwrap();
        assert_eq!(scoped, vec![t1]);
        assert!(svc.get_by_project(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_then_get_fails_not_found() {
        let svc = service();
        let t = svc.create(new_task("gone")).await.unwrap();
        svc.delete(t.id).await.unwrap();
        assert!(matches!(
            svc.get_by_id(t.id).await,
            Err(Error::TaskNotFound(id)) if id == t.id
        ));
    }

    #[tokio::test]
    async fn uninitialized_store_serves_the_sample_tasks() {
        let svc = TaskService::new(Arc::new(MemoryStore::new()));
        let all = svc.get_all().await.unwrap();
        assert_eq!(all, crate::store::seed::tasks());
        // Ids keep climbing from the seeded max.
        let next = svc.create(new_task("after seed")).await.unwrap();
        assert_eq!(next.id, 6);
    }

    #[tokio::test]
    async fn saved_state_survives_a_restart_instead_of_reseeding() {
        let dir = tempfile::tempdir().unwrap();

        // First "process": seed, then mutate.
        {
            let svc = TaskService::new(Arc::new(crate::store::JsonFileStore::new(dir.path())));
            let seeded = svc.get_all().await.unwrap();
            for t in seeded {
                svc.delete(t.id).await.unwrap();
            }
            svc.create(new_task("survivor")).await.unwrap();
        }

        // Second "process" over the same directory sees the saved state.
        let svc = TaskService::new(Arc::new(crate::store::JsonFileStore::new(dir.path())));
        let all = svc.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "survivor");
    }

    #[tokio::test]
    async fn task_ids_are_independent_of_project_ids() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::empty());
        let projects = crate::project::ProjectService::new(store.clone());
        let tasks = TaskService::new(store);

        let p = projects
            .create(crate::project::NewProject {
                title: "p".to_string(),
                description: String::new(),
                color: "#fff".to_string(),
            })
            .await
            .unwrap();
        let t = tasks.create(new_task("t")).await.unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(t.id, 1);
    }
}

//! Project entity and its CRUD service.
//!
//! Projects are lightweight grouping records; tasks reference them by id.
//! Deleting a project does not cascade — a task pointing at a missing
//! project id is tolerated everywhere.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{self, Bucket, Store};

/// A project record as persisted in the projects bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Opaque colour token, presentation-only; must round-trip exactly.
    pub color: String,
    pub created_at_utc: i64,
}

/// Input for [`ProjectService::create`]. The service owns id and timestamp
/// assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub color: String,
}

/// Partial update for [`ProjectService::update`]. Omitted fields keep their
/// stored values; `id` and `created_at_utc` are never touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// CRUD over the projects bucket.
///
/// Every operation is async and may suspend for the configured simulated
/// latency before touching the store. The substrate itself is synchronous
/// and single-writer.
pub struct ProjectService {
    store: Arc<dyn Store>,
    latency: Duration,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        ProjectService {
            store,
            latency: Duration::ZERO,
        }
    }

    /// Simulated per-operation latency, for callers that want the original
    /// suspend-then-resolve feel. Zero by default.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn load(&self) -> Result<Vec<Project>> {
        store::load_or_seed(self.store.as_ref(), Bucket::Projects, store::seed::projects)
    }

    fn save(&self, projects: &[Project]) -> Result<()> {
        store::persist(self.store.as_ref(), Bucket::Projects, projects)
    }

    /// Full collection in stored order: newest first, since creates prepend.
    pub async fn get_all(&self) -> Result<Vec<Project>> {
        self.pause().await;
        self.load()
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Project> {
        self.pause().await;
        let projects = self.load()?;
        projects
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))
    }

    /// Allocate `max(existing ids, 0) + 1` and prepend the new record.
    ///
    /// The max is recomputed on every call, so ids below the current max are
    /// never reused after deletions — this matches the stored-data contract
    /// and is deliberately not a counter.
    pub async fn create(&self, data: NewProject) -> Result<Project> {
        self.pause().await;
        let mut projects = self.load()?;
        let id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let project = Project {
            id,
            title: data.title,
            description: data.description,
            color: data.color,
            created_at_utc: Utc::now().timestamp(),
        };
        projects.insert(0, project.clone());
        self.save(&projects)?;
        tracing::debug!(id, "created project");
        Ok(project)
    }

    pub async fn update(&self, id: u64, patch: ProjectPatch) -> Result<Project> {
        self.pause().await;
        let mut projects = self.load()?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))?;
        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(color) = patch.color {
            project.color = color;
        }
        let updated = project.clone();
        self.save(&projects)?;
        tracing::debug!(id, "updated project");
        Ok(updated)
    }

    /// Remove and return the record.
    pub async fn delete(&self, id: u64) -> Result<Project> {
        self.pause().await;
        let mut projects = self.load()?;
        let idx = projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProjectNotFound(id))?;
        let removed = projects.remove(idx);
        self.save(&projects)?;
        tracing::debug!(id, "deleted project");
        Ok(removed)
    }
}

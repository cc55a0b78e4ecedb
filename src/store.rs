//! Persistence substrate: a durable key-value store with two logical buckets.
//!
//! The substrate is deliberately dumb: it hands whole buckets back and forth
//! as serialized payloads and knows nothing about entities. Services own the
//! typed view. `JsonFileStore` is the durable implementation (one JSON file
//! per bucket, written atomically via temp file + rename); `MemoryStore` is
//! the in-memory double used by tests.
//!
//! A bucket that has never been written reads back as `None`. The first
//! typed load of such a bucket seeds it from the shipped sample dataset
//! exactly once; every later load sees saved state, never the samples again.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::fields::{Priority, Status};
use crate::project::Project;
use crate::task::Task;

/// One named logical collection within the substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Projects,
    Tasks,
}

impl Bucket {
    fn file_name(self) -> &'static str {
        match self {
            Bucket::Projects => "projects.json",
            Bucket::Tasks => "tasks.json",
        }
    }
}

/// Raw storage handle. Single-writer: callers serialize their own
/// read-modify-write cycles, the store only guarantees that each `write`
/// replaces the bucket atomically from the reader's perspective.
pub trait Store: Send + Sync {
    /// Read a bucket's payload. `None` means the bucket was never written.
    fn read(&self, bucket: Bucket) -> io::Result<Option<String>>;

    /// Replace a bucket's payload.
    fn write(&self, bucket: Bucket, payload: &str) -> io::Result<()>;
}

/// Durable store keeping one JSON file per bucket under a base directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    fn path(&self, bucket: Bucket) -> PathBuf {
        self.dir.join(bucket.file_name())
    }
}

impl Store for JsonFileStore {
    fn read(&self, bucket: Bucket) -> io::Result<Option<String>> {
        let path = self.path(bucket);
        if !path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&path)?.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn write(&self, bucket: Bucket, payload: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(bucket);
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(payload.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: Mutex<HashMap<Bucket, String>>,
}

impl MemoryStore {
    /// An uninitialized store: the first typed load of each bucket will
    /// seed it from the sample dataset.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store with both buckets already initialized to empty collections,
    /// so no seeding occurs. Ids then start from 1.
    pub fn empty() -> Self {
        let store = MemoryStore::default();
        {
            let mut buckets = store.buckets.lock().unwrap();
            buckets.insert(Bucket::Projects, "[]".to_string());
            buckets.insert(Bucket::Tasks, "[]".to_string());
        }
        store
    }
}

impl Store for MemoryStore {
    fn read(&self, bucket: Bucket) -> io::Result<Option<String>> {
        Ok(self.buckets.lock().unwrap().get(&bucket).cloned())
    }

    fn write(&self, bucket: Bucket, payload: &str) -> io::Result<()> {
        self.buckets.lock().unwrap().insert(bucket, payload.to_string());
        Ok(())
    }
}

/// Load a bucket as typed records, seeding it first if it was never written.
pub(crate) fn load_or_seed<T>(
    store: &dyn Store,
    bucket: Bucket,
    seed: fn() -> Vec<T>,
) -> Result<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    match store.read(bucket)? {
        Some(payload) => Ok(serde_json::from_str(&payload)?),
        None => {
            let records = seed();
            persist(store, bucket, &records)?;
            tracing::debug!(?bucket, count = records.len(), "seeded bucket");
            Ok(records)
        }
    }
}

/// Serialize records and replace the bucket.
pub(crate) fn persist<T: Serialize>(
    store: &dyn Store,
    bucket: Bucket,
    records: &[T],
) -> Result<()> {
    let payload = serde_json::to_string_pretty(records)?;
    store.write(bucket, &payload)?;
    Ok(())
}

/// Shipped sample dataset used to seed never-written buckets. Stored
/// newest-first, matching the prepend-on-create convention.
pub mod seed {
    use chrono::NaiveDate;

    use super::*;

    pub fn projects() -> Vec<Project> {
        vec![
            Project {
                id: 3,
                title: "Home Renovation".to_string(),
                description: "Kitchen and bathroom refresh, one room at a time.".to_string(),
                color: "#F59E0B".to_string(),
                created_at_utc: 1_736_208_000,
            },
            Project {
                id: 2,
                title: "Portfolio Site".to_string(),
                description: "Personal site rebuild with a proper writing section.".to_string(),
                color: "#10B981".to_string(),
                created_at_utc: 1_735_862_400,
            },
            Project {
                id: 1,
                title: "Launch Checklist".to_string(),
                description: "Everything needed to ship the side project.".to_string(),
                color: "#6366F1".to_string(),
                created_at_utc: 1_735_689_600,
            },
        ]
    }

    pub fn tasks() -> Vec<Task> {
        vec![
            Task {
                id: 5,
                title: "Order tile samples".to_string(),
                description: "Three finishes for the bathroom floor.".to_string(),
                due: NaiveDate::from_ymd_opt(2025, 2, 14),
                priority: Priority::Low,
                status: Status::Pending,
                project_id: Some(3),
                parent_task_id: Some(4),
                is_subtask: true,
                created_at_utc: 1_736_380_800,
                completed_at_utc: None,
            },
            Task {
                id: 4,
                title: "Plan bathroom layout".to_string(),
                description: String::new(),
                due: NaiveDate::from_ymd_opt(2025, 2, 28),
                priority: Priority::Medium,
                status: Status::Pending,
                project_id: Some(3),
                parent_task_id: None,
                is_subtask: false,
                created_at_utc: 1_736_380_700,
                completed_at_utc: None,
            },
            Task {
                id: 3,
                title: "Write about page".to_string(),
                description: "Short bio plus links to recent work.".to_string(),
                due: NaiveDate::from_ymd_opt(2025, 1, 20),
                priority: Priority::Medium,
                status: Status::Completed,
                project_id: Some(2),
                parent_task_id: None,
                is_subtask: false,
                created_at_utc: 1_735_948_800,
                completed_at_utc: Some(1_736_035_200),
            },
            Task {
                id: 2,
                title: "Set up analytics".to_string(),
                description: "Privacy-friendly, no cookie banner required.".to_string(),
                due: NaiveDate::from_ymd_opt(2025, 1, 15),
                priority: Priority::High,
                status: Status::Pending,
                project_id: Some(1),
                parent_task_id: None,
                is_subtask: false,
                created_at_utc: 1_735_776_000,
                completed_at_utc: None,
            },
            Task {
                id: 1,
                title: "Draft announcement post".to_string(),
                description: String::new(),
                due: NaiveDate::from_ymd_opt(2025, 1, 10),
                priority: Priority::High,
                status: Status::Pending,
                project_id: Some(1),
                parent_task_id: None,
                is_subtask: false,
                created_at_utc: 1_735_689_700,
                completed_at_utc: None,
            },
        ]
    }
}

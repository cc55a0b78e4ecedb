//! # TaskFlow core
//!
//! Persistence-and-query core for a personal task/project tracker: the
//! entity model, the id-allocation scheme, the derived-state computations,
//! the sort/filter pipeline, and the parent/subtask auto-creation workflow.
//! Visual components, routing, and notifications are external collaborators
//! that call into this crate and render what comes back.
//!
//! ## Layout
//!
//! - [`store`] — durable key-value substrate with two buckets (projects,
//!   tasks), seeded from a sample dataset on first use.
//! - [`project`] / [`task`] — entities and their CRUD services. Services
//!   take an explicit store handle, so tests run against an in-memory
//!   substrate.
//! - [`query`] — text filtering, stable multi-key sorting, completion and
//!   overdue statistics, all computed on read.
//! - [`form`] — task-composition state and the two-phase subtask
//!   auto-creation protocol.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskflow::{JsonFileStore, NewTask, TaskService};
//!
//! # async fn demo() -> taskflow::Result<()> {
//! let store = Arc::new(JsonFileStore::new("./data"));
//! let tasks = TaskService::new(store);
//!
//! let task = tasks
//!     .create(NewTask {
//!         title: "Write announcement".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("created task {}", task.id);
//! # Ok(())
//! # }
//! ```
//!
//! All data lives in two JSON files under the store directory; ids are
//! allocated as `current max + 1` and new records are prepended, so stored
//! order is newest-first by construction.

pub mod error;
pub mod fields;
pub mod form;
pub mod project;
pub mod query;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use fields::{Priority, SortDirection, SortKey, Status};
pub use form::TaskForm;
pub use project::{NewProject, Project, ProjectPatch, ProjectService};
pub use query::{ProjectStats, TaskStats};
pub use store::{Bucket, JsonFileStore, MemoryStore, Store};
pub use task::{NewTask, Task, TaskPatch, TaskService};

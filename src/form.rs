//! Task-composition form state and the subtask auto-creation workflow.
//!
//! Marking an in-progress task as a subtask silently persists a separate
//! parent task and links it. That side effect is a two-phase write against
//! [`TaskService`] primitives, owned here rather than by the service:
//!
//! 1. Phase one submits the current parent-field values as a new,
//!    independent task with `is_subtask = false`.
//! 2. Phase two takes the returned id as `parent_task_id`, clears the
//!    parent fields, and flips the flag so fresh subtask fields can be
//!    filled in.
//!
//! The workflow only fires on the flag's false-to-true edge, and the parent
//! persisted in an edit session is remembered so toggling off and on again
//! relinks instead of creating a duplicate. If phase one fails the flag
//! stays off and nothing is persisted.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::fields::Priority;
use crate::task::{NewTask, Task, TaskService};

/// In-progress field values for a task being composed.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub project_id: Option<u64>,
    pub is_subtask: bool,
    pub parent_task_id: Option<u64>,
    /// Parent already persisted during this edit session, kept so repeated
    /// toggling cannot re-submit stale field values.
    submitted_parent: Option<u64>,
}

impl TaskForm {
    pub fn new() -> Self {
        TaskForm::default()
    }

    /// Caller-side validation, mirroring what a form would block on before
    /// submitting. The services themselves accept anything shaped validly.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title is required".to_string()));
        }
        if self.due.is_none() {
            return Err(Error::Validation("due date is required".to_string()));
        }
        if self.is_subtask && self.parent_task_id.is_none() {
            return Err(Error::Validation("parent task is required".to_string()));
        }
        Ok(())
    }

    /// The record this form would create on final submit.
    pub fn draft(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            due: self.due,
            priority: self.priority,
            project_id: self.project_id,
            parent_task_id: self.parent_task_id,
            is_subtask: self.is_subtask,
        }
    }

    /// Flip the "is subtask" flag, running the two-phase parent creation on
    /// the false-to-true edge.
    ///
    /// Returns the parent task persisted by phase one, or `None` when no
    /// write happened (no-op toggle, disable, or relink to a parent already
    /// submitted this session). On a phase-one failure the flag is left
    /// off and the form fields are untouched.
    pub async fn set_subtask(
        &mut self,
        tasks: &TaskService,
        enabled: bool,
    ) -> Result<Option<Task>> {
        // Gate on the edge transition, never on re-evaluation.
        if enabled == self.is_subtask {
            return Ok(None);
        }

        if !enabled {
            self.is_subtask = false;
            self.parent_task_id = None;
            return Ok(None);
        }

        // Re-enabling within the same edit session relinks the parent that
        // phase one already persisted; the cleared fields now describe the
        // subtask, not the parent, so re-submitting them would be wrong.
        if let Some(parent_id) = self.submitted_parent {
            self.parent_task_id = Some(parent_id);
            self.is_subtask = true;
            return Ok(None);
        }

        if self.title.trim().is_empty() {
            return Err(Error::Validation(
                "parent task title is required".to_string(),
            ));
        }
        if self.due.is_none() {
            return Err(Error::Validation(
                "parent task due date is required".to_string(),
            ));
        }

        // Phase one: persist the in-progress values as the parent.
        let parent = tasks
            .create(NewTask {
                title: self.title.clone(),
                description: if self.description.is_empty() {
                    None
                } else {
                    Some(self.description.clone())
                },
                due: self.due,
                priority: self.priority,
                project_id: self.project_id,
                parent_task_id: None,
                is_subtask: false,
            })
            .await?;
        tracing::debug!(parent_id = parent.id, "auto-created parent task");

        // Phase two: link and reset the parent fields for subtask entry.
        self.parent_task_id = Some(parent.id);
        self.submitted_parent = Some(parent.id);
        self.is_subtask = true;
        self.title.clear();
        self.description.clear();
        self.due = None;
        self.priority = Priority::default();

        Ok(Some(parent))
    }
}

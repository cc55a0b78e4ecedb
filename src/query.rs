//! Filtering, sorting, and derived statistics over task collections.
//!
//! Nothing here is persisted: overdue flags, counts, and completion
//! percentages are recomputed on every read. Callers rerun these after each
//! mutation to refresh their views.

use chrono::{Local, NaiveDate};

use crate::fields::{SortDirection, SortKey, Status};
use crate::task::Task;

/// Aggregate counters for a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// Completion summary for one project's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// `round(completed / total * 100)`; 0 for an empty collection.
    pub completion_percentage: u32,
}

/// Case-insensitive substring match against title or description. An empty
/// query matches everything.
pub fn filter_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Sort in place by the given key and direction.
///
/// Stable for equal keys in both directions: callers re-sort on every filter
/// change, and equal-priority rows must not swap between renders. A task
/// without a due date sorts as if due at the earliest possible date.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey, direction: SortDirection) {
    tasks.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortKey::Due => {
                let a_due = a.due.unwrap_or(NaiveDate::MIN);
                let b_due = b.due.unwrap_or(NaiveDate::MIN);
                a_due.cmp(&b_due)
            }
            SortKey::Created => a.created_at_utc.cmp(&b.created_at_utc),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Display-only overdue classification: a due date strictly before `today`
/// (the same calendar day is not overdue yet) on a task that is not
/// completed.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    match task.due {
        Some(due) => due < today && task.status != Status::Completed,
        None => false,
    }
}

/// Counters over the whole collection, with overdue judged against `today`.
pub fn task_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.status == Status::Completed).count();
    let overdue = tasks.iter().filter(|t| is_overdue(t, today)).count();
    TaskStats {
        total,
        completed,
        pending: total - completed,
        overdue,
    }
}

/// Counters plus completion percentage, as shown on a project detail view.
pub fn project_stats(tasks: &[Task]) -> ProjectStats {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.status == Status::Completed).count();
    let completion_percentage = if total_tasks > 0 {
        ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as u32
    } else {
        0
    };
    ProjectStats {
        total_tasks,
        completed_tasks,
        pending_tasks: total_tasks - completed_tasks,
        completion_percentage,
    }
}

/// Convenience wrapper judging overdue against the local calendar day.
pub fn task_stats_now(tasks: &[Task]) -> TaskStats {
    task_stats(tasks, Local::now().date_naive())
}

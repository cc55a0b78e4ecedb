//! Enumerations and field types shared across the crate.
//!
//! This module defines the structured field types carried by tasks, plus the
//! sort keys accepted by the query engine. The serialized forms match the
//! persisted record layout (`"High"`, `"pending"`, ...).

use serde::{Deserialize, Serialize};

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Fixed total order used for sorting: High=3, Medium=2, Low=1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Task completion status. Only these two states are ever stored; labels
/// like "overdue" are computed on read.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

/// Available sorting keys for task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Due,
    Created,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

//! Crate error taxonomy.
//!
//! Service failures are terminal for the single operation that raised them;
//! there is no automatic retry and no partial apply. Callers translate these
//! into user-visible messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("project {0} not found")]
    ProjectNotFound(u64),
    #[error("task {0} not found")]
    TaskNotFound(u64),
    /// Caller-side input that never should have reached a service, e.g. a
    /// form submitted without a title. The services themselves do not
    /// validate; only the form layer raises this.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Data(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

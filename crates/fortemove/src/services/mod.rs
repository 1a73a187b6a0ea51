//! Role-scoped domain services. Each call takes the acting [`Principal`]
//! explicitly and returns a [`ServiceError`] the HTTP layer maps onto the
//! response envelope.

pub mod admin;
pub mod candidate;
pub mod forms;
pub mod jobs;
pub mod transfer;

use crate::access::AccessError;
use crate::export::ExportError;
use crate::import::ImportError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("{0}")]
    Conflict(String),
    #[error("storage failure")]
    Unavailable(#[source] StoreError),
    #[error("failed to serialize response data")]
    Serialize(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { field, message } => Self::Validation { field, message },
            StoreError::NotFound => Self::NotFound("No record found with that ID"),
            StoreError::Conflict(message) => Self::Conflict(message),
            err @ StoreError::Unavailable(_) => Self::Unavailable(err),
        }
    }
}

impl From<ImportError> for ServiceError {
    fn from(err: ImportError) -> Self {
        match err {
            err @ ImportError::TooManyRows { .. } => Self::validation("file", err.to_string()),
        }
    }
}

impl From<ExportError> for ServiceError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Store(err) => err.into(),
            ExportError::Render(message) => {
                Self::Unavailable(StoreError::Unavailable(message))
            }
        }
    }
}

/// Best-effort removal of an uploaded file whose owning database write
/// failed or was rejected; keeps storage free of orphans. Not guaranteed
/// under process crash.
pub trait FileCleanup: Send + Sync {
    fn remove(&self, path: &str) -> std::io::Result<()>;
}

/// Deletes from the local filesystem; uploads are path-referenced files.
#[derive(Debug, Default, Clone)]
pub struct LocalFileCleanup;

impl FileCleanup for LocalFileCleanup {
    fn remove(&self, path: &str) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("no qualifying heading found in reply {assistant_message_id}")]
    ExtractionEmpty { assistant_message_id: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures raised at the persistence boundary.
///
/// These travel through [`NavError::Repository`] unchanged; the service never
/// retries or compensates.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("constraint conflict: {0}")]
    Conflict(String),

    #[error("navigator does not exist: {0}")]
    MissingNavigator(String),

    #[error("section batch insert failed at section {failed_section_id}: {source}")]
    BatchInsert {
        failed_section_id: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{0} mutex poisoned")]
    Poisoned(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl NavError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ExtractionEmpty { .. } => "EXTRACTION_EMPTY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Repository(RepositoryError::Conflict(_)) => "REPOSITORY_CONFLICT",
            Self::Repository(RepositoryError::MissingNavigator(_)) => "NAVIGATOR_MISSING",
            Self::Repository(_) => "REPOSITORY_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_payload(
        &self,
        operation: impl Into<String>,
        chat_id: Option<String>,
    ) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            chat_id,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::ExtractionEmpty {
                assistant_message_id,
            } => Some(serde_json::json!({
                "assistantMessageId": assistant_message_id,
            })),
            Self::Repository(RepositoryError::BatchInsert {
                failed_section_id, ..
            }) => Some(serde_json::json!({
                "failedSectionId": failed_section_id,
            })),
            _ => None,
        }
    }
}

impl RepositoryError {
    pub(crate) const fn poisoned(lock_name: &'static str) -> Self {
        Self::Poisoned(lock_name)
    }
}

use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomhubError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Schedule conflict with events {ids:?}")]
    ScheduleConflict { ids: Vec<i64> },

    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unprocessable: {message}")]
    Unprocessable { message: String },

    #[error("Internal error")]
    Internal,
}

impl RoomhubError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn schedule_conflict(ids: Vec<i64>) -> Self {
        Self::ScheduleConflict { ids }
    }

    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            key: key.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

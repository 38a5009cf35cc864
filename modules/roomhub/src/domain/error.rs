use thiserror::Error;

/// One rejected input field, located by a JSON pointer into the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub pointer: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {}", summarize(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("Event collides with existing events {conflicting_ids:?}")]
    ScheduleConflict { conflicting_ids: Vec<i64> },

    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },

    #[error("{message}")]
    Unprocessable { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.pointer, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            violations: vec![FieldViolation::new(pointer, message)],
        }
    }

    pub fn invalid(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    pub fn schedule_conflict(conflicting_ids: Vec<i64>) -> Self {
        Self::ScheduleConflict { conflicting_ids }
    }

    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            key: key.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Collects field violations so all of them are reported at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation::new(pointer, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was collected.
    pub fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::invalid(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let mut v = Violations::new();
        v.push("/title", "must not be empty");
        v.push("/date", "expected YYYY-MM-DD");
        let err = v.finish().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: /title: must not be empty; /date: expected YYYY-MM-DD"
        );
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(Violations::new().finish().is_ok());
    }
}

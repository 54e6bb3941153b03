use std::fmt::Write;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Optimistic concurrency check failed: the aggregate changed since the
    /// caller last read it.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut message = String::new();
        for (field, field_errors) in fields {
            for err in field_errors {
                if !message.is_empty() {
                    message.push_str("; ");
                }
                match &err.message {
                    Some(msg) => {
                        let _ = write!(message, "{field}: {msg}");
                    }
                    None => {
                        let _ = write!(message, "{field}: invalid value ({})", err.code);
                    }
                }
            }
        }
        CoreError::Validation(message)
    }
}

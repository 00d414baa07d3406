//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A stored column could not be mapped back into a record field.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A delimited id-list column did not parse. The whole row is rejected.
    #[error("{entity_type} {id} has a malformed id list: {raw:?}")]
    MalformedIdList {
        entity_type: &'static str,
        id: i64,
        raw: String,
    },
}

impl RepoError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    pub fn malformed_id_list(entity_type: &'static str, id: i64, raw: impl Into<String>) -> Self {
        Self::MalformedIdList {
            entity_type,
            id,
            raw: raw.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failures from the platform media services (pick, decode, persist-copy).
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Cancelled by the user")]
    Cancelled,
    #[error("Media file not found: {0}")]
    NotFound(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Persist failed: {0}")]
    Persist(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

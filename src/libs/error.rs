//! Typed errors for the choreboard core.
//!
//! Every core operation returns [`ChoreResult`], distinguishing the four kinds
//! of failure a caller has to react to differently (bad input, missing record,
//! conflicting state, missing permission) from plain storage failures. The
//! command layer maps each kind to a process exit code.

use thiserror::Error;

/// Exit codes for the choreboard CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION: i32 = 2;
    pub const UNAUTHORIZED: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 5;
}

/// Main error type for choreboard operations
#[derive(Error, Debug)]
pub enum ChoreError {
    /// Malformed or out-of-range input rejected at the boundary.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The record is in a state that forbids the operation
    /// (task already completed, duplicate email, lost race).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Access denied: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ChoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        ChoreError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ChoreError::NotFound { entity, id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ChoreError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ChoreError::Unauthorized(message.into())
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChoreError::Validation(_) => exit_codes::VALIDATION,
            ChoreError::Unauthorized(_) => exit_codes::UNAUTHORIZED,
            ChoreError::NotFound { .. } => exit_codes::NOT_FOUND,
            ChoreError::Conflict(_) => exit_codes::CONFLICT,
            ChoreError::Database(_) => exit_codes::FAILURE,
        }
    }

    /// True when the underlying SQLite error is a constraint violation
    /// (unique email, foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            ChoreError::Database(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type ChoreResult<T> = std::result::Result<T, ChoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        assert_eq!(ChoreError::validation("bad").exit_code(), exit_codes::VALIDATION);
        assert_eq!(ChoreError::not_found("Task", 3).exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(ChoreError::conflict("done").exit_code(), exit_codes::CONFLICT);
        assert_eq!(ChoreError::unauthorized("admin").exit_code(), exit_codes::UNAUTHORIZED);
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(ChoreError::not_found("Task", 42).to_string(), "Task 42 not found");
    }
}

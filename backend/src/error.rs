use shared::ActivityType;
use thiserror::Error;

use crate::domain::models::{ActivityValidationError, KidValidationError};

/// Failure signal returned by the mutating repository operations.
///
/// Each cause is a distinct variant so callers can tell a missing record from
/// a rejected change or a storage fault.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No record with this id exists in the collection.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// An update tried to change an activity's type.
    #[error("Cannot change activity type from {stored} to {attempted}")]
    TypeMismatch {
        stored: ActivityType,
        attempted: ActivityType,
    },

    #[error("Invalid activity: {0}")]
    InvalidActivity(#[from] ActivityValidationError),

    #[error("Invalid kid: {0}")]
    InvalidKid(#[from] KidValidationError),

    /// The document store failed to read or write.
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, RepositoryError::TypeMismatch { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, RepositoryError::Storage(_))
    }
}

/// Convenience alias used by the repositories and the app context.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

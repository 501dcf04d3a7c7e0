//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tally_core::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StorageError(e.to_string())
}

//! Domain errors - error types for the tally engine
//!
//! Every error here is terminal for the operation that raised it: there are
//! no retries anywhere in the engine. The calling layer renders a
//! user-visible message and must not crash the process.

use thiserror::Error;

use crate::value_objects::MessageId;
use crate::{TeamId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Empty command input and the team has no persisted divider.
    #[error("No divider saved for team {0}")]
    NoSavedBoundary(TeamId),

    /// Input was given but contained no parseable message link.
    #[error("No message link found in the given text")]
    ExplicitBoundaryNotFound,

    /// The resolved divider id was absent from the fetched range. The
    /// message may have been deleted, or the saved divider is stale.
    #[error("Divider message {0} not found in channel history")]
    StartBoundaryNotFound(MessageId),

    /// An upstream chat-platform call reported failure. Partial
    /// accumulation from the in-flight operation is discarded.
    #[error("Chat API request failed: {0}")]
    ApiError(String),

    /// Award extraction yielded zero groups.
    #[error("No awardees found in the given text or tally")]
    NoAwardee,

    /// Awarding is restricted for this team and the caller is not on the
    /// allow-list.
    #[error("User {0} is not allowed to hand out awards")]
    AwarderRestricted(UserId),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    /// Get an error code string for logs and API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSavedBoundary(_) => "NO_SAVED_BOUNDARY",
            Self::ExplicitBoundaryNotFound => "EXPLICIT_BOUNDARY_NOT_FOUND",
            Self::StartBoundaryNotFound(_) => "START_BOUNDARY_NOT_FOUND",
            Self::ApiError(_) => "API_ERROR",
            Self::NoAwardee => "NO_AWARDEE",
            Self::AwarderRestricted(_) => "AWARDER_RESTRICTED",
            Self::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this error is caused by user input (as opposed to an
    /// infrastructure failure)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NoSavedBoundary(_)
                | Self::ExplicitBoundaryNotFound
                | Self::StartBoundaryNotFound(_)
                | Self::NoAwardee
                | Self::AwarderRestricted(_)
        )
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

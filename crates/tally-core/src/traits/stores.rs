//! Storage ports - team installations and award records

use async_trait::async_trait;

use crate::entities::{AwardRecord, TeamInstallation};
use crate::error::DomainResult;
use crate::value_objects::MessageId;
use crate::UserId;

/// Team-scoped installation data and the persisted divider.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Insert or update a team's installation data
    async fn save_installation(&self, installation: &TeamInstallation) -> DomainResult<()>;

    /// Get a team's access token, if the bot is installed there
    async fn get_access_token(&self, team_id: &str) -> DomainResult<Option<String>>;

    /// Get the bot's own user id in a team
    async fn get_bot_user_id(&self, team_id: &str) -> DomainResult<Option<UserId>>;

    /// Persist a team's divider marker, replacing any previous one
    async fn save_boundary(&self, team_id: &str, id: &MessageId) -> DomainResult<()>;

    /// Get a team's persisted divider marker
    async fn get_saved_boundary(&self, team_id: &str) -> DomainResult<Option<MessageId>>;
}

/// Append-only award record storage.
#[async_trait]
pub trait AwardStore: Send + Sync {
    /// Append an award record
    async fn save_award_record(&self, record: &AwardRecord) -> DomainResult<()>;

    /// Open a forward-only cursor over all of a team's award records.
    ///
    /// The cursor must be closed on every exit path, including early error
    /// returns; no reads are permitted afterwards.
    async fn stream_award_records(&self, team_id: &str) -> DomainResult<Box<dyn AwardCursor>>;
}

/// Forward-only, closeable cursor over award records.
#[async_trait]
pub trait AwardCursor: Send {
    /// Fetch the next record, or `None` once the stream is exhausted
    async fn next(&mut self) -> DomainResult<Option<AwardRecord>>;

    /// Release the cursor's resources
    async fn close(self: Box<Self>) -> DomainResult<()>;
}

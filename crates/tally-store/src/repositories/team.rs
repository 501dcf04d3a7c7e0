//! PostgreSQL implementation of TeamStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tally_core::{DomainError, DomainResult, MessageId, TeamInstallation, TeamStore, UserId};

use super::error::map_db_error;

/// PostgreSQL implementation of TeamStore
#[derive(Clone)]
pub struct PgTeamStore {
    pool: PgPool,
}

impl PgTeamStore {
    /// Create a new PgTeamStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for PgTeamStore {
    #[instrument(skip(self, installation), fields(team_id = %installation.team_id))]
    async fn save_installation(&self, installation: &TeamInstallation) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO team_installations
                (team_id, team_name, channel, channel_id, access_token, bot_user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (team_id) DO UPDATE SET
                team_name = EXCLUDED.team_name,
                channel = EXCLUDED.channel,
                channel_id = EXCLUDED.channel_id,
                access_token = EXCLUDED.access_token,
                bot_user_id = EXCLUDED.bot_user_id
            "#,
        )
        .bind(&installation.team_id)
        .bind(&installation.team_name)
        .bind(&installation.channel)
        .bind(&installation.channel_id)
        .bind(&installation.access_token)
        .bind(&installation.bot_user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_access_token(&self, team_id: &str) -> DomainResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT access_token FROM team_installations WHERE team_id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn get_bot_user_id(&self, team_id: &str) -> DomainResult<Option<UserId>> {
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT bot_user_id FROM team_installations WHERE team_id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn save_boundary(&self, team_id: &str, id: &MessageId) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dividers (team_id, divider_message_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id) DO UPDATE SET
                divider_message_id = EXCLUDED.divider_message_id
            "#,
        )
        .bind(team_id)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_saved_boundary(&self, team_id: &str) -> DomainResult<Option<MessageId>> {
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT divider_message_id FROM dividers WHERE team_id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .map(|raw| {
                MessageId::parse(&raw).map_err(|e| {
                    DomainError::StorageError(format!("stored divider for {team_id} is invalid: {e}"))
                })
            })
            .transpose()
    }
}

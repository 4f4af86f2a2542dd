//! PostgreSQL implementation of GuildRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clan_core::traits::{GuildRepository, RepoResult};
use clan_core::{DomainError, Guild, GuildId, MemberId};

use crate::mappers::member_ids_to_row;
use crate::models::GuildModel;

use super::error::map_db_error;

const SELECT_GUILD: &str = r"
    SELECT g.id, g.name, g.region, g.admins, g.active_dataset, g.created_at, g.updated_at,
           ARRAY(
               SELECT gm.member_id FROM guild_members gm
               WHERE gm.guild_id = g.id
               ORDER BY gm.joined_at, gm.member_id
           ) AS members
    FROM guilds g
";

/// PostgreSQL implementation of GuildRepository
#[derive(Clone)]
pub struct PgGuildRepository {
    pool: PgPool,
}

impl PgGuildRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildRepository for PgGuildRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: GuildId) -> RepoResult<Option<Guild>> {
        let result = sqlx::query_as::<_, GuildModel>(&format!("{SELECT_GUILD} WHERE g.id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Guild::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Guild>> {
        let results = sqlx::query_as::<_, GuildModel>(&format!(
            "{SELECT_GUILD}
             JOIN guild_members j ON j.guild_id = g.id
             WHERE j.member_id = $1
             ORDER BY j.joined_at"
        ))
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Guild::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn update(&self, guild: &Guild) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE guilds
            SET name = $2, region = $3, admins = $4, active_dataset = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(guild.id.into_inner())
        .bind(&guild.name)
        .bind(guild.region.as_str())
        .bind(member_ids_to_row(&guild.admins))
        .bind(guild.active_dataset)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GuildNotFound(guild.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: GuildId) -> RepoResult<()> {
        // ledger tables and memberships cascade
        let result = sqlx::query("DELETE FROM guilds WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GuildNotFound(id));
        }

        Ok(())
    }
}

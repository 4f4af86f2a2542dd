//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clan_core::traits::{MemberRepository, RepoResult};
use clan_core::{DomainError, GuildId, Member, MemberId};

use crate::models::MemberModel;

use super::error::{map_db_error, map_unique_violation};

const SELECT_MEMBER: &str = r"
    SELECT m.id, m.name, m.created_at, m.updated_at,
           ARRAY(
               SELECT gm.guild_id FROM guild_members gm
               WHERE gm.member_id = m.id
               ORDER BY gm.joined_at
           ) AS guild_ids
    FROM members m
";

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let result =
            sqlx::query_as::<_, MemberModel>(&format!("{SELECT_MEMBER} WHERE m.id = $1"))
                .bind(id.into_inner())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.map(Member::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: GuildId) -> RepoResult<Vec<Member>> {
        let results = sqlx::query_as::<_, MemberModel>(&format!(
            "{SELECT_MEMBER}
             JOIN guild_members j ON j.member_id = m.id
             WHERE j.guild_id = $1
             ORDER BY j.joined_at, m.id"
        ))
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, member: &Member) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO members (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(member.id.into_inner())
        .bind(&member.name)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::Conflict(format!("member {} already exists", member.id))
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, member: &Member) -> RepoResult<()> {
        let result = sqlx::query("UPDATE members SET name = $2, updated_at = NOW() WHERE id = $1")
            .bind(member.id.into_inner())
            .bind(&member.name)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(member.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: MemberId) -> RepoResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, Option<String>>(
            "SELECT password_hash FROM members WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(hash.flatten())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: MemberId, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE members SET password_hash = $2, session_token = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn set_session_token(&self, id: MemberId, token: Option<&str>) -> RepoResult<()> {
        let result = sqlx::query("UPDATE members SET session_token = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn find_by_session_token(&self, token: &str) -> RepoResult<Option<MemberId>> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM members WHERE session_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(id.map(MemberId::new))
    }
}

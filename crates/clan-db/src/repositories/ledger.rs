//! PostgreSQL implementation of LedgerRepository
//!
//! Every ledger statement is filtered by `(guild_id, dataset)`; roster
//! statements by `guild_id`. A plan is applied in a single transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use clan_core::traits::{LedgerRepository, RecordQuery, RepoResult, ReservationQuery, SlQuery};
use clan_core::{
    DamageRecord, DomainError, LedgerMutation, LedgerScope, MutationPlan, Reservation, SlUsage,
};

use crate::mappers::{boss_to_row, member_ids_to_row};
use crate::models::{DamageRecordModel, ReservationModel, SlUsageModel};

use super::error::{map_db_error, map_unique_violation};

const RECORD_COLUMNS: &str = "id, guild_id, dataset, member_id, proxy_id, boss, cycle, \
     hp_before, damage, comment, is_bonus_attempt, earns_bonus, is_override, recorded_at";

/// PostgreSQL implementation of LedgerRepository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply_one(
        tx: &mut Transaction<'_, Postgres>,
        scope: LedgerScope,
        mutation: LedgerMutation,
    ) -> RepoResult<()> {
        match mutation {
            LedgerMutation::InsertRecord(record) => {
                sqlx::query(&format!(
                    "INSERT INTO damage_records ({RECORD_COLUMNS})
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
                ))
                .bind(record.id.into_inner())
                .bind(scope.guild_id.into_inner())
                .bind(scope.dataset)
                .bind(record.member_id.into_inner())
                .bind(record.proxy_id.map(|id| id.into_inner()))
                .bind(boss_to_row(record.boss))
                .bind(record.cycle)
                .bind(record.hp_before)
                .bind(record.damage)
                .bind(&record.comment)
                .bind(record.is_bonus_attempt)
                .bind(record.earns_bonus)
                .bind(record.is_override)
                .bind(record.recorded_at)
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;
            }
            LedgerMutation::DeleteRecord(id) => {
                let result = sqlx::query(
                    "DELETE FROM damage_records WHERE id = $1 AND guild_id = $2 AND dataset = $3",
                )
                .bind(id.into_inner())
                .bind(scope.guild_id.into_inner())
                .bind(scope.dataset)
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::RecordNotFound(id));
                }
            }
            LedgerMutation::InsertReservation(entry) => {
                sqlx::query(
                    r"
                    INSERT INTO reservations
                        (id, kind, guild_id, dataset, member_id, boss, cycle, comment, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    ",
                )
                .bind(entry.id.into_inner())
                .bind(entry.kind.as_str())
                .bind(scope.guild_id.into_inner())
                .bind(scope.dataset)
                .bind(entry.member_id.into_inner())
                .bind(boss_to_row(entry.boss))
                .bind(entry.cycle)
                .bind(&entry.comment)
                .bind(entry.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| {
                    map_unique_violation(e, || {
                        DomainError::Conflict(format!(
                            "member {} already holds a conflicting {} entry",
                            entry.member_id, entry.kind
                        ))
                    })
                })?;
            }
            LedgerMutation::DeleteReservation(id) => {
                // a reservation may already be gone; deleting it again is a no-op
                sqlx::query(
                    "DELETE FROM reservations WHERE id = $1 AND guild_id = $2 AND dataset = $3",
                )
                .bind(id.into_inner())
                .bind(scope.guild_id.into_inner())
                .bind(scope.dataset)
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;
            }
            LedgerMutation::InsertSl(usage) => {
                sqlx::query(
                    r"
                    INSERT INTO sl_usages
                        (id, guild_id, dataset, member_id, proxy_id, boss, cycle, comment, used_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    ",
                )
                .bind(usage.id.into_inner())
                .bind(scope.guild_id.into_inner())
                .bind(scope.dataset)
                .bind(usage.member_id.into_inner())
                .bind(usage.proxy_id.map(|id| id.into_inner()))
                .bind(usage.boss.map(boss_to_row))
                .bind(usage.cycle)
                .bind(&usage.comment)
                .bind(usage.used_at)
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;
            }
            LedgerMutation::CreateGuild(guild) => {
                sqlx::query(
                    r"
                    INSERT INTO guilds
                        (id, name, region, admins, active_dataset, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ",
                )
                .bind(scope.guild_id.into_inner())
                .bind(&guild.name)
                .bind(guild.region.as_str())
                .bind(member_ids_to_row(&guild.admins))
                .bind(guild.active_dataset)
                .bind(guild.created_at)
                .bind(guild.updated_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| {
                    map_unique_violation(e, || {
                        DomainError::Conflict(format!("guild {} already exists", scope.guild_id))
                    })
                })?;
            }
            LedgerMutation::RegisterMember(member) => {
                sqlx::query(
                    r"
                    INSERT INTO members (id, name, created_at, updated_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO NOTHING
                    ",
                )
                .bind(member.id.into_inner())
                .bind(&member.name)
                .bind(member.created_at)
                .bind(member.updated_at)
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;
            }
            LedgerMutation::AddMembership(member_id) => {
                sqlx::query("INSERT INTO guild_members (guild_id, member_id) VALUES ($1, $2)")
                    .bind(scope.guild_id.into_inner())
                    .bind(member_id.into_inner())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| {
                        map_unique_violation(e, || {
                            DomainError::Conflict(format!(
                                "member {member_id} already joined guild {}",
                                scope.guild_id
                            ))
                        })
                    })?;
            }
            LedgerMutation::RemoveMembership(member_id) => {
                let result =
                    sqlx::query("DELETE FROM guild_members WHERE guild_id = $1 AND member_id = $2")
                        .bind(scope.guild_id.into_inner())
                        .bind(member_id.into_inner())
                        .execute(&mut **tx)
                        .await
                        .map_err(map_db_error)?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::MemberNotFound(member_id));
                }
            }
            LedgerMutation::SetAdmins(admins) => {
                let result = sqlx::query(
                    "UPDATE guilds SET admins = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(scope.guild_id.into_inner())
                .bind(member_ids_to_row(&admins))
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::GuildNotFound(scope.guild_id));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self))]
    async fn latest_per_boss(&self, scope: LedgerScope) -> RepoResult<Vec<DamageRecord>> {
        let results = sqlx::query_as::<_, DamageRecordModel>(&format!(
            "SELECT DISTINCT ON (boss) {RECORD_COLUMNS}
             FROM damage_records
             WHERE guild_id = $1 AND dataset = $2
             ORDER BY boss, recorded_at DESC, id DESC"
        ))
        .bind(scope.guild_id.into_inner())
        .bind(scope.dataset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(DamageRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_records(
        &self,
        scope: LedgerScope,
        query: &RecordQuery,
    ) -> RepoResult<Vec<DamageRecord>> {
        let direction = if query.newest_first { "DESC" } else { "ASC" };
        let results = sqlx::query_as::<_, DamageRecordModel>(&format!(
            "SELECT {RECORD_COLUMNS}
             FROM damage_records
             WHERE guild_id = $1 AND dataset = $2
               AND ($3::BIGINT IS NULL OR member_id = $3)
               AND ($4::SMALLINT IS NULL OR boss = $4)
               AND ($5::INTEGER IS NULL OR cycle = $5)
               AND ($6::TIMESTAMPTZ IS NULL OR recorded_at >= $6)
               AND ($7::TIMESTAMPTZ IS NULL OR recorded_at < $7)
             ORDER BY recorded_at {direction}, id {direction}
             LIMIT $8"
        ))
        .bind(scope.guild_id.into_inner())
        .bind(scope.dataset)
        .bind(query.member.map(|id| id.into_inner()))
        .bind(query.boss.map(boss_to_row))
        .bind(query.cycle)
        .bind(query.since)
        .bind(query.until)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(DamageRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_reservations(
        &self,
        scope: LedgerScope,
        query: &ReservationQuery,
    ) -> RepoResult<Vec<Reservation>> {
        let results = sqlx::query_as::<_, ReservationModel>(
            r"
            SELECT id, kind, guild_id, dataset, member_id, boss, cycle, comment, created_at
            FROM reservations
            WHERE guild_id = $1 AND dataset = $2
              AND ($3::TEXT IS NULL OR kind = $3)
              AND ($4::BIGINT IS NULL OR member_id = $4)
              AND ($5::SMALLINT IS NULL OR boss = $5)
              AND ($6::INTEGER IS NULL OR cycle = $6)
            ORDER BY created_at, id
            ",
        )
        .bind(scope.guild_id.into_inner())
        .bind(scope.dataset)
        .bind(query.kind.map(|k| k.as_str()))
        .bind(query.member.map(|id| id.into_inner()))
        .bind(query.boss.map(boss_to_row))
        .bind(query.cycle)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reservation::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_sl_usages(
        &self,
        scope: LedgerScope,
        query: &SlQuery,
    ) -> RepoResult<Vec<SlUsage>> {
        let results = sqlx::query_as::<_, SlUsageModel>(
            r"
            SELECT id, guild_id, dataset, member_id, proxy_id, boss, cycle, comment, used_at
            FROM sl_usages
            WHERE guild_id = $1 AND dataset = $2
              AND ($3::BIGINT IS NULL OR member_id = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR used_at >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR used_at < $5)
            ORDER BY used_at, id
            ",
        )
        .bind(scope.guild_id.into_inner())
        .bind(scope.dataset)
        .bind(query.member.map(|id| id.into_inner()))
        .bind(query.window.map(|w| w.start))
        .bind(query.window.map(|w| w.end))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(SlUsage::try_from).collect()
    }

    #[instrument(skip(self, plan), fields(mutations = plan.len()))]
    async fn apply(&self, scope: LedgerScope, plan: MutationPlan) -> RepoResult<()> {
        if plan.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        for mutation in plan.into_inner() {
            // dropping the transaction on error rolls it back
            Self::apply_one(&mut tx, scope, mutation).await?;
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, scope: LedgerScope) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut removed = 0;
        for table in ["damage_records", "reservations", "sl_usages"] {
            let result = sqlx::query(&format!(
                "DELETE FROM {table} WHERE guild_id = $1 AND dataset = $2"
            ))
            .bind(scope.guild_id.into_inner())
            .bind(scope.dataset)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
            removed += result.rows_affected();
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok(removed)
    }
}

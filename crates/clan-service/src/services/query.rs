//! Read-only views of the live dataset

use tracing::instrument;

use clan_core::{
    BossIndex, DayWindow, GuildId, RecordQuery, ReservationKind, ReservationQuery, SlQuery,
};

use crate::dto::{
    BoardResponse, RecordHistoryQuery, RecordResponse, ReservationResponse, SlUsageResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Default page size of the record history
const HISTORY_LIMIT: i64 = 100;

/// Query service
pub struct QueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Cycle, stage and HP of every boss
    #[instrument(skip(self))]
    pub async fn current_boss_states(&self, guild_id: GuildId) -> ServiceResult<BoardResponse> {
        let guild = self.ctx.load_guild(guild_id).await?;
        let board = self.ctx.board(&guild).await?;
        Ok(BoardResponse::new(guild.active_dataset, &board))
    }

    #[instrument(skip(self))]
    pub async fn queue_list(
        &self,
        guild_id: GuildId,
        boss: Option<i32>,
    ) -> ServiceResult<Vec<ReservationResponse>> {
        self.reservations(guild_id, ReservationKind::Queue, boss).await
    }

    #[instrument(skip(self))]
    pub async fn tree_list(
        &self,
        guild_id: GuildId,
        boss: Option<i32>,
    ) -> ServiceResult<Vec<ReservationResponse>> {
        self.reservations(guild_id, ReservationKind::Tree, boss).await
    }

    #[instrument(skip(self))]
    pub async fn subscribe_list(
        &self,
        guild_id: GuildId,
        boss: Option<i32>,
    ) -> ServiceResult<Vec<ReservationResponse>> {
        self.reservations(guild_id, ReservationKind::Subscribe, boss)
            .await
    }

    /// SL usages of today's battle day
    #[instrument(skip(self))]
    pub async fn sl_list(&self, guild_id: GuildId) -> ServiceResult<Vec<SlUsageResponse>> {
        let guild = self.ctx.load_guild(guild_id).await?;
        let query = SlQuery {
            member: None,
            window: Some(DayWindow::containing(guild.region, self.ctx.clock().now())),
        };
        let usages = self.ctx.ledger().find_sl_usages(guild.scope(), &query).await?;
        Ok(usages.iter().map(SlUsageResponse::from).collect())
    }

    /// Records of the live dataset, newest first
    #[instrument(skip(self))]
    pub async fn record_history(
        &self,
        guild_id: GuildId,
        filter: RecordHistoryQuery,
    ) -> ServiceResult<Vec<RecordResponse>> {
        let guild = self.ctx.load_guild(guild_id).await?;

        let mut query = RecordQuery {
            member: filter.member_id,
            boss: parse_boss(filter.boss)?,
            cycle: filter.cycle,
            newest_first: true,
            limit: Some(filter.limit.unwrap_or(HISTORY_LIMIT)),
            ..RecordQuery::default()
        };
        if let Some(day) = filter.day {
            query = query.window(DayWindow::for_day(guild.region, day));
        }

        let records = self.ctx.ledger().find_records(guild.scope(), &query).await?;
        Ok(records.iter().map(RecordResponse::from).collect())
    }

    async fn reservations(
        &self,
        guild_id: GuildId,
        kind: ReservationKind,
        boss: Option<i32>,
    ) -> ServiceResult<Vec<ReservationResponse>> {
        let guild = self.ctx.load_guild(guild_id).await?;
        let query = ReservationQuery {
            boss: parse_boss(boss)?,
            ..ReservationQuery::of_kind(kind)
        };
        let entries = self
            .ctx
            .ledger()
            .find_reservations(guild.scope(), &query)
            .await?;
        Ok(entries.iter().map(ReservationResponse::from).collect())
    }
}

fn parse_boss(boss: Option<i32>) -> ServiceResult<Option<BossIndex>> {
    boss.map(BossIndex::new)
        .transpose()
        .map_err(|e| ServiceError::validation(e.to_string()))
}

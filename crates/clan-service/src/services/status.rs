//! Daily attempt status of members and guild totals

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::instrument;

use clan_core::{
    battle_day, DailyStatus, DayWindow, Guild, GuildId, GuildTotals, MemberId, RecordQuery,
    SlQuery,
};

use crate::dto::{MemberStatusResponse, TotalsResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Status service
pub struct StatusService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatusService<'a> {
    /// Create a new StatusService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The member's attempts in the current battle day
    #[instrument(skip(self))]
    pub async fn today_status(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> ServiceResult<MemberStatusResponse> {
        self.status_for(guild_id, member_id, None).await
    }

    /// The member's attempts in `day`, or today
    #[instrument(skip(self))]
    pub async fn status_for(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
        day: Option<NaiveDate>,
    ) -> ServiceResult<MemberStatusResponse> {
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_member(member_id) {
            return Err(ServiceError::not_found("Member", member_id));
        }
        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Member", member_id))?;

        let (day, window) = self.window(&guild, day);
        let records = self
            .ctx
            .ledger()
            .find_records(guild.scope(), &RecordQuery::default().member(member_id).window(window))
            .await?;
        let used_sl = !self
            .ctx
            .ledger()
            .find_sl_usages(
                guild.scope(),
                &SlQuery {
                    member: Some(member_id),
                    window: Some(window),
                },
            )
            .await?
            .is_empty();

        Ok(MemberStatusResponse {
            member_id,
            name: member.name,
            day,
            status: DailyStatus::replay(&records, used_sl),
        })
    }

    /// Every member's attempts in `day`, in join order
    #[instrument(skip(self))]
    pub async fn today_status_all(
        &self,
        guild_id: GuildId,
        day: Option<NaiveDate>,
    ) -> ServiceResult<Vec<MemberStatusResponse>> {
        let guild = self.ctx.load_guild(guild_id).await?;
        let (day, window) = self.window(&guild, day);

        let records = self
            .ctx
            .ledger()
            .find_records(guild.scope(), &RecordQuery::default().window(window))
            .await?;
        let sl_users: Vec<MemberId> = self
            .ctx
            .ledger()
            .find_sl_usages(
                guild.scope(),
                &SlQuery {
                    member: None,
                    window: Some(window),
                },
            )
            .await?
            .into_iter()
            .map(|usage| usage.member_id)
            .collect();

        let mut by_member: HashMap<MemberId, Vec<_>> = HashMap::new();
        for record in &records {
            by_member.entry(record.member_id).or_default().push(record);
        }

        let members = self.ctx.member_repo().find_by_guild(guild_id).await?;
        Ok(members
            .into_iter()
            .map(|member| {
                let own = by_member.remove(&member.id).unwrap_or_default();
                MemberStatusResponse {
                    member_id: member.id,
                    day,
                    status: DailyStatus::replay(own, sl_users.contains(&member.id)),
                    name: member.name,
                }
            })
            .collect())
    }

    /// Full attempts and outstanding bonus attempts of the whole guild
    #[instrument(skip(self))]
    pub async fn today_totals(
        &self,
        guild_id: GuildId,
        day: Option<NaiveDate>,
    ) -> ServiceResult<TotalsResponse> {
        let guild = self.ctx.load_guild(guild_id).await?;
        let (day, window) = self.window(&guild, day);

        let records = self
            .ctx
            .ledger()
            .find_records(guild.scope(), &RecordQuery::default().window(window))
            .await?;

        // bonus attempts are per member and cannot be pooled
        let mut by_member: HashMap<MemberId, Vec<_>> = HashMap::new();
        for record in &records {
            by_member.entry(record.member_id).or_default().push(record);
        }
        let (full_attempts, bonus_outstanding) = by_member
            .into_values()
            .map(GuildTotals::replay)
            .fold((0, 0), |(full, bonus), totals| {
                (full + totals.full_attempts, bonus + totals.bonus_outstanding)
            });

        Ok(TotalsResponse {
            day,
            full_attempts,
            bonus_outstanding,
        })
    }

    fn window(&self, guild: &Guild, day: Option<NaiveDate>) -> (NaiveDate, DayWindow) {
        let day = day.unwrap_or_else(|| battle_day(guild.region, self.ctx.clock().now()));
        (day, DayWindow::for_day(guild.region, day))
    }
}

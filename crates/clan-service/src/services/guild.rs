//! Guild service
//!
//! Guild creation and deletion, admins, datasets and the admin override of a
//! boss's progress.

use tracing::{info, instrument};

use clan_core::{
    parse_amount, BossIndex, DamageRecord, Guild, GuildId, GuildRejection, LedgerMutation, Member,
    MemberId, MutationPlan, Region, MAX_CYCLE,
};

use crate::dto::{
    BoardResponse, ClearedResponse, CreateGuildRequest, ForceSetBossRequest,
    GuildResponse,
};

use super::context::ServiceContext;
use super::error::{reject, ServiceError, ServiceResult};

/// Outcome of a guild command
pub type GuildOutcome<T> = ServiceResult<Result<T, GuildRejection>>;

/// Guild service
pub struct GuildService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuildService<'a> {
    /// Create a new GuildService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a guild; the creator joins as its first admin
    #[instrument(skip(self, request), fields(guild_id = %request.guild_id))]
    pub async fn create_guild(
        &self,
        creator: MemberId,
        request: CreateGuildRequest,
    ) -> GuildOutcome<GuildResponse> {
        let region: Region = request
            .region
            .parse()
            .map_err(|e| ServiceError::validation(format!("{e}")))?;
        let name = request.name.trim();
        if name.is_empty() {
            return Ok(Err(GuildRejection::IllegalName));
        }

        let guild_id = request.guild_id;
        let _guard = self.ctx.locks().acquire(guild_id).await;

        if self.ctx.guild_repo().find_by_id(guild_id).await?.is_some() {
            return Ok(Err(GuildRejection::GuildAlreadyExists));
        }

        let mut guild = Guild::new(guild_id, name.to_string(), region);
        guild.set_admins(vec![creator]);

        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::CreateGuild(guild.clone()));
        plan.push(LedgerMutation::RegisterMember(Member::new(
            creator,
            request.creator_name.trim().to_string(),
        )));
        plan.push(LedgerMutation::AddMembership(creator));
        self.ctx.ledger().apply(guild.scope(), plan).await?;
        guild.members.push(creator);

        info!(guild_id = %guild_id, region = %region, creator = %creator, "Guild created");

        Ok(Ok(GuildResponse::from(&guild)))
    }

    /// Get guild by ID
    #[instrument(skip(self))]
    pub async fn get_guild(&self, guild_id: GuildId) -> ServiceResult<GuildResponse> {
        let guild = self.ctx.load_guild(guild_id).await?;
        Ok(GuildResponse::from(&guild))
    }

    /// Delete the guild with its memberships and every dataset
    #[instrument(skip(self))]
    pub async fn delete_guild(&self, actor: MemberId, guild_id: GuildId) -> GuildOutcome<()> {
        {
            let _guard = self.ctx.locks().acquire(guild_id).await;
            let guild = self.ctx.load_guild(guild_id).await?;
            if !guild.is_admin(actor) {
                return Ok(reject(guild_id, GuildRejection::NotAdmin));
            }
            self.ctx.guild_repo().delete(guild_id).await?;
        }
        self.ctx.locks().forget(guild_id);

        info!(guild_id = %guild_id, actor = %actor, "Guild deleted");
        Ok(Ok(()))
    }

    /// Rename the guild (admin only)
    #[instrument(skip(self))]
    pub async fn rename_guild(
        &self,
        actor: MemberId,
        guild_id: GuildId,
        name: &str,
    ) -> GuildOutcome<GuildResponse> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Err(GuildRejection::IllegalName));
        }

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let mut guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }

        guild.set_name(name.to_string());
        self.ctx.guild_repo().update(&guild).await?;

        info!(guild_id = %guild_id, "Guild renamed");
        Ok(Ok(GuildResponse::from(&guild)))
    }

    /// Replace the admin set with the chat group's current admins
    ///
    /// Trusted call from the chat front-end; no actor check.
    #[instrument(skip(self))]
    pub async fn refresh_admins(
        &self,
        guild_id: GuildId,
        admins: Vec<MemberId>,
    ) -> ServiceResult<GuildResponse> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let mut guild = self.ctx.load_guild(guild_id).await?;

        guild.set_admins(admins);
        self.ctx.guild_repo().update(&guild).await?;

        info!(guild_id = %guild_id, admins = guild.admins.len(), "Guild admins refreshed");
        Ok(GuildResponse::from(&guild))
    }

    /// Grant admin rights to a member of the guild
    #[instrument(skip(self))]
    pub async fn add_admin(
        &self,
        actor: MemberId,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> GuildOutcome<GuildResponse> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let mut guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }
        if !guild.is_member(member_id) {
            return Ok(reject(guild_id, GuildRejection::MemberNotInClan));
        }

        let mut admins = guild.admins.clone();
        admins.push(member_id);
        guild.set_admins(admins);
        self.ctx.guild_repo().update(&guild).await?;

        info!(guild_id = %guild_id, member_id = %member_id, "Admin added");
        Ok(Ok(GuildResponse::from(&guild)))
    }

    /// Make another dataset live; older datasets stay untouched
    #[instrument(skip(self))]
    pub async fn switch_dataset(
        &self,
        actor: MemberId,
        guild_id: GuildId,
        dataset: i32,
    ) -> GuildOutcome<GuildResponse> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let mut guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }
        if !guild.switch_dataset(dataset) {
            return Ok(reject(guild_id, GuildRejection::DatasetOutOfRange));
        }
        self.ctx.guild_repo().update(&guild).await?;

        info!(guild_id = %guild_id, dataset, "Dataset switched");
        Ok(Ok(GuildResponse::from(&guild)))
    }

    /// Delete every ledger row of the live dataset
    #[instrument(skip(self))]
    pub async fn clear_dataset(
        &self,
        actor: MemberId,
        guild_id: GuildId,
    ) -> GuildOutcome<ClearedResponse> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }

        let removed = self.ctx.ledger().clear(guild.scope()).await?;

        info!(guild_id = %guild_id, dataset = guild.active_dataset, removed, "Dataset cleared");
        Ok(Ok(ClearedResponse {
            dataset: guild.active_dataset,
            removed,
        }))
    }

    /// Put a boss at `cycle` with `hp` remaining
    ///
    /// Stored as an override record (no damage) so the ledger stays the only
    /// source of boss state; quota replay skips it.
    #[instrument(skip(self, request))]
    pub async fn force_set_boss_state(
        &self,
        actor: MemberId,
        guild_id: GuildId,
        request: ForceSetBossRequest,
    ) -> GuildOutcome<BoardResponse> {
        let Ok(boss) = BossIndex::new(request.boss) else {
            return Ok(Err(GuildRejection::IllegalTargetBoss));
        };
        if !(1..=MAX_CYCLE).contains(&request.cycle) {
            return Ok(Err(GuildRejection::IllegalCycle));
        }
        let Ok(hp) = parse_amount(&request.hp) else {
            return Ok(Err(GuildRejection::IllegalHp));
        };

        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }

        let max_hp = self
            .ctx
            .table(guild.region)
            .max_hp_for_cycle(request.cycle, boss)?;
        if !(1..=max_hp).contains(&hp) {
            return Ok(reject(guild_id, GuildRejection::IllegalHp));
        }

        let record = DamageRecord {
            id: self.ctx.generate_id(),
            guild_id,
            dataset: guild.active_dataset,
            member_id: actor,
            proxy_id: None,
            boss,
            cycle: request.cycle,
            hp_before: hp,
            damage: 0,
            comment: Some("progress set by an admin".to_string()),
            is_bonus_attempt: false,
            earns_bonus: false,
            is_override: true,
            recorded_at: self.ctx.clock().now(),
        };
        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::InsertRecord(record));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        let board = self.ctx.board(&guild).await?;
        info!(
            guild_id = %guild_id,
            boss = %boss,
            cycle = request.cycle,
            hp,
            "Boss state overridden"
        );
        Ok(Ok(BoardResponse::new(guild.active_dataset, &board)))
    }

}

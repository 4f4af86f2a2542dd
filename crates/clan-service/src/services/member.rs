//! Member service
//!
//! Membership of guilds. Leaving drops the member's reservations in the live
//! dataset together, so nobody is notified about a stale queue later.

use tracing::{info, instrument};

use clan_core::{
    Guild, GuildId, GuildRejection, LedgerMutation, Member, MemberId, MutationPlan,
    ReservationQuery,
};

use crate::dto::{GuildResponse, JoinGuildRequest, MemberResponse};

use super::context::ServiceContext;
use super::error::{reject, ServiceError, ServiceResult};
use super::guild::GuildOutcome;

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Join a guild, registering the member on first sight
    ///
    /// Trusted call from the chat front-end, which has already seen the
    /// member in the group.
    #[instrument(skip(self, request))]
    pub async fn join(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
        request: JoinGuildRequest,
    ) -> GuildOutcome<MemberResponse> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        self.attach(&guild, member_id, &request.name).await
    }

    /// Add a member to the guild on an admin's behalf
    #[instrument(skip(self, request))]
    pub async fn enlist(
        &self,
        actor: MemberId,
        guild_id: GuildId,
        member_id: MemberId,
        request: JoinGuildRequest,
    ) -> GuildOutcome<MemberResponse> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }
        self.attach(&guild, member_id, &request.name).await
    }

    /// Leave a guild
    #[instrument(skip(self))]
    pub async fn leave(&self, guild_id: GuildId, member_id: MemberId) -> GuildOutcome<()> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        self.detach(guild_id, member_id).await
    }

    /// Remove another member from the guild (admin only)
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        actor: MemberId,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> GuildOutcome<()> {
        let _guard = self.ctx.locks().acquire(guild_id).await;
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_admin(actor) {
            return Ok(reject(guild_id, GuildRejection::NotAdmin));
        }
        self.detach(guild_id, member_id).await
    }

    /// Change a member's display name in every guild
    #[instrument(skip(self))]
    pub async fn rename_member(
        &self,
        member_id: MemberId,
        name: &str,
    ) -> ServiceResult<Result<(), GuildRejection>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Err(GuildRejection::IllegalName));
        }

        let mut member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Member", member_id))?;
        member.set_name(name.to_string());
        self.ctx.member_repo().update(&member).await?;

        info!(member_id = %member_id, "Member renamed");
        Ok(Ok(()))
    }

    /// Members of a guild in join order
    #[instrument(skip(self))]
    pub async fn member_list(&self, guild_id: GuildId) -> ServiceResult<Vec<MemberResponse>> {
        let guild = self.ctx.load_guild(guild_id).await?;
        let members = self.ctx.member_repo().find_by_guild(guild_id).await?;

        Ok(members
            .into_iter()
            .map(|member| MemberResponse {
                is_admin: guild.is_admin(member.id),
                id: member.id,
                name: member.name,
            })
            .collect())
    }

    /// Guilds the member belongs to
    #[instrument(skip(self))]
    pub async fn joined_guilds(&self, member_id: MemberId) -> ServiceResult<Vec<GuildResponse>> {
        let guilds = self.ctx.guild_repo().find_by_member(member_id).await?;
        Ok(guilds.into_iter().map(GuildResponse::from).collect())
    }

    /// Register and join in one plan; caller holds the lock
    async fn attach(
        &self,
        guild: &Guild,
        member_id: MemberId,
        name: &str,
    ) -> GuildOutcome<MemberResponse> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Err(GuildRejection::IllegalName));
        }
        if guild.is_member(member_id) {
            return Ok(reject(guild.id, GuildRejection::AlreadyMember));
        }

        let member = match self.ctx.member_repo().find_by_id(member_id).await? {
            Some(member) => member,
            None => Member::new(member_id, name.to_string()),
        };

        let mut plan = MutationPlan::new();
        plan.push(LedgerMutation::RegisterMember(member.clone()));
        plan.push(LedgerMutation::AddMembership(member_id));
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(guild_id = %guild.id, member_id = %member_id, "Member joined");
        Ok(Ok(MemberResponse {
            id: member.id,
            name: member.name,
            is_admin: guild.is_admin(member_id),
        }))
    }

    /// Drop membership, admin rights and live reservations; caller holds the lock
    async fn detach(&self, guild_id: GuildId, member_id: MemberId) -> GuildOutcome<()> {
        let guild = self.ctx.load_guild(guild_id).await?;
        if !guild.is_member(member_id) {
            return Ok(reject(guild_id, GuildRejection::MemberNotInClan));
        }

        let entries = self
            .ctx
            .ledger()
            .find_reservations(guild.scope(), &ReservationQuery::default().member(member_id))
            .await?;

        let mut plan = MutationPlan::new();
        plan.delete_reservations(entries.iter().map(|entry| entry.id));
        plan.push(LedgerMutation::RemoveMembership(member_id));
        if guild.is_admin(member_id) {
            let admins = guild
                .admins
                .iter()
                .copied()
                .filter(|admin| *admin != member_id)
                .collect();
            plan.push(LedgerMutation::SetAdmins(admins));
        }
        self.ctx.ledger().apply(guild.scope(), plan).await?;

        info!(
            guild_id = %guild_id,
            member_id = %member_id,
            dropped_reservations = entries.len(),
            "Member left"
        );
        Ok(Ok(()))
    }
}

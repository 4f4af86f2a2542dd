//! Guild membership and the caller's own profile

use axum::{extract::State, Json};
use clan_core::{GuildId, MemberId};
use clan_service::dto::{GuildResponse, JoinGuildRequest, MemberResponse, RenameRequest};
use clan_service::MemberService;

use crate::extractors::{AuthMember, GuildMember, IdPath, ValidatedJson};
use crate::response::{settle, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Admin adds a chat member under a display name
///
/// POST /guilds/{guild_id}/members/{member_id}
pub async fn enlist_member(
    State(state): State<AppState>,
    member: GuildMember,
    IdPath((_, target)): IdPath<(GuildId, MemberId)>,
    ValidatedJson(request): ValidatedJson<JoinGuildRequest>,
) -> ApiResult<Created<Json<MemberResponse>>> {
    let service = MemberService::new(state.service_context());
    let enlisted = settle(
        service
            .enlist(member.member_id, member.guild_id, target, request)
            .await,
    )?;
    Ok(Created(Json(enlisted)))
}

/// GET /guilds/{guild_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.member_list(member.guild_id).await?))
}

/// DELETE /guilds/{guild_id}/members/@me
pub async fn leave_guild(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<NoContent> {
    let service = MemberService::new(state.service_context());
    settle(service.leave(member.guild_id, member.member_id).await)?;
    Ok(NoContent)
}

/// Admin removal; the member's reservations go with them
///
/// DELETE /guilds/{guild_id}/members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    member: GuildMember,
    IdPath((_, target)): IdPath<(GuildId, MemberId)>,
) -> ApiResult<NoContent> {
    let service = MemberService::new(state.service_context());
    settle(
        service
            .remove_member(member.member_id, member.guild_id, target)
            .await,
    )?;
    Ok(NoContent)
}

/// Display name is global across guilds
///
/// PATCH /members/@me
pub async fn rename_self(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<RenameRequest>,
) -> ApiResult<NoContent> {
    let service = MemberService::new(state.service_context());
    settle(service.rename_member(auth.member_id, &request.name).await)?;
    Ok(NoContent)
}

/// GET /members/@me/guilds
pub async fn joined_guilds(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<Json<Vec<GuildResponse>>> {
    let service = MemberService::new(state.service_context());
    Ok(Json(service.joined_guilds(auth.member_id).await?))
}

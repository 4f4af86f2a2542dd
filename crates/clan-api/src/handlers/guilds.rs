//! Guild management
//!
//! Only members see a guild; everything but reads requires an admin.

use axum::{extract::State, Json};
use clan_core::{GuildId, GuildRejection, MemberId};
use clan_service::dto::{
    BoardResponse, ClearedResponse, CreateGuildRequest, ForceSetBossRequest, GuildResponse,
    RefreshAdminsRequest, RenameRequest, SwitchDatasetRequest,
};
use clan_service::GuildService;

use crate::extractors::{AuthMember, GuildMember, IdPath, ValidatedJson};
use crate::response::{settle, ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /guilds
pub async fn create_guild(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<CreateGuildRequest>,
) -> ApiResult<Created<Json<GuildResponse>>> {
    let service = GuildService::new(state.service_context());
    let guild = settle(service.create_guild(auth.member_id, request).await)?;
    Ok(Created(Json(guild)))
}

/// GET /guilds/{guild_id}
pub async fn get_guild(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<Json<GuildResponse>> {
    let service = GuildService::new(state.service_context());
    Ok(Json(service.get_guild(member.guild_id).await?))
}

/// PATCH /guilds/{guild_id}
pub async fn rename_guild(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<RenameRequest>,
) -> ApiResult<Json<GuildResponse>> {
    let service = GuildService::new(state.service_context());
    let guild = settle(
        service
            .rename_guild(member.member_id, member.guild_id, &request.name)
            .await,
    )?;
    Ok(Json(guild))
}

/// DELETE /guilds/{guild_id}
pub async fn delete_guild(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<NoContent> {
    let service = GuildService::new(state.service_context());
    settle(service.delete_guild(member.member_id, member.guild_id).await)?;
    Ok(NoContent)
}

/// Replace the admin set
///
/// The chat front-end pushes the platform's admin list unchecked; over HTTP
/// only a current admin may do it.
///
/// PUT /guilds/{guild_id}/admins
pub async fn refresh_admins(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<RefreshAdminsRequest>,
) -> ApiResult<Json<GuildResponse>> {
    if !member.is_admin {
        return Err(ApiError::rejected(GuildRejection::NotAdmin));
    }

    let service = GuildService::new(state.service_context());
    Ok(Json(
        service
            .refresh_admins(member.guild_id, request.admins)
            .await?,
    ))
}

/// PUT /guilds/{guild_id}/admins/{member_id}
pub async fn add_admin(
    State(state): State<AppState>,
    member: GuildMember,
    IdPath((_, target)): IdPath<(GuildId, MemberId)>,
) -> ApiResult<Json<GuildResponse>> {
    let service = GuildService::new(state.service_context());
    let guild = settle(service.add_admin(member.member_id, member.guild_id, target).await)?;
    Ok(Json(guild))
}

/// PUT /guilds/{guild_id}/dataset
pub async fn switch_dataset(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<SwitchDatasetRequest>,
) -> ApiResult<Json<GuildResponse>> {
    let service = GuildService::new(state.service_context());
    let guild = settle(
        service
            .switch_dataset(member.member_id, member.guild_id, request.dataset)
            .await,
    )?;
    Ok(Json(guild))
}

/// Wipe the live dataset
///
/// DELETE /guilds/{guild_id}/dataset
pub async fn clear_dataset(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<Json<ClearedResponse>> {
    let service = GuildService::new(state.service_context());
    let cleared = settle(service.clear_dataset(member.member_id, member.guild_id).await)?;
    Ok(Json(cleared))
}

/// PUT /guilds/{guild_id}/bosses
pub async fn force_set_boss_state(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<ForceSetBossRequest>,
) -> ApiResult<Json<BoardResponse>> {
    let service = GuildService::new(state.service_context());
    let board = settle(
        service
            .force_set_boss_state(member.member_id, member.guild_id, request)
            .await,
    )?;
    Ok(Json(board))
}

//! Battle commands: hits, undo, reservations, SL and reminders
//!
//! All of them serialize per guild inside the service layer. Kill and
//! reminder notifications go out through the configured notifier.

use axum::{extract::State, Json};
use clan_core::GuildId;
use clan_service::dto::{
    CommitRecordRequest, CycleQuery, RecordReceipt, RecordResponse, RemindRequest,
    RemindedResponse, RemovedResponse, ReservationResponse, ReserveRequest, SlRequest,
    SlUsageResponse, SubscribeRequest, UndoRequest, UpdateCommentRequest,
};
use clan_service::BattleService;

use crate::extractors::{GuildMember, IdPath, ValidatedJson, ValidatedQuery};
use crate::response::{settle, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Report a hit, for oneself or on behalf of another member
///
/// POST /guilds/{guild_id}/records
pub async fn commit_record(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<CommitRecordRequest>,
) -> ApiResult<Created<Json<RecordReceipt>>> {
    let service = BattleService::new(state.service_context());
    let receipt = settle(
        service
            .commit_record(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Created(Json(receipt)))
}

/// POST /guilds/{guild_id}/records/undo
pub async fn undo_last_record(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<UndoRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let service = BattleService::new(state.service_context());
    let undone = settle(
        service
            .undo_last_record(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Json(undone))
}

/// POST /guilds/{guild_id}/queue
pub async fn commit_queue(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<ReserveRequest>,
) -> ApiResult<Created<Json<ReservationResponse>>> {
    let service = BattleService::new(state.service_context());
    let entry = settle(
        service
            .commit_queue(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Created(Json(entry)))
}

/// PATCH /guilds/{guild_id}/queue
pub async fn update_queue_comment(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<ReservationResponse>> {
    let service = BattleService::new(state.service_context());
    let entry = settle(
        service
            .update_queue_comment(member.guild_id, member.member_id, request.comment)
            .await,
    )?;
    Ok(Json(entry))
}

/// DELETE /guilds/{guild_id}/queue
pub async fn cancel_queue(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<NoContent> {
    let service = BattleService::new(state.service_context());
    settle(service.cancel_queue(member.guild_id, member.member_id).await)?;
    Ok(NoContent)
}

/// POST /guilds/{guild_id}/tree
pub async fn commit_tree(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<ReserveRequest>,
) -> ApiResult<Created<Json<ReservationResponse>>> {
    let service = BattleService::new(state.service_context());
    let entry = settle(
        service
            .commit_tree(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Created(Json(entry)))
}

/// PATCH /guilds/{guild_id}/tree
pub async fn update_tree_comment(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<ReservationResponse>> {
    let service = BattleService::new(state.service_context());
    let entry = settle(
        service
            .update_tree_comment(member.guild_id, member.member_id, request.comment)
            .await,
    )?;
    Ok(Json(entry))
}

/// DELETE /guilds/{guild_id}/tree
pub async fn cancel_tree(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<NoContent> {
    let service = BattleService::new(state.service_context());
    settle(service.cancel_tree(member.guild_id, member.member_id).await)?;
    Ok(NoContent)
}

/// POST /guilds/{guild_id}/subscriptions
pub async fn commit_subscribe(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<SubscribeRequest>,
) -> ApiResult<Created<Json<ReservationResponse>>> {
    let service = BattleService::new(state.service_context());
    let entry = settle(
        service
            .commit_subscribe(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Created(Json(entry)))
}

/// Without `?cycle=` every subscription on the boss is dropped
///
/// DELETE /guilds/{guild_id}/subscriptions/{boss}
pub async fn cancel_subscribe(
    State(state): State<AppState>,
    member: GuildMember,
    IdPath((_, boss)): IdPath<(GuildId, i32)>,
    ValidatedQuery(query): ValidatedQuery<CycleQuery>,
) -> ApiResult<Json<RemovedResponse>> {
    let service = BattleService::new(state.service_context());
    let removed = settle(
        service
            .cancel_subscribe(member.guild_id, member.member_id, boss, query.cycle)
            .await,
    )?;
    Ok(Json(RemovedResponse { removed }))
}

/// POST /guilds/{guild_id}/sl
pub async fn commit_sl(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<SlRequest>,
) -> ApiResult<Created<Json<SlUsageResponse>>> {
    let service = BattleService::new(state.service_context());
    let usage = settle(
        service
            .commit_sl(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Created(Json(usage)))
}

/// POST /guilds/{guild_id}/reminders
pub async fn remind_members(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedJson(request): ValidatedJson<RemindRequest>,
) -> ApiResult<Json<RemindedResponse>> {
    let service = BattleService::new(state.service_context());
    let reminded = settle(
        service
            .remind_members(member.guild_id, member.member_id, request)
            .await,
    )?;
    Ok(Json(RemindedResponse { reminded }))
}

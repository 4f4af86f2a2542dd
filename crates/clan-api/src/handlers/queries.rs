//! Read models of the live dataset

use axum::{extract::State, Json};
use clan_service::dto::{
    BoardResponse, BossQuery, RecordHistoryQuery, RecordResponse, ReservationResponse,
    SlUsageResponse,
};
use clan_service::QueryService;

use crate::extractors::{GuildMember, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /guilds/{guild_id}/bosses
pub async fn current_boss_states(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<Json<BoardResponse>> {
    let service = QueryService::new(state.service_context());
    Ok(Json(service.current_boss_states(member.guild_id).await?))
}

/// GET /guilds/{guild_id}/queue?boss=
pub async fn queue_list(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<BossQuery>,
) -> ApiResult<Json<Vec<ReservationResponse>>> {
    let service = QueryService::new(state.service_context());
    Ok(Json(service.queue_list(member.guild_id, query.boss).await?))
}

/// GET /guilds/{guild_id}/tree?boss=
pub async fn tree_list(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<BossQuery>,
) -> ApiResult<Json<Vec<ReservationResponse>>> {
    let service = QueryService::new(state.service_context());
    Ok(Json(service.tree_list(member.guild_id, query.boss).await?))
}

/// GET /guilds/{guild_id}/subscriptions?boss=
pub async fn subscribe_list(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<BossQuery>,
) -> ApiResult<Json<Vec<ReservationResponse>>> {
    let service = QueryService::new(state.service_context());
    Ok(Json(service.subscribe_list(member.guild_id, query.boss).await?))
}

/// Retries used in the current battle day
///
/// GET /guilds/{guild_id}/sl
pub async fn sl_list(
    State(state): State<AppState>,
    member: GuildMember,
) -> ApiResult<Json<Vec<SlUsageResponse>>> {
    let service = QueryService::new(state.service_context());
    Ok(Json(service.sl_list(member.guild_id).await?))
}

/// Newest first
///
/// GET /guilds/{guild_id}/records?member_id=&boss=&cycle=&day=&limit=
pub async fn record_history(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<RecordHistoryQuery>,
) -> ApiResult<Json<Vec<RecordResponse>>> {
    let service = QueryService::new(state.service_context());
    Ok(Json(service.record_history(member.guild_id, query).await?))
}

//! Daily attempt status and guild totals
//!
//! `?day=YYYY-MM-DD` picks a past battle day; the current one otherwise.

use axum::{extract::State, Json};
use clan_core::{GuildId, MemberId};
use clan_service::dto::{DayQuery, MemberStatusResponse, TotalsResponse};
use clan_service::StatusService;

use crate::extractors::{GuildMember, IdPath, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /guilds/{guild_id}/status/@me
pub async fn my_status(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<DayQuery>,
) -> ApiResult<Json<MemberStatusResponse>> {
    let service = StatusService::new(state.service_context());
    Ok(Json(
        service
            .status_for(member.guild_id, member.member_id, query.day)
            .await?,
    ))
}

/// GET /guilds/{guild_id}/status/{member_id}
pub async fn member_status(
    State(state): State<AppState>,
    member: GuildMember,
    IdPath((_, target)): IdPath<(GuildId, MemberId)>,
    ValidatedQuery(query): ValidatedQuery<DayQuery>,
) -> ApiResult<Json<MemberStatusResponse>> {
    let service = StatusService::new(state.service_context());
    Ok(Json(service.status_for(member.guild_id, target, query.day).await?))
}

/// Every member in join order
///
/// GET /guilds/{guild_id}/status
pub async fn status_all(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<DayQuery>,
) -> ApiResult<Json<Vec<MemberStatusResponse>>> {
    let service = StatusService::new(state.service_context());
    Ok(Json(service.today_status_all(member.guild_id, query.day).await?))
}

/// GET /guilds/{guild_id}/totals
pub async fn totals(
    State(state): State<AppState>,
    member: GuildMember,
    ValidatedQuery(query): ValidatedQuery<DayQuery>,
) -> ApiResult<Json<TotalsResponse>> {
    let service = StatusService::new(state.service_context());
    Ok(Json(service.today_totals(member.guild_id, query.day).await?))
}

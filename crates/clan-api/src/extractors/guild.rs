//! Guild-scoped access
//!
//! Every `/guilds/:guild_id/...` route reads or writes one guild's ledger, so
//! the caller must belong to that guild.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Path},
    http::request::Parts,
};
use clan_core::{GuildId, MemberId};
use serde::Deserialize;

use super::AuthMember;
use crate::response::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
struct GuildPath {
    guild_id: GuildId,
}

/// Authenticated member of the guild named in the path
#[derive(Debug, Clone, Copy)]
pub struct GuildMember {
    pub guild_id: GuildId,
    pub member_id: MemberId,
    pub is_admin: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for GuildMember
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthMember::from_request_parts(parts, state).await?;

        let Path(GuildPath { guild_id }) = Path::<GuildPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        let app_state = AppState::from_ref(state);
        let guild = app_state
            .service_context()
            .require_member(guild_id, auth.member_id)
            .await?;

        Ok(Self {
            guild_id,
            member_id: auth.member_id,
            is_admin: guild.is_admin(auth.member_id),
        })
    }
}

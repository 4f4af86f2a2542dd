//! Session authentication
//!
//! `Authorization: Bearer <token>` where the token came from `POST /auth/login`.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use clan_core::MemberId;
use clan_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Member behind a valid session token
#[derive(Debug, Clone, Copy)]
pub struct AuthMember {
    pub member_id: MemberId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthMember
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let member_id = AuthService::new(app_state.service_context())
            .resolve_session(bearer.token())
            .await?
            .ok_or_else(|| {
                tracing::debug!("Unknown session token");
                ApiError::InvalidSession
            })?;

        Ok(Self { member_id })
    }
}

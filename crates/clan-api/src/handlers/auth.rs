//! Web login

use axum::{extract::State, Json};
use clan_common::AppError;
use clan_core::AuthRejection;
use clan_service::dto::{LoginRequest, LoginResponse, SetPasswordRequest};
use clan_service::AuthService;

use crate::extractors::{AuthMember, ValidatedJson};
use crate::response::{settle, ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// Trade a member id and password for a session token
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = AuthService::new(state.service_context())
        .login(request)
        .await?;

    // Every failed login looks the same from outside
    match outcome {
        Ok(response) => Ok(Json(response)),
        Err(
            AuthRejection::UnknownMember
            | AuthRejection::PasswordNotSet
            | AuthRejection::WrongPassword,
        ) => Err(ApiError::App(AppError::InvalidCredentials)),
        Err(rejection) => Err(ApiError::rejected(rejection)),
    }
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthMember) -> ApiResult<NoContent> {
    AuthService::new(state.service_context())
        .logout(auth.member_id)
        .await?;
    Ok(NoContent)
}

/// Replace the caller's password; the current session ends with it
///
/// PUT /auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<SetPasswordRequest>,
) -> ApiResult<NoContent> {
    settle(
        AuthService::new(state.service_context())
            .set_password(auth.member_id, request)
            .await,
    )?;
    Ok(NoContent)
}

//! Web login
//!
//! Members set a dashboard password from chat, then trade it for an opaque
//! session token. One session per member; logging in again replaces it.

use clan_common::auth::{
    generate_session_token, hash_password, validate_password_strength, verify_password,
};
use clan_core::{AuthRejection, MemberId};
use tracing::{info, instrument, warn};

use crate::dto::{LoginRequest, LoginResponse, SetPasswordRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set or replace the member's password; existing sessions end
    #[instrument(skip(self, request))]
    pub async fn set_password(
        &self,
        member_id: MemberId,
        request: SetPasswordRequest,
    ) -> ServiceResult<Result<(), AuthRejection>> {
        if validate_password_strength(&request.password).is_err() {
            return Ok(Err(AuthRejection::WeakPassword));
        }
        if self.ctx.member_repo().find_by_id(member_id).await?.is_none() {
            return Ok(Err(AuthRejection::UnknownMember));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;
        self.ctx
            .member_repo()
            .update_password(member_id, &password_hash)
            .await?;

        info!(member_id = %member_id, "Password set");
        Ok(Ok(()))
    }

    /// Login with member id and password
    #[instrument(skip(self, request), fields(member_id = %request.member_id))]
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> ServiceResult<Result<LoginResponse, AuthRejection>> {
        let member_id = request.member_id;
        if self.ctx.member_repo().find_by_id(member_id).await?.is_none() {
            warn!(member_id = %member_id, "Login failed: unknown member");
            return Ok(Err(AuthRejection::UnknownMember));
        }

        let Some(password_hash) = self.ctx.member_repo().get_password_hash(member_id).await? else {
            warn!(member_id = %member_id, "Login failed: no password set");
            return Ok(Err(AuthRejection::PasswordNotSet));
        };

        let is_valid = verify_password(&request.password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;
        if !is_valid {
            warn!(member_id = %member_id, "Login failed: invalid password");
            return Ok(Err(AuthRejection::WrongPassword));
        }

        let token = generate_session_token();
        self.ctx
            .member_repo()
            .set_session_token(member_id, Some(&token))
            .await?;

        info!(member_id = %member_id, "Member logged in");
        Ok(Ok(LoginResponse { member_id, token }))
    }

    /// Member owning a session token
    pub async fn resolve_session(&self, token: &str) -> ServiceResult<Option<MemberId>> {
        Ok(self.ctx.member_repo().find_by_session_token(token).await?)
    }

    /// End the member's session
    #[instrument(skip(self))]
    pub async fn logout(&self, member_id: MemberId) -> ServiceResult<()> {
        self.ctx
            .member_repo()
            .set_session_token(member_id, None)
            .await?;
        info!(member_id = %member_id, "Member logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CreateGuildRequest;
    use crate::services::context::tests::{fixture, Fixture, ADMIN, GUILD};
    use crate::services::guild::GuildService;

    async fn setup() -> Fixture {
        let fixture = fixture();
        GuildService::new(&fixture.ctx)
            .create_guild(
                ADMIN,
                CreateGuildRequest {
                    guild_id: GUILD,
                    name: "Sarendia".to_string(),
                    region: "tw".to_string(),
                    creator_name: "leader".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        fixture
    }

    fn password(value: &str) -> SetPasswordRequest {
        SetPasswordRequest {
            password: value.to_string(),
        }
    }

    fn login_as(member_id: MemberId, password: &str) -> LoginRequest {
        LoginRequest {
            member_id,
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_flow() {
        let fixture = setup().await;
        let auth = AuthService::new(&fixture.ctx);

        let outcome = auth.login(login_as(ADMIN, "princess01")).await.unwrap();
        assert_eq!(outcome.unwrap_err(), AuthRejection::PasswordNotSet);

        auth.set_password(ADMIN, password("princess01")).await.unwrap().unwrap();

        let outcome = auth.login(login_as(ADMIN, "princess02")).await.unwrap();
        assert_eq!(outcome.unwrap_err(), AuthRejection::WrongPassword);

        let session = auth.login(login_as(ADMIN, "princess01")).await.unwrap().unwrap();
        assert_eq!(auth.resolve_session(&session.token).await.unwrap(), Some(ADMIN));

        auth.logout(ADMIN).await.unwrap();
        assert_eq!(auth.resolve_session(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_password_ends_session() {
        let fixture = setup().await;
        let auth = AuthService::new(&fixture.ctx);
        auth.set_password(ADMIN, password("princess01")).await.unwrap().unwrap();
        let session = auth.login(login_as(ADMIN, "princess01")).await.unwrap().unwrap();

        auth.set_password(ADMIN, password("knight2024")).await.unwrap().unwrap();
        assert_eq!(auth.resolve_session(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_password_rejections() {
        let fixture = setup().await;
        let auth = AuthService::new(&fixture.ctx);

        let outcome = auth.set_password(ADMIN, password("short1")).await.unwrap();
        assert_eq!(outcome.unwrap_err(), AuthRejection::WeakPassword);
        let outcome = auth.set_password(ADMIN, password("allletters")).await.unwrap();
        assert_eq!(outcome.unwrap_err(), AuthRejection::WeakPassword);
        let outcome = auth
            .set_password(MemberId::new(404), password("princess01"))
            .await
            .unwrap();
        assert_eq!(outcome.unwrap_err(), AuthRejection::UnknownMember);
        let outcome = auth.login(login_as(MemberId::new(404), "princess01")).await.unwrap();
        assert_eq!(outcome.unwrap_err(), AuthRejection::UnknownMember);
    }
}

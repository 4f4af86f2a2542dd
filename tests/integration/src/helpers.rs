//! Test server lifecycle and HTTP shortcuts

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use clan_api::{create_app, create_app_state, AppState};
use clan_common::AppConfig;
use clan_core::{Member, MemberId};
use clan_service::dto::SetPasswordRequest;
use clan_service::AuthService;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{unique_id, LoginBody, TEST_PASSWORD};

/// Boss tables shipped with the repository
pub fn boss_tables_path() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/boss_tables.json").to_string()
}

/// In-memory configuration; the port is ignored since tests bind port 0
pub fn memory_config() -> AppConfig {
    AppConfig::in_memory(0, boss_tables_path())
}

/// PostgreSQL configuration from the environment, if one is available
pub fn database_config() -> Option<AppConfig> {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return None;
    }

    let mut config = AppConfig::from_env().ok()?;
    config.ledger.boss_tables_path = boss_tables_path();
    Some(config)
}

/// A member with an open web session
#[derive(Debug, Clone)]
pub struct TestMember {
    pub id: MemberId,
    pub name: String,
    pub token: String,
}

/// Running API server bound to a random local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(memory_config()).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Passwords are set from chat, so members are seeded in-process and
    /// then log in over HTTP like a browser would.
    pub async fn enlist(&self, name: &str) -> Result<TestMember> {
        let id = MemberId::new(unique_id());
        let ctx = self.state.service_context();
        ctx.member_repo()
            .create(&Member::new(id, name.to_string()))
            .await?;

        AuthService::new(ctx)
            .set_password(
                id,
                SetPasswordRequest {
                    password: TEST_PASSWORD.to_string(),
                },
            )
            .await?
            .map_err(|r| anyhow::anyhow!("set_password rejected: {r}"))?;

        let response = self
            .post(
                "/api/v1/auth/login",
                &json!({ "member_id": id, "password": TEST_PASSWORD }),
            )
            .await?;
        let login: LoginBody = assert_json(response, StatusCode::OK).await?;

        Ok(TestMember {
            id,
            name: name.to_string(),
            token: login.token,
        })
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.get(self.url(path)), token, None::<&()>).await
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.post(self.url(path)), token, Some(body)).await
    }

    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.put(self.url(path)), token, Some(body)).await
    }

    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.patch(self.url(path)), token, Some(body)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.delete(self.url(path)), token, None::<&()>).await
    }
}

async fn send<T: Serialize>(
    request: RequestBuilder,
    token: &str,
    body: Option<&T>,
) -> Result<Response> {
    let request = request.bearer_auth(token);
    let request = match body {
        Some(body) => request.json(body),
        None => request,
    };
    Ok(request.send().await?)
}

/// Assert the status and parse the JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert a failure and return its stable error code
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("No error code in {body}"))
}

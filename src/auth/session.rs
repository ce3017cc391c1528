use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::AuthError;

const DEFAULT_SERVER_URL: &str = "https://api.mainbase.com";
const USER_AGENT: &str = "mainbase-cli";

/// Session token pair minted by the backend, plus the identity it belongs
/// to. The identity is surfaced for display only and never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserIdentity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserIdentity {
    /// Preferred display name: full name when set, otherwise the login.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Client for the backend's session endpoints: exchange a GitHub token for
/// a session, rotate the session, revoke it.
#[derive(Debug, Clone)]
pub struct SessionClient {
    client: reqwest::Client,
    server_url: String,
}

impl SessionClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            server_url: server_url.into(),
        }
    }

    pub fn new_default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }

    /// Exchange a GitHub access token for application session tokens.
    ///
    /// Single attempt, no retry: a failed exchange almost always means the
    /// provider token itself is unusable.
    pub async fn exchange(&self, provider_token: &str) -> Result<SessionTokens, AuthError> {
        let resp = self
            .client
            .post(format!("{}/v1/auth/github/exchange", self.server_url))
            .json(&json!({ "access_token": provider_token }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ExchangeFailed { status, body });
        }
        Ok(resp.json().await?)
    }

    /// Rotate the session using a refresh token.
    ///
    /// The returned pair supersedes the input in full; the refresh token is
    /// not guaranteed stable across rotations, so callers must persist both
    /// fields every time.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, AuthError> {
        let resp = self
            .client
            .post(format!("{}/v1/auth/refresh", self.server_url))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::RefreshFailed { status, body });
        }
        Ok(resp.json().await?)
    }

    /// Best-effort remote revocation. Failures are swallowed so that logout
    /// always succeeds locally.
    pub async fn revoke(&self, access_token: &str) {
        let result = self
            .client
            .post(format!("{}/v1/auth/logout", self.server_url))
            .bearer_auth(access_token)
            .send()
            .await;
        if let Err(err) = result {
            debug!("session revocation failed, continuing logout: {err}");
        }
    }
}

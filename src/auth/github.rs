use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use super::error::AuthError;

const DEFAULT_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
const DEFAULT_ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const DEFAULT_SCOPE: &str = "read:user user:email";

/// The provider's suggested interval is a floor, not a ceiling; we never
/// poll faster than this.
const POLL_INTERVAL_FLOOR: Duration = Duration::from_secs(3);
/// Extra delay applied to a single cycle after a `slow_down` response.
/// The base interval is not permanently raised.
const SLOW_DOWN_PENALTY: Duration = Duration::from_secs(5);

/// An in-flight device authorization.
///
/// Produced by [`GitHubAuth::request_device_code`], which also starts the
/// background poll task. The `user_code` and `verification_uri` are for
/// display; the device code itself stays inside the poll task. `wait`
/// consumes the state exactly once; a process restart loses any pending
/// authorization and the user must start over.
#[derive(Debug)]
pub struct DeviceAuthorization {
    pub user_code: String,
    pub verification_uri: String,
    pub expires_at: DateTime<Utc>,
    pub interval: Duration,
    completion: oneshot::Receiver<Result<String, AuthError>>,
    cancel: CancellationToken,
}

impl DeviceAuthorization {
    /// Seconds until the user code expires, for display.
    pub fn expires_in_seconds(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(0) as u64
    }

    /// Suspend until the background poll task reaches a terminal outcome.
    ///
    /// Resolves with the provider token on authorization, or the terminal
    /// error that ended the poll loop. Waiting does not drive polling; the
    /// task has been running since the device code was requested.
    pub async fn wait(self) -> Result<String, AuthError> {
        match self.completion.await {
            Ok(outcome) => outcome,
            // Sender dropped without a result: the task was cancelled.
            Err(_) => Err(AuthError::Cancelled),
        }
    }

    /// Stop the background poll task. Safe to call more than once.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// GitHub OAuth device-flow client.
///
/// # Example
/// ```no_run
/// use mainbase::auth::GitHubAuth;
///
/// # async fn example() -> Result<(), mainbase::auth::AuthError> {
/// let auth = GitHubAuth::new("client-id");
/// let pending = auth.request_device_code().await?;
/// println!("visit {} and enter {}", pending.verification_uri, pending.user_code);
/// let provider_token = pending.wait().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitHubAuth {
    client: reqwest::Client,
    client_id: String,
    scope: String,
    device_code_url: String,
    access_token_url: String,
    poll_floor: Duration,
    slow_down_penalty: Duration,
}

impl GitHubAuth {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            poll_floor: POLL_INTERVAL_FLOOR,
            slow_down_penalty: SLOW_DOWN_PENALTY,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    pub fn with_poll_floor(mut self, floor: Duration) -> Self {
        self.poll_floor = floor;
        self
    }

    pub fn with_slow_down_penalty(mut self, penalty: Duration) -> Self {
        self.slow_down_penalty = penalty;
        self
    }

    /// Request a device code and start polling for its completion.
    ///
    /// The returned state carries the user-facing code and URL; the poll
    /// task runs in the background from this moment and self-terminates on
    /// any terminal outcome. Cancel it through
    /// [`DeviceAuthorization::cancel`] if the result is no longer wanted.
    pub async fn request_device_code(&self) -> Result<DeviceAuthorization, AuthError> {
        let resp = self
            .client
            .post(&self.device_code_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Provider(format!(
                "device code request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceCodeResponse = resp.json().await?;

        let expires_at = Utc::now() + chrono::Duration::seconds(payload.expires_in as i64);
        let interval = Duration::from_secs(payload.interval).max(self.poll_floor);
        let cancel = CancellationToken::new();
        let (tx, rx) = oneshot::channel();

        let poller = PollTask {
            client: self.client.clone(),
            access_token_url: self.access_token_url.clone(),
            client_id: self.client_id.clone(),
            device_code: payload.device_code,
            interval,
            slow_down_penalty: self.slow_down_penalty,
            expires_at,
            cancel: cancel.clone(),
        };
        tokio::spawn(async move {
            let outcome = poller.run().await;
            // The receiver may be gone if the caller abandoned the flow.
            let _ = tx.send(outcome);
        });

        Ok(DeviceAuthorization {
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            expires_at,
            interval,
            completion: rx,
            cancel,
        })
    }
}

/// The background half of the device flow: polls the access-token endpoint
/// until the grant reaches a terminal state.
struct PollTask {
    client: reqwest::Client,
    access_token_url: String,
    client_id: String,
    device_code: String,
    interval: Duration,
    slow_down_penalty: Duration,
    expires_at: DateTime<Utc>,
    cancel: CancellationToken,
}

impl PollTask {
    async fn run(self) -> Result<String, AuthError> {
        let mut wait = self.interval;
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(AuthError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
            wait = self.interval;

            if Utc::now() >= self.expires_at {
                return Err(AuthError::DeviceCodeExpired);
            }

            match self.poll_once().await? {
                PollOutcome::Authorized(token) => return Ok(token),
                PollOutcome::Pending => {}
                PollOutcome::SlowDown => wait = self.interval + self.slow_down_penalty,
            }
        }
    }

    async fn poll_once(&self) -> Result<PollOutcome, AuthError> {
        let resp = self
            .client
            .post(&self.access_token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("device_code", self.device_code.as_str()),
                ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Provider(format!(
                "device token request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceTokenResponse = resp.json().await?;
        classify_poll_response(payload)
    }
}

/// Non-terminal poll results; terminal ones are errors or the token itself.
#[derive(Debug)]
enum PollOutcome {
    Authorized(String),
    Pending,
    SlowDown,
}

fn classify_poll_response(payload: DeviceTokenResponse) -> Result<PollOutcome, AuthError> {
    if let Some(token) = payload.access_token {
        return Ok(PollOutcome::Authorized(token));
    }
    match payload.error.as_deref() {
        Some("authorization_pending") => Ok(PollOutcome::Pending),
        Some("slow_down") => Ok(PollOutcome::SlowDown),
        Some("expired_token") => Err(AuthError::DeviceCodeExpired),
        Some("access_denied") => Err(AuthError::AccessDenied),
        Some(other) => {
            let detail = payload
                .error_description
                .unwrap_or_else(|| "no description".to_string());
            Err(AuthError::Provider(format!("{other}: {detail}")))
        }
        None => Err(AuthError::Provider(
            "device token response missing both token and error".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    expires_in: u64,
    interval: u64,
}

#[derive(Debug, Deserialize)]
struct DeviceTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

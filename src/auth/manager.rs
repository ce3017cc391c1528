use std::sync::{Arc, Mutex};

use tracing::warn;

use super::credentials::{CredentialStore, Credentials, FileCredentialStore};
use super::error::AuthError;
use super::github::{DeviceAuthorization, GitHubAuth};
use super::session::{SessionClient, UserIdentity};
use crate::config::AuthConfig;

/// Output capability for the blocking login flow.
///
/// Progress messages route through this instead of a global console so a
/// host UI can redirect them without mutating shared state.
pub trait ProgressSink {
    fn message(&self, text: &str);
}

/// Display payload for the two-phase login flow: everything a UI needs to
/// show while the device flow is pending.
#[derive(Debug, Clone)]
pub struct LoginInstructions {
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in_seconds: u64,
}

/// Orchestrates the full credential lifecycle: device flow, session
/// exchange, persistence, refresh, and logout.
///
/// Holds at most one in-flight device authorization. Starting a second
/// interactive flow cancels the prior poll task before replacing it.
///
/// # Example
/// ```no_run
/// use mainbase::auth::AuthManager;
/// use mainbase::config::AuthConfig;
///
/// # async fn example() -> Result<(), mainbase::auth::AuthError> {
/// let manager = AuthManager::new(&AuthConfig::from_env());
/// if let Some(token) = manager.get_valid_access_token().await? {
///     println!("ready: {token}");
/// } else {
///     println!("please run `mainbase auth login`");
/// }
/// # Ok(())
/// # }
/// ```
pub struct AuthManager {
    github: GitHubAuth,
    session: SessionClient,
    store: Arc<dyn CredentialStore>,
    pending: Mutex<Option<DeviceAuthorization>>,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            github: GitHubAuth::new(&config.github_client_id),
            session: SessionClient::new(&config.server_url),
            store: Arc::new(FileCredentialStore::new_default()),
            pending: Mutex::new(None),
        }
    }

    pub fn with_github(mut self, github: GitHubAuth) -> Self {
        self.github = github;
        self
    }

    pub fn with_session(mut self, session: SessionClient) -> Self {
        self.session = session;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = store;
        self
    }

    /// Blocking login flow: device code, instructions through `sink`, wait
    /// for authorization, exchange, persist.
    ///
    /// Nothing is saved until the exchange succeeds, so any failure leaves
    /// the store untouched.
    pub async fn login(&self, sink: &dyn ProgressSink) -> Result<UserIdentity, AuthError> {
        sink.message("Starting GitHub authentication...");
        let pending = self.github.request_device_code().await?;

        sink.message("GitHub Device Authorization");
        sink.message(&format!("1. Go to: {}", pending.verification_uri));
        sink.message(&format!("2. Enter this code: {}", pending.user_code));
        sink.message("3. Authorize the application");
        if webbrowser::open(&pending.verification_uri).is_ok() {
            sink.message("Opening browser...");
        } else {
            sink.message("Could not open a browser automatically; please open the URL above.");
        }

        sink.message("Waiting for authorization...");
        let provider_token = pending.wait().await?;

        sink.message("Exchanging GitHub token with server...");
        self.finish(&provider_token).await
    }

    /// Non-blocking half of the two-phase flow.
    ///
    /// Returns display instructions immediately and parks the pending
    /// authorization internally. Any prior pending flow is cancelled and
    /// replaced. The browser is deliberately not opened here; display is
    /// the caller's concern.
    pub async fn begin_interactive_login(&self) -> Result<LoginInstructions, AuthError> {
        let pending = self.github.request_device_code().await?;
        let instructions = LoginInstructions {
            user_code: pending.user_code.clone(),
            verification_uri: pending.verification_uri.clone(),
            expires_in_seconds: pending.expires_in_seconds(),
        };
        let mut slot = self.pending_slot();
        if let Some(prior) = slot.take() {
            prior.cancel();
        }
        *slot = Some(pending);
        Ok(instructions)
    }

    /// Consume the pending flow: wait, exchange, persist.
    ///
    /// Returns `false` on any failure or when no flow is pending, so a
    /// double invocation is harmless and issues no network calls. The
    /// pending slot is cleared either way.
    pub async fn complete_interactive_login(&self) -> bool {
        match self.try_complete_interactive_login().await {
            Ok(_) => true,
            Err(AuthError::NoPendingAuth) => false,
            Err(err) => {
                warn!("interactive login failed: {err}");
                false
            }
        }
    }

    /// [`complete_interactive_login`](Self::complete_interactive_login)
    /// with the failure surfaced, for callers that display errors.
    pub async fn try_complete_interactive_login(&self) -> Result<UserIdentity, AuthError> {
        let pending = self.pending_slot().take().ok_or(AuthError::NoPendingAuth)?;
        let provider_token = pending.wait().await?;
        self.finish(&provider_token).await
    }

    /// Revoke the session remotely (best effort) and clear local storage.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(credentials) = self.store.load() {
            self.session.revoke(&credentials.access_token).await;
        }
        self.store.clear()
    }

    /// Return a known-good access token, refreshing the session first.
    ///
    /// The refresh is unconditional: one extra round trip buys us not
    /// having to track token lifetimes locally. A refresh failure
    /// invalidates the session, clearing the store.
    pub async fn get_valid_access_token(&self) -> Result<Option<String>, AuthError> {
        let credentials = match self.store.load() {
            Some(credentials) => credentials,
            None => return Ok(None),
        };
        match self.session.refresh(&credentials.refresh_token).await {
            Ok(session) => {
                self.store.save(&Credentials {
                    access_token: session.access_token.clone(),
                    refresh_token: session.refresh_token,
                })?;
                Ok(Some(session.access_token))
            }
            Err(err) => {
                warn!("session refresh failed, clearing credentials: {err}");
                self.store.clear()?;
                Ok(None)
            }
        }
    }

    /// Cheap local check: a credential record exists. Does not verify the
    /// token is still accepted by the server.
    pub fn is_logged_in(&self) -> bool {
        self.store.exists()
    }

    async fn finish(&self, provider_token: &str) -> Result<UserIdentity, AuthError> {
        let session = self.session.exchange(provider_token).await?;
        self.store.save(&Credentials {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        })?;
        Ok(session.user)
    }

    fn pending_slot(&self) -> std::sync::MutexGuard<'_, Option<DeviceAuthorization>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

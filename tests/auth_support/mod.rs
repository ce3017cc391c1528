#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use mainbase::auth::{
    AuthError, AuthManager, CredentialStore, Credentials, GitHubAuth, ProgressSink, SessionClient,
};
use mainbase::config::AuthConfig;
use wiremock::MockServer;

/// Single-slot credential store held in memory, for tests that must not
/// touch the filesystem.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<Credentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, credentials: Credentials) {
        *self.slot.lock().expect("store lock poisoned") = Some(credentials);
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Option<Credentials> {
        self.slot.lock().expect("store lock poisoned").clone()
    }

    fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        *self.slot.lock().expect("store lock poisoned") = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

/// Collects login progress messages instead of printing them.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink lock poisoned").clone()
    }
}

impl ProgressSink for RecordingSink {
    fn message(&self, text: &str) {
        self.messages
            .lock()
            .expect("sink lock poisoned")
            .push(text.to_string());
    }
}

pub fn credentials(access: &str, refresh: &str) -> Credentials {
    Credentials {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

/// GitHub client pointed at a mock server, with a fast poll cadence so
/// tests do not sit through real provider intervals.
pub fn github_auth(server: &MockServer) -> GitHubAuth {
    GitHubAuth::new("test-client-id")
        .with_device_code_url(format!("{}/login/device/code", server.uri()))
        .with_access_token_url(format!("{}/login/oauth/access_token", server.uri()))
        .with_poll_floor(Duration::from_millis(50))
        .with_slow_down_penalty(Duration::from_millis(300))
}

pub fn session_client(server: &MockServer) -> SessionClient {
    SessionClient::new(server.uri())
}

pub fn manager(
    server: &MockServer,
    store: std::sync::Arc<InMemoryCredentialStore>,
) -> AuthManager {
    AuthManager::new(&AuthConfig::default())
        .with_github(github_auth(server))
        .with_session(session_client(server))
        .with_store(store)
}

use thiserror::Error;

/// Errors raised by the authentication flows.
///
/// Every variant is terminal for the operation that produced it; the only
/// automatic retries happen inside the device-code poll loop, for the two
/// transient provider codes (`authorization_pending`, `slow_down`).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("device code expired before authorization completed")]
    DeviceCodeExpired,
    #[error("user denied the authorization request")]
    AccessDenied,
    #[error("identity provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("server exchange failed with status {status}: {body}")]
    ExchangeFailed { status: u16, body: String },
    #[error("token refresh failed with status {status}: {body}")]
    RefreshFailed { status: u16, body: String },
    #[error("no pending authentication")]
    NoPendingAuth,
    #[error("login flow cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        // A body that fails to decode means the provider sent an unexpected
        // shape, not that the network broke.
        if error.is_decode() {
            Self::Provider(format!("malformed response: {error}"))
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

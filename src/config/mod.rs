//! Environment-driven configuration for the auth endpoints.

const DEFAULT_CLIENT_ID: &str = "your-github-client-id";
const DEFAULT_SERVER_URL: &str = "https://api.mainbase.com";

/// Endpoint configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth app client id used for the device flow.
    pub github_client_id: String,
    /// Base URL of the backend that mints session tokens.
    pub server_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            github_client_id: DEFAULT_CLIENT_ID.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl AuthConfig {
    /// Load from `GITHUB_CLIENT_ID` and `MAINBASE_SERVER_URL`, reading a
    /// `.env` file first if one is present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        if let Ok(client_id) = std::env::var("GITHUB_CLIENT_ID") {
            config.github_client_id = client_id;
        }
        if let Ok(server_url) = std::env::var("MAINBASE_SERVER_URL") {
            config.server_url = server_url.trim_end_matches('/').to_string();
        }
        config
    }
}

//! GitHub device-flow authentication and session lifecycle.

pub mod credentials;
pub mod error;
pub mod github;
pub mod manager;
pub mod session;

pub use credentials::{CredentialStore, Credentials, FileCredentialStore};
pub use error::AuthError;
pub use github::{DeviceAuthorization, GitHubAuth};
pub use manager::{AuthManager, LoginInstructions, ProgressSink};
pub use session::{SessionClient, SessionTokens, UserIdentity};

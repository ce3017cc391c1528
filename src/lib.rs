//! Mainbase CLI — GitHub device-flow authentication core.
//!
//! Authenticates the CLI user against GitHub with the OAuth 2.0 Device
//! Authorization Grant, exchanges the GitHub token for an
//! application-issued session token pair, and persists that session
//! across invocations.
//!
//! # Quick Start
//!
//! ```no_run
//! use mainbase::auth::AuthManager;
//! use mainbase::config::AuthConfig;
//!
//! # async fn example() -> Result<(), mainbase::auth::AuthError> {
//! let manager = AuthManager::new(&AuthConfig::from_env());
//! let instructions = manager.begin_interactive_login().await?;
//! println!(
//!     "Visit {} and enter {}",
//!     instructions.verification_uri, instructions.user_code
//! );
//! if manager.complete_interactive_login().await {
//!     println!("Logged in.");
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;

//! CLI auth command handlers for login, status, and logout.

use crate::auth::{AuthManager, ProgressSink};
use crate::config::AuthConfig;

/// Routes login progress messages to stdout.
struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn message(&self, text: &str) {
        println!("{text}");
    }
}

fn manager() -> AuthManager {
    AuthManager::new(&AuthConfig::from_env())
}

/// Handle `mainbase auth login`.
pub async fn handle_login() -> Result<(), Box<dyn std::error::Error>> {
    let manager = manager();

    if manager.is_logged_in() {
        println!("Already logged in. Use `mainbase auth logout` first to re-authenticate.");
        return Ok(());
    }

    let user = manager.login(&ConsoleSink).await?;
    println!("✅ Authentication successful!");
    println!("👋 Welcome, {}!", user.display_name());
    if let Some(email) = &user.email {
        println!("📧 Email: {email}");
    }
    Ok(())
}

/// Handle `mainbase auth status`.
pub async fn handle_status() -> Result<(), Box<dyn std::error::Error>> {
    let manager = manager();

    if !manager.is_logged_in() {
        println!("❌ Not logged in");
        return Ok(());
    }

    // Presence of a record is only optimistic; a refresh round trip tells
    // us whether the server still honors the session.
    match manager.get_valid_access_token().await? {
        Some(_) => println!("✅ Logged in and token is valid"),
        None => println!("❌ Logged in but token is invalid. Please login again."),
    }
    Ok(())
}

/// Handle `mainbase auth logout`.
pub async fn handle_logout() -> Result<(), Box<dyn std::error::Error>> {
    let manager = manager();

    if !manager.is_logged_in() {
        println!("Not currently logged in.");
        return Ok(());
    }

    manager.logout().await?;
    println!("👋 Logged out successfully");
    Ok(())
}

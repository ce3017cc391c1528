//! CLI entry point for Mainbase.

pub mod auth;

use clap::{Parser, Subcommand};

/// Mainbase CLI
#[derive(Parser, Debug)]
#[command(name = "mainbase", version, about = "Mainbase CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authentication management
    Auth(AuthArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands for login, status, and logout.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Login with GitHub
    Login,
    /// Show authentication status
    Status,
    /// Logout and revoke the current session
    Logout,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_auth_login() {
        let cli = Cli::try_parse_from(["mainbase", "auth", "login"]).unwrap();
        match cli.command {
            Commands::Auth(auth) => assert!(matches!(auth.command, AuthCommands::Login)),
        }
    }

    #[test]
    fn parse_auth_status() {
        let cli = Cli::try_parse_from(["mainbase", "auth", "status"]).unwrap();
        match cli.command {
            Commands::Auth(auth) => assert!(matches!(auth.command, AuthCommands::Status)),
        }
    }

    #[test]
    fn parse_auth_logout() {
        let cli = Cli::try_parse_from(["mainbase", "auth", "logout"]).unwrap();
        match cli.command {
            Commands::Auth(auth) => assert!(matches!(auth.command, AuthCommands::Logout)),
        }
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["mainbase"]).is_err());
    }

    #[test]
    fn parse_unknown_auth_subcommand_is_error() {
        assert!(Cli::try_parse_from(["mainbase", "auth", "register"]).is_err());
    }
}

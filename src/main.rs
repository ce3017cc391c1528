//! Mainbase CLI binary entry point.

use mainbase::cli::{AuthCommands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let result = match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login => mainbase::cli::auth::handle_login().await,
            AuthCommands::Status => mainbase::cli::auth::handle_status().await,
            AuthCommands::Logout => mainbase::cli::auth::handle_logout().await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

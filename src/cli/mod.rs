pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use client::{ApiClient, ClientError};

#[derive(Parser)]
#[command(name = "userctl")]
#[command(about = "userctl - Command-line client for the User API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "USER_API_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the User API server"
    )]
    pub server: String,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Account registration, login and identity")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Check server health status from the /health endpoint")]
    Health,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, output_format).await,
        Commands::Health => {
            let data = client.health().await?;
            utils::output_success(&output_format, "Server is healthy", Some(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_auth_command() {
        let cli = Cli::parse_from([
            "userctl",
            "--server",
            "http://api.test:8080",
            "auth",
            "login",
            "a@b.com",
            "--password",
            "pw1",
        ]);

        assert_eq!(cli.server, "http://api.test:8080");
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));
        match cli.command {
            Commands::Auth {
                cmd: commands::auth::AuthCommands::Login { email, password },
            } => {
                assert_eq!(email, "a@b.com");
                assert_eq!(password.as_deref(), Some("pw1"));
            }
            _ => panic!("expected auth login"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::parse_from(["userctl", "health", "--json"]);
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
    }
}

use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register new account")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login and print a bearer token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Show the email of the token's account")]
    Whoami {
        #[arg(long, env = "USER_API_TOKEN", help = "Bearer token from `auth login`")]
        token: String,
    },
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { email, password } => {
            let password = read_password(password)?;
            let id = client.register(&email, &password).await?;
            output_success(&output_format, &format!("Registered account {}", id), Some(json!({ "id": id })))
        }
        AuthCommands::Login { email, password } => {
            let password = read_password(password)?;
            let token = client.login(&email, &password).await?;
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Logged in", Some(json!({ "token": token }))),
                // Bare token so it can be captured by the shell
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        AuthCommands::Whoami { token } => {
            let email = client.whoami(&token).await?;
            output_success(&output_format, &email, Some(json!({ "email": email })))
        }
    }
}

fn read_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;
    read_password_line(io::stdin().lock())
}

fn read_password_line(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}

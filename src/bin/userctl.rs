use clap::Parser;
use user_api_rust::cli::utils::output_error;
use user_api_rust::cli::{Cli, ClientError, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("USERCTL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = user_api_rust::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => {
                let code = match e.downcast_ref::<ClientError>() {
                    Some(ClientError::Api { code, .. }) => Some(code.as_str()),
                    _ => None,
                };
                output_error(&output_format, &e.to_string(), code)?;
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

/// MusicApp - Command-line client for the MusicApp catalog
use clap::Parser;
use musicapp_client::{ClientError, MusicAppClient};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod session;

use commands::Command;
use config::AppConfig;
use session::StoredSession;

#[derive(Parser)]
#[command(name = "musicapp")]
#[command(about = "MusicApp catalog client", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (default: ./musicapp.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "musicapp_client=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "musicapp=info,musicapp_client=info".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let stored = StoredSession::load(&config.session.path)?;
    let client = MusicAppClient::new(config.client_config(stored.access, stored.refresh))?;
    tracing::debug!(url = %client.url(), "Client ready");

    let outcome = commands::run(&client, cli.command).await;

    // Persist whatever the command left behind: new tokens, a refreshed
    // access token, or nothing after logout and session expiry
    let (access, refresh) = client.get_tokens().await;
    session::persist(&config.session.path, access, refresh);

    if let Err(e) = &outcome {
        if matches!(e.downcast_ref::<ClientError>(), Some(ClientError::SessionExpired)) {
            eprintln!("Your session has expired. Run `musicapp login` to sign in again.");
        }
    }

    outcome
}

//! Challenge leaderboard server binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leaderboard_api_rest::{create_app, issue_token, AppState, Claims};
use leaderboard_common::{init_tracing, AppConfig};
use leaderboard_domain::SessionId;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "challenge-leaderboard")]
#[command(author, version, about = "Challenge leaderboard server")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind (overrides configuration)
        #[arg(long, env = "LEADERBOARD_HOST")]
        host: Option<String>,

        /// Port to bind (overrides configuration)
        #[arg(short, long, env = "LEADERBOARD_PORT")]
        port: Option<u16>,
    },

    /// Mint a bearer token signed with the configured secret
    IssueToken {
        /// Username the token authenticates
        #[arg(short, long)]
        username: String,

        /// Lifetime in seconds (defaults to the configured token expiry)
        #[arg(long)]
        ttl_seconds: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::IssueToken {
            username,
            ttl_seconds,
        } => {
            let ttl = ttl_seconds
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.token_expiry());
            let claims = Claims::new(username, SessionId::new(), ttl);
            let token = issue_token(&claims, &config.auth.jwt_secret)?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    init_tracing(
        &config.telemetry.service_name,
        config.telemetry.json_logging,
        &config.telemetry.log_level,
    )?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config).context("Failed to open the competition")?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "challenge leaderboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

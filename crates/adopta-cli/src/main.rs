//! Adopta CLI - Pet adoption platform with an insight agent
//!
//! Usage:
//!   adopta init                   Initialize database
//!   adopta seed --demo            Insert sample pets and demo activity
//!   adopta health                 Analyze system health
//!   adopta chat "¿cómo vamos?"    Ask the agent
//!   adopta serve --port 8000      Start web server
//!   adopta remote summary         Executive summary from a running server

mod cli;
mod client;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Seed { demo } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_seed(&db, demo).map(|_| ())
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.config.as_deref()),
        Commands::Health => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_health(&db, &commands::load_engine(cli.config.as_deref())).await
        }
        Commands::Recommendations => {
            let db = commands::open_db(&cli.db)?;
            let engine = commands::load_engine(cli.config.as_deref());
            commands::cmd_recommendations(&db, &engine).await
        }
        Commands::Anomalies => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_anomalies(&db, &commands::load_engine(cli.config.as_deref())).await
        }
        Commands::Chat { message, context } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_agent_config(cli.config.as_deref());
            let engine = adopta_core::InsightEngine::from_config(&config);
            commands::cmd_chat(
                &db,
                &engine,
                &message,
                context.as_deref(),
                config.max_message_chars,
            )
            .await
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => {
            commands::cmd_serve(&cli.db, cli.config.as_deref(), &host, port, no_auth).await
        }
        Commands::Remote { url, token, action } => {
            commands::cmd_remote(&url, token.as_deref(), action).await
        }
    }
}

//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Adopta - Pet adoption platform with an insight agent
#[derive(Parser)]
#[command(name = "adopta")]
#[command(about = "Pet adoption platform backend with heuristic and model-backed analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "adopta.db", global = true)]
    pub db: PathBuf,

    /// Agent config file (overrides the data dir agent.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Insert the sample pets
    Seed {
        /// Also insert demo users, adoptions and donations
        #[arg(long)]
        demo: bool,
    },

    /// Show database counts
    Status,

    /// Analyze system health
    Health,

    /// Get adoption recommendations
    Recommendations,

    /// Detect anomalies
    Anomalies,

    /// Ask the agent a question
    Chat {
        /// The question
        message: String,

        /// Extra context passed to the model
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the agent routes require an API key from ADOPTA_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },

    /// Query a running server
    Remote {
        /// Base URL of the API
        #[arg(long, default_value = "http://127.0.0.1:8000/api", env = "ADOPTA_API_URL")]
        url: String,

        /// API key sent as a bearer token
        #[arg(long, env = "ADOPTA_API_TOKEN")]
        token: Option<String>,

        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
pub enum RemoteAction {
    /// Fetch the system health analysis
    Health,
    /// Fetch adoption recommendations
    Recommendations,
    /// Fetch the anomaly report
    Anomalies,
    /// Send a chat message
    Chat {
        message: String,
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Fetch all three analyses and print an executive summary
    Summary,
}

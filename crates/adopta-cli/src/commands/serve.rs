//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::{load_agent_config, open_db};

pub async fn cmd_serve(
    db_path: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    no_auth: bool,
) -> Result<()> {
    println!("🚀 Starting Adopta web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}/api", host, port);

    // Comma-separated API keys and CORS origins
    let api_keys = adopta_server::parse_list(&std::env::var("ADOPTA_API_KEYS").unwrap_or_default());
    let allowed_origins =
        adopta_server::parse_list(&std::env::var("ADOPTA_ALLOWED_ORIGINS").unwrap_or_default());

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!("   🔒 Authentication: required, but no API keys configured");
        println!("      Set ADOPTA_API_KEYS to allow access to the analytics routes");
    } else {
        println!(
            "   🔑 API keys: {} configured (ADOPTA_API_KEYS)",
            api_keys.len()
        );
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;
    let agent = load_agent_config(config_path);

    let config = adopta_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
    };

    adopta_server::serve_with_config(db, host, port, config, &agent).await?;

    Ok(())
}

//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_agent_config` / `load_engine` - Insight engine from config files and environment
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show snapshot counts

use std::path::Path;

use anyhow::{Context, Result};

use adopta_core::{AgentConfig, Database, InsightEngine};

use super::print_header;

/// Open (and migrate) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Agent config from `config_path` (or the data dir) and the environment
pub fn load_agent_config(config_path: Option<&Path>) -> AgentConfig {
    AgentConfig::load(config_path)
}

pub fn load_engine(config_path: Option<&Path>) -> InsightEngine {
    InsightEngine::from_config(&load_agent_config(config_path))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add sample data: adopta seed --demo");
    println!("  2. Check the system: adopta health");
    println!("  3. Start the API: adopta serve");

    Ok(())
}

pub fn cmd_status(db_path: &Path, config_path: Option<&Path>) -> Result<()> {
    print_header("📊 Adopta Status");
    println!("   Database: {}", db_path.display());

    if !db_path.exists() {
        println!("   Size: (database not initialized)");
        println!();
        println!("   Run: adopta init");
        return Ok(());
    }

    let db = open_db(db_path)?;
    let snapshot = db.collect_snapshot().context("Failed to collect snapshot")?;

    let size_kb = snapshot.system_metrics.database_size_bytes as f64 / 1024.0;
    if size_kb < 1024.0 {
        println!("   Size: {:.1} KB", size_kb);
    } else {
        println!("   Size: {:.1} MB", size_kb / 1024.0);
    }

    println!();
    println!(
        "   🐾 Pets: {} ({} available, {} adopted, {} in process)",
        snapshot.pets.total,
        snapshot.pets.available,
        snapshot.pets.adopted,
        snapshot.pets.in_process
    );
    for (species, count) in &snapshot.pets.by_species {
        println!("      {}: {}", species, count);
    }
    println!(
        "   🏠 Adoptions: {} ({} pending, {} approved, {} completed, {} rejected)",
        snapshot.adoptions.total,
        snapshot.adoptions.pending,
        snapshot.adoptions.approved,
        snapshot.adoptions.completed,
        snapshot.adoptions.rejected
    );
    println!(
        "   💰 Donations: {} (${:.2} completed)",
        snapshot.donations.total, snapshot.donations.total_amount
    );
    println!(
        "   👥 Users: {} ({} in the last week)",
        snapshot.users.total, snapshot.users.recent_registrations
    );
    if let Some(last) = snapshot.system_metrics.last_activity {
        println!("   Last registration: {}", last.format("%Y-%m-%d %H:%M"));
    }

    let engine = load_engine(config_path);
    println!();
    if let Some(ai) = engine.ai() {
        use adopta_core::AIBackend;
        println!("   🤖 External model: {} ({})", ai.model(), ai.host());
    } else {
        println!("   💡 Tip: Set DEEPSEEK_API_KEY to delegate analyses to an external model");
    }

    Ok(())
}

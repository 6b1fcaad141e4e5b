//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, status) and shared utilities (open_db, load_engine)
//! - `seed` - Sample pets and demo activity
//! - `agent` - Local insight engine commands (health, recommendations, anomalies, chat)
//! - `serve` - Web server command
//! - `remote` - Commands against a running server

pub mod agent;
pub mod core;
pub mod remote;
pub mod seed;
pub mod serve;

// Re-export command functions for main.rs
pub use agent::*;
pub use core::*;
pub use remote::*;
pub use seed::*;
pub use serve::*;

/// Print a section header followed by a rule
pub fn print_header(title: &str) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");
}

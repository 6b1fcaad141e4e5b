//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod agent;
pub mod audit;
pub mod stats;

// Re-export all handlers for use in router
pub use agent::*;
pub use audit::*;
pub use stats::*;

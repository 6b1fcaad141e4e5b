//! Adopta Core Library
//!
//! Shared functionality for the Adopta pet adoption platform:
//! - Database access and migrations (users, pets, adoptions, donations, audit log)
//! - Snapshot aggregation over the adoption data
//! - Heuristic insight engine (health tiers, anomalies, recommendations, chat)
//! - Pluggable external model backends with heuristic fallback
//! - Agent configuration (embedded defaults, file override, environment)

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;

/// Test utilities including a mock chat-completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, Completion, CompletionParams, MockBackend, OpenAICompatibleBackend};
pub use config::AgentConfig;
pub use db::{AuditEntry, AuditFilter, Database};
pub use error::{Error, Result};
pub use insights::{
    AnalysisKind, AnalysisReport, AnalysisSource, AnomalyFlag, AnomalyKind, ChatIntent,
    HealthAssessment, InsightEngine, SystemSnapshot, Tier,
};

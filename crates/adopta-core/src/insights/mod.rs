//! Insight Engine - heuristic analytics for the adoption platform
//!
//! Given a [`SystemSnapshot`] of aggregate counts the engine produces:
//!
//! - **Health** - narrative plus a qualitative [`Tier`] from the adoption rate
//! - **Recommendations** - a fixed optimization playbook
//! - **Anomalies** - [`AnomalyFlag`]s against static thresholds
//! - **Chat** - keyword-routed canned replies
//!
//! When an external model is configured, [`InsightEngine`] asks it first
//! and falls back to the heuristics on any failure.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adopta_core::{Database, InsightEngine};
//!
//! let snapshot = db.collect_snapshot()?;
//! let engine = InsightEngine::from_config(&config);
//! let report = engine.system_health(&snapshot).await;
//! println!("{} ({})", report.analysis, report.source);
//! ```

pub mod anomalies;
pub mod chat;
pub mod engine;
pub mod format;
pub mod health;
pub mod prompts;
pub mod recommendations;
pub mod snapshot;
pub mod summary;
pub mod types;

pub use engine::InsightEngine;
pub use snapshot::{
    AdoptionCounts, DonationCounts, PetCounts, SystemMetrics, SystemSnapshot, UserCounts,
};
pub use summary::{ExecutiveSummary, SummaryMetrics, SummaryStatus};
pub use types::{
    AnalysisKind, AnalysisReport, AnalysisSource, AnomaliesResponse, AnomalyFlag, AnomalyKind,
    ChatIntent, ChatReply, ChatRequest, ChatResponse, HealthAssessment, RecommendationsResponse,
    SystemHealthResponse, Tier,
};

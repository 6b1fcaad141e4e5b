//! Core types for the insight engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ai::TokenUsage;

use super::snapshot::SystemSnapshot;

/// Qualitative health tier, from the adoption rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Adoption rate above 70%
    Excellent,
    /// Adoption rate above 50%
    Good,
    NeedsAttention,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::NeedsAttention => "needs_attention",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three analyses the engine can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    SystemHealth,
    AdoptionOptimization,
    AnomalyDetection,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::SystemHealth => "system_health",
            AnalysisKind::AdoptionOptimization => "adoption_optimization",
            AnalysisKind::AnomalyDetection => "anomaly_detection",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system_health" => Ok(AnalysisKind::SystemHealth),
            "adoption_optimization" => Ok(AnalysisKind::AdoptionOptimization),
            "anomaly_detection" => Ok(AnalysisKind::AnomalyDetection),
            _ => Err(format!("Unknown analysis kind: {}", s)),
        }
    }
}

/// Where a piece of generated text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Heuristic templates
    Simulated,
    /// External chat-completion model
    External,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Simulated => "simulated",
            AnalysisSource::External => "external",
        }
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    PendingAdoptionsSpike,
    DonationSpike,
    UserRegistrationSpike,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::PendingAdoptionsSpike => "pending_adoptions_spike",
            AnomalyKind::DonationSpike => "donation_spike",
            AnomalyKind::UserRegistrationSpike => "user_registration_spike",
        }
    }
}

/// A threshold crossed by the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub kind: AnomalyKind,
    /// Pending ratio for adoptions, recent count otherwise
    pub evidence: f64,
}

/// Output of the snapshot classifier
#[derive(Debug, Clone, PartialEq)]
pub struct HealthAssessment {
    /// None when there are no pets to rate
    pub tier: Option<Tier>,
    pub adoption_rate: Option<f64>,
    pub narrative: String,
}

/// Chat intents, in routing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    Greeting,
    Pets,
    Adoptions,
    Donations,
    Users,
    Problems,
    Recommendations,
    Fallback,
}

impl ChatIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatIntent::Greeting => "greeting",
            ChatIntent::Pets => "pets",
            ChatIntent::Adoptions => "adoptions",
            ChatIntent::Donations => "donations",
            ChatIntent::Users => "users",
            ChatIntent::Problems => "problems",
            ChatIntent::Recommendations => "recommendations",
            ChatIntent::Fallback => "fallback",
        }
    }
}

/// One generated analysis, as returned inside the API envelopes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: String,
    pub source: AnalysisSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Anomaly flags (anomaly detection only, heuristic evaluation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<AnomalyFlag>>,
}

/// One chat answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub source: AnalysisSource,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

// ============================================================================
// API envelopes (shared by the server and the remote client)
// ============================================================================

/// `GET /api/ai-agent/system-health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealthResponse {
    pub status: String,
    pub analysis: AnalysisReport,
    pub system_data: SystemSnapshot,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/ai-agent/adoption-recommendations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub status: String,
    pub recommendations: AnalysisReport,
    pub data_analyzed: crate::models::AdoptionMetrics,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/ai-agent/detect-anomalies`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomaliesResponse {
    pub status: String,
    pub anomalies: AnalysisReport,
    pub data_checked: crate::models::AnomalyScan,
    pub timestamp: DateTime<Utc>,
}

/// `POST /api/ai-agent/chat` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// `POST /api/ai-agent/chat` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub response: ChatReply,
    pub timestamp: DateTime<Utc>,
}

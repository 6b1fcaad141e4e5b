//! Insight engine: heuristic analyses with optional model delegation
//!
//! Two states per call. Without a client the heuristic generators answer
//! directly. With one, a single chat-completion attempt is made first and
//! any failure falls back to the heuristic answer with a warning.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient, Completion, CompletionParams};
use crate::config::AgentConfig;
use crate::models::{AdoptionMetrics, AnomalyScan};

use super::snapshot::SystemSnapshot;
use super::types::{AnalysisKind, AnalysisReport, AnalysisSource, AnomalyFlag, ChatReply};
use super::{anomalies, chat, health, prompts, recommendations};

/// Data handed to the model alongside the snapshot
#[derive(Serialize)]
struct DelegatedData<'a, T: Serialize> {
    system_data: &'a SystemSnapshot,
    details: &'a T,
}

/// The insight engine
#[derive(Clone)]
pub struct InsightEngine {
    ai: Option<AIClient>,
    analysis_params: CompletionParams,
    chat_params: CompletionParams,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InsightEngine {
    /// Create an engine; `None` keeps it on the heuristic path
    pub fn new(ai: Option<AIClient>) -> Self {
        let defaults = AgentConfig::default();
        Self {
            ai,
            analysis_params: defaults.analysis.into(),
            chat_params: defaults.chat.into(),
        }
    }

    /// Create an engine from resolved configuration
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            ai: AIClient::from_config(config),
            analysis_params: config.analysis.into(),
            chat_params: config.chat.into(),
        }
    }

    /// Whether calls will try the external model first
    pub fn is_delegated(&self) -> bool {
        self.ai.is_some()
    }

    /// The configured model client, if any
    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Health narrative for the snapshot
    pub async fn system_health(&self, snapshot: &SystemSnapshot) -> AnalysisReport {
        let prompt = prompts::build_prompt(snapshot, AnalysisKind::SystemHealth);
        if let Some(completion) = self.delegate(AnalysisKind::SystemHealth, &prompt).await {
            return external_report(completion, None);
        }

        let assessment = health::classify(snapshot);
        debug!(tier = ?assessment.tier, rate = ?assessment.adoption_rate, "Health classified");
        simulated_report(assessment.narrative, None)
    }

    /// Adoption recommendations; the heuristic text ignores the data
    pub async fn adoption_recommendations(
        &self,
        snapshot: &SystemSnapshot,
        metrics: &AdoptionMetrics,
    ) -> AnalysisReport {
        let data = DelegatedData {
            system_data: snapshot,
            details: metrics,
        };
        let prompt = prompts::build_prompt(&data, AnalysisKind::AdoptionOptimization);
        if let Some(completion) = self
            .delegate(AnalysisKind::AdoptionOptimization, &prompt)
            .await
        {
            return external_report(completion, None);
        }

        simulated_report(recommendations::recommendations().to_string(), None)
    }

    /// Anomaly report; flags always come from the snapshot thresholds
    pub async fn detect_anomalies(
        &self,
        snapshot: &SystemSnapshot,
        scan: &AnomalyScan,
    ) -> AnalysisReport {
        let flags = anomalies::detect(snapshot);
        if !flags.is_empty() {
            debug!(count = flags.len(), "Anomaly thresholds crossed");
        }

        let data = DelegatedData {
            system_data: snapshot,
            details: scan,
        };
        let prompt = prompts::build_prompt(&data, AnalysisKind::AnomalyDetection);
        if let Some(completion) = self.delegate(AnalysisKind::AnomalyDetection, &prompt).await {
            return external_report(completion, Some(flags));
        }

        simulated_report(anomalies::render(&flags), Some(flags))
    }

    /// Answer a chat message
    pub async fn chat(
        &self,
        message: &str,
        context: Option<&str>,
        snapshot: &SystemSnapshot,
    ) -> ChatReply {
        if let Some(ai) = &self.ai {
            let system = prompts::chat_system_prompt(snapshot, context);
            match ai.chat_completion(&system, message, self.chat_params).await {
                Ok(completion) => {
                    return ChatReply {
                        response: completion.content,
                        source: AnalysisSource::External,
                        timestamp: Utc::now(),
                        usage: completion.usage,
                    };
                }
                Err(e) => {
                    warn!(error = %e, host = %ai.host(), "Chat model call failed, using simulated response");
                }
            }
        }

        let intent = chat::route(message);
        debug!(intent = intent.as_str(), "Chat routed");
        ChatReply {
            response: chat::respond(message, snapshot),
            source: AnalysisSource::Simulated,
            timestamp: Utc::now(),
            usage: None,
        }
    }

    /// One attempt at the external model; None means use the heuristics
    async fn delegate(&self, kind: AnalysisKind, prompt: &str) -> Option<Completion> {
        let ai = self.ai.as_ref()?;
        match ai
            .chat_completion(prompts::ANALYSIS_SYSTEM_PROMPT, prompt, self.analysis_params)
            .await
        {
            Ok(completion) => {
                debug!(kind = kind.as_str(), model = %ai.model(), "Analysis delegated");
                Some(completion)
            }
            Err(e) => {
                warn!(
                    kind = kind.as_str(),
                    host = %ai.host(),
                    error = %e,
                    "Model API failed, using simulated analysis"
                );
                None
            }
        }
    }
}

fn simulated_report(
    analysis: String,
    flags: Option<Vec<AnomalyFlag>>,
) -> AnalysisReport {
    AnalysisReport {
        analysis,
        source: AnalysisSource::Simulated,
        timestamp: Utc::now(),
        usage: None,
        flags,
    }
}

fn external_report(
    completion: Completion,
    flags: Option<Vec<AnomalyFlag>>,
) -> AnalysisReport {
    AnalysisReport {
        analysis: completion.content,
        source: AnalysisSource::External,
        timestamp: Utc::now(),
        usage: completion.usage,
        flags,
    }
}

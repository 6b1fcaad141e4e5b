//! Pluggable chat-completion backend abstraction
//!
//! The insight engine optionally hands its analyses to an external model.
//! This module hides which model that is.
//!
//! # Architecture
//!
//! - `AIBackend` trait: one chat-completion call (system + user message)
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! See [`AgentConfig`](crate::config::AgentConfig). `AI_BACKEND` selects
//! `deepseek` (default, any OpenAI-compatible server) or `mock`.

mod mock;
mod openai_compatible;
pub mod types;

pub use mock::{MockBackend, RecordedCall};
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send one system instruction and one user message, return the reply
    async fn chat_completion(
        &self,
        system: &str,
        user: &str,
        params: CompletionParams,
    ) -> Result<Completion>;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// DeepSeek or any other OpenAI-compatible chat-completions server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Build a client from resolved configuration
    ///
    /// Returns None when no usable credential is configured (missing,
    /// blank, or the placeholder key), which keeps the engine on its
    /// heuristic path.
    pub fn from_config(config: &AgentConfig) -> Option<Self> {
        match config.backend.as_str() {
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            "deepseek" | "openai_compatible" | "openai" => {
                let key = config.usable_api_key()?;
                match OpenAICompatibleBackend::new(
                    &config.api_url,
                    &config.model,
                    key,
                    config.timeout,
                ) {
                    Ok(backend) => {
                        debug!(host = %backend.host(), model = %backend.model(), "External model configured");
                        Some(AIClient::OpenAICompatible(backend))
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to build HTTP client, using heuristic analyses");
                        None
                    }
                }
            }
            other => {
                warn!(backend = %other, "Unknown AI_BACKEND, using heuristic analyses");
                None
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn chat_completion(
        &self,
        system: &str,
        user: &str,
        params: CompletionParams,
    ) -> Result<Completion> {
        match self {
            AIClient::OpenAICompatible(b) => b.chat_completion(system, user, params).await,
            AIClient::Mock(b) => b.chat_completion(system, user, params).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_client_without_key() {
        let config = AgentConfig::default();
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_no_client_with_placeholder_key() {
        let config = AgentConfig {
            api_key: Some(crate::config::PLACEHOLDER_API_KEY.to_string()),
            ..Default::default()
        };
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_client_with_real_key() {
        let config = AgentConfig {
            api_key: Some("sk-live".to_string()),
            api_url: "http://localhost:9/v1/".to_string(),
            ..Default::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert!(matches!(client, AIClient::OpenAICompatible(_)));
        assert_eq!(client.host(), "http://localhost:9/v1");
        assert_eq!(client.model(), "deepseek-chat");
    }

    #[test]
    fn test_mock_and_unknown_backends() {
        let mock = AgentConfig {
            backend: "mock".to_string(),
            ..Default::default()
        };
        assert!(matches!(AIClient::from_config(&mock), Some(AIClient::Mock(_))));

        let unknown = AgentConfig {
            backend: "ollama".to_string(),
            api_key: Some("sk-live".to_string()),
            ..Default::default()
        };
        assert!(AIClient::from_config(&unknown).is_none());
    }
}

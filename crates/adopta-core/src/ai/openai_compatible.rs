//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the chat completions API. The
//! default target is DeepSeek (`https://api.deepseek.com/v1`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{Completion, CompletionParams, TokenUsage};
use super::AIBackend;

/// OpenAI-compatible backend
///
/// Issues exactly one `POST {base_url}/chat/completions` per call, bounded
/// by the client timeout. No retries.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAICompatibleBackend {
    /// Create a new backend with a bounded request timeout
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn chat_completion(
        &self,
        system: &str,
        user: &str,
        params: CompletionParams,
    ) -> Result<Completion> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        debug!(model = %self.model, max_tokens = params.max_tokens, "Sending chat completion");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Chat API error {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let chat_response: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Upstream(format!("Malformed chat API response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Upstream("No response from chat API".into()))?;

        Ok(Completion {
            content,
            usage: chat_response.usage,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockChatServer;

    fn params() -> CompletionParams {
        CompletionParams {
            temperature: 0.7,
            max_tokens: 1500,
        }
    }

    fn backend(url: &str) -> OpenAICompatibleBackend {
        OpenAICompatibleBackend::new(url, "deepseek-chat", "sk-test", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = backend("http://localhost:12434/v1/");
        assert_eq!(backend.host(), "http://localhost:12434/v1");
        assert_eq!(backend.model(), "deepseek-chat");
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let server = MockChatServer::ok("Todo en orden").await;
        let completion = backend(&server.url())
            .chat_completion("sys", "hola", params())
            .await
            .unwrap();

        assert_eq!(completion.content, "Todo en orden");
        assert_eq!(completion.usage.unwrap().total_tokens, 30);

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer sk-test"));
        assert_eq!(requests[0].body["model"], "deepseek-chat");
        assert_eq!(requests[0].body["max_tokens"], 1500);
        assert_eq!(requests[0].body["messages"][0]["role"], "system");
        assert_eq!(requests[0].body["messages"][1]["content"], "hola");
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let server = MockChatServer::status(503).await;
        let err = backend(&server.url())
            .chat_completion("sys", "hola", params())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let server = MockChatServer::malformed().await;
        let err = backend(&server.url())
            .chat_completion("sys", "hola", params())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_upstream_error() {
        let server = MockChatServer::empty_choices().await;
        let err = backend(&server.url())
            .chat_completion("sys", "hola", params())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_error() {
        let server = MockChatServer::hanging().await;
        let backend = OpenAICompatibleBackend::new(
            &server.url(),
            "deepseek-chat",
            "sk-test",
            Duration::from_millis(200),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let result = backend.chat_completion("sys", "hola", params()).await;
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let result = backend("http://127.0.0.1:9")
            .chat_completion("sys", "hola", params())
            .await;
        assert!(result.is_err());
    }
}

//! Mock backend for testing
//!
//! Returns a canned reply (or a canned failure) and records every call so
//! tests can inspect the prompts the engine built.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{Completion, CompletionParams, TokenUsage};
use super::AIBackend;

/// One call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub params: CompletionParams,
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Reply content; `None` makes every call fail
    reply: Option<String>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock that answers every call
    pub fn new() -> Self {
        Self::with_reply("Análisis generado por el modelo de prueba.")
    }

    /// Create a mock with a specific reply
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock whose calls always fail
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn chat_completion(
        &self,
        system: &str,
        user: &str,
        params: CompletionParams,
    ) -> Result<Completion> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: system.to_string(),
                user: user.to_string(),
                params,
            });
        }

        match &self.reply {
            Some(reply) => Ok(Completion {
                content: reply.clone(),
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                    total_tokens: 30,
                }),
            }),
            None => Err(Error::Upstream("Mock backend configured to fail".into())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

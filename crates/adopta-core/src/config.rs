//! Agent configuration
//!
//! Resolution order (later wins):
//! 1. Embedded defaults (`config/agent.toml`)
//! 2. Override file: `--config <PATH>`, else the data dir
//!    (~/.local/share/adopta/config/agent.toml)
//! 3. Environment variables (`DEEPSEEK_*`, `AI_BACKEND`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("../config/agent.toml");

/// Sample key from the `.env.example` template; treated as "not configured"
pub const PLACEHOLDER_API_KEY: &str = "your_deepseek_api_key";

/// Sampling parameters for one kind of model call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Resolved agent configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// `deepseek` / `openai_compatible` or `mock`
    pub backend: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub analysis: SamplingConfig,
    pub chat: SamplingConfig,
    pub max_message_chars: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            backend: "deepseek".to_string(),
            api_url: "https://api.deepseek.com/v1".to_string(),
            api_key: None,
            model: "deepseek-chat".to_string(),
            timeout: Duration::from_secs(30),
            analysis: SamplingConfig {
                temperature: 0.7,
                max_tokens: 1500,
            },
            chat: SamplingConfig {
                temperature: 0.8,
                max_tokens: 1000,
            },
            max_message_chars: 1000,
        }
    }
}

impl AgentConfig {
    /// Load from `override_path` (or the data dir) and the process environment
    pub fn load(override_path: Option<&Path>) -> Self {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(default_config_path);
        Self::resolve(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve file then environment; an unreadable file falls back to the
    /// built-in defaults but environment overrides still apply
    pub fn resolve<F>(path: Option<&Path>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = load_file(path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load agent config, using defaults");
            Self::default()
        });
        config.apply_env(lookup);
        config
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("AI_BACKEND") {
            self.backend = backend.to_lowercase();
        }
        if let Some(url) = lookup("DEEPSEEK_API_URL") {
            self.api_url = url;
        }
        if let Some(key) = lookup("DEEPSEEK_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("DEEPSEEK_MODEL") {
            self.model = model;
        }
        if let Some(secs) = lookup("DEEPSEEK_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.timeout = Duration::from_secs(secs),
                Err(_) => warn!(value = %secs, "Ignoring invalid DEEPSEEK_TIMEOUT_SECS"),
            }
        }
    }

    /// The credential, if one is set and is not the placeholder
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }

    /// Whether analyses will try the external model first
    pub fn is_delegated(&self) -> bool {
        self.backend == "mock" || self.usable_api_key().is_some()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("adopta").join("config").join("agent.toml"))
}

/// Load configuration (override first, then default)
fn load_file(override_path: Option<&Path>) -> Result<AgentConfig> {
    let content = match override_path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading agent config override");
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    provider: Option<RawProvider>,
    analysis: Option<RawSampling>,
    chat: Option<RawChat>,
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    backend: Option<String>,
    api_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSampling {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_message_chars: Option<usize>,
}

/// Parse config from TOML content, filling gaps from the built-in defaults
fn parse_config(content: &str) -> Result<AgentConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AgentConfig::default();

    if let Some(provider) = raw.provider {
        if let Some(backend) = provider.backend {
            config.backend = backend.to_lowercase();
        }
        if let Some(url) = provider.api_url {
            config.api_url = url;
        }
        if let Some(key) = provider.api_key {
            config.api_key = Some(key);
        }
        if let Some(model) = provider.model {
            config.model = model;
        }
        if let Some(secs) = provider.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
    }

    if let Some(analysis) = raw.analysis {
        if let Some(t) = analysis.temperature {
            config.analysis.temperature = t;
        }
        if let Some(m) = analysis.max_tokens {
            config.analysis.max_tokens = m;
        }
    }

    if let Some(chat) = raw.chat {
        if let Some(t) = chat.temperature {
            config.chat.temperature = t;
        }
        if let Some(m) = chat.max_tokens {
            config.chat.max_tokens = m;
        }
        if let Some(n) = chat.max_message_chars {
            config.max_message_chars = n;
        }
    }

    Ok(config)
}

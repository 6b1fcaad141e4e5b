//! HTTP client for a running Adopta server
//!
//! Successful GET responses are cached per client for [`CACHE_TTL`], keyed by
//! endpoint plus serialized query parameters. Logging out clears the cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::{debug, warn};

use adopta_core::insights::{
    AnomaliesResponse, ChatResponse, RecommendationsResponse, SystemHealthResponse,
};

/// How long a cached GET response stays fresh
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const AGENT_ENDPOINT: &str = "/ai-agent";

struct CachedResponse {
    data: Value,
    stored_at: Instant,
}

/// TTL cache for GET responses
pub struct RequestCache {
    ttl: Duration,
    entries: HashMap<String, CachedResponse>,
}

impl RequestCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// `{endpoint}_{params as JSON}`
    pub fn key(endpoint: &str, params: &Value) -> String {
        format!("{}_{}", endpoint, params)
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`; stale entries are evicted
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        let fresh = self
            .entries
            .get(key)
            .is_some_and(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl);

        if fresh {
            return self.entries.get(key).map(|entry| entry.data.clone());
        }
        self.entries.remove(key);
        None
    }

    pub fn insert(&mut self, key: String, data: Value) {
        self.insert_at(key, data, Instant::now());
    }

    pub fn insert_at(&mut self, key: String, data: Value, now: Instant) {
        self.entries.insert(
            key,
            CachedResponse {
                data,
                stored_at: now,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

/// The three analyses, each present only if its request succeeded
pub struct CompleteAnalysis {
    pub health: Option<SystemHealthResponse>,
    pub recommendations: Option<RecommendationsResponse>,
    pub anomalies: Option<AnomaliesResponse>,
}

/// Client for the Adopta REST API
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
    cache: RequestCache,
}

impl ApiClient {
    /// `base_url` includes the `/api` prefix
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            http,
            cache: RequestCache::default(),
        })
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Forget the token and every cached response
    pub fn logout(&mut self) {
        self.token = None;
        self.cache.clear();
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// GET `endpoint`, answering from the cache while fresh
    pub async fn get(&mut self, endpoint: &str, params: &Value) -> Result<Value> {
        let key = RequestCache::key(endpoint, params);
        if let Some(data) = self.cache.get(&key) {
            debug!(endpoint, "Cache hit");
            return Ok(data);
        }

        let mut request = self.http.get(format!("{}{}", self.base_url, endpoint));
        if let Some(map) = params.as_object() {
            let query: Vec<(&str, String)> = map
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => (k.as_str(), s.clone()),
                    other => (k.as_str(), other.to_string()),
                })
                .collect();
            request = request.query(&query);
        }

        let data = self.send(request).await?;
        self.cache.insert(key, data.clone());
        Ok(data)
    }

    /// POST a JSON body to `endpoint`; never cached
    pub async fn post(&mut self, endpoint: &str, body: &Value) -> Result<Value> {
        let request = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .json(body);
        self.send(request).await
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> Result<Value> {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .context("Request failed")?;
        let status = response.status();
        let data: Value = response
            .json()
            .await
            .with_context(|| format!("Invalid JSON response (HTTP {})", status))?;

        if !status.is_success() {
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Request failed");
            bail!("{} (HTTP {})", message, status.as_u16());
        }
        Ok(data)
    }

    pub async fn system_health(&mut self) -> Result<SystemHealthResponse> {
        let data = self
            .get(&format!("{}/system-health", AGENT_ENDPOINT), &json!({}))
            .await?;
        serde_json::from_value(data).context("Unexpected system-health response")
    }

    pub async fn adoption_recommendations(&mut self) -> Result<RecommendationsResponse> {
        let data = self
            .get(
                &format!("{}/adoption-recommendations", AGENT_ENDPOINT),
                &json!({}),
            )
            .await?;
        serde_json::from_value(data).context("Unexpected adoption-recommendations response")
    }

    pub async fn detect_anomalies(&mut self) -> Result<AnomaliesResponse> {
        let data = self
            .get(&format!("{}/detect-anomalies", AGENT_ENDPOINT), &json!({}))
            .await?;
        serde_json::from_value(data).context("Unexpected detect-anomalies response")
    }

    pub async fn chat(&mut self, message: &str, context: Option<&str>) -> Result<ChatResponse> {
        let data = self
            .post(
                &format!("{}/chat", AGENT_ENDPOINT),
                &json!({ "message": message, "context": context }),
            )
            .await?;
        serde_json::from_value(data).context("Unexpected chat response")
    }

    /// Fetch all three analyses; a failed one is logged and left out
    pub async fn complete_analysis(&mut self) -> CompleteAnalysis {
        let health = self
            .system_health()
            .await
            .map_err(|e| warn!(error = %e, "Health analysis failed"))
            .ok();
        let recommendations = self
            .adoption_recommendations()
            .await
            .map_err(|e| warn!(error = %e, "Recommendations failed"))
            .ok();
        let anomalies = self
            .detect_anomalies()
            .await
            .map_err(|e| warn!(error = %e, "Anomaly detection failed"))
            .ok();

        CompleteAnalysis {
            health,
            recommendations,
            anomalies,
        }
    }
}

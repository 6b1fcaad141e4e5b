//! CLI command tests
//!
//! This module contains all tests for the CLI commands and the remote client.

use std::path::Path;
use std::time::{Duration, Instant};

use clap::Parser;
use serde_json::json;

use adopta_core::insights::{ExecutiveSummary, SummaryStatus};
use adopta_core::{AuditFilter, Database, InsightEngine};
use adopta_server::ServerConfig;

use crate::cli::{Cli, Commands, RemoteAction};
use crate::client::{ApiClient, RequestCache, CACHE_TTL};
use crate::commands;

const TEST_KEY: &str = "cli-test-key";

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

/// Serve the API on an ephemeral port, returning its base URL
async fn spawn_api(db: Database, require_auth: bool) -> String {
    let config = ServerConfig {
        require_auth,
        allowed_origins: vec![],
        api_keys: vec![TEST_KEY.to_string()],
    };
    let app =
        adopta_server::create_router_with_engine(db, config, InsightEngine::default(), 1000);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

fn audit_count(db: &Database, action: &str) -> usize {
    db.list_audit_log(&AuditFilter::default(), 100)
        .unwrap()
        .iter()
        .filter(|e| e.action == action)
        .count()
}

// ========== Seed Command Tests ==========

#[test]
fn test_cmd_seed_pets() {
    let db = setup_test_db();
    let summary = commands::cmd_seed(&db, false).unwrap();

    assert_eq!(summary.pets, 5);
    assert_eq!(summary.users, 0);

    let snapshot = db.collect_snapshot().unwrap();
    assert_eq!(snapshot.pets.total, 5);
    assert_eq!(snapshot.pets.available, 5);
    assert_eq!(snapshot.pets.by_species.get("perro"), Some(&3));
    assert_eq!(snapshot.pets.by_species.get("gato"), Some(&2));
    assert_eq!(snapshot.adoptions.total, 0);
}

#[test]
fn test_cmd_seed_is_idempotent() {
    let db = setup_test_db();
    commands::cmd_seed(&db, true).unwrap();

    let again = commands::cmd_seed(&db, true).unwrap();
    assert_eq!(again, commands::SeedSummary::default());
    assert_eq!(db.list_pets(None).unwrap().len(), 5);
    assert_eq!(db.count_users().unwrap(), 3);
}

#[test]
fn test_cmd_seed_demo() {
    let db = setup_test_db();
    let summary = commands::cmd_seed(&db, true).unwrap();

    assert_eq!(summary.users, 3);
    assert_eq!(summary.adoptions, 3);
    assert_eq!(summary.donations, 4);

    let snapshot = db.collect_snapshot().unwrap();
    assert_eq!(snapshot.pets.adopted, 1);
    assert_eq!(snapshot.pets.in_process, 1);
    assert_eq!(snapshot.pets.available, 3);
    assert_eq!(snapshot.adoptions.pending, 1);
    assert_eq!(snapshot.adoptions.approved, 1);
    assert_eq!(snapshot.adoptions.completed, 1);
    assert_eq!(snapshot.donations.total, 4);
    assert!((snapshot.donations.total_amount - 525.5).abs() < 1e-9);
    assert_eq!(snapshot.users.google_users, 1);
    assert_eq!(snapshot.users.recent_registrations, 1);
}

#[test]
fn test_cmd_seed_demo_after_plain_seed() {
    let db = setup_test_db();
    commands::cmd_seed(&db, false).unwrap();

    let summary = commands::cmd_seed(&db, true).unwrap();
    assert_eq!(summary.pets, 0);
    assert_eq!(summary.users, 3);
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adopta.db");

    let db = commands::open_db(&path).unwrap();
    assert!(path.exists());
    assert_eq!(db.count_users().unwrap(), 0);
}

#[test]
fn test_cmd_init_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adopta.db");

    commands::cmd_init(&path).unwrap();
    let db = commands::open_db(&path).unwrap();
    commands::cmd_seed(&db, true).unwrap();

    assert!(commands::cmd_status(&path, None).is_ok());
}

#[test]
fn test_cmd_status_missing_db() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    assert!(commands::cmd_status(&path, None).is_ok());
    assert!(!path.exists());
}

// ========== Config Flag Tests ==========

#[test]
fn test_config_flag_is_global() {
    let cli = Cli::try_parse_from(["adopta", "health", "--config", "agent.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some(Path::new("agent.toml")));
    assert!(matches!(cli.command, Commands::Health));

    let cli = Cli::try_parse_from(["adopta", "status"]).unwrap();
    assert!(cli.config.is_none());
}

#[test]
fn test_load_agent_config_honors_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.toml");
    std::fs::write(&path, "[chat]\nmax_message_chars = 42\n").unwrap();

    let config = commands::load_agent_config(Some(&path));
    assert_eq!(config.max_message_chars, 42);

    std::fs::write(&path, "[chat\nmax_message_chars = ").unwrap();
    let config = commands::load_agent_config(Some(&path));
    assert_eq!(config.max_message_chars, 1000);
}

// ========== Agent Command Tests ==========

#[tokio::test]
async fn test_agent_commands_on_empty_db() {
    let db = setup_test_db();
    let engine = InsightEngine::default();

    assert!(commands::cmd_health(&db, &engine).await.is_ok());
    assert!(commands::cmd_recommendations(&db, &engine).await.is_ok());
    assert!(commands::cmd_anomalies(&db, &engine).await.is_ok());
}

#[tokio::test]
async fn test_agent_commands_on_seeded_db() {
    let db = setup_test_db();
    commands::cmd_seed(&db, true).unwrap();
    let engine = InsightEngine::default();

    assert!(commands::cmd_health(&db, &engine).await.is_ok());
    assert!(commands::cmd_recommendations(&db, &engine).await.is_ok());
    assert!(commands::cmd_anomalies(&db, &engine).await.is_ok());
    assert!(
        commands::cmd_chat(&db, &engine, "¿Cómo van las adopciones?", None, 1000)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_cmd_chat_rejects_empty_message() {
    let db = setup_test_db();
    let engine = InsightEngine::default();

    let result = commands::cmd_chat(&db, &engine, "   ", None, 1000).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_chat_counts_characters() {
    let db = setup_test_db();
    let engine = InsightEngine::default();

    let at_limit = "ñ".repeat(10);
    assert!(commands::cmd_chat(&db, &engine, &at_limit, None, 10)
        .await
        .is_ok());

    let over_limit = "ñ".repeat(11);
    let err = commands::cmd_chat(&db, &engine, &over_limit, None, 10)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at most 10"));
}

// ========== Request Cache Tests ==========

#[test]
fn test_cache_key_format() {
    assert_eq!(
        RequestCache::key("/ai-agent/system-health", &json!({})),
        "/ai-agent/system-health_{}"
    );
    assert_eq!(
        RequestCache::key("/audit", &json!({"limit": 5})),
        "/audit_{\"limit\":5}"
    );
}

#[test]
fn test_cache_hit_within_ttl() {
    let mut cache = RequestCache::default();
    let start = Instant::now();
    cache.insert_at("k".to_string(), json!({"ok": true}), start);

    let later = start + CACHE_TTL - Duration::from_secs(1);
    assert_eq!(cache.get_at("k", later), Some(json!({"ok": true})));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_expires_and_evicts() {
    let mut cache = RequestCache::new(Duration::from_secs(60));
    let start = Instant::now();
    cache.insert_at("k".to_string(), json!(1), start);

    assert_eq!(cache.get_at("k", start + Duration::from_secs(60)), None);
    assert!(cache.is_empty());
}

#[test]
fn test_cache_miss_and_clear() {
    let mut cache = RequestCache::default();
    assert_eq!(cache.get("missing"), None);

    cache.insert("a".to_string(), json!(1));
    cache.insert("b".to_string(), json!(2));
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

// ========== API Client Tests ==========

#[tokio::test]
async fn test_client_caches_get_requests() {
    let db = setup_test_db();
    commands::cmd_seed(&db, false).unwrap();
    let url = spawn_api(db.clone(), false).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    let first = client.system_health().await.unwrap();
    let second = client.system_health().await.unwrap();

    assert_eq!(first.system_data.pets.total, 5);
    assert_eq!(first.analysis, second.analysis);
    assert_eq!(client.cache().len(), 1);
    // Second call never reached the server
    assert_eq!(audit_count(&db, "system_health"), 1);
}

#[tokio::test]
async fn test_client_chat_is_not_cached() {
    let db = setup_test_db();
    let url = spawn_api(db.clone(), false).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    let reply = client.chat("hola", None).await.unwrap();
    client.chat("hola", None).await.unwrap();

    assert_eq!(reply.status, "success");
    assert!(client.cache().is_empty());
    assert_eq!(audit_count(&db, "chat"), 2);
}

#[tokio::test]
async fn test_client_logout_clears_cache() {
    let db = setup_test_db();
    let url = spawn_api(db, false).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    client.detect_anomalies().await.unwrap();
    client.adoption_recommendations().await.unwrap();
    assert_eq!(client.cache().len(), 2);

    client.logout();
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_client_surfaces_server_message() {
    let db = setup_test_db();
    let url = spawn_api(db, false).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    let err = client.chat("", None).await.unwrap_err();
    assert_eq!(err.to_string(), "message is required (HTTP 400)");
}

#[tokio::test]
async fn test_client_auth() {
    let db = setup_test_db();
    let url = spawn_api(db.clone(), true).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    let err = client.system_health().await.unwrap_err();
    assert_eq!(err.to_string(), "Authentication required (HTTP 401)");
    assert!(client.cache().is_empty());

    client.set_token(TEST_KEY);
    client.system_health().await.unwrap();

    let entries = db.list_audit_log(&AuditFilter::default(), 10).unwrap();
    assert_eq!(entries[0].user_email, "api-key");
}

#[tokio::test]
async fn test_complete_analysis() {
    let db = setup_test_db();
    commands::cmd_seed(&db, true).unwrap();
    let url = spawn_api(db, false).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    let analysis = client.complete_analysis().await;
    assert!(analysis.health.is_some());
    assert!(analysis.recommendations.is_some());
    assert!(analysis.anomalies.is_some());

    let summary =
        ExecutiveSummary::build(analysis.health.as_ref(), analysis.anomalies.as_ref());
    assert_eq!(summary.metrics.total_pets, 5);
    assert_eq!(summary.metrics.total_users, 3);
}

#[tokio::test]
async fn test_complete_analysis_unauthorized() {
    let db = setup_test_db();
    let url = spawn_api(db, true).await;

    let mut client = ApiClient::new(&url, None).unwrap();
    let analysis = client.complete_analysis().await;
    assert!(analysis.health.is_none());
    assert!(analysis.recommendations.is_none());
    assert!(analysis.anomalies.is_none());

    let summary =
        ExecutiveSummary::build(analysis.health.as_ref(), analysis.anomalies.as_ref());
    assert_eq!(summary.status, SummaryStatus::Healthy);
    assert!(summary.critical_issues.is_empty());
}

// ========== Remote Command Tests ==========

#[tokio::test]
async fn test_cmd_remote_actions() {
    let db = setup_test_db();
    commands::cmd_seed(&db, true).unwrap();
    let url = spawn_api(db, true).await;

    for action in [
        RemoteAction::Health,
        RemoteAction::Recommendations,
        RemoteAction::Anomalies,
        RemoteAction::Summary,
    ] {
        assert!(commands::cmd_remote(&url, Some(TEST_KEY), action)
            .await
            .is_ok());
    }

    let chat = RemoteAction::Chat {
        message: "¿Qué mascotas hay?".to_string(),
        context: None,
    };
    assert!(commands::cmd_remote(&url, Some(TEST_KEY), chat).await.is_ok());
}

#[tokio::test]
async fn test_cmd_remote_unauthorized() {
    let db = setup_test_db();
    let url = spawn_api(db, true).await;

    let result = commands::cmd_remote(&url, None, RemoteAction::Health).await;
    assert!(result.is_err());
}

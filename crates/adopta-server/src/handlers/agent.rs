//! AI agent handlers
//!
//! Every handler recomputes the snapshot, runs the insight engine and records
//! the call (with the answer's source) in the audit log.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use tracing::debug;

use crate::{get_user_email, AppError, AppState};
use adopta_core::insights::{
    AnomaliesResponse, ChatRequest, ChatResponse, RecommendationsResponse, SystemHealthResponse,
};

const SUCCESS: &str = "success";

/// Audit actions recorded by the agent routes
pub const ACTION_SYSTEM_HEALTH: &str = "system_health";
pub const ACTION_RECOMMENDATIONS: &str = "adoption_recommendations";
pub const ACTION_ANOMALIES: &str = "detect_anomalies";
pub const ACTION_CHAT: &str = "chat";

/// Entity type of every agent audit entry
const AGENT_ENTITY: &str = "ai_agent";

/// GET /api/ai-agent/system-health - Health narrative with the snapshot it was built from
pub async fn system_health(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<SystemHealthResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    let snapshot = state.db.collect_snapshot()?;
    let analysis = state.engine.system_health(&snapshot).await;

    state.db.log_audit(
        &user_email,
        ACTION_SYSTEM_HEALTH,
        Some(AGENT_ENTITY),
        None,
        Some(&format!("source={}", analysis.source)),
    )?;

    Ok(Json(SystemHealthResponse {
        status: SUCCESS.to_string(),
        analysis,
        system_data: snapshot,
        timestamp: Utc::now(),
    }))
}

/// GET /api/ai-agent/adoption-recommendations - Recommendations with the metrics analyzed
pub async fn adoption_recommendations(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    let snapshot = state.db.collect_snapshot()?;
    let metrics = state.db.adoption_metrics()?;
    let recommendations = state
        .engine
        .adoption_recommendations(&snapshot, &metrics)
        .await;

    state.db.log_audit(
        &user_email,
        ACTION_RECOMMENDATIONS,
        Some(AGENT_ENTITY),
        None,
        Some(&format!("source={}", recommendations.source)),
    )?;

    Ok(Json(RecommendationsResponse {
        status: SUCCESS.to_string(),
        recommendations,
        data_analyzed: metrics,
        timestamp: Utc::now(),
    }))
}

/// GET /api/ai-agent/detect-anomalies - Anomaly report with the rows checked
pub async fn detect_anomalies(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AnomaliesResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    let snapshot = state.db.collect_snapshot()?;
    let scan = state.db.anomaly_scan()?;
    let anomalies = state.engine.detect_anomalies(&snapshot, &scan).await;

    let flag_count = anomalies.flags.as_ref().map_or(0, Vec::len);
    state.db.log_audit(
        &user_email,
        ACTION_ANOMALIES,
        Some(AGENT_ENTITY),
        None,
        Some(&format!(
            "source={}, flags={}",
            anomalies.source, flag_count
        )),
    )?;

    Ok(Json(AnomaliesResponse {
        status: SUCCESS.to_string(),
        anomalies,
        data_checked: scan,
        timestamp: Utc::now(),
    }))
}

/// POST /api/ai-agent/chat - Answer an administrator's question
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let user_email = get_user_email(&headers);

    let Json(body) = payload.map_err(|e| {
        debug!(error = %e, "Rejected chat body");
        AppError::bad_request("Request body must be JSON with a 'message' field")
    })?;
    validate_message(&body.message, state.max_message_chars)?;

    let snapshot = state.db.collect_snapshot()?;
    let reply = state
        .engine
        .chat(&body.message, body.context.as_deref(), &snapshot)
        .await;

    state.db.log_audit(
        &user_email,
        ACTION_CHAT,
        Some(AGENT_ENTITY),
        None,
        Some(&format!(
            "source={}, chars={}",
            reply.source,
            body.message.chars().count()
        )),
    )?;

    Ok(Json(ChatResponse {
        status: SUCCESS.to_string(),
        response: reply,
        timestamp: Utc::now(),
    }))
}

fn validate_message(message: &str, max_chars: usize) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::bad_request("message is required"));
    }
    if message.chars().count() > max_chars {
        return Err(AppError::bad_request(&format!(
            "message must be at most {} characters",
            max_chars
        )));
    }
    Ok(())
}

//! Audit trail handlers
//!
//! The agent routes record one entry per call with the answer's source
//! (`source=external` or `source=simulated`); this listing narrows that trail
//! by action and source.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::agent::{ACTION_ANOMALIES, ACTION_CHAT, ACTION_RECOMMENDATIONS, ACTION_SYSTEM_HEALTH};
use crate::{get_user_email, AppError, AppState, MAX_PAGE_LIMIT};
use adopta_core::{AnalysisSource, AuditEntry, AuditFilter};

/// Action recorded when the audit trail itself is listed
pub const ACTION_LIST: &str = "list";

const KNOWN_ACTIONS: [&str; 5] = [
    ACTION_SYSTEM_HEALTH,
    ACTION_RECOMMENDATIONS,
    ACTION_ANOMALIES,
    ACTION_CHAT,
    ACTION_LIST,
];

/// Query parameters for the audit trail
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
    pub action: Option<String>,
    /// `external` or `simulated`
    pub source: Option<AnalysisSource>,
}

fn default_audit_limit() -> i64 {
    100
}

/// GET /api/audit - List audit entries, optionally by `action` and `source`
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AuditQuery>, QueryRejection>,
    request: Request,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let user_email = get_user_email(request.headers());

    let Query(params) = query.map_err(|e| {
        debug!(error = %e, "Rejected audit query");
        AppError::bad_request("Invalid query: source must be 'external' or 'simulated'")
    })?;
    if let Some(action) = params.action.as_deref() {
        if !KNOWN_ACTIONS.contains(&action) {
            return Err(AppError::bad_request(&format!(
                "Unknown action '{}', expected one of: {}",
                action,
                KNOWN_ACTIONS.join(", ")
            )));
        }
    }

    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let filter = AuditFilter {
        action: params.action,
        source: params.source,
    };
    let entries = state.db.list_audit_log(&filter, limit)?;

    let mut details = format!("limit={}", limit);
    if let Some(action) = &filter.action {
        details.push_str(&format!(", action={}", action));
    }
    if let Some(source) = filter.source {
        details.push_str(&format!(", source_filter={}", source));
    }
    state.db.log_audit(
        &user_email,
        ACTION_LIST,
        Some("audit_log"),
        None,
        Some(&details),
    )?;

    Ok(Json(entries))
}

//! Admin endpoints for the request log and metrics (comms team only).

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::User;
use crate::observability::{MetricsSnapshot, RequestLog};
use crate::AppState;

fn require_comms_team(user: &User) -> Result<(), AppError> {
    if user.is_comms_team {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Comms team access required".to_string(),
        ))
    }
}

/// Query parameters for the request log.
#[derive(Debug, Deserialize)]
pub struct LogParams {
    pub limit: Option<usize>,
    pub level: Option<String>,
    pub path: Option<String>,
}

/// GET /api/admin/logs - Recent request logs, newest first.
pub async fn get_request_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<LogParams>,
) -> Result<Json<Vec<RequestLog>>, AppError> {
    require_comms_team(&user)?;

    let limit = params.limit.unwrap_or(100).min(1000);
    let logs = state
        .request_log
        .get_logs(limit, params.level.as_deref(), params.path.as_deref());
    Ok(Json(logs))
}

/// GET /api/admin/metrics - Minute-window request metrics.
pub async fn get_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MetricsSnapshot>, AppError> {
    require_comms_team(&user)?;
    Ok(Json(state.request_log.get_metrics()))
}

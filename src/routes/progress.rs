use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth;
use crate::db::interactions;
use crate::response::AppError;
use crate::services::progress::{module_progress, zero_progress, ModuleProgress};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgressResponse {
    success: bool,
    attempts: i64,
    correct: i64,
    accuracy: f64,
    completed_activities: usize,
    total_activities: usize,
    overall_percent: f64,
}

pub async fn overall(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Json<OverallProgressResponse>, AppError> {
    let user_id = auth::optional_user_id(&headers)
        .map_err(|_| AppError::unauthorized("invalid token"))?
        .or(query.user_id);

    // store failures degrade to zeros rather than erroring the read
    let (attempts, correct) = match user_id.as_deref() {
        Some(user_id) => match interactions::accuracy_totals(state.db(), Some(user_id)).await {
            Ok(totals) => totals,
            Err(err) => {
                warn!(error = %err, "accuracy totals unavailable, serving zeros");
                (0, 0)
            }
        },
        None => (0, 0),
    };

    let modules = match module_progress(state.db(), state.catalog(), user_id.as_deref()).await {
        Ok(modules) => modules,
        Err(err) => {
            warn!(error = %err, "module progress unavailable, serving zeros");
            zero_progress(state.catalog())
        }
    };
    let completed: usize = modules.iter().map(|m| m.completed).sum();
    let total: usize = modules.iter().map(|m| m.total).sum();

    Ok(Json(OverallProgressResponse {
        success: true,
        attempts,
        correct,
        accuracy: if attempts > 0 {
            (correct as f64 / attempts as f64 * 1000.0).round() / 1000.0
        } else {
            0.0
        },
        completed_activities: completed,
        total_activities: total,
        overall_percent: percent(completed, total),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulesResponse {
    success: bool,
    modules: Vec<ModuleProgress>,
}

pub async fn modules(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Json<ModulesResponse>, AppError> {
    let user_id = auth::optional_user_id(&headers)
        .map_err(|_| AppError::unauthorized("invalid token"))?
        .or(query.user_id);

    let modules = match module_progress(state.db(), state.catalog(), user_id.as_deref()).await {
        Ok(modules) => modules,
        Err(err) => {
            warn!(error = %err, "module progress unavailable, serving zeros");
            zero_progress(state.catalog())
        }
    };
    Ok(Json(ModulesResponse {
        success: true,
        modules,
    }))
}

fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = (completed as f64 / total as f64 * 100.0).min(100.0);
    (raw * 10.0).round() / 10.0
}

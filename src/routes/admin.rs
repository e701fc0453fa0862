use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::interactions::DailyAccuracy;
use crate::db::model_logs::{self, MlPredictionLog, NlpAnalysisLog};
use crate::db::{interactions, Database};
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: i64 = 50;
const MAX_LOG_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    user_id: Option<String>,
    limit: Option<i64>,
}

impl LogQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MlLogsResponse {
    success: bool,
    logs: Vec<MlPredictionLog>,
}

pub async fn ml_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Json<MlLogsResponse> {
    let logs =
        model_logs::list_ml_predictions(state.db(), query.user_id.as_deref(), query.limit())
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "ml prediction logs unavailable");
                Vec::new()
            });
    Json(MlLogsResponse {
        success: true,
        logs,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpLogsResponse {
    success: bool,
    logs: Vec<NlpAnalysisLog>,
}

pub async fn nlp_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Json<NlpLogsResponse> {
    let logs =
        model_logs::list_nlp_analyses(state.db(), query.user_id.as_deref(), query.limit())
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "nlp analysis logs unavailable");
                Vec::new()
            });
    Json(NlpLogsResponse {
        success: true,
        logs,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQuery {
    user_id: Option<String>,
    days: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    day: String,
    total: i64,
    correct: i64,
    accuracy: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsResponse {
    success: bool,
    days: i64,
    trends: Vec<TrendPoint>,
}

pub async fn accuracy_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Json<TrendsResponse> {
    let days = query.days.unwrap_or(7).clamp(1, 365);
    let trends = daily_trends(state.db(), query.user_id.as_deref(), days)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "accuracy trends unavailable");
            Vec::new()
        });
    Json(TrendsResponse {
        success: true,
        days,
        trends,
    })
}

async fn daily_trends(
    db: &Database,
    user_id: Option<&str>,
    days: i64,
) -> Result<Vec<TrendPoint>, sqlx::Error> {
    let cutoff = (Utc::now() - Duration::days(days))
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let rows = interactions::daily_accuracy(db, user_id, &cutoff).await?;
    Ok(rows.into_iter().map(trend_point).collect())
}

fn trend_point(row: DailyAccuracy) -> TrendPoint {
    let accuracy = if row.total > 0 {
        (row.correct as f64 / row.total as f64 * 1000.0).round() / 1000.0
    } else {
        0.0
    };
    TrendPoint {
        day: row.day,
        total: row.total,
        correct: row.correct,
        accuracy,
    }
}

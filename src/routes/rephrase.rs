use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth;
use crate::db::model_logs;
use crate::response::AppError;
use crate::services::rephrase::RephraseContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RephraseRequest {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    neuro_flags: Vec<String>,
    #[serde(default)]
    confusion_detected: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RephraseResponse {
    success: bool,
    original: String,
    simplified: String,
    provider: &'static str,
    used_fallback: bool,
}

pub async fn rephrase(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RephraseRequest>,
) -> Result<Json<RephraseResponse>, AppError> {
    let user_id = auth::optional_user_id(&headers)
        .map_err(|_| AppError::unauthorized("invalid token"))?;

    if body.question.trim().is_empty() {
        return Err(AppError::validation("question must not be empty"));
    }

    let ctx = RephraseContext {
        question: body.question.clone(),
        options: body.options,
        neuro_flags: body.neuro_flags.clone(),
        confusion_detected: body.confusion_detected,
    };
    let outcome = state.rephrase().rephrase(&ctx).await;

    if let Err(err) = model_logs::log_rephrase_request(
        state.db(),
        user_id.as_deref(),
        &body.question,
        &outcome.simplified,
        body.neuro_flags.first().map(String::as_str),
    )
    .await
    {
        warn!(error = %err, "failed to log rephrase request");
    }

    Ok(Json(RephraseResponse {
        success: true,
        original: body.question,
        simplified: outcome.simplified,
        provider: outcome.provider,
        used_fallback: outcome.used_fallback,
    }))
}

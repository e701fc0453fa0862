use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth;
use crate::catalog::sequencer;
use crate::catalog::ActivityItem;
use crate::db::{interactions, model_logs};
use crate::response::AppError;
use crate::services::features::{build_features, FeatureVector, HISTORY_WINDOW};
use crate::services::recommend::{choose_activity, Recommendation};
use crate::services::sentiment::SentimentResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuery {
    module_id: String,
    last_activity_id: Option<String>,
    last_lesson_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextResponse {
    success: bool,
    activity: Option<ActivityItem>,
    /// True once the learner has walked past the module's last activity.
    /// An unknown module also yields no activity but is not "done".
    module_complete: bool,
}

/// Deterministic sequence walk. End of module is a normal terminal state,
/// reported with a null activity rather than an error.
pub async fn next(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
) -> Result<Json<NextResponse>, AppError> {
    let catalog = state.catalog();
    let activity = sequencer::next_in_sequence(
        catalog,
        &query.module_id,
        query.last_activity_id.as_deref(),
        query.last_lesson_id.as_deref(),
    );

    let known_module = catalog.module_total(&query.module_id) > 0;
    Ok(Json(NextResponse {
        success: true,
        module_complete: known_module && activity.is_none(),
        activity: activity.cloned(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedResponse {
    success: bool,
    activity: Option<ActivityItem>,
    recommendation: Recommendation,
    features: FeatureVector,
}

/// Adaptive pick: features over the recent interaction window feed the
/// recommendation strategy, then the catalog is searched for a matching
/// activity.
pub async fn recommended(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Json<RecommendedResponse>, AppError> {
    // token identity wins over the query param
    let user_id = auth::optional_user_id(&headers)
        .map_err(|_| AppError::unauthorized("invalid token"))?
        .or(query.user_id);
    let db = state.db();

    // an unreadable store means an empty history, not a failed serve
    let history = interactions::recent(db, user_id.as_deref(), HISTORY_WINDOW)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "interaction history unavailable");
            Vec::new()
        });
    let features = build_features(&history);
    let recommendation = state.recommender().recommend(&features);

    let count = interactions::count(db, user_id.as_deref()).await.unwrap_or_else(|err| {
        warn!(error = %err, "interaction count unavailable");
        0
    });
    let activity = choose_activity(state.catalog(), &recommendation, count);

    if let Err(err) =
        model_logs::log_ml_prediction(db, user_id.as_deref(), &features, &recommendation).await
    {
        warn!(error = %err, "failed to log prediction");
    }

    Ok(Json(RecommendedResponse {
        success: true,
        activity: activity.cloned(),
        recommendation,
        features,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    activity_id: String,
    answer: String,
    /// Client-side verdict for activity types the catalog cannot grade
    /// (sequencing, multi-step). Ignored when options carry the answer.
    is_correct: Option<bool>,
    time_taken_seconds: Option<f64>,
    difficulty_rating: Option<i64>,
    focus_rating: Option<i64>,
    feedback_text: Option<String>,
    attention_score: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    success: bool,
    interaction_id: String,
    is_correct: bool,
    sentiment_score: Option<f64>,
    confusion_detected: bool,
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let user_id = auth::optional_user_id(&headers)
        .map_err(|_| AppError::unauthorized("invalid token"))?;

    let item = state
        .catalog()
        .by_id(&body.activity_id)
        .ok_or_else(|| AppError::not_found("unknown activity"))?;

    let is_correct = grade(item, &body.answer).or(body.is_correct).unwrap_or(false);

    let mut sentiment: Option<SentimentResult> = None;
    if let Some(text) = body.feedback_text.as_deref().filter(|t| !t.trim().is_empty()) {
        let result = state.sentiment().analyze(text).await;
        if let Err(err) = model_logs::log_nlp_analysis(
            state.db(),
            user_id.as_deref(),
            text,
            result.score,
            result.confusion,
        )
        .await
        {
            warn!(error = %err, "failed to log sentiment analysis");
        }
        sentiment = Some(result);
    }

    let record = interactions::NewInteraction {
        user_id: user_id.clone(),
        activity_id: body.activity_id.clone(),
        answer: body.answer.clone(),
        is_correct,
        time_taken: body.time_taken_seconds.unwrap_or(0.0).max(0.0),
        difficulty_rating: body.difficulty_rating,
        focus_rating: body.focus_rating,
        feedback_text: body.feedback_text.clone(),
        sentiment_score: sentiment.map(|s| s.score),
        confusion_flag: sentiment.map(|s| s.confusion),
        attention_score: body.attention_score,
    };
    let interaction_id = interactions::insert(state.db(), &record).await?;

    Ok(Json(SubmitResponse {
        success: true,
        interaction_id,
        is_correct,
        sentiment_score: sentiment.map(|s| s.score),
        confusion_detected: sentiment.map(|s| s.confusion).unwrap_or(false),
    }))
}

/// Grades against the catalog when the item has graded options; `None`
/// means the item type is graded client-side.
fn grade(item: &ActivityItem, answer: &str) -> Option<bool> {
    if item.options.is_empty() {
        return None;
    }
    let answer = answer.trim().to_lowercase();
    Some(item.options.iter().any(|opt| {
        opt.is_correct
            && (opt.id.to_lowercase() == answer || opt.label.trim().to_lowercase() == answer)
    }))
}

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::{interactions, model_logs};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    user_id: Option<String>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RatingDistribution {
    easy: i64,
    medium: i64,
    hard: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentDistribution {
    positive: i64,
    neutral: i64,
    negative: i64,
    confusion_detections: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    predictions: i64,
    sentiment_analyses: i64,
    rephrase_requests: i64,
    rephrase_simplified: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnalyticsResponse {
    success: bool,
    total_interactions: i64,
    correct: i64,
    incorrect: i64,
    accuracy: f64,
    difficulty_ratings: RatingDistribution,
    sentiment: SentimentDistribution,
    usage: ModelUsage,
}

/// Aggregate view of how the adaptive models are behaving, for the admin
/// dashboard. Scoped to one user when `userId` is given. Every aggregate
/// degrades to its empty default if the store cannot be read.
pub async fn models(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<ModelAnalyticsResponse> {
    let db = state.db();
    let user_id = query.user_id.as_deref();

    let (total, correct) = interactions::accuracy_totals(db, user_id)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "accuracy totals unavailable");
            (0, 0)
        });

    // rating scale is 1..=5: 1-2 easy, 3-4 medium, 5 hard
    let mut ratings = RatingDistribution::default();
    let rating_counts = interactions::rating_counts(db, user_id)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "rating counts unavailable");
            Vec::new()
        });
    for (rating, count) in rating_counts {
        if rating <= 2 {
            ratings.easy += count;
        } else if rating <= 4 {
            ratings.medium += count;
        } else {
            ratings.hard += count;
        }
    }

    let sentiment = model_logs::sentiment_totals(db, user_id)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "sentiment totals unavailable");
            Default::default()
        });
    let usage = model_logs::usage_totals(db, user_id)
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "usage totals unavailable");
            Default::default()
        });

    Json(ModelAnalyticsResponse {
        success: true,
        total_interactions: total,
        correct,
        incorrect: total - correct,
        accuracy: if total > 0 {
            (correct as f64 / total as f64 * 1000.0).round() / 1000.0
        } else {
            0.0
        },
        difficulty_ratings: ratings,
        sentiment: SentimentDistribution {
            positive: sentiment.positive,
            neutral: sentiment.neutral,
            negative: sentiment.negative,
            confusion_detections: sentiment.confusions,
        },
        usage: ModelUsage {
            predictions: usage.predictions,
            sentiment_analyses: usage.sentiment_analyses,
            rephrase_requests: usage.rephrase_requests,
            rephrase_simplified: usage.rephrase_simplified,
        },
    })
}

//! Append-only logs of model activity: recommendations served, sentiment
//! analyses run, rephrase calls made. Read back by the admin endpoints.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::services::features::FeatureVector;
use crate::services::recommend::Recommendation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MlPredictionLog {
    pub id: String,
    pub user_id: Option<String>,
    pub features: serde_json::Value,
    pub prediction: serde_json::Value,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpAnalysisLog {
    pub id: String,
    pub user_id: Option<String>,
    pub text: String,
    pub sentiment_score: f64,
    pub confusion_flag: bool,
    pub created_at: String,
}

pub async fn log_ml_prediction(
    db: &Database,
    user_id: Option<&str>,
    features: &FeatureVector,
    prediction: &Recommendation,
) -> Result<(), sqlx::Error> {
    let features_json = serde_json::to_string(features).unwrap_or_else(|_| "{}".to_string());
    let prediction_json = serde_json::to_string(prediction).unwrap_or_else(|_| "{}".to_string());

    sqlx::query(
        r#"
        INSERT INTO "ml_predictions" ("id", "user_id", "features", "prediction", "created_at")
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&features_json)
    .bind(&prediction_json)
    .bind(now())
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn log_nlp_analysis(
    db: &Database,
    user_id: Option<&str>,
    text: &str,
    sentiment_score: f64,
    confusion_flag: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "nlp_analyses"
            ("id", "user_id", "text", "sentiment_score", "confusion_flag", "created_at")
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(text)
    .bind(sentiment_score)
    .bind(confusion_flag)
    .bind(now())
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn log_rephrase_request(
    db: &Database,
    user_id: Option<&str>,
    original: &str,
    simplified: &str,
    neurotype: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "rephrase_requests"
            ("id", "user_id", "original_question", "simplified_question",
             "neurotype", "was_simplified", "created_at")
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(original)
    .bind(simplified)
    .bind(neurotype)
    .bind(original != simplified)
    .bind(now())
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn list_ml_predictions(
    db: &Database,
    user_id: Option<&str>,
    limit: i64,
) -> Result<Vec<MlPredictionLog>, sqlx::Error> {
    let rows = match user_id {
        Some(user_id) => {
            sqlx::query(
                r#"
                SELECT * FROM "ml_predictions"
                WHERE "user_id" = ?
                ORDER BY "created_at" DESC
                LIMIT ?
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(db.pool())
            .await?
        }
        None => {
            sqlx::query(
                r#"SELECT * FROM "ml_predictions" ORDER BY "created_at" DESC LIMIT ?"#,
            )
            .bind(limit)
            .fetch_all(db.pool())
            .await?
        }
    };

    Ok(rows
        .iter()
        .map(|row| MlPredictionLog {
            id: row.get("id"),
            user_id: row.get("user_id"),
            features: parse_json(row.get("features")),
            prediction: parse_json(row.get("prediction")),
            created_at: row.get("created_at"),
        })
        .collect())
}

pub async fn list_nlp_analyses(
    db: &Database,
    user_id: Option<&str>,
    limit: i64,
) -> Result<Vec<NlpAnalysisLog>, sqlx::Error> {
    let rows = match user_id {
        Some(user_id) => {
            sqlx::query(
                r#"
                SELECT * FROM "nlp_analyses"
                WHERE "user_id" = ?
                ORDER BY "created_at" DESC
                LIMIT ?
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(db.pool())
            .await?
        }
        None => {
            sqlx::query(r#"SELECT * FROM "nlp_analyses" ORDER BY "created_at" DESC LIMIT ?"#)
                .bind(limit)
                .fetch_all(db.pool())
                .await?
        }
    };

    Ok(rows
        .iter()
        .map(|row| NlpAnalysisLog {
            id: row.get("id"),
            user_id: row.get("user_id"),
            text: row.get("text"),
            sentiment_score: row.get("sentiment_score"),
            confusion_flag: row.get::<i64, _>("confusion_flag") != 0,
            created_at: row.get("created_at"),
        })
        .collect())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentTotals {
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    pub confusions: i64,
}

/// Bucketed sentiment counts over logged analyses. >0.3 positive, <-0.3
/// negative, the band between neutral.
pub async fn sentiment_totals(
    db: &Database,
    user_id: Option<&str>,
) -> Result<SentimentTotals, sqlx::Error> {
    let sql = r#"
        SELECT
            COALESCE(SUM(CASE WHEN "sentiment_score" > 0.3 THEN 1 ELSE 0 END), 0) AS "positive",
            COALESCE(SUM(CASE WHEN "sentiment_score" < -0.3 THEN 1 ELSE 0 END), 0) AS "negative",
            COALESCE(SUM(CASE WHEN "sentiment_score" BETWEEN -0.3 AND 0.3 THEN 1 ELSE 0 END), 0)
                AS "neutral",
            COALESCE(SUM("confusion_flag"), 0) AS "confusions"
        FROM "nlp_analyses"
    "#;

    let row = match user_id {
        Some(user_id) => {
            sqlx::query(&format!(r#"{sql} WHERE "user_id" = ?"#))
                .bind(user_id)
                .fetch_one(db.pool())
                .await?
        }
        None => sqlx::query(sql).fetch_one(db.pool()).await?,
    };

    Ok(SentimentTotals {
        positive: row.get("positive"),
        neutral: row.get("neutral"),
        negative: row.get("negative"),
        confusions: row.get("confusions"),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UsageTotals {
    pub predictions: i64,
    pub sentiment_analyses: i64,
    pub rephrase_requests: i64,
    pub rephrase_simplified: i64,
}

/// How often each model surface has been exercised.
pub async fn usage_totals(
    db: &Database,
    user_id: Option<&str>,
) -> Result<UsageTotals, sqlx::Error> {
    let predictions = count_table(db, "ml_predictions", user_id).await?;
    let sentiment_analyses = count_table(db, "nlp_analyses", user_id).await?;

    let sql = r#"
        SELECT COUNT(*) AS "total",
               COALESCE(SUM("was_simplified"), 0) AS "simplified"
        FROM "rephrase_requests"
    "#;
    let row = match user_id {
        Some(user_id) => {
            sqlx::query(&format!(r#"{sql} WHERE "user_id" = ?"#))
                .bind(user_id)
                .fetch_one(db.pool())
                .await?
        }
        None => sqlx::query(sql).fetch_one(db.pool()).await?,
    };

    Ok(UsageTotals {
        predictions,
        sentiment_analyses,
        rephrase_requests: row.get("total"),
        rephrase_simplified: row.get("simplified"),
    })
}

async fn count_table(
    db: &Database,
    table: &str,
    user_id: Option<&str>,
) -> Result<i64, sqlx::Error> {
    match user_id {
        Some(user_id) => {
            sqlx::query_scalar(&format!(
                r#"SELECT COUNT(*) FROM "{table}" WHERE "user_id" = ?"#
            ))
            .bind(user_id)
            .fetch_one(db.pool())
            .await
        }
        None => {
            sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{table}""#))
                .fetch_one(db.pool())
                .await
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_json(raw: String) -> serde_json::Value {
    serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null)
}

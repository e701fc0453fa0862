use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use super::Database;

/// One submitted answer. Append-only: created on submission, read back for
/// aggregation, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub activity_id: String,
    pub answer: String,
    pub is_correct: bool,
    pub time_taken: f64,
    pub difficulty_rating: Option<i64>,
    pub focus_rating: Option<i64>,
    pub feedback_text: Option<String>,
    pub sentiment_score: Option<f64>,
    pub confusion_flag: Option<bool>,
    pub attention_score: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub user_id: Option<String>,
    pub activity_id: String,
    pub answer: String,
    pub is_correct: bool,
    pub time_taken: f64,
    pub difficulty_rating: Option<i64>,
    pub focus_rating: Option<i64>,
    pub feedback_text: Option<String>,
    pub sentiment_score: Option<f64>,
    pub confusion_flag: Option<bool>,
    pub attention_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAccuracy {
    pub day: String,
    pub total: i64,
    pub correct: i64,
}

pub async fn insert(db: &Database, input: &NewInteraction) -> Result<String, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    sqlx::query(
        r#"
        INSERT INTO "interactions"
            ("id", "user_id", "activity_id", "answer", "is_correct", "time_taken",
             "difficulty_rating", "focus_rating", "feedback_text",
             "sentiment_score", "confusion_flag", "attention_score", "created_at")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&input.user_id)
    .bind(&input.activity_id)
    .bind(&input.answer)
    .bind(input.is_correct)
    .bind(input.time_taken)
    .bind(input.difficulty_rating)
    .bind(input.focus_rating)
    .bind(&input.feedback_text)
    .bind(input.sentiment_score)
    .bind(input.confusion_flag)
    .bind(input.attention_score)
    .bind(&created_at)
    .execute(db.pool())
    .await?;

    Ok(id)
}

/// Most recent interactions, newest first. `user_id = None` spans all users,
/// matching anonymous sessions.
pub async fn recent(
    db: &Database,
    user_id: Option<&str>,
    limit: i64,
) -> Result<Vec<InteractionRecord>, sqlx::Error> {
    let rows = match user_id {
        Some(user_id) => {
            sqlx::query(
                r#"
                SELECT * FROM "interactions"
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
                r#"
                SELECT * FROM "interactions"
                ORDER BY "created_at" DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(db.pool())
            .await?
        }
    };

    Ok(rows.iter().map(map_interaction).collect())
}

pub async fn count(db: &Database, user_id: Option<&str>) -> Result<i64, sqlx::Error> {
    let count: i64 = match user_id {
        Some(user_id) => {
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM "interactions" WHERE "user_id" = ?"#)
                .bind(user_id)
                .fetch_one(db.pool())
                .await?
        }
        None => {
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM "interactions""#)
                .fetch_one(db.pool())
                .await?
        }
    };
    Ok(count)
}

/// (attempts, correct) for the overall accuracy summary.
pub async fn accuracy_totals(
    db: &Database,
    user_id: Option<&str>,
) -> Result<(i64, i64), sqlx::Error> {
    let row = match user_id {
        Some(user_id) => {
            sqlx::query(
                r#"
                SELECT COUNT(*) AS "attempts",
                       COALESCE(SUM("is_correct"), 0) AS "correct"
                FROM "interactions"
                WHERE "user_id" = ?
                "#,
            )
            .bind(user_id)
            .fetch_one(db.pool())
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT COUNT(*) AS "attempts",
                       COALESCE(SUM("is_correct"), 0) AS "correct"
                FROM "interactions"
                "#,
            )
            .fetch_one(db.pool())
            .await?
        }
    };
    Ok((row.get("attempts"), row.get("correct")))
}

/// Distinct activity ids the user has answered correctly. Duplicate correct
/// answers to the same activity collapse to one entry.
pub async fn distinct_correct_activity_ids(
    db: &Database,
    user_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT "activity_id" FROM "interactions"
        WHERE "user_id" = ? AND "is_correct" = 1
        "#,
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    Ok(rows.iter().map(|row| row.get("activity_id")).collect())
}

/// (rating, count) pairs for submitted difficulty ratings.
pub async fn rating_counts(
    db: &Database,
    user_id: Option<&str>,
) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    let rows = match user_id {
        Some(user_id) => {
            sqlx::query(
                r#"
                SELECT "difficulty_rating" AS "rating", COUNT(*) AS "count"
                FROM "interactions"
                WHERE "user_id" = ? AND "difficulty_rating" IS NOT NULL
                GROUP BY "difficulty_rating"
                "#,
            )
            .bind(user_id)
            .fetch_all(db.pool())
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT "difficulty_rating" AS "rating", COUNT(*) AS "count"
                FROM "interactions"
                WHERE "difficulty_rating" IS NOT NULL
                GROUP BY "difficulty_rating"
                "#,
            )
            .fetch_all(db.pool())
            .await?
        }
    };

    Ok(rows
        .iter()
        .map(|row| (row.get("rating"), row.get("count")))
        .collect())
}

/// Per-day totals for the accuracy trend chart. Grouping on the date prefix
/// of the RFC 3339 timestamp.
pub async fn daily_accuracy(
    db: &Database,
    user_id: Option<&str>,
    cutoff: &str,
) -> Result<Vec<DailyAccuracy>, sqlx::Error> {
    let rows = match user_id {
        Some(user_id) => {
            sqlx::query(
                r#"
                SELECT substr("created_at", 1, 10) AS "day",
                       COUNT(*) AS "total",
                       COALESCE(SUM("is_correct"), 0) AS "correct"
                FROM "interactions"
                WHERE "user_id" = ? AND "created_at" >= ?
                GROUP BY "day"
                ORDER BY "day" ASC
                "#,
            )
            .bind(user_id)
            .bind(cutoff)
            .fetch_all(db.pool())
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT substr("created_at", 1, 10) AS "day",
                       COUNT(*) AS "total",
                       COALESCE(SUM("is_correct"), 0) AS "correct"
                FROM "interactions"
                WHERE "created_at" >= ?
                GROUP BY "day"
                ORDER BY "day" ASC
                "#,
            )
            .bind(cutoff)
            .fetch_all(db.pool())
            .await?
        }
    };

    Ok(rows
        .iter()
        .map(|row| DailyAccuracy {
            day: row.get("day"),
            total: row.get("total"),
            correct: row.get("correct"),
        })
        .collect())
}

fn map_interaction(row: &sqlx::sqlite::SqliteRow) -> InteractionRecord {
    InteractionRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        activity_id: row.get("activity_id"),
        answer: row.get("answer"),
        is_correct: row.get::<i64, _>("is_correct") != 0,
        time_taken: row.get("time_taken"),
        difficulty_rating: row.get("difficulty_rating"),
        focus_rating: row.get("focus_rating"),
        feedback_text: row.get("feedback_text"),
        sentiment_score: row.get("sentiment_score"),
        confusion_flag: row
            .get::<Option<i64>, _>("confusion_flag")
            .map(|flag| flag != 0),
        attention_score: row.get("attention_score"),
        created_at: row.get("created_at"),
    }
}

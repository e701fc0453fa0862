pub mod interactions;
pub mod model_logs;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "interactions" (
    "id" TEXT PRIMARY KEY,
    "user_id" TEXT,
    "activity_id" TEXT NOT NULL,
    "answer" TEXT NOT NULL,
    "is_correct" INTEGER NOT NULL,
    "time_taken" REAL NOT NULL,
    "difficulty_rating" INTEGER,
    "focus_rating" INTEGER,
    "feedback_text" TEXT,
    "sentiment_score" REAL,
    "confusion_flag" INTEGER,
    "attention_score" REAL,
    "created_at" TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "users" (
    "id" TEXT PRIMARY KEY,
    "name" TEXT NOT NULL,
    "email" TEXT NOT NULL UNIQUE,
    "password_hash" TEXT NOT NULL,
    "neuro_flags" TEXT NOT NULL DEFAULT '[]',
    "created_at" TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "ml_predictions" (
    "id" TEXT PRIMARY KEY,
    "user_id" TEXT,
    "features" TEXT NOT NULL,
    "prediction" TEXT NOT NULL,
    "created_at" TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "nlp_analyses" (
    "id" TEXT PRIMARY KEY,
    "user_id" TEXT,
    "text" TEXT NOT NULL,
    "sentiment_score" REAL NOT NULL,
    "confusion_flag" INTEGER NOT NULL,
    "created_at" TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "rephrase_requests" (
    "id" TEXT PRIMARY KEY,
    "user_id" TEXT,
    "original_question" TEXT NOT NULL,
    "simplified_question" TEXT NOT NULL,
    "neurotype" TEXT,
    "was_simplified" INTEGER NOT NULL,
    "created_at" TEXT NOT NULL
);
"#;

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("invalid database url: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Handle to the append-style store. Every collection is insert-and-read;
/// nothing in the request path updates or deletes rows.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| DbInitError::Config(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    /// In-memory database, used by the test suites.
    pub async fn connect_in_memory() -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbInitError::Config(e.to_string()))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                continue;
            }
            sqlx::query(trimmed).execute(&self.pool).await?;
        }
        Ok(())
    }
}

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

use super::Database;

/// Stored account. The password hash never leaves this module's callers;
/// responses use [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub neuro_flags: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub neuro_flags: Vec<String>,
    pub created_at: String,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            neuro_flags: self.neuro_flags.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

pub async fn insert(
    db: &Database,
    name: &str,
    email: &str,
    password_hash: &str,
    neuro_flags: &[String],
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let flags_json = serde_json::to_string(neuro_flags).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        r#"
        INSERT INTO "users" ("id", "name", "email", "password_hash", "neuro_flags", "created_at")
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(&flags_json)
    .bind(&created_at)
    .execute(db.pool())
    .await?;

    Ok(User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        neuro_flags: neuro_flags.to_vec(),
        created_at,
    })
}

pub async fn find_by_email(db: &Database, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "users" WHERE "email" = ? LIMIT 1"#)
        .bind(email)
        .fetch_optional(db.pool())
        .await?;

    Ok(row.map(|row| map_user(&row)))
}

fn map_user(row: &sqlx::sqlite::SqliteRow) -> User {
    let flags_json: String = row.get("neuro_flags");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        neuro_flags: serde_json::from_str(&flags_json).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}

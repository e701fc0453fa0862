use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::db::users::{self, PublicUser};
use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    neuro_flags: Vec<String>,
    // older clients send a single neuroType string instead of neuroFlags
    neuro_type: Option<String>,
}

impl RegisterRequest {
    fn neuro_flags(&self) -> Vec<String> {
        let mut flags = self.neuro_flags.clone();
        if let Some(neuro_type) = self.neuro_type.as_deref() {
            let neuro_type = neuro_type.trim();
            if !neuro_type.is_empty() && !flags.iter().any(|f| f == neuro_type) {
                flags.push(neuro_type.to_string());
            }
        }
        flags
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct AuthData {
    user: PublicUser,
    token: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    success: bool,
    data: AuthData,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    if !email.contains('@') {
        return Err(AppError::validation("invalid email address"));
    }
    if body.password.len() < 6 {
        return Err(AppError::validation("password must be at least 6 characters"));
    }

    if users::find_by_email(state.db(), &email).await?.is_some() {
        return Err(AppError::conflict("email is already registered"));
    }

    let password_hash = auth::hash_password(&body.password)
        .map_err(|err| AppError::internal(err.to_string()))?;
    let user = users::insert(state.db(), name, &email, &password_hash, &body.neuro_flags())
        .await
        .map_err(|err| match &err {
            // races on the unique email index still surface as a conflict
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict("email is already registered")
            }
            _ => AppError::from(err),
        })?;

    let token = auth::issue_token(&user.id);
    Ok(Json(AuthResponse {
        success: true,
        data: AuthData {
            user: user.public(),
            token,
        },
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    let Some(user) = users::find_by_email(state.db(), &email).await? else {
        return Err(AppError::unauthorized("invalid email or password"));
    };
    if !auth::verify_password(&body.password, &user.password_hash) {
        return Err(AppError::unauthorized("invalid email or password"));
    }

    let token = auth::issue_token(&user.id);
    Ok(Json(AuthResponse {
        success: true,
        data: AuthData {
            user: user.public(),
            token,
        },
    }))
}

//! Session tokens are opaque bearer strings carrying the user id and issue
//! time. They are not signed; per-deployment auth hardening is expected to
//! happen at the gateway in front of this service.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn issue_token(user_id: &str) -> String {
    let nonce: u64 = rand::rng().random();
    let raw = format!("{user_id}:{}:{nonce:016x}", Utc::now().timestamp_millis());
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Recovers the user id from a token issued by [`issue_token`].
pub fn token_user_id(token: &str) -> Result<String, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    let raw = String::from_utf8(bytes).map_err(|_| AuthError::InvalidToken)?;

    let mut parts = raw.rsplitn(3, ':');
    let nonce = parts.next().ok_or(AuthError::InvalidToken)?;
    let timestamp = parts.next().ok_or(AuthError::InvalidToken)?;
    let user_id = parts.next().ok_or(AuthError::InvalidToken)?;

    if user_id.is_empty()
        || nonce.len() != 16
        || timestamp.parse::<i64>().is_err()
    {
        return Err(AuthError::InvalidToken);
    }
    Ok(user_id.to_string())
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|value| value.to_string())
}

/// Optional identity: a missing header is anonymous, a present but bad
/// token is an error.
pub fn optional_user_id(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    match extract_token(headers) {
        None => Ok(None),
        Some(token) => token_user_id(&token).map(Some),
    }
}

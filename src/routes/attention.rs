use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::AppError;
use crate::services::attention::{decode_frame, AttentionResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionRequest {
    /// Webcam frame as a `data:image/...;base64,` URL or bare base64.
    frame: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionResponse {
    success: bool,
    #[serde(flatten)]
    result: AttentionResult,
}

/// Stateless frame scoring. The client attaches the returned score to its
/// next activity submission.
pub async fn score(
    State(state): State<AppState>,
    Json(body): Json<AttentionRequest>,
) -> Result<Json<AttentionResponse>, AppError> {
    let frame = decode_frame(&body.frame).map_err(|err| AppError::validation(err.to_string()))?;
    let result = state.attention().score(&frame);

    Ok(Json(AttentionResponse {
        success: true,
        result,
    }))
}

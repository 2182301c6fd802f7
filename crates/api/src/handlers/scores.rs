//! Handlers for the `/scores` resource.

use axum::extract::State;
use axum::Json;
use tradeoff_core::score_input::ScoreInput;
use tradeoff_db::models::score::Score;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::services::scores;
use crate::state::AppState;

/// PUT /api/v1/scores
///
/// The body is taken as loose JSON so that a missing or mistyped field is
/// reported as a validation error rather than a deserialization rejection.
pub async fn upsert(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<Score>> {
    let input: ScoreInput = serde_json::from_value(body).unwrap_or_default();
    let score = scores::upsert(&state, user.user_id, &input).await?;
    Ok(Json(score))
}

//! Single score writes.

use tradeoff_core::error::CoreError;
use tradeoff_core::score_input::{validate_score_input, ScoreInput};
use tradeoff_core::types::UserId;
use tradeoff_db::models::score::Score;

use crate::error::AppResult;
use crate::services::ownership::{owned_choice, owned_criterion};
use crate::state::AppState;

/// Validate, authorize and upsert one score.
///
/// Validation runs before any store access. The criterion and choice must
/// exist, belong to the same project, and that project must be owned by
/// `user`. The write itself is a single atomic upsert keyed on
/// `(criteria_id, choice_id)`.
pub async fn upsert(state: &AppState, user: UserId, input: &ScoreInput) -> AppResult<Score> {
    let valid = validate_score_input(input)?;

    let criterion = owned_criterion(state, user, valid.criteria_id).await?;
    let choice = owned_choice(state, user, valid.choice_id).await?;
    if criterion.project_id != choice.project_id {
        return Err(CoreError::Validation(format!(
            "Criterion {} and choice {} belong to different projects",
            criterion.id, choice.id
        ))
        .into());
    }

    let score = state
        .call("upsert_score", state.store.upsert_score(user, &valid))
        .await?;

    tracing::info!(
        criteria_id = score.criteria_id,
        choice_id = score.choice_id,
        score = score.score,
        user_id = %user,
        "Score saved"
    );
    Ok(score)
}

//! Validation for single score writes.
//!
//! A score write arrives as loosely-typed JSON. [`validate_score_input`]
//! checks presence first, then range, then integrality, and yields a
//! [`ValidScore`] that the store can persist as-is.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest accepted score (inclusive). Also the value used for seeded scores.
pub const SCORE_MIN: i32 = 0;

/// Highest accepted score (inclusive).
pub const SCORE_MAX: i32 = 5;

/// Message returned when any of the three fields is missing or mistyped.
pub const MISSING_FIELDS_MESSAGE: &str = "criteria_id, choice_id, and score are required";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw body of a score write. Every field is optional so that missing and
/// mistyped values produce a domain validation error instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreInput {
    pub criteria_id: Option<DbId>,
    pub choice_id: Option<DbId>,
    pub score: Option<serde_json::Value>,
}

/// A score write that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidScore {
    pub criteria_id: DbId,
    pub choice_id: DbId,
    pub score: i32,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw score write.
///
/// Ids must be present and positive; `score` must be a JSON number within
/// `[SCORE_MIN, SCORE_MAX]` with no fractional part.
pub fn validate_score_input(input: &ScoreInput) -> Result<ValidScore, CoreError> {
    let criteria_id = input.criteria_id.filter(|id| *id > 0);
    let choice_id = input.choice_id.filter(|id| *id > 0);
    let score = input.score.as_ref().and_then(serde_json::Value::as_f64);

    let (Some(criteria_id), Some(choice_id), Some(score)) = (criteria_id, choice_id, score) else {
        return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    };

    validate_score_range(score)?;

    if score.fract() != 0.0 {
        return Err(CoreError::Validation(format!(
            "score must be a whole number, got {score}"
        )));
    }

    Ok(ValidScore {
        criteria_id,
        choice_id,
        score: score as i32,
    })
}

/// Check that `score` lies within `[SCORE_MIN, SCORE_MAX]`.
pub fn validate_score_range(score: f64) -> Result<(), CoreError> {
    if (f64::from(SCORE_MIN)..=f64::from(SCORE_MAX)).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "score must be within [{SCORE_MIN}, {SCORE_MAX}]"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Score entity model.
//!
//! Scores have no create/update DTOs of their own: writes arrive as a
//! validated [`tradeoff_core::score_input::ValidScore`] or as seeding pairs.

use serde::Serialize;
use sqlx::FromRow;
use tradeoff_core::scoring::ScoreEntry;
use tradeoff_core::types::{DbId, Timestamp, UserId};

/// A score row from the `scores` table. Unique per `(criteria_id, choice_id)`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Score {
    pub id: DbId,
    pub criteria_id: DbId,
    pub choice_id: DbId,
    pub score: i32,
    /// The user who last wrote this score.
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Score> for ScoreEntry {
    fn from(score: &Score) -> Self {
        ScoreEntry {
            criteria_id: score.criteria_id,
            choice_id: score.choice_id,
            score: score.score,
        }
    }
}

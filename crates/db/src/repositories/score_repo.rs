//! Repository for the `scores` table.
//!
//! Every write is keyed on the `(criteria_id, choice_id)` unique constraint,
//! so concurrent writers for the same pair can never produce two rows.

use sqlx::PgPool;
use tradeoff_core::score_input::ValidScore;
use tradeoff_core::seeding::{ScoreSeed, DEFAULT_SCORE};
use tradeoff_core::types::{DbId, UserId};

use crate::models::score::Score;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, criteria_id, choice_id, score, created_by, created_at, updated_at";

/// Provides data access for per-pair scores.
pub struct ScoreRepo;

impl ScoreRepo {
    /// List every score attached to any of `choice_ids`.
    pub async fn list_by_choices(
        pool: &PgPool,
        choice_ids: &[DbId],
    ) -> Result<Vec<Score>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scores WHERE choice_id = ANY($1)
             ORDER BY id"
        );
        sqlx::query_as::<_, Score>(&query)
            .bind(choice_ids)
            .fetch_all(pool)
            .await
    }

    /// Insert or overwrite the score for one pair in a single statement.
    ///
    /// On conflict the value and the `created_by` attribution are replaced
    /// (last write wins).
    pub async fn upsert(
        pool: &PgPool,
        owner: UserId,
        input: &ValidScore,
    ) -> Result<Score, sqlx::Error> {
        let query = format!(
            "INSERT INTO scores (criteria_id, choice_id, score, created_by)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (criteria_id, choice_id) DO UPDATE
             SET score = EXCLUDED.score,
                 created_by = EXCLUDED.created_by,
                 updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Score>(&query)
            .bind(input.criteria_id)
            .bind(input.choice_id)
            .bind(input.score)
            .bind(owner)
            .fetch_one(pool)
            .await
    }

    /// Bulk insert default scores, skipping pairs that already have a row.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_defaults(
        pool: &PgPool,
        owner: UserId,
        seeds: &[ScoreSeed],
    ) -> Result<u64, sqlx::Error> {
        if seeds.is_empty() {
            return Ok(0);
        }

        let criteria_ids: Vec<DbId> = seeds.iter().map(|s| s.criteria_id).collect();
        let choice_ids: Vec<DbId> = seeds.iter().map(|s| s.choice_id).collect();

        let result = sqlx::query(
            "INSERT INTO scores (criteria_id, choice_id, score, created_by)
             SELECT c.criteria_id, c.choice_id, $3, $4
             FROM UNNEST($1::BIGINT[], $2::BIGINT[]) AS c (criteria_id, choice_id)
             ON CONFLICT (criteria_id, choice_id) DO NOTHING",
        )
        .bind(&criteria_ids)
        .bind(&choice_ids)
        .bind(DEFAULT_SCORE)
        .bind(owner)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

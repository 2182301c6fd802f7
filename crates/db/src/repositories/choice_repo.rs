//! Repository for the `choices` table.

use sqlx::PgPool;
use tradeoff_core::types::{DbId, UserId};

use crate::models::choice::{Choice, NewChoice, UpdateChoice};
use crate::store::SortOrder;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, description, disqualified, created_by, created_at, updated_at";

/// Provides CRUD operations for choices.
pub struct ChoiceRepo;

impl ChoiceRepo {
    /// Insert a batch of choices under `project_id` within a transaction.
    ///
    /// `disqualified` defaults to `false` when omitted.
    pub async fn create_many(
        pool: &PgPool,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewChoice],
    ) -> Result<Vec<Choice>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(inputs.len());

        let query = format!(
            "INSERT INTO choices (project_id, description, disqualified, created_by)
             VALUES ($1, $2, COALESCE($3, FALSE), $4)
             RETURNING {COLUMNS}"
        );

        for input in inputs {
            let row = sqlx::query_as::<_, Choice>(&query)
                .bind(project_id)
                .bind(&input.description)
                .bind(input.disqualified)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Find a choice by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Choice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM choices WHERE id = $1");
        sqlx::query_as::<_, Choice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the choices of a set of projects.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
        order: SortOrder,
    ) -> Result<Vec<Choice>, sqlx::Error> {
        let direction = order.sql();
        let query = format!(
            "SELECT {COLUMNS} FROM choices WHERE project_id = ANY($1)
             ORDER BY created_at {direction}, id {direction}"
        );
        sqlx::query_as::<_, Choice>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a choice. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChoice,
    ) -> Result<Option<Choice>, sqlx::Error> {
        let query = format!(
            "UPDATE choices SET
                description = COALESCE($2, description),
                disqualified = COALESCE($3, disqualified),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Choice>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.disqualified)
            .fetch_optional(pool)
            .await
    }

    /// Delete a choice by ID; its scores cascade. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM choices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

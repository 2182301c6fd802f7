//! Repository for the `criteria` table.

use sqlx::PgPool;
use tradeoff_core::types::{DbId, UserId};

use crate::models::criterion::{Criterion, NewCriterion, UpdateCriterion};
use crate::store::SortOrder;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, definition, weight, created_by, created_at, updated_at";

/// Provides CRUD operations for criteria.
pub struct CriterionRepo;

impl CriterionRepo {
    /// Insert a batch of criteria under `project_id` within a transaction.
    ///
    /// Returns the created rows in input order. Either every row is inserted
    /// or none is.
    pub async fn create_many(
        pool: &PgPool,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewCriterion],
    ) -> Result<Vec<Criterion>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(inputs.len());

        let query = format!(
            "INSERT INTO criteria (project_id, definition, weight, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );

        for input in inputs {
            let row = sqlx::query_as::<_, Criterion>(&query)
                .bind(project_id)
                .bind(&input.definition)
                .bind(input.weight)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Find a criterion by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Criterion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria WHERE id = $1");
        sqlx::query_as::<_, Criterion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the criteria of a set of projects.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
        order: SortOrder,
    ) -> Result<Vec<Criterion>, sqlx::Error> {
        let direction = order.sql();
        let query = format!(
            "SELECT {COLUMNS} FROM criteria WHERE project_id = ANY($1)
             ORDER BY created_at {direction}, id {direction}"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a criterion. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCriterion,
    ) -> Result<Option<Criterion>, sqlx::Error> {
        let query = format!(
            "UPDATE criteria SET
                definition = COALESCE($2, definition),
                weight = COALESCE($3, weight),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(id)
            .bind(&input.definition)
            .bind(input.weight)
            .fetch_optional(pool)
            .await
    }

    /// Delete a criterion by ID; its scores cascade. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM criteria WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

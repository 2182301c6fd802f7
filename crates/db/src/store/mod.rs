//! The record store consumed by the API layer.
//!
//! [`DecisionStore`] exposes fetch-many (by typed query), fetch-one,
//! insert-many, update, delete and conflict-keyed upsert over the four
//! collections. Queries are plain values ([`ProjectQuery`],
//! [`ProjectItemQuery`], [`ScoreQuery`]) rather than builders, so a query can
//! be logged, compared and reused without side effects.
//!
//! Two implementations ship with the crate:
//! - [`PgStore`] -- PostgreSQL through the repositories in [`crate::repositories`].
//! - [`MemoryStore`] -- in-process tables, for local runs and tests.

use async_trait::async_trait;
use tradeoff_core::score_input::ValidScore;
use tradeoff_core::seeding::ScoreSeed;
use tradeoff_core::types::{DbId, UserId};

use crate::models::choice::{Choice, NewChoice, UpdateChoice};
use crate::models::criterion::{Criterion, NewCriterion, UpdateCriterion};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::score::Score;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// PostgreSQL SQLSTATEs for foreign key, unique and check violations.
const CONSTRAINT_VIOLATION_CODES: &[&str] = &["23503", "23505", "23514"];

/// Any failure of the underlying persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Constraint violated during {operation}: {detail}")]
    Constraint {
        operation: &'static str,
        detail: String,
    },

    #[error("Store operation {operation} timed out after {elapsed_ms}ms")]
    Timeout {
        operation: &'static str,
        elapsed_ms: u64,
    },
}

impl StoreError {
    /// Wrap a sqlx error with the name of the store operation that raised it.
    ///
    /// Foreign key, unique and check violations become [`StoreError::Constraint`].
    pub fn database(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
        move |source| {
            if let sqlx::Error::Database(db_err) = &source {
                if let Some(code) = db_err.code() {
                    if CONSTRAINT_VIOLATION_CODES.contains(&code.as_ref()) {
                        return StoreError::Constraint {
                            operation,
                            detail: db_err.message().to_string(),
                        };
                    }
                }
            }
            StoreError::Database { operation, source }
        }
    }

    /// Name of the store operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Database { operation, .. }
            | StoreError::Constraint { operation, .. }
            | StoreError::Timeout { operation, .. } => operation,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Ordering by creation time (ties broken by id in the same direction).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

impl SortOrder {
    /// SQL direction keyword.
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::OldestFirst => "ASC",
            SortOrder::NewestFirst => "DESC",
        }
    }
}

/// Projects created by `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub owner: UserId,
    pub order: SortOrder,
}

impl ProjectQuery {
    /// Most recently created first.
    pub fn owned_by(owner: UserId) -> Self {
        Self {
            owner,
            order: SortOrder::NewestFirst,
        }
    }
}

/// Criteria or choices belonging to any of `project_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItemQuery {
    pub project_ids: Vec<DbId>,
    pub order: SortOrder,
}

impl ProjectItemQuery {
    /// Oldest first, i.e. the order the items were added in.
    pub fn in_project(project_id: DbId) -> Self {
        Self::in_projects(vec![project_id])
    }

    /// Items of several projects in one fetch, oldest first.
    pub fn in_projects(project_ids: Vec<DbId>) -> Self {
        Self {
            project_ids,
            order: SortOrder::OldestFirst,
        }
    }
}

/// Scores whose `choice_id` is any of `choice_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreQuery {
    pub choice_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Store interface
// ---------------------------------------------------------------------------

/// Record-level persistence for decision projects.
///
/// Ownership checks are the caller's job; the store only filters by the
/// fields named in each query.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    // Projects

    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Vec<Project>>;
    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>>;
    async fn create_project(&self, owner: UserId, input: &CreateProject) -> StoreResult<Project>;
    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>>;
    /// Removes the project with its criteria, choices and scores.
    async fn delete_project(&self, id: DbId) -> StoreResult<bool>;

    // Criteria

    async fn list_criteria(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Criterion>>;
    async fn find_criterion(&self, id: DbId) -> StoreResult<Option<Criterion>>;
    /// Inserts all of `inputs` or none of them.
    async fn create_criteria(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewCriterion],
    ) -> StoreResult<Vec<Criterion>>;
    async fn update_criterion(
        &self,
        id: DbId,
        input: &UpdateCriterion,
    ) -> StoreResult<Option<Criterion>>;
    /// Removes the criterion and its scores.
    async fn delete_criterion(&self, id: DbId) -> StoreResult<bool>;

    // Choices

    async fn list_choices(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Choice>>;
    async fn find_choice(&self, id: DbId) -> StoreResult<Option<Choice>>;
    /// Inserts all of `inputs` or none of them.
    async fn create_choices(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewChoice],
    ) -> StoreResult<Vec<Choice>>;
    async fn update_choice(&self, id: DbId, input: &UpdateChoice) -> StoreResult<Option<Choice>>;
    /// Removes the choice and its scores.
    async fn delete_choice(&self, id: DbId) -> StoreResult<bool>;

    // Scores

    async fn list_scores(&self, query: &ScoreQuery) -> StoreResult<Vec<Score>>;
    /// Atomic insert-or-overwrite keyed on `(criteria_id, choice_id)`.
    async fn upsert_score(&self, owner: UserId, input: &ValidScore) -> StoreResult<Score>;
    /// Insert zero-valued scores, skipping pairs that already exist. Returns
    /// the number of rows inserted.
    async fn insert_default_scores(&self, owner: UserId, seeds: &[ScoreSeed]) -> StoreResult<u64>;
}

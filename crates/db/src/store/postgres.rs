//! PostgreSQL-backed [`DecisionStore`].

use async_trait::async_trait;
use tradeoff_core::score_input::ValidScore;
use tradeoff_core::seeding::ScoreSeed;
use tradeoff_core::types::{DbId, UserId};

use super::{DecisionStore, ProjectItemQuery, ProjectQuery, ScoreQuery, StoreError, StoreResult};
use crate::models::choice::{Choice, NewChoice, UpdateChoice};
use crate::models::criterion::{Criterion, NewCriterion, UpdateCriterion};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::score::Score;
use crate::repositories::{ChoiceRepo, CriterionRepo, ProjectRepo, ScoreRepo};
use crate::DbPool;

/// Store that delegates every operation to the table repositories.
///
/// Cheap to clone; the pool is reference counted internally.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DecisionStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::database("health_check"))
    }

    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Vec<Project>> {
        ProjectRepo::list_by_owner(&self.pool, query.owner, query.order)
            .await
            .map_err(StoreError::database("list_projects"))
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::database("find_project"))
    }

    async fn create_project(&self, owner: UserId, input: &CreateProject) -> StoreResult<Project> {
        ProjectRepo::create(&self.pool, owner, input)
            .await
            .map_err(StoreError::database("create_project"))
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        ProjectRepo::update(&self.pool, id, input)
            .await
            .map_err(StoreError::database("update_project"))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        ProjectRepo::delete(&self.pool, id)
            .await
            .map_err(StoreError::database("delete_project"))
    }

    async fn list_criteria(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Criterion>> {
        CriterionRepo::list_by_projects(&self.pool, &query.project_ids, query.order)
            .await
            .map_err(StoreError::database("list_criteria"))
    }

    async fn find_criterion(&self, id: DbId) -> StoreResult<Option<Criterion>> {
        CriterionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::database("find_criterion"))
    }

    async fn create_criteria(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewCriterion],
    ) -> StoreResult<Vec<Criterion>> {
        CriterionRepo::create_many(&self.pool, owner, project_id, inputs)
            .await
            .map_err(StoreError::database("create_criteria"))
    }

    async fn update_criterion(
        &self,
        id: DbId,
        input: &UpdateCriterion,
    ) -> StoreResult<Option<Criterion>> {
        CriterionRepo::update(&self.pool, id, input)
            .await
            .map_err(StoreError::database("update_criterion"))
    }

    async fn delete_criterion(&self, id: DbId) -> StoreResult<bool> {
        CriterionRepo::delete(&self.pool, id)
            .await
            .map_err(StoreError::database("delete_criterion"))
    }

    async fn list_choices(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Choice>> {
        ChoiceRepo::list_by_projects(&self.pool, &query.project_ids, query.order)
            .await
            .map_err(StoreError::database("list_choices"))
    }

    async fn find_choice(&self, id: DbId) -> StoreResult<Option<Choice>> {
        ChoiceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::database("find_choice"))
    }

    async fn create_choices(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewChoice],
    ) -> StoreResult<Vec<Choice>> {
        ChoiceRepo::create_many(&self.pool, owner, project_id, inputs)
            .await
            .map_err(StoreError::database("create_choices"))
    }

    async fn update_choice(&self, id: DbId, input: &UpdateChoice) -> StoreResult<Option<Choice>> {
        ChoiceRepo::update(&self.pool, id, input)
            .await
            .map_err(StoreError::database("update_choice"))
    }

    async fn delete_choice(&self, id: DbId) -> StoreResult<bool> {
        ChoiceRepo::delete(&self.pool, id)
            .await
            .map_err(StoreError::database("delete_choice"))
    }

    async fn list_scores(&self, query: &ScoreQuery) -> StoreResult<Vec<Score>> {
        if query.choice_ids.is_empty() {
            return Ok(Vec::new());
        }
        ScoreRepo::list_by_choices(&self.pool, &query.choice_ids)
            .await
            .map_err(StoreError::database("list_scores"))
    }

    async fn upsert_score(&self, owner: UserId, input: &ValidScore) -> StoreResult<Score> {
        ScoreRepo::upsert(&self.pool, owner, input)
            .await
            .map_err(StoreError::database("upsert_score"))
    }

    async fn insert_default_scores(&self, owner: UserId, seeds: &[ScoreSeed]) -> StoreResult<u64> {
        ScoreRepo::insert_defaults(&self.pool, owner, seeds)
            .await
            .map_err(StoreError::database("insert_default_scores"))
    }
}

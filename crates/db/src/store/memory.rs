//! In-process [`DecisionStore`] backed by ordered maps behind a `RwLock`.
//!
//! Mirrors the PostgreSQL schema's guarantees: ids are assigned from
//! per-table sequences, foreign keys are checked on insert, deletes cascade,
//! and `(criteria_id, choice_id)` is unique for scores. Every write holds the
//! write lock for its whole duration, which makes upserts atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tradeoff_core::score_input::ValidScore;
use tradeoff_core::seeding::{ScoreSeed, DEFAULT_SCORE};
use tradeoff_core::types::{DbId, Timestamp, UserId};

use super::{
    DecisionStore, ProjectItemQuery, ProjectQuery, ScoreQuery, SortOrder, StoreError, StoreResult,
};
use crate::models::choice::{Choice, NewChoice, UpdateChoice};
use crate::models::criterion::{Criterion, NewCriterion, UpdateCriterion};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::score::Score;

/// A table keyed by id with its own id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<DbId, T>,
    next_id: DbId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> DbId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Tables {
    projects: Table<Project>,
    criteria: Table<Criterion>,
    choices: Table<Choice>,
    scores: Table<Score>,
}

impl Tables {
    fn remove_scores_where(&mut self, predicate: impl Fn(&Score) -> bool) {
        self.scores.rows.retain(|_, score| !predicate(score));
    }

    fn remove_criterion(&mut self, id: DbId) -> bool {
        let removed = self.criteria.rows.remove(&id).is_some();
        if removed {
            self.remove_scores_where(|s| s.criteria_id == id);
        }
        removed
    }

    fn remove_choice(&mut self, id: DbId) -> bool {
        let removed = self.choices.rows.remove(&id).is_some();
        if removed {
            self.remove_scores_where(|s| s.choice_id == id);
        }
        removed
    }

    fn score_for_pair_mut(&mut self, criteria_id: DbId, choice_id: DbId) -> Option<&mut Score> {
        self.scores
            .rows
            .values_mut()
            .find(|s| s.criteria_id == criteria_id && s.choice_id == choice_id)
    }

    fn insert_score(
        &mut self,
        owner: UserId,
        seed: ScoreSeed,
        score: i32,
        now: Timestamp,
    ) -> Score {
        let row = Score {
            id: self.scores.next_id(),
            criteria_id: seed.criteria_id,
            choice_id: seed.choice_id,
            score,
            created_by: owner,
            created_at: now,
            updated_at: now,
        };
        self.scores.rows.insert(row.id, row.clone());
        row
    }

    fn require_project(&self, operation: &'static str, id: DbId) -> StoreResult<()> {
        if self.projects.rows.contains_key(&id) {
            Ok(())
        } else {
            Err(missing_parent(operation, "project", id))
        }
    }

    fn require_pair(&self, operation: &'static str, seed: ScoreSeed) -> StoreResult<()> {
        if !self.criteria.rows.contains_key(&seed.criteria_id) {
            return Err(missing_parent(operation, "criterion", seed.criteria_id));
        }
        if !self.choices.rows.contains_key(&seed.choice_id) {
            return Err(missing_parent(operation, "choice", seed.choice_id));
        }
        Ok(())
    }
}

fn missing_parent(operation: &'static str, entity: &str, id: DbId) -> StoreError {
    StoreError::Constraint {
        operation,
        detail: format!("{entity} {id} does not exist"),
    }
}

/// Sort rows by `(created_at, id)` in the requested direction.
fn sorted<T: Clone>(
    rows: Vec<&T>,
    order: SortOrder,
    key: impl Fn(&T) -> (Timestamp, DbId),
) -> Vec<T> {
    let mut rows: Vec<T> = rows.into_iter().cloned().collect();
    rows.sort_by_key(&key);
    if order == SortOrder::NewestFirst {
        rows.reverse();
    }
    rows
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DecisionStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_projects(&self, query: &ProjectQuery) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let rows = tables
            .projects
            .rows
            .values()
            .filter(|p| p.created_by == query.owner)
            .collect();
        Ok(sorted(rows, query.order, |p| (p.created_at, p.id)))
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.rows.get(&id).cloned())
    }

    async fn create_project(&self, owner: UserId, input: &CreateProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let project = Project {
            id: tables.projects.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            created_by: owner,
            created_at: now,
            updated_at: now,
        };
        tables.projects.rows.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        let Some(project) = tables.projects.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            project.title = title.clone();
        }
        if let Some(description) = &input.description {
            project.description = Some(description.clone());
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.projects.rows.remove(&id).is_none() {
            return Ok(false);
        }

        let criteria: Vec<DbId> = tables
            .criteria
            .rows
            .values()
            .filter(|c| c.project_id == id)
            .map(|c| c.id)
            .collect();
        let choices: Vec<DbId> = tables
            .choices
            .rows
            .values()
            .filter(|c| c.project_id == id)
            .map(|c| c.id)
            .collect();

        for criterion_id in criteria {
            tables.remove_criterion(criterion_id);
        }
        for choice_id in choices {
            tables.remove_choice(choice_id);
        }
        Ok(true)
    }

    async fn list_criteria(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Criterion>> {
        let tables = self.tables.read().await;
        let rows = tables
            .criteria
            .rows
            .values()
            .filter(|c| query.project_ids.contains(&c.project_id))
            .collect();
        Ok(sorted(rows, query.order, |c| (c.created_at, c.id)))
    }

    async fn find_criterion(&self, id: DbId) -> StoreResult<Option<Criterion>> {
        Ok(self.tables.read().await.criteria.rows.get(&id).cloned())
    }

    async fn create_criteria(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewCriterion],
    ) -> StoreResult<Vec<Criterion>> {
        let mut tables = self.tables.write().await;
        tables.require_project("create_criteria", project_id)?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let criterion = Criterion {
                id: tables.criteria.next_id(),
                project_id,
                definition: input.definition.clone(),
                weight: input.weight,
                created_by: owner,
                created_at: now,
                updated_at: now,
            };
            tables.criteria.rows.insert(criterion.id, criterion.clone());
            created.push(criterion);
        }
        Ok(created)
    }

    async fn update_criterion(
        &self,
        id: DbId,
        input: &UpdateCriterion,
    ) -> StoreResult<Option<Criterion>> {
        let mut tables = self.tables.write().await;
        let Some(criterion) = tables.criteria.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(definition) = &input.definition {
            criterion.definition = definition.clone();
        }
        if input.weight.is_some() {
            criterion.weight = input.weight;
        }
        criterion.updated_at = Utc::now();
        Ok(Some(criterion.clone()))
    }

    async fn delete_criterion(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_criterion(id))
    }

    async fn list_choices(&self, query: &ProjectItemQuery) -> StoreResult<Vec<Choice>> {
        let tables = self.tables.read().await;
        let rows = tables
            .choices
            .rows
            .values()
            .filter(|c| query.project_ids.contains(&c.project_id))
            .collect();
        Ok(sorted(rows, query.order, |c| (c.created_at, c.id)))
    }

    async fn find_choice(&self, id: DbId) -> StoreResult<Option<Choice>> {
        Ok(self.tables.read().await.choices.rows.get(&id).cloned())
    }

    async fn create_choices(
        &self,
        owner: UserId,
        project_id: DbId,
        inputs: &[NewChoice],
    ) -> StoreResult<Vec<Choice>> {
        let mut tables = self.tables.write().await;
        tables.require_project("create_choices", project_id)?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let choice = Choice {
                id: tables.choices.next_id(),
                project_id,
                description: input.description.clone(),
                disqualified: input.disqualified.unwrap_or(false),
                created_by: owner,
                created_at: now,
                updated_at: now,
            };
            tables.choices.rows.insert(choice.id, choice.clone());
            created.push(choice);
        }
        Ok(created)
    }

    async fn update_choice(&self, id: DbId, input: &UpdateChoice) -> StoreResult<Option<Choice>> {
        let mut tables = self.tables.write().await;
        let Some(choice) = tables.choices.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(description) = &input.description {
            choice.description = description.clone();
        }
        if let Some(disqualified) = input.disqualified {
            choice.disqualified = disqualified;
        }
        choice.updated_at = Utc::now();
        Ok(Some(choice.clone()))
    }

    async fn delete_choice(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_choice(id))
    }

    async fn list_scores(&self, query: &ScoreQuery) -> StoreResult<Vec<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .rows
            .values()
            .filter(|s| query.choice_ids.contains(&s.choice_id))
            .cloned()
            .collect())
    }

    async fn upsert_score(&self, owner: UserId, input: &ValidScore) -> StoreResult<Score> {
        let mut tables = self.tables.write().await;
        let seed = ScoreSeed {
            criteria_id: input.criteria_id,
            choice_id: input.choice_id,
        };
        tables.require_pair("upsert_score", seed)?;

        let now = Utc::now();
        if let Some(existing) = tables.score_for_pair_mut(input.criteria_id, input.choice_id) {
            existing.score = input.score;
            existing.created_by = owner;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        Ok(tables.insert_score(owner, seed, input.score, now))
    }

    async fn insert_default_scores(&self, owner: UserId, seeds: &[ScoreSeed]) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        for seed in seeds {
            tables.require_pair("insert_default_scores", *seed)?;
        }

        let now = Utc::now();
        let mut inserted = 0;
        for seed in seeds {
            if tables
                .score_for_pair_mut(seed.criteria_id, seed.choice_id)
                .is_none()
            {
                tables.insert_score(owner, *seed, DEFAULT_SCORE, now);
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    async fn project_with_pair(store: &MemoryStore, owner: UserId) -> (Project, DbId, DbId) {
        let project = store
            .create_project(
                owner,
                &CreateProject {
                    title: "Laptop".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let criteria = store
            .create_criteria(
                owner,
                project.id,
                &[NewCriterion {
                    definition: "Battery".to_string(),
                    weight: Some(3.0),
                }],
            )
            .await
            .unwrap();
        let choices = store
            .create_choices(
                owner,
                project.id,
                &[NewChoice {
                    description: "Model A".to_string(),
                    disqualified: None,
                }],
            )
            .await
            .unwrap();
        (project, criteria[0].id, choices[0].id)
    }

    #[tokio::test]
    async fn second_upsert_overwrites_first() {
        let store = MemoryStore::new();
        let first_user = Uuid::new_v4();
        let second_user = Uuid::new_v4();
        let (_, criteria_id, choice_id) = project_with_pair(&store, first_user).await;

        let first = store
            .upsert_score(
                first_user,
                &ValidScore {
                    criteria_id,
                    choice_id,
                    score: 2,
                },
            )
            .await
            .unwrap();
        let second = store
            .upsert_score(
                second_user,
                &ValidScore {
                    criteria_id,
                    choice_id,
                    score: 5,
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.score, 5);
        assert_eq!(second.created_by, second_user);

        let all = store
            .list_scores(&ScoreQuery {
                choice_ids: vec![choice_id],
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].score, 5);
    }

    #[tokio::test]
    async fn default_scores_skip_existing_pairs() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let (_, criteria_id, choice_id) = project_with_pair(&store, owner).await;
        let seed = ScoreSeed {
            criteria_id,
            choice_id,
        };

        store
            .upsert_score(
                owner,
                &ValidScore {
                    criteria_id,
                    choice_id,
                    score: 4,
                },
            )
            .await
            .unwrap();
        let inserted = store.insert_default_scores(owner, &[seed, seed]).await.unwrap();

        assert_eq!(inserted, 0);
        let all = store
            .list_scores(&ScoreQuery {
                choice_ids: vec![choice_id],
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].score, 4);
    }

    #[tokio::test]
    async fn item_query_spans_several_projects() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let (first, first_criterion, _) = project_with_pair(&store, owner).await;
        let (second, second_criterion, _) = project_with_pair(&store, owner).await;
        let (third, _, _) = project_with_pair(&store, owner).await;

        let criteria = store
            .list_criteria(&ProjectItemQuery::in_projects(vec![first.id, second.id]))
            .await
            .unwrap();
        let ids: Vec<DbId> = criteria.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first_criterion, second_criterion]);
        assert!(criteria.iter().all(|c| c.project_id != third.id));

        let choices = store
            .list_choices(&ProjectItemQuery::in_project(third.id))
            .await
            .unwrap();
        assert_eq!(choices.len(), 1);
    }

    #[tokio::test]
    async fn upsert_for_unknown_choice_violates_constraint() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let (_, criteria_id, _) = project_with_pair(&store, owner).await;

        let err = store
            .upsert_score(
                owner,
                &ValidScore {
                    criteria_id,
                    choice_id: 999,
                    score: 1,
                },
            )
            .await
            .unwrap_err();
        assert_matches!(
            err,
            StoreError::Constraint {
                operation: "upsert_score",
                ..
            }
        );
    }

    #[tokio::test]
    async fn deleting_project_cascades() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let (project, criteria_id, choice_id) = project_with_pair(&store, owner).await;
        store
            .insert_default_scores(
                owner,
                &[ScoreSeed {
                    criteria_id,
                    choice_id,
                }],
            )
            .await
            .unwrap();

        assert!(store.delete_project(project.id).await.unwrap());

        assert!(store.find_criterion(criteria_id).await.unwrap().is_none());
        assert!(store.find_choice(choice_id).await.unwrap().is_none());
        let scores = store
            .list_scores(&ScoreQuery {
                choice_ids: vec![choice_id],
            })
            .await
            .unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn projects_are_filtered_by_owner_newest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        for (user, title) in [(owner, "First"), (other, "Theirs"), (owner, "Second")] {
            store
                .create_project(
                    user,
                    &CreateProject {
                        title: title.to_string(),
                        description: None,
                    },
                )
                .await
                .unwrap();
        }

        let projects = store
            .list_projects(&ProjectQuery::owned_by(owner))
            .await
            .unwrap();
        let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }
}

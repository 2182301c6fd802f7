//! Zero-valued score seeding after criteria or choices are created.
//!
//! Seeding runs on a detached task so it never holds up, or fails, the
//! request that created the rows. Aggregation treats a missing score as 0,
//! so a slow or failed seed only leaves the table sparser for a while.

use tokio::task::JoinHandle;
use tradeoff_core::seeding::{seeds_for_new_choices, seeds_for_new_criteria, ScoreSeed};
use tradeoff_core::types::{DbId, UserId};
use tradeoff_db::store::{ProjectItemQuery, StoreResult};

use crate::state::AppState;

/// What was just created in the project.
#[derive(Debug, Clone)]
pub enum NewItems {
    Choices(Vec<DbId>),
    Criteria(Vec<DbId>),
}

impl NewItems {
    fn ids(&self) -> &[DbId] {
        match self {
            NewItems::Choices(ids) | NewItems::Criteria(ids) => ids,
        }
    }

    fn trigger(&self) -> &'static str {
        match self {
            NewItems::Choices(_) => "choices",
            NewItems::Criteria(_) => "criteria",
        }
    }
}

/// Start seeding default scores for `items` in the background.
///
/// Returns `None` when seeding is disabled or there is nothing to seed.
pub fn spawn(
    state: &AppState,
    user: UserId,
    project_id: DbId,
    items: NewItems,
) -> Option<JoinHandle<()>> {
    if !state.config.seed_default_scores || items.ids().is_empty() {
        return None;
    }

    let state = state.clone();
    Some(tokio::spawn(async move {
        let result = seed(&state, user, project_id, &items).await;
        report(project_id, items.trigger(), result);
    }))
}

/// Pair the new items with every existing counterpart in the project and
/// insert the missing scores.
async fn seed(
    state: &AppState,
    user: UserId,
    project_id: DbId,
    items: &NewItems,
) -> StoreResult<u64> {
    let query = ProjectItemQuery::in_project(project_id);
    let seeds = match items {
        NewItems::Choices(new_ids) => {
            let criteria = state
                .call("list_criteria", state.store.list_criteria(&query))
                .await?;
            let criteria_ids: Vec<DbId> = criteria.iter().map(|c| c.id).collect();
            seeds_for_new_choices(new_ids, &criteria_ids)
        }
        NewItems::Criteria(new_ids) => {
            let choices = state
                .call("list_choices", state.store.list_choices(&query))
                .await?;
            let choice_ids: Vec<DbId> = choices.iter().map(|c| c.id).collect();
            seeds_for_new_criteria(new_ids, &choice_ids)
        }
    };
    insert(state, user, seeds).await
}

async fn insert(state: &AppState, user: UserId, seeds: Vec<ScoreSeed>) -> StoreResult<u64> {
    if seeds.is_empty() {
        return Ok(0);
    }
    state
        .call(
            "insert_default_scores",
            state.store.insert_default_scores(user, &seeds),
        )
        .await
}

fn report(project_id: DbId, trigger: &'static str, result: StoreResult<u64>) {
    match result {
        Ok(inserted) => {
            tracing::debug!(project_id, trigger, inserted, "Seeded default scores");
        }
        Err(err) => {
            tracing::warn!(
                project_id,
                trigger,
                operation = err.operation(),
                error = %err,
                "Default score seeding failed"
            );
        }
    }
}

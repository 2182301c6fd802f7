//! Ownership checks.
//!
//! A project is visible only to the user that created it. Criteria and
//! choices inherit their project's owner. Missing records yield `NotFound`
//! and records owned by someone else yield `Forbidden`.

use tradeoff_core::error::CoreError;
use tradeoff_core::types::{DbId, UserId};
use tradeoff_db::models::choice::Choice;
use tradeoff_db::models::criterion::Criterion;
use tradeoff_db::models::project::Project;

use crate::error::AppResult;
use crate::state::AppState;

/// Fetch a project and check that `user` owns it.
pub async fn owned_project(state: &AppState, user: UserId, id: DbId) -> AppResult<Project> {
    let project = state
        .call("find_project", state.store.find_project(id))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;

    ensure_owner(&project, user)?;
    Ok(project)
}

/// Fetch a criterion and check that `user` owns its project.
pub async fn owned_criterion(state: &AppState, user: UserId, id: DbId) -> AppResult<Criterion> {
    let criterion = state
        .call("find_criterion", state.store.find_criterion(id))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Criterion",
            id,
        })?;

    owned_project(state, user, criterion.project_id).await?;
    Ok(criterion)
}

/// Fetch a choice and check that `user` owns its project.
pub async fn owned_choice(state: &AppState, user: UserId, id: DbId) -> AppResult<Choice> {
    let choice = state
        .call("find_choice", state.store.find_choice(id))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Choice",
            id,
        })?;

    owned_project(state, user, choice.project_id).await?;
    Ok(choice)
}

fn ensure_owner(project: &Project, user: UserId) -> Result<(), CoreError> {
    if project.created_by == user {
        Ok(())
    } else {
        tracing::warn!(
            project_id = project.id,
            user_id = %user,
            "Access to foreign project denied"
        );
        Err(CoreError::Forbidden(format!(
            "Project {} belongs to another user",
            project.id
        )))
    }
}

//! Handlers for the `/criteria` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tradeoff_core::error::CoreError;
use tradeoff_core::types::DbId;
use tradeoff_db::models::criterion::{CreateCriteria, Criterion, UpdateCriterion};
use tradeoff_db::store::ProjectItemQuery;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectIdParams;
use crate::services::ownership::{owned_criterion, owned_project};
use crate::services::seeding::{self, NewItems};
use crate::state::AppState;

/// GET /api/v1/criteria?projectId=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProjectIdParams>,
) -> AppResult<Json<Vec<Criterion>>> {
    let project_id = params.require()?;
    owned_project(&state, user.user_id, project_id).await?;
    let criteria = state
        .call(
            "list_criteria",
            state
                .store
                .list_criteria(&ProjectItemQuery::in_project(project_id)),
        )
        .await?;
    Ok(Json(criteria))
}

/// POST /api/v1/criteria
///
/// Creates all criteria in the body, then starts seeding a zero score for each new
/// criterion against every existing choice.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCriteria>,
) -> AppResult<(StatusCode, Json<Vec<Criterion>>)> {
    input.validate()?;
    if input.criteria.is_empty() {
        return Err(AppError::BadRequest(
            "At least one criterion is required".into(),
        ));
    }
    owned_project(&state, user.user_id, input.project_id).await?;

    let created = state
        .call(
            "create_criteria",
            state
                .store
                .create_criteria(user.user_id, input.project_id, &input.criteria),
        )
        .await?;
    tracing::info!(
        project_id = input.project_id,
        count = created.len(),
        "Criteria created"
    );

    let new_ids = created.iter().map(|item| item.id).collect();
    seeding::spawn(
        &state,
        user.user_id,
        input.project_id,
        NewItems::Criteria(new_ids),
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/criteria/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCriterion>,
) -> AppResult<Json<Criterion>> {
    input.validate()?;
    owned_criterion(&state, user.user_id, id).await?;
    let criterion = state
        .call("update_criterion", state.store.update_criterion(id, &input))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Criterion",
            id,
        }))?;
    Ok(Json(criterion))
}

/// DELETE /api/v1/criteria/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_criterion(&state, user.user_id, id).await?;
    let deleted = state
        .call("delete_criterion", state.store.delete_criterion(id))
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Criterion",
            id,
        }))
    }
}

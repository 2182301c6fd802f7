//! Handlers for the `/choices` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tradeoff_core::error::CoreError;
use tradeoff_core::types::DbId;
use tradeoff_db::models::choice::{Choice, CreateChoices, UpdateChoice};
use tradeoff_db::store::ProjectItemQuery;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectIdParams;
use crate::services::ownership::{owned_choice, owned_project};
use crate::services::seeding::{self, NewItems};
use crate::state::AppState;

/// GET /api/v1/choices?projectId=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProjectIdParams>,
) -> AppResult<Json<Vec<Choice>>> {
    let project_id = params.require()?;
    owned_project(&state, user.user_id, project_id).await?;
    let choices = state
        .call(
            "list_choices",
            state
                .store
                .list_choices(&ProjectItemQuery::in_project(project_id)),
        )
        .await?;
    Ok(Json(choices))
}

/// POST /api/v1/choices
///
/// Creates all choices in the body, then starts seeding a zero score for each new
/// choice against every existing criterion.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChoices>,
) -> AppResult<(StatusCode, Json<Vec<Choice>>)> {
    input.validate()?;
    if input.choices.is_empty() {
        return Err(AppError::BadRequest("At least one choice is required".into()));
    }
    owned_project(&state, user.user_id, input.project_id).await?;

    let created = state
        .call(
            "create_choices",
            state
                .store
                .create_choices(user.user_id, input.project_id, &input.choices),
        )
        .await?;
    tracing::info!(
        project_id = input.project_id,
        count = created.len(),
        "Choices created"
    );

    let new_ids = created.iter().map(|item| item.id).collect();
    seeding::spawn(
        &state,
        user.user_id,
        input.project_id,
        NewItems::Choices(new_ids),
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/choices/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateChoice>,
) -> AppResult<Json<Choice>> {
    input.validate()?;
    owned_choice(&state, user.user_id, id).await?;
    let choice = state
        .call("update_choice", state.store.update_choice(id, &input))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Choice",
            id,
        }))?;
    Ok(Json(choice))
}

/// DELETE /api/v1/choices/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_choice(&state, user.user_id, id).await?;
    let deleted = state
        .call("delete_choice", state.store.delete_choice(id))
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Choice",
            id,
        }))
    }
}

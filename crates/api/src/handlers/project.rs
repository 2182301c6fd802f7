//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tradeoff_core::error::CoreError;
use tradeoff_core::types::DbId;
use tradeoff_db::models::project::{CreateProject, Project, UpdateProject};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::assembly::{self, ProjectDetail, ProjectRanking};
use crate::services::ownership::owned_project;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = state
        .call(
            "create_project",
            state.store.create_project(user.user_id, &input),
        )
        .await?;
    tracing::info!(project_id = project.id, user_id = %user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
///
/// Every project owned by the caller, each with criteria and scored choices.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = assembly::assemble_owned(&state, user.user_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = owned_project(&state, user.user_id, id).await?;
    let detail = assembly::assemble(&state, project).await?;
    Ok(Json(detail))
}

/// GET /api/v1/projects/{id}/ranking
pub async fn ranking(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectRanking>> {
    let project = owned_project(&state, user.user_id, id).await?;
    let ranking = assembly::rank(&state, &project).await?;
    Ok(Json(ranking))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    owned_project(&state, user.user_id, id).await?;
    let project = state
        .call("update_project", state.store.update_project(id, &input))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_project(&state, user.user_id, id).await?;
    let deleted = state
        .call("delete_project", state.store.delete_project(id))
        .await?;
    if deleted {
        tracing::info!(project_id = id, user_id = %user.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

//! Route definitions for the `/choices` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::choices;
use crate::state::AppState;

/// Routes mounted at `/choices`.
///
/// ```text
/// GET    /?projectId=      -> list
/// POST   /                 -> create
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(choices::list).post(choices::create))
        .route("/{id}", put(choices::update).delete(choices::delete))
}

//! Route definitions for the `/criteria` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::criteria;
use crate::state::AppState;

/// Routes mounted at `/criteria`.
///
/// ```text
/// GET    /?projectId=      -> list
/// POST   /                 -> create
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(criteria::list).post(criteria::create))
        .route("/{id}", put(criteria::update).delete(criteria::delete))
}

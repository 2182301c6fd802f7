//! Route definitions for the `/scores` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::scores;
use crate::state::AppState;

/// Routes mounted at `/scores`.
///
/// ```text
/// PUT    /                 -> upsert
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", put(scores::upsert))
}

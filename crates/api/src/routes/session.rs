//! Route definitions for the `/session` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/session`.
///
/// ```text
/// GET    /                 -> current
/// POST   /signout          -> sign_out
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::current))
        .route("/signout", post(session::sign_out))
}

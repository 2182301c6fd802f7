pub mod choices;
pub mod criteria;
pub mod health;
pub mod project;
pub mod scores;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /session                              current user (auth required)
/// /session/signout                      expire session cookie (public)
///
/// /projects                             list (assembled), create
/// /projects/{id}                        get (assembled), update, delete
/// /projects/{id}/ranking                ranked choices
///
/// /criteria?projectId=                  list, create (bulk)
/// /criteria/{id}                        update, delete
///
/// /choices?projectId=                   list, create (bulk)
/// /choices/{id}                         update, delete
///
/// /scores                               upsert (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/session", session::router())
        .nest("/projects", project::router())
        .nest("/criteria", criteria::router())
        .nest("/choices", choices::router())
        .nest("/scores", scores::router())
}

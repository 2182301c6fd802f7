//! Handlers for the `/session` resource.
//!
//! Sign-up and sign-in happen at the identity provider; this server only
//! reports who the current token belongs to and clears the session cookie.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tradeoff_core::types::UserId;

use crate::auth::session::expired_cookie;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

/// GET /api/v1/session
pub async fn current(user: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: SessionUser {
            id: user.user_id,
            email: user.email,
            role: user.role,
        },
    })
}

/// POST /api/v1/session/signout
///
/// Expires the session cookie. Does not require a valid token.
pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, expired_cookie(&state.config.session_cookie_name))],
        Json(json!({ "message": "Signed out" })),
    )
}

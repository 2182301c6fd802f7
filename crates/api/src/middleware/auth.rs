//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tradeoff_core::error::CoreError;
use tradeoff_core::types::UserId;

use crate::auth::jwt::validate_token;
use crate::auth::session::find_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the session token.
///
/// The token is read from a `Bearer` Authorization header, or failing that
/// from the session cookie. Use this as an extractor parameter in any handler
/// that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (token, source) = find_token(&parts.headers, &state.config.session_cookie_name)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing session token".into()))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|err| {
            tracing::debug!(?source, error = %err, "Rejected session token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

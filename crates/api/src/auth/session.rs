//! Locating the session token on a request.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

/// Where a session token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Bearer,
    Cookie,
}

/// Find the session token: a `Bearer` Authorization header wins, otherwise
/// the named cookie. Empty values are ignored.
pub fn find_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<(&'a str, TokenSource)> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some((token, TokenSource::Bearer));
    }

    cookie_value(headers, cookie_name).map(|token| (token, TokenSource::Cookie))
}

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Lax")
}

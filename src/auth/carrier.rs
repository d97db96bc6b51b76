//! Session token transport: cookie first, then `Authorization: Bearer`

use crate::{auth::jwt::SESSION_TTL_SECS, error::AppError};
use axum::http::{header, HeaderMap, HeaderValue};

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "token";

/// Locate the raw session token for a request.
///
/// The cookie wins over the header; empty values count as absent.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
}

/// Read a named cookie from every `Cookie` header on the request
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// `Set-Cookie` value carrying a freshly issued token.
/// HttpOnly + Secure + SameSite=None so the frontend on another origin can send it back.
pub fn session_cookie(token: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE, token, SESSION_TTL_SECS
    ))
    .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
}

/// `Set-Cookie` value that makes the browser drop the session cookie
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "token=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/; HttpOnly; Secure; SameSite=None",
    )
}

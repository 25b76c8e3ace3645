//! Session cookie encoding and token extraction.

use axum::http::header::{InvalidHeaderValue, AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::auth::jwt::SessionConfig;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "alovate.session-token";

const CLEARED_COOKIE: &str = "alovate.session-token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0";
const CLEARED_SECURE_COOKIE: &str =
    "alovate.session-token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure";

/// `Set-Cookie` value that stores `token` for the configured lifetime.
pub fn session_cookie(token: &str, config: &SessionConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.max_age_secs;
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value that tells the browser to drop the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> HeaderValue {
    if config.cookie_secure {
        HeaderValue::from_static(CLEARED_SECURE_COOKIE)
    } else {
        HeaderValue::from_static(CLEARED_COOKIE)
    }
}

/// Find the raw session token on a request.
///
/// The session cookie wins; an `Authorization: Bearer` header is accepted
/// for non-browser clients.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie_token(headers).or_else(|| extract_bearer_token(headers))
}

fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            let val = val.trim();
            (key.trim() == SESSION_COOKIE_NAME && !val.is_empty()).then(|| val.to_string())
        })
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

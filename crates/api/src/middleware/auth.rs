//! Session extraction from the session cookie or a Bearer token.

use std::convert::Infallible;

use alovate_core::roles::Role;
use alovate_core::types::UserId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::auth::cookie::extract_session_token;
use crate::auth::jwt::{decode_session_token, SessionClaims, SessionConfig};
use crate::state::AppState;

/// The signed-in user as recorded in their session token.
///
/// `role` is whatever the token says, not the user's current role in the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    /// Token expiry (UTC Unix timestamp).
    pub expires_at: i64,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            expires_at: claims.exp,
        }
    }
}

/// Resolve the session carried by a request.
///
/// A missing, malformed, expired or tampered token yields `None`; the
/// failure is logged at debug level and never reported to the client.
pub fn resolve_session(headers: &HeaderMap, config: &SessionConfig) -> Option<SessionUser> {
    let token = extract_session_token(headers)?;
    match decode_session_token(&token, config) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            None
        }
    }
}

/// Optional session extractor for pages that render for everyone.
///
/// ```ignore
/// async fn home(MaybeSession(session): MaybeSession) -> Json<HomeView> {
///     // session is None for anonymous visitors
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionUser>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(resolve_session(
            &parts.headers,
            &state.config.session,
        )))
    }
}

//! Page-level role checks.
//!
//! These extractors re-apply the gate's rules inside the handlers. Their
//! rejections are redirects rather than error pages: an anonymous visitor
//! goes to `/login`, a non-admin on an admin page goes to `/dashboard`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;

use super::auth::{resolve_session, SessionUser};
use super::gate::{DASHBOARD_PATH, LOGIN_PATH};
use crate::state::AppState;

/// Requires any valid session. Redirects to `/login` otherwise.
///
/// ```ignore
/// async fn dashboard(RequirePageSession(session): RequirePageSession) -> Json<DashboardView> {
///     // session is guaranteed to be present here
/// }
/// ```
pub struct RequirePageSession(pub SessionUser);

impl FromRequestParts<AppState> for RequirePageSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_session(&parts.headers, &state.config.session)
            .map(RequirePageSession)
            .ok_or_else(|| Redirect::temporary(LOGIN_PATH))
    }
}

/// Requires a session whose token carries the `ADMIN` role.
///
/// Redirects to `/login` without a session and to `/dashboard` for any
/// other role.
pub struct RequireAdminPage(pub SessionUser);

impl FromRequestParts<AppState> for RequireAdminPage {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequirePageSession(session) =
            RequirePageSession::from_request_parts(parts, state).await?;
        if !session.role.is_admin() {
            tracing::debug!(user_id = %session.user_id, "Admin page refused for non-admin session");
            return Err(Redirect::temporary(DASHBOARD_PATH));
        }
        Ok(RequireAdminPage(session))
    }
}

//! Path-based authorization gate.
//!
//! Runs in front of every route, but only acts on protected page paths
//! (`/dashboard`, `/admin` and anything below them). The decision is made
//! from the session token alone:
//!
//! | Session              | `/dashboard/*` | `/admin/*`              |
//! |----------------------|----------------|-------------------------|
//! | none / invalid       | → `/login`     | → `/login`              |
//! | `USER`               | allow          | → `/dashboard`          |
//! | `ADMIN`              | allow          | allow                   |
//!
//! Page handlers repeat the check through [`super::rbac`], so a path that
//! slips past this matcher is still guarded.

use alovate_core::roles::Role;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::auth::{resolve_session, SessionUser};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_PATH: &str = "/admin";

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// No usable session: send the visitor to sign in.
    RedirectToLogin,
    /// Signed in, but the page needs a role the session lacks.
    RedirectToDashboard,
}

/// Paths the gate is responsible for. Everything else, including `/`,
/// `/login` and `/register`, passes through untouched.
pub fn is_protected_path(path: &str) -> bool {
    is_under(path, DASHBOARD_PATH) || is_under(path, ADMIN_PATH)
}

pub fn is_admin_path(path: &str) -> bool {
    is_under(path, ADMIN_PATH)
}

/// `path` equals `base` or is one of its sub-paths.
fn is_under(path: &str, base: &str) -> bool {
    path.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Decide whether `path` may be served to the holder of `session`.
pub fn decide(path: &str, session: Option<&SessionUser>) -> GateDecision {
    if !is_protected_path(path) {
        return GateDecision::Allow;
    }

    let Some(session) = session else {
        return GateDecision::RedirectToLogin;
    };

    if is_admin_path(path) && session.role != Role::Admin {
        return GateDecision::RedirectToDashboard;
    }

    GateDecision::Allow
}

/// `/login?callbackUrl=<target>`, so sign-in can return the visitor.
pub fn login_redirect_target(callback: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", callback)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Axum middleware applying [`decide`] to each request.
pub async fn authorization_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !is_protected_path(path) {
        return next.run(request).await;
    }

    let session = resolve_session(request.headers(), &state.config.session);
    match decide(path, session.as_ref()) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectToLogin => {
            let callback = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(DASHBOARD_PATH);
            tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
            Redirect::temporary(&login_redirect_target(callback)).into_response()
        }
        GateDecision::RedirectToDashboard => {
            tracing::debug!(
                path = %request.uri().path(),
                user_id = ?session.as_ref().map(|s| s.user_id),
                "Admin path requested without ADMIN role, redirecting to dashboard"
            );
            Redirect::temporary(DASHBOARD_PATH).into_response()
        }
    }
}

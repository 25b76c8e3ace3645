//! Handlers for the `/api/auth` resource (credentials sign-in, session, sign-out).
//!
//! Sign-in follows browser form semantics: every outcome is a `303 See Other`
//! redirect. Success sets the session cookie; failure lands on
//! `/login?error=<code>` with no cookie.

use alovate_core::roles::Role;
use alovate_core::types::{Timestamp, UserId};
use axum::extract::{FromRequest, Request, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::credentials::{authorize, LoginError};
use crate::auth::jwt::issue_session_token;
use crate::middleware::auth::MaybeSession;
use crate::middleware::gate::{DASHBOARD_PATH, LOGIN_PATH};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/callback/credentials`, as JSON or form fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Where to send the user after signing in (same-origin paths only).
    pub callback_url: Option<String>,
}

/// Response of `GET /api/auth/session`; serializes as `{}` when signed out.
#[derive(Debug, Default, Serialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<Timestamp>,
}

/// Public identity fields of the current session.
#[derive(Debug, Serialize)]
pub struct SessionUserInfo {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/callback/credentials
///
/// Check email + password and mint a session token into the session cookie.
pub async fn credentials_callback(State(state): State<AppState>, request: Request) -> Response {
    let input = read_credentials(request).await;

    let user = match authorize(
        state.store.as_ref(),
        input.email.as_deref(),
        input.password.as_deref(),
    )
    .await
    {
        Ok(user) => user,
        Err(err) => return login_failure(&err),
    };

    let config = &state.config.session;
    let cookie = issue_session_token(user.id, &user.email, user.role, config)
        .map_err(|e| e.to_string())
        .and_then(|token| session_cookie(&token, config).map_err(|e| e.to_string()));
    let cookie = match cookie {
        Ok(cookie) => cookie,
        Err(e) => {
            return login_failure(&LoginError::Internal(format!("session issue failed: {e}")))
        }
    };

    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

    let target = safe_callback(input.callback_url.as_deref());
    let mut response = Redirect::to(target).into_response();
    response.headers_mut().insert(SET_COOKIE, cookie);
    response
}

/// GET /api/auth/session
///
/// Describe the caller's session, or `{}` when there is none.
pub async fn session(MaybeSession(session): MaybeSession) -> Json<SessionResponse> {
    let response = match session {
        Some(session) => SessionResponse {
            expires: chrono::DateTime::from_timestamp(session.expires_at, 0),
            user: Some(SessionUserInfo {
                id: session.user_id,
                email: session.email,
                role: session.role,
            }),
        },
        None => SessionResponse::default(),
    };
    Json(response)
}

/// POST /api/auth/signout
///
/// Drop the session cookie and return to the home page. Tokens are
/// stateless, so a copy kept elsewhere stays valid until it expires.
pub async fn signout(State(state): State<AppState>) -> Response {
    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .insert(SET_COOKIE, clear_session_cookie(&state.config.session));
    response
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the sign-in body as form fields or JSON. An unreadable body is
/// treated as one without credentials.
async fn read_credentials(request: Request) -> CredentialsRequest {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let parsed = if is_form {
        Form::<CredentialsRequest>::from_request(request, &())
            .await
            .map(|Form(input)| input)
            .ok()
    } else {
        Json::<CredentialsRequest>::from_request(request, &())
            .await
            .map(|Json(input)| input)
            .ok()
    };
    parsed.unwrap_or_default()
}

/// Redirect a refused sign-in back to the login page with a generic code.
fn login_failure(err: &LoginError) -> Response {
    match err {
        LoginError::Internal(detail) => tracing::error!(error = %detail, "Sign-in failed"),
        other => tracing::info!(reason = other.code(), "Sign-in refused"),
    }
    Redirect::to(&login_error_target(err.code())).into_response()
}

/// `/login?error=<code>`.
pub fn login_error_target(code: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("error", code)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Accept only same-origin absolute paths as post-login targets.
/// The value must also be usable as a `Location` header.
fn safe_callback(callback: Option<&str>) -> &str {
    match callback {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control)
                && HeaderValue::from_str(path).is_ok() =>
        {
            path
        }
        _ => DASHBOARD_PATH,
    }
}

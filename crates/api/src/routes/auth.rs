//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/api/auth`.
///
/// ```text
/// POST /callback/credentials  -> credentials_callback
/// GET  /session               -> session
/// POST /signout               -> signout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/callback/credentials", post(auth::credentials_callback))
        .route("/session", get(auth::session))
        .route("/signout", post(auth::signout))
}

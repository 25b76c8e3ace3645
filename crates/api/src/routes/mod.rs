pub mod auth;
pub mod health;
pub mod pages;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /register                     register (public)
///
/// /auth/callback/credentials    credentials sign-in (public)
/// /auth/session                 current session (public)
/// /auth/signout                 clear session cookie (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register::register))
        .nest("/auth", auth::router())
}

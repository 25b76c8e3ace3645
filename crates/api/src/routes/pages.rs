//! Page routes. `/dashboard` and `/admin` sit behind the authorization gate.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::middleware::gate::{ADMIN_PATH, DASHBOARD_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route(LOGIN_PATH, get(pages::login))
        .route(REGISTER_PATH, get(pages::register))
        .route(DASHBOARD_PATH, get(pages::dashboard))
        .route(ADMIN_PATH, get(pages::admin))
}

//! Page handlers.
//!
//! Presentation is out of scope, so each page answers with a small JSON view
//! of what it would render. `/dashboard` and `/admin` re-check the session
//! themselves even though the gate already ran.

use alovate_db::models::user::UserSummary;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::{MaybeSession, SessionUser};
use crate::middleware::rbac::{RequireAdminPage, RequirePageSession};
use crate::state::AppState;

/// Query parameters the login page understands.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPageQuery {
    pub error: Option<String>,
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub page: &'static str,
    pub session: Option<SessionUser>,
    pub show_admin_link: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub page: &'static str,
    pub error: Option<String>,
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterView {
    pub page: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub page: &'static str,
    pub session: SessionUser,
    pub show_admin_link: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub page: &'static str,
    pub session: SessionUser,
    pub users: Vec<UserSummary>,
}

/// GET /
pub async fn home(MaybeSession(session): MaybeSession) -> Json<HomeView> {
    let show_admin_link = session.as_ref().is_some_and(|s| s.role.is_admin());
    Json(HomeView {
        page: "home",
        session,
        show_admin_link,
    })
}

/// GET /login
pub async fn login(Query(query): Query<LoginPageQuery>) -> Json<LoginView> {
    Json(LoginView {
        page: "login",
        error: query.error,
        callback_url: query.callback_url,
    })
}

/// GET /register
pub async fn register() -> Json<RegisterView> {
    Json(RegisterView { page: "register" })
}

/// GET /dashboard
///
/// Any signed-in user. The admin link follows the token's role.
pub async fn dashboard(RequirePageSession(session): RequirePageSession) -> Json<DashboardView> {
    let show_admin_link = session.role.is_admin();
    Json(DashboardView {
        page: "dashboard",
        session,
        show_admin_link,
    })
}

/// GET /admin
///
/// Lists every account, newest first. Admin sessions only.
pub async fn admin(
    State(state): State<AppState>,
    RequireAdminPage(session): RequireAdminPage,
) -> AppResult<Json<AdminView>> {
    let users = state
        .store
        .list()
        .await?
        .into_iter()
        .map(UserSummary::from)
        .collect();

    Ok(Json(AdminView {
        page: "admin",
        session,
        users,
    }))
}

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alovate_api::auth::jwt::SessionConfig;
use alovate_api::auth::password::PasswordConfig;
use alovate_api::config::ServerConfig;
use alovate_api::router::build_app_router;
use alovate_api::state::AppState;
use alovate_core::roles::Role;
use alovate_core::types::UserId;
use alovate_db::models::user::{CreateUser, User};
use alovate_db::store::{StoreError, UserStore};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// In-memory [`UserStore`] with the same uniqueness and ordering rules as
/// the Postgres store.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn role_of(&self, email: &str) -> Option<Role> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.role)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::DuplicateEmail(input.email.clone()));
        }
        let user = User {
            id: UserId::now_v7(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            created_at: chrono::Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn set_role_by_email(&self, email: &str, role: Role) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| StoreError::NotFound(email.to_string()))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A store whose every call fails like an unreachable database.
pub struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn create(&self, _input: &CreateUser) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn set_role_by_email(&self, _email: &str, _role: Role) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a cheap hash work factor.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            max_age_secs: 3600,
            cookie_secure: false,
        },
        password: PasswordConfig {
            memory_kib: 4096,
            iterations: 1,
            parallelism: 1,
        },
    }
}

pub fn test_state(store: Arc<dyn UserStore>) -> AppState {
    AppState {
        store,
        config: Arc::new(test_config()),
    }
}

/// Build the full application router, exactly as the binary does.
pub fn build_test_app(store: Arc<dyn UserStore>) -> Router {
    build_app_router(test_state(store))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// GET with a `Cookie` header (e.g. the `name=value` pair from [`session_cookie`]).
pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn register(app: &Router, email: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/api/register",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await
}

pub async fn sign_in(app: &Router, email: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/api/auth/callback/credentials",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` part of the response's `Set-Cookie` header, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let value = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(|pair| pair.trim().to_string())
}

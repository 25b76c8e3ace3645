//! Handler for `POST /api/register`.

use alovate_core::error::CoreError;
use alovate_core::roles::Role;
use alovate_db::models::user::{CreateUser, UserResponse};
use alovate_db::store::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password_blocking, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";

/// Request body for `POST /api/register`. Both fields are checked by hand so
/// an absent field gets the same message as an empty one.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

/// POST /api/register
///
/// Create a `USER` account. Returns 201 with the public user fields, or 400
/// when a field is missing, the password is too short, or the email is taken.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (email, password) = match (input.email, input.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Email and password are required".into(),
            )))
        }
    };

    validate_password_strength(&password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if state.store.find_by_email(&email).await?.is_some() {
        return Err(AppError::Core(CoreError::AlreadyExists(
            DUPLICATE_EMAIL_MESSAGE.into(),
        )));
    }

    let password_hash = hash_password_blocking(password, state.config.password)
        .await
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        email,
        password_hash,
        role: Role::User,
    };

    // A concurrent registration can still win between the lookup and here.
    let user = state.store.create(&input).await.map_err(|e| match e {
        StoreError::DuplicateEmail(_) => {
            AppError::Core(CoreError::AlreadyExists(DUPLICATE_EMAIL_MESSAGE.into()))
        }
        other => AppError::Store(other),
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user: UserResponse::from(&user),
        }),
    ))
}

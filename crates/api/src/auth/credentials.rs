//! Email/password credential check used by the sign-in callback.

use alovate_core::roles::Role;
use alovate_core::types::UserId;
use alovate_db::store::UserStore;

use crate::auth::password::verify_password_blocking;

/// Why a sign-in attempt was refused.
///
/// Unknown emails and wrong passwords share [`LoginError::InvalidCredentials`]
/// so the response never reveals which accounts exist.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Sign-in failed: {0}")]
    Internal(String),
}

impl LoginError {
    /// Code placed in the `error` query parameter of the login redirect.
    pub fn code(&self) -> &'static str {
        match self {
            LoginError::MissingCredentials => "MissingCredentials",
            LoginError::InvalidCredentials => "CredentialsSignin",
            LoginError::Internal(_) => "ServerError",
        }
    }
}

/// Identity that passed the credential check; becomes the token's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

/// Look up `email` and check `password` against the stored hash.
///
/// Empty strings count as missing.
pub async fn authorize(
    store: &dyn UserStore,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<AuthorizedUser, LoginError> {
    let (email, password) = match (non_empty(email), non_empty(password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(LoginError::MissingCredentials),
    };

    let user = store
        .find_by_email(email)
        .await
        .map_err(|e| LoginError::Internal(format!("user lookup failed: {e}")))?
        .ok_or(LoginError::InvalidCredentials)?;

    let password_valid = verify_password_blocking(password.to_string(), user.password_hash)
        .await
        .map_err(|e| LoginError::Internal(format!("password verification failed: {e}")))?;

    if !password_valid {
        return Err(LoginError::InvalidCredentials);
    }

    Ok(AuthorizedUser {
        id: user.id,
        email: user.email,
        role: user.role,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

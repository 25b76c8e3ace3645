//! The credential store seam.
//!
//! Handlers talk to [`UserStore`] rather than to a pool directly, so the
//! HTTP layer can be exercised without a running database. [`PgUserStore`]
//! is the production implementation backed by [`UserRepo`].

use alovate_core::roles::Role;
use async_trait::async_trait;

use crate::models::user::{CreateUser, User};
use crate::repositories::UserRepo;
use crate::DbPool;

/// Name of the unique constraint guarding `users.email`.
const EMAIL_UNIQUE_CONSTRAINT: &str = "uq_users_email";

/// PostgreSQL SQLSTATE for unique constraint violations.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another account already uses this email.
    #[error("a user with email {0:?} already exists")]
    DuplicateEmail(String),

    /// No account matched the lookup key.
    #[error("no user with email {0:?}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Point reads and writes over the persisted user table.
///
/// Every operation is a single-row statement; no caller needs a transaction.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::DuplicateEmail`] when
    /// the email is taken, including when a concurrent insert wins the race.
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All accounts, newest first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Out-of-band role change. Tokens issued before the change keep the
    /// role they were minted with.
    async fn set_role_by_email(&self, email: &str, role: Role) -> Result<User, StoreError>;

    /// Cheap reachability probe for `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// [`UserStore`] backed by the Postgres `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, input).await.map_err(|err| {
            if is_email_conflict(&err) {
                StoreError::DuplicateEmail(input.email.clone())
            } else {
                StoreError::Database(err)
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn set_role_by_email(&self, email: &str, role: Role) -> Result<User, StoreError> {
        let updated = UserRepo::update_role_by_email(&self.pool, email, role).await?;
        match updated {
            Some(user) => {
                tracing::info!(user_id = %user.id, role = %role, "User role changed");
                Ok(user)
            }
            None => Err(StoreError::NotFound(email.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

/// Whether `err` is the unique violation on the email column.
fn is_email_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
                && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

//! Postgres-backed tests for `PgUserStore`.
//!
//! These need a live database (`DATABASE_URL`), so they are ignored by
//! default. Run with `cargo test -p alovate-db -- --ignored`.

use alovate_core::roles::Role;
use alovate_db::models::user::CreateUser;
use alovate_db::store::{PgUserStore, StoreError, UserStore};
use assert_matches::assert_matches;
use sqlx::PgPool;

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=4096,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA".into(),
        role: Role::User,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn create_defaults_to_user_and_finds_by_email(pool: PgPool) {
    let store = PgUserStore::new(pool);

    let created = store.create(&new_user("a@x.com")).await.unwrap();
    assert_eq!(created.role, Role::User);

    let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn duplicate_email_maps_to_duplicate_error(pool: PgPool) {
    let store = PgUserStore::new(pool);
    store.create(&new_user("dup@x.com")).await.unwrap();

    let err = store.create(&new_user("dup@x.com")).await.unwrap_err();
    assert_matches!(err, StoreError::DuplicateEmail(email) if email == "dup@x.com");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn promotion_updates_role_and_missing_email_is_not_found(pool: PgPool) {
    let store = PgUserStore::new(pool);
    store.create(&new_user("boss@x.com")).await.unwrap();

    let promoted = store.set_role_by_email("boss@x.com", Role::Admin).await.unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let err = store
        .set_role_by_email("ghost@x.com", Role::Admin)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::NotFound(_));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn list_returns_newest_first(pool: PgPool) {
    let store = PgUserStore::new(pool);
    store.create(&new_user("first@x.com")).await.unwrap();
    store.create(&new_user("second@x.com")).await.unwrap();

    let emails: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, vec!["second@x.com", "first@x.com"]);
    store.ping().await.unwrap();
}

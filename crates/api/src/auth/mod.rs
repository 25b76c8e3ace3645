//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- stateless session token minting and verification.
//! - [`cookie`] -- session cookie headers and token extraction.
//! - [`credentials`] -- the email/password check behind sign-in.

pub mod cookie;
pub mod credentials;
pub mod jwt;
pub mod password;

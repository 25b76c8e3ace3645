//! Request handlers.
//!
//! - [`register`] -- account creation.
//! - [`auth`] -- credentials sign-in, session lookup, sign-out.
//! - [`pages`] -- the public and protected pages.

pub mod auth;
pub mod pages;
pub mod register;

//! Session resolution, the path-based authorization gate, and page-level
//! role checks.
//!
//! - [`auth::MaybeSession`] -- the caller's session, if any; never rejects.
//! - [`gate::authorization_gate`] -- redirects before protected pages run.
//! - [`rbac::RequirePageSession`] / [`rbac::RequireAdminPage`] -- the same
//!   rules enforced again inside the page handlers.

pub mod auth;
pub mod gate;
pub mod rbac;

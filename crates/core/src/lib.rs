//! Domain primitives shared by the store and the HTTP layer.

pub mod error;
pub mod roles;
pub mod types;

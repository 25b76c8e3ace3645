use std::sync::Arc;

use alovate_db::store::UserStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; holds no per-request mutable data.
#[derive(Clone)]
pub struct AppState {
    /// Credential store.
    pub store: Arc<dyn UserStore>,
    /// Server configuration (session secret, hashing work factor, ...).
    pub config: Arc<ServerConfig>,
}

use std::sync::Arc;

use personagens_db::Store;

use crate::config::ServerConfig;
use crate::upload::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn Store>,
    /// Where uploaded photos are written.
    pub uploads: Arc<UploadStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

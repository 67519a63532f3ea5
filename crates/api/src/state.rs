use std::sync::Arc;

use annolab_concord::{ConcordanceEngine, PgStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: annolab_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing domain events.
    pub event_bus: Arc<annolab_events::EventBus>,
    /// Concordance engine, invoked synchronously after annotation
    /// mutations.
    pub concord: Arc<ConcordanceEngine<PgStore>>,
}

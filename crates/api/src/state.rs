use std::sync::Arc;

use barbershop_db::ScheduleStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Schedule configuration store (PostgreSQL or in-memory).
    pub store: Arc<dyn ScheduleStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

//! Shared application state for the dashboard API.

use pokedex_db::DbPool;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The pool is cheap to clone and safe to share.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool of the species store.
    pub db: DbPool,
}

impl AppState {
    /// Create the application state around a connected, migrated pool.
    pub const fn new(db: DbPool) -> Self {
        Self { db }
    }
}

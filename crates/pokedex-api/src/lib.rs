//! Dashboard HTTP API for the Pokedex species store.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Dashboard summary** (`/api/dashboard/summary`) with the species
//!   total and counts by type and generation
//! - **Species table** (`/api/pokemon`) filtered, sorted and paginated by
//!   query string
//! - **Species detail** (`/api/pokemon/{number}`)
//! - **Minimal HTML status page** (`GET /`) with links to the endpoints
//!
//! # Architecture
//!
//! Handlers are thin: they normalize the request, call one store in
//! `pokedex-db` and serialize the result. The store is read-only once the
//! server is up, so no handler takes a lock.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{DEFAULT_CORS_ORIGINS, ServerConfig, ServerError, start_server};
pub use state::AppState;

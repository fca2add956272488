//! Data layer for the Pokedex dashboard (`SQLite`).
//!
//! The species graph is written once, in bulk, by the seed loader when the
//! store is found empty at startup. Everything after that is read-only:
//! the filtered table listing, the per-species detail view, and the
//! dashboard aggregates.
//!
//! # Architecture
//!
//! ```text
//! Startup
//!     |
//!     +-- DbPool::connect + run_migrations
//!     +-- seed::seed_if_empty ----> SpeciesStore::batch_insert (one transaction)
//!
//! Request
//!     |
//!     +-- TableStore::list        (filter, sort, paginate, summarize rows)
//!     +-- SpeciesStore::get_details --> projection::project_details
//!     +-- SummaryStore::summary   (grouped counts)
//! ```
//!
//! # Modules
//!
//! - [`sqlite`] -- `SQLite` connection pool and configuration
//! - [`species_store`] -- Bulk insert and detail loading
//! - [`table_store`] -- Filtered, sorted, paginated species table
//! - [`summary_store`] -- Dashboard aggregates
//! - [`projection`] -- Raw rows and their pure projections into response records
//! - [`seed`] -- One-time import of the static JSON dataset
//! - [`error`] -- Shared error types

pub mod error;
pub mod projection;
pub mod seed;
pub mod species_store;
pub mod sqlite;
pub mod summary_store;
pub mod table_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use projection::{SpeciesGraph, SpeciesRow, TableRowRecord};
pub use seed::{SeedOutcome, build_batch, parse_document, seed_from_file, seed_if_empty};
pub use species_store::{NewEvolution, NewEvolutionTarget, NewSpecies, SpeciesStore};
pub use sqlite::{DbPool, SqliteConfig};
pub use summary_store::SummaryStore;
pub use table_store::TableStore;

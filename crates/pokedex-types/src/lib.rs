//! Shared type definitions for the Pokedex dashboard.
//!
//! This crate is the single source of truth for the shapes exchanged
//! between the data layer, the HTTP API, and the React dashboard. Types
//! defined here flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`structs`] -- Response records (detail, table page, dashboard summary)
//! - [`enums`] -- Sort key and sort direction
//! - [`query`] -- Raw listing parameters and their normalized form

pub mod enums;
pub mod query;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{SortField, SortOrder};
pub use query::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, ListParams, ListRequest, SpeciesFilters};
pub use structs::{
    DashboardSummary, Evolution, PokemonDetails, PokemonTablePage, PokemonTableRow, Stat,
};

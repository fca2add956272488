//! Response records served by the dashboard API.
//!
//! Field names serialize in `camelCase` to match the JSON contract the
//! React dashboard consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Species detail
// ---------------------------------------------------------------------------

/// Full detail view of one species, including every sub-collection.
///
/// Sub-collections are in seed order, never alphabetical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PokemonDetails {
    /// National dex number (primary key).
    pub number: i32,
    /// Species name.
    pub name: String,
    /// Generation label, e.g. `Generation I`.
    pub generation: String,
    /// Height as stored in the dataset.
    pub height: i32,
    /// Weight as stored in the dataset.
    pub weight: i32,
    /// Type labels. The first two are the primary and secondary types.
    pub types: Vec<String>,
    /// Base stats.
    pub stats: Vec<Stat>,
    /// Learnable moves.
    pub moves: Vec<String>,
    /// Abilities.
    pub abilities: Vec<String>,
    /// Evolution chain links. Always present, possibly empty.
    pub evolution: Evolution,
    /// Artwork URL.
    pub image: String,
}

/// A single named base stat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stat {
    /// Stat name, e.g. `HP` or `Attack`.
    pub name: String,
    /// Stat value.
    pub value: i32,
}

/// Predecessor and successors of a species.
///
/// `to` and `to_numbers` are parallel sequences of equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Evolution {
    /// Name of the species this one evolves from.
    pub from: Option<String>,
    /// Resolved number of the predecessor, if it exists in the store.
    pub from_number: Option<i32>,
    /// Names of the species this one evolves into.
    pub to: Vec<String>,
    /// Resolved numbers of the successors.
    pub to_numbers: Vec<i32>,
}

// ---------------------------------------------------------------------------
// Table listing
// ---------------------------------------------------------------------------

/// One page of the filtered, sorted species table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PokemonTablePage {
    /// 1-based page index that was served.
    pub page_number: i32,
    /// Page length that was applied.
    pub page_size: i32,
    /// Number of rows matching the filters, before pagination.
    #[ts(type = "number")]
    pub total_count: i64,
    /// Rows on this page.
    pub results: Vec<PokemonTableRow>,
}

/// Summary row of the species table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PokemonTableRow {
    /// National dex number.
    pub number: i32,
    /// Species name.
    pub name: String,
    /// Generation label.
    pub generation: String,
    /// Height.
    pub height: i32,
    /// Weight.
    pub weight: i32,
    /// First type in seed order, or an empty string.
    pub type1: String,
    /// Second type in seed order, if any.
    pub type2: Option<String>,
    /// Number of move records.
    pub moves_count: i32,
}

// ---------------------------------------------------------------------------
// Dashboard summary
// ---------------------------------------------------------------------------

/// Aggregate counts shown on the dashboard landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DashboardSummary {
    /// Total number of species.
    #[ts(type = "number")]
    pub total_pokemon_species: i64,
    /// Type label to number of type records carrying it.
    ///
    /// A dual-typed species contributes to two buckets.
    #[ts(type = "Record<string, number>")]
    pub pokemon_count_by_type: BTreeMap<String, i64>,
    /// Generation label to number of species in it.
    #[ts(type = "Record<string, number>")]
    pub pokemon_count_by_generation: BTreeMap<String, i64>,
}

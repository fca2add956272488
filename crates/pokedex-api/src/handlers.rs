//! REST endpoint handlers for the dashboard API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/dashboard/summary` | Species total, counts by type and generation |
//! | `GET` | `/api/pokemon` | Filtered, sorted, paginated species table |
//! | `GET` | `/api/pokemon/{number}` | Single species detail |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use pokedex_db::{SpeciesStore, SummaryStore, TableStore};
use pokedex_types::{DashboardSummary, ListParams, ListRequest, PokemonDetails, PokemonTablePage};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page with the species count and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let species_count = SpeciesStore::new(state.db.pool()).count_species().await?;

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Pokedex API</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #ef5350; margin-bottom: 0.25rem; }}
        .metric .value {{ color: #ef5350; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Pokedex API</h1>
    <div class="metric">
        <div>Species</div>
        <div class="value">{species_count}</div>
    </div>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/dashboard/summary">/api/dashboard/summary</a> -- Counts by type and generation</li>
        <li><a href="/api/pokemon">/api/pokemon</a> -- Species table (?pageNumber=1&amp;pageSize=25&amp;typeFilter=fire&amp;sortBy=name)</li>
        <li><a href="/api/pokemon/1">/api/pokemon/{{number}}</a> -- Single species detail</li>
    </ul>
</body>
</html>"#
    )))
}

// ---------------------------------------------------------------------------
// GET /api/dashboard/summary
// ---------------------------------------------------------------------------

/// Return the dashboard aggregates.
pub async fn dashboard_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = SummaryStore::new(state.db.pool()).summary().await?;
    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// GET /api/pokemon -- species table
// ---------------------------------------------------------------------------

/// Return one page of the species table.
///
/// # Query Parameters
///
/// - `pageNumber`, `pageSize`: integers (default 1 and 25)
/// - `numberFilter`: exact dex number; ignored unless it parses
/// - `nameFilter`, `typeFilter`, `generationFilter`, `moveFilter`:
///   case-insensitive substrings
/// - `sortBy`: `number` | `name` | `generation` | `height` | `weight`
/// - `sortOrder`: `asc` | `desc`
pub async fn list_pokemon(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<PokemonTablePage>, ApiError> {
    let request = ListRequest::from(params);
    let page = TableStore::new(state.db.pool()).list(&request).await?;
    Ok(Json(page))
}

// ---------------------------------------------------------------------------
// GET /api/pokemon/{number} -- species detail
// ---------------------------------------------------------------------------

/// Return the detail record of one species.
///
/// A segment that is not an integer can never name a species, so it is
/// answered like an unknown number.
pub async fn get_pokemon(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<PokemonDetails>, ApiError> {
    let Ok(number) = number.parse::<i32>() else {
        return Err(ApiError::NotFound);
    };

    SpeciesStore::new(state.db.pool())
        .get_details(number)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

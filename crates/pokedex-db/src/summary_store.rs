//! Dashboard aggregates: species total, counts by type and generation.

use std::collections::BTreeMap;

use pokedex_types::DashboardSummary;
use sqlx::SqlitePool;

use crate::error::DbError;

/// Aggregate queries for the dashboard landing page.
pub struct SummaryStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SummaryStore<'a> {
    /// Create a new summary store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Compute the dashboard summary.
    ///
    /// `pokemon_count_by_type` counts type rows, not distinct species: a
    /// species with two types lands in two buckets.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if a query fails.
    pub async fn summary(&self) -> Result<DashboardSummary, DbError> {
        let total_pokemon_species = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pokemon")
            .fetch_one(self.pool)
            .await?;

        let by_type = sqlx::query_as::<_, (String, i64)>(
            r"SELECT type_label, COUNT(*) FROM pokemon_types GROUP BY type_label",
        )
        .fetch_all(self.pool)
        .await?;

        let by_generation = sqlx::query_as::<_, (String, i64)>(
            r"SELECT generation, COUNT(*) FROM pokemon GROUP BY generation",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(DashboardSummary {
            total_pokemon_species,
            pokemon_count_by_type: by_type.into_iter().collect::<BTreeMap<_, _>>(),
            pokemon_count_by_generation: by_generation.into_iter().collect::<BTreeMap<_, _>>(),
        })
    }
}

//! Species persistence: bulk insert of the seeded graph and detail loading.
//!
//! Species are written exactly once, in one transaction, by the seed
//! loader. Reads load a single species with every child collection in
//! sequence order and hand the rows to [`projection::project_details`].

use pokedex_types::{PokemonDetails, Stat};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::DbError;
use crate::projection::{self, EvolutionRow, EvolutionTargetRow, SpeciesGraph, SpeciesRow, StatRow};

/// A fully resolved species ready to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSpecies {
    /// National dex number (primary key, never generated).
    pub number: i32,
    /// Species name.
    pub name: String,
    /// Generation label.
    pub generation: String,
    /// Height.
    pub height: i32,
    /// Weight.
    pub weight: i32,
    /// Artwork URL.
    pub image: String,
    /// Type labels in seed order.
    pub types: Vec<String>,
    /// Base stats in seed order.
    pub stats: Vec<Stat>,
    /// Move names in seed order.
    pub moves: Vec<String>,
    /// Ability names in seed order.
    pub abilities: Vec<String>,
    /// Evolution links, already resolved to numbers.
    pub evolution: NewEvolution,
}

/// Evolution links of a species with names resolved to numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvolution {
    /// Predecessor name, verbatim from the dataset.
    pub from: Option<String>,
    /// Resolved predecessor number.
    pub from_number: Option<i32>,
    /// Successors that resolved to a known species.
    pub targets: Vec<NewEvolutionTarget>,
}

/// One resolved successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvolutionTarget {
    /// Successor name, verbatim from the dataset.
    pub name: String,
    /// Resolved successor number.
    pub number: i32,
}

/// Operations on the `pokemon` table and its child tables.
pub struct SpeciesStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SpeciesStore<'a> {
    /// Create a new species store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Count the stored species.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn count_species(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pokemon")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a batch of species with all their children.
    ///
    /// The whole batch is one transaction: either every species is
    /// committed or none is. Species rows go in first so evolution links
    /// may point at any species of the batch.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if any insert fails, e.g. on a duplicate
    /// number or an evolution link to a number outside the store.
    pub async fn batch_insert(&self, species: &[NewSpecies]) -> Result<(), DbError> {
        if species.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for s in species {
            sqlx::query(
                r"INSERT INTO pokemon (number, name, generation, height, weight, image)
                  VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(s.number)
            .bind(&s.name)
            .bind(&s.generation)
            .bind(s.height)
            .bind(s.weight)
            .bind(&s.image)
            .execute(&mut *tx)
            .await?;
        }

        for s in species {
            insert_children(&mut *tx, s).await?;
        }

        tx.commit().await?;

        tracing::debug!(count = species.len(), "Inserted species");
        Ok(())
    }

    /// Load one species with every child collection.
    ///
    /// Returns `Ok(None)` when no species has this number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if a query fails.
    pub async fn load_graph(&self, number: i32) -> Result<Option<SpeciesGraph>, DbError> {
        let Some(species) = sqlx::query_as::<_, SpeciesRow>(
            r"SELECT number, name, generation, height, weight, image
              FROM pokemon
              WHERE number = ?",
        )
        .bind(number)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let types = sqlx::query_scalar::<_, String>(
            r"SELECT type_label FROM pokemon_types WHERE pokemon_number = ? ORDER BY id",
        )
        .bind(number)
        .fetch_all(self.pool)
        .await?;

        let stats = sqlx::query_as::<_, StatRow>(
            r"SELECT stat_name, value FROM pokemon_stats WHERE pokemon_number = ? ORDER BY id",
        )
        .bind(number)
        .fetch_all(self.pool)
        .await?;

        let moves = sqlx::query_scalar::<_, String>(
            r"SELECT move_name FROM pokemon_moves WHERE pokemon_number = ? ORDER BY id",
        )
        .bind(number)
        .fetch_all(self.pool)
        .await?;

        let abilities = sqlx::query_scalar::<_, String>(
            r"SELECT ability_name FROM pokemon_abilities WHERE pokemon_number = ? ORDER BY id",
        )
        .bind(number)
        .fetch_all(self.pool)
        .await?;

        let evolution = sqlx::query_as::<_, EvolutionRow>(
            r"SELECT from_name, from_number FROM pokemon_evolutions WHERE pokemon_number = ?",
        )
        .bind(number)
        .fetch_optional(self.pool)
        .await?;

        let evolution_targets = sqlx::query_as::<_, EvolutionTargetRow>(
            r"SELECT to_name, to_number FROM pokemon_evolutions_to WHERE pokemon_number = ? ORDER BY id",
        )
        .bind(number)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(SpeciesGraph {
            species,
            types,
            stats,
            moves,
            abilities,
            evolution,
            evolution_targets,
        }))
    }

    /// Load the detail record of one species.
    ///
    /// Returns `Ok(None)` when no species has this number; a missing
    /// species is never reported as a partially filled record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if a query fails.
    pub async fn get_details(&self, number: i32) -> Result<Option<PokemonDetails>, DbError> {
        let graph = self.load_graph(number).await?;
        Ok(graph.map(projection::project_details))
    }
}

/// Insert the child rows and the evolution record of one species.
async fn insert_children(conn: &mut SqliteConnection, s: &NewSpecies) -> Result<(), DbError> {
    if !s.types.is_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT INTO pokemon_types (pokemon_number, type_label) ",
        );
        qb.push_values(&s.types, |mut row, label| {
            row.push_bind(s.number).push_bind(label.as_str());
        });
        qb.build().execute(&mut *conn).await?;
    }

    if !s.stats.is_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT INTO pokemon_stats (pokemon_number, stat_name, value) ",
        );
        qb.push_values(&s.stats, |mut row, stat| {
            row.push_bind(s.number)
                .push_bind(stat.name.as_str())
                .push_bind(stat.value);
        });
        qb.build().execute(&mut *conn).await?;
    }

    if !s.moves.is_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT INTO pokemon_moves (pokemon_number, move_name) ",
        );
        qb.push_values(&s.moves, |mut row, name| {
            row.push_bind(s.number).push_bind(name.as_str());
        });
        qb.build().execute(&mut *conn).await?;
    }

    if !s.abilities.is_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT INTO pokemon_abilities (pokemon_number, ability_name) ",
        );
        qb.push_values(&s.abilities, |mut row, name| {
            row.push_bind(s.number).push_bind(name.as_str());
        });
        qb.build().execute(&mut *conn).await?;
    }

    sqlx::query(
        r"INSERT INTO pokemon_evolutions (pokemon_number, from_name, from_number)
          VALUES (?, ?, ?)",
    )
    .bind(s.number)
    .bind(s.evolution.from.as_deref())
    .bind(s.evolution.from_number)
    .execute(&mut *conn)
    .await?;

    if !s.evolution.targets.is_empty() {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "INSERT INTO pokemon_evolutions_to (pokemon_number, to_name, to_number) ",
        );
        qb.push_values(&s.evolution.targets, |mut row, target| {
            row.push_bind(s.number)
                .push_bind(target.name.as_str())
                .push_bind(target.number);
        });
        qb.build().execute(&mut *conn).await?;
    }

    Ok(())
}

//! Filtered, sorted, paginated species table.
//!
//! One [`ListRequest`] becomes two statements sharing the same `WHERE`
//! clause: a count over the whole filtered set and a page query that
//! summarizes each species (first two types, move count). Text filters
//! are literal, case-insensitive substring matches; `number` is always
//! the final ascending sort key so pages never overlap or skip rows.

use pokedex_types::{ListRequest, PokemonTablePage, SortField, SpeciesFilters};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::DbError;
use crate::projection::{self, TableRowRecord};

/// Select list of a table row. Types are ranked by their sequence id.
const TABLE_ROW_COLUMNS: &str = r"SELECT p.number, p.name, p.generation, p.height, p.weight,
    (SELECT t.type_label FROM pokemon_types t
       WHERE t.pokemon_number = p.number ORDER BY t.id LIMIT 1) AS type1,
    (SELECT t.type_label FROM pokemon_types t
       WHERE t.pokemon_number = p.number ORDER BY t.id LIMIT 1 OFFSET 1) AS type2,
    (SELECT COUNT(*) FROM pokemon_moves m
       WHERE m.pokemon_number = p.number) AS moves_count
  FROM pokemon p";

/// Read-only queries over the species table.
pub struct TableStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TableStore<'a> {
    /// Create a new table store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Serve one page of the species table.
    ///
    /// `total_count` counts every species matching the filters, before
    /// pagination.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if a query fails.
    pub async fn list(&self, request: &ListRequest) -> Result<PokemonTablePage, DbError> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM pokemon p");
        push_filters(&mut count_query, &request.filters);
        let total_count: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut page_query = QueryBuilder::<Sqlite>::new(TABLE_ROW_COLUMNS);
        push_filters(&mut page_query, &request.filters);
        page_query
            .push(" ORDER BY p.")
            .push(sort_column(request.sort_by))
            .push(if request.sort_order.is_descending() {
                " DESC"
            } else {
                " ASC"
            });
        if request.sort_by != SortField::Number {
            page_query.push(", p.number ASC");
        }
        page_query
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());

        let rows = page_query
            .build_query_as::<TableRowRecord>()
            .fetch_all(self.pool)
            .await?;

        tracing::debug!(
            total_count,
            returned = rows.len(),
            filtered = !request.filters.is_empty(),
            sort_by = request.sort_by.as_str(),
            "Listed species page"
        );

        Ok(PokemonTablePage {
            page_number: request.page_number,
            page_size: request.page_size,
            total_count,
            results: rows.into_iter().map(projection::project_table_row).collect(),
        })
    }
}

/// Column backing a sort key. Never user-supplied text.
const fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Number => "number",
        SortField::Name => "name",
        SortField::Generation => "generation",
        SortField::Height => "height",
        SortField::Weight => "weight",
    }
}

/// Append the `WHERE` clause for `filters`, joining every present filter
/// with `AND`.
///
/// Filter text is folded here rather than in SQL: `SQLite`'s `lower()`
/// only folds ASCII, so `FLABÉBÉ` would never meet `lower('Flabébé')`.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &SpeciesFilters) {
    qb.push(" WHERE 1 = 1");

    if let Some(number) = filters.number {
        qb.push(" AND p.number = ").push_bind(number);
    }
    if let Some(name) = &filters.name {
        qb.push(" AND instr(lower(p.name), ")
            .push_bind(name.to_lowercase())
            .push(") > 0");
    }
    if let Some(label) = &filters.type_label {
        qb.push(
            " AND EXISTS (SELECT 1 FROM pokemon_types ft
                 WHERE ft.pokemon_number = p.number AND instr(lower(ft.type_label), ",
        )
        .push_bind(label.to_lowercase())
        .push(") > 0)");
    }
    if let Some(generation) = &filters.generation {
        qb.push(" AND instr(lower(p.generation), ")
            .push_bind(generation.to_lowercase())
            .push(") > 0");
    }
    if let Some(move_name) = &filters.move_name {
        qb.push(
            " AND EXISTS (SELECT 1 FROM pokemon_moves fm
                 WHERE fm.pokemon_number = p.number AND instr(lower(fm.move_name), ",
        )
        .push_bind(move_name.to_lowercase())
        .push(") > 0)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_clause(filters: &SpeciesFilters) -> String {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM pokemon p");
        push_filters(&mut qb, filters);
        qb.sql().to_owned()
    }

    #[test]
    fn no_filters_match_everything() {
        let sql = where_clause(&SpeciesFilters::default());
        assert!(sql.ends_with(" WHERE 1 = 1"));
    }

    #[test]
    fn filters_are_conjoined_and_bound() {
        let filters = SpeciesFilters {
            number: Some(6),
            name: Some(String::from("char")),
            type_label: Some(String::from("fire")),
            generation: None,
            move_name: Some(String::from("ember")),
        };
        let sql = where_clause(&filters);

        assert_eq!(sql.matches('?').count(), 4);
        assert!(sql.contains("pokemon_types"));
        assert!(sql.contains("pokemon_moves"));
        assert!(!sql.contains("char"));
    }
}

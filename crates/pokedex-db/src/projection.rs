//! Raw rows and their projection into response records.
//!
//! Stores fetch plain rows; the functions here reshape them into the
//! records served by the API. They do no I/O, so they are tested with
//! in-memory rows.

use pokedex_types::{Evolution, PokemonDetails, PokemonTableRow, Stat};

/// A row from the `pokemon` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SpeciesRow {
    /// National dex number.
    pub number: i64,
    /// Species name.
    pub name: String,
    /// Generation label.
    pub generation: String,
    /// Height.
    pub height: i64,
    /// Weight.
    pub weight: i64,
    /// Artwork URL.
    pub image: String,
}

/// A row from the `pokemon_stats` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StatRow {
    /// Stat name.
    pub stat_name: String,
    /// Stat value.
    pub value: i64,
}

/// A row from the `pokemon_evolutions` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EvolutionRow {
    /// Predecessor name as it appeared in the dataset.
    pub from_name: Option<String>,
    /// Resolved predecessor number.
    pub from_number: Option<i64>,
}

/// A row from the `pokemon_evolutions_to` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EvolutionTargetRow {
    /// Successor name as it appeared in the dataset.
    pub to_name: String,
    /// Resolved successor number.
    pub to_number: i64,
}

/// Everything stored for one species, children in sequence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesGraph {
    /// The species itself.
    pub species: SpeciesRow,
    /// Type labels.
    pub types: Vec<String>,
    /// Base stats.
    pub stats: Vec<StatRow>,
    /// Move names.
    pub moves: Vec<String>,
    /// Ability names.
    pub abilities: Vec<String>,
    /// Evolution record, if one was stored.
    pub evolution: Option<EvolutionRow>,
    /// Resolved successors.
    pub evolution_targets: Vec<EvolutionTargetRow>,
}

/// One row of the species table as returned by the listing query.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TableRowRecord {
    /// National dex number.
    pub number: i64,
    /// Species name.
    pub name: String,
    /// Generation label.
    pub generation: String,
    /// Height.
    pub height: i64,
    /// Weight.
    pub weight: i64,
    /// First type label by sequence, if any.
    pub type1: Option<String>,
    /// Second type label by sequence, if any.
    pub type2: Option<String>,
    /// Number of move rows.
    pub moves_count: i64,
}

/// Reshape a loaded species graph into the detail record.
///
/// A species without an evolution record gets an empty evolution block,
/// not an absent one.
pub fn project_details(graph: SpeciesGraph) -> PokemonDetails {
    let SpeciesGraph {
        species,
        types,
        stats,
        moves,
        abilities,
        evolution,
        evolution_targets,
    } = graph;

    let evolution = evolution.map_or_else(Evolution::default, |row| {
        let (to, to_numbers) = evolution_targets
            .into_iter()
            .map(|target| (target.to_name, narrow(target.to_number)))
            .unzip();
        Evolution {
            from: row.from_name,
            from_number: row.from_number.map(narrow),
            to,
            to_numbers,
        }
    });

    PokemonDetails {
        number: narrow(species.number),
        name: species.name,
        generation: species.generation,
        height: narrow(species.height),
        weight: narrow(species.weight),
        types,
        stats: stats
            .into_iter()
            .map(|s| Stat {
                name: s.stat_name,
                value: narrow(s.value),
            })
            .collect(),
        moves,
        abilities,
        evolution,
        image: species.image,
    }
}

/// Reshape a listing row into a table row.
pub fn project_table_row(row: TableRowRecord) -> PokemonTableRow {
    PokemonTableRow {
        number: narrow(row.number),
        name: row.name,
        generation: row.generation,
        height: narrow(row.height),
        weight: narrow(row.weight),
        type1: row.type1.unwrap_or_default(),
        type2: row.type2,
        moves_count: narrow(row.moves_count),
    }
}

/// `SQLite` integers are 64-bit; every stored value originated as 32-bit.
fn narrow(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn bulbasaur() -> SpeciesRow {
        SpeciesRow {
            number: 1,
            name: String::from("Bulbasaur"),
            generation: String::from("Generation I"),
            height: 7,
            weight: 69,
            image: String::from("https://img.example/1.png"),
        }
    }

    fn graph() -> SpeciesGraph {
        SpeciesGraph {
            species: bulbasaur(),
            types: vec![String::from("Grass"), String::from("Poison")],
            stats: vec![
                StatRow {
                    stat_name: String::from("HP"),
                    value: 45,
                },
                StatRow {
                    stat_name: String::from("Attack"),
                    value: 49,
                },
            ],
            moves: vec![String::from("Tackle"), String::from("Vine Whip")],
            abilities: vec![String::from("Overgrow")],
            evolution: Some(EvolutionRow {
                from_name: None,
                from_number: None,
            }),
            evolution_targets: vec![EvolutionTargetRow {
                to_name: String::from("Ivysaur"),
                to_number: 2,
            }],
        }
    }

    #[test]
    fn details_keep_sequence_order_and_pair_stats() {
        let details = project_details(graph());

        assert_eq!(details.number, 1);
        assert_eq!(details.types, vec!["Grass", "Poison"]);
        assert_eq!(details.moves, vec!["Tackle", "Vine Whip"]);
        assert_eq!(details.stats.len(), 2);
        assert_eq!(details.stats[0].name, "HP");
        assert_eq!(details.stats[0].value, 45);
        assert_eq!(details.stats[1].name, "Attack");
        assert_eq!(details.image, "https://img.example/1.png");
    }

    #[test]
    fn evolution_targets_become_parallel_lists() {
        let details = project_details(graph());

        assert_eq!(details.evolution.from, None);
        assert_eq!(details.evolution.from_number, None);
        assert_eq!(details.evolution.to, vec!["Ivysaur"]);
        assert_eq!(details.evolution.to_numbers, vec![2]);
    }

    #[test]
    fn missing_evolution_record_projects_to_empty_block() {
        let mut graph = graph();
        graph.evolution = None;
        // Orphaned targets cannot exist without their record.
        graph.evolution_targets.clear();

        let details = project_details(graph);
        assert_eq!(details.evolution, Evolution::default());
    }

    #[test]
    fn table_row_defaults_missing_first_type_to_empty() {
        let row = project_table_row(TableRowRecord {
            number: 132,
            name: String::from("Ditto"),
            generation: String::from("Generation I"),
            height: 3,
            weight: 40,
            type1: None,
            type2: None,
            moves_count: 1,
        });

        assert_eq!(row.type1, "");
        assert_eq!(row.type2, None);
        assert_eq!(row.moves_count, 1);
    }

    #[test]
    fn narrow_saturates() {
        assert_eq!(narrow(i64::MAX), i32::MAX);
        assert_eq!(narrow(i64::MIN), i32::MIN);
        assert_eq!(narrow(-3), -3);
    }
}

//! One-time import of the static JSON dataset.
//!
//! The dataset is an array of species records shaped like the detail
//! view. Field names match case-insensitively. Evolution links are given
//! by name and resolved to numbers here, once: an unresolvable
//! predecessor leaves `from_number` unset, and an unresolvable successor
//! is dropped from the list entirely.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use pokedex_types::Stat;
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::error::DbError;
use crate::species_store::{NewEvolution, NewEvolutionTarget, NewSpecies, SpeciesStore};

/// What happened when the seed loader ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held species; nothing was read.
    AlreadySeeded {
        /// Number of species found in the store.
        existing: i64,
    },
    /// The seed file does not exist. The store stays empty.
    FileMissing,
    /// The seed file holds no records. The store stays empty.
    EmptyDataset,
    /// The dataset was imported.
    Seeded {
        /// Number of species inserted.
        count: usize,
    },
}

/// One species record of the seed document.
///
/// Missing or `null` fields fall back to empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedRecord {
    /// National dex number.
    pub number: Option<i32>,
    /// Species name.
    pub name: Option<String>,
    /// Generation label.
    pub generation: Option<String>,
    /// Height.
    pub height: Option<i32>,
    /// Weight.
    pub weight: Option<i32>,
    /// Artwork URL.
    pub image: Option<String>,
    /// Type labels.
    pub types: Option<Vec<String>>,
    /// Base stats.
    pub stats: Option<Vec<SeedStat>>,
    /// Move names.
    pub moves: Option<Vec<String>>,
    /// Ability names.
    pub abilities: Option<Vec<String>>,
    /// Evolution links by name.
    pub evolution: Option<SeedEvolution>,
}

/// A stat entry of the seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedStat {
    /// Stat name.
    pub name: Option<String>,
    /// Stat value.
    pub value: Option<i32>,
}

/// The evolution block of the seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedEvolution {
    /// Predecessor name.
    pub from: Option<String>,
    /// Successor names.
    pub to: Option<Vec<Option<String>>>,
}

/// Parse a seed document.
///
/// Object keys are folded to lower case before decoding, which is how
/// field names match regardless of case. A top-level `null` is an empty
/// dataset.
///
/// # Errors
///
/// Returns [`DbError::Serialization`] if the text is not JSON or not an
/// array of species records.
pub fn parse_document(json: &str) -> Result<Vec<SeedRecord>, DbError> {
    let mut value: Value = serde_json::from_str(json)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    fold_keys(&mut value);
    Ok(serde_json::from_value(value)?)
}

/// Resolve evolution names and turn seed records into insertable species.
///
/// Order of records, and of every list inside them, is preserved.
///
/// # Errors
///
/// Returns [`DbError::SeedData`] if two species names fold to the same
/// key, since references to that name would be ambiguous.
pub fn build_batch(records: Vec<SeedRecord>) -> Result<Vec<NewSpecies>, DbError> {
    let index = name_index(&records)?;
    Ok(records
        .into_iter()
        .map(|record| resolve(record, &index))
        .collect())
}

/// Seed the store from `path` if it holds no species yet.
///
/// # Errors
///
/// Returns [`DbError`] if the store cannot be queried, the file cannot be
/// read or parsed, or the insert fails. A missing file is not an error.
pub async fn seed_if_empty(pool: &SqlitePool, path: &Path) -> Result<SeedOutcome, DbError> {
    let existing = SpeciesStore::new(pool).count_species().await?;
    if existing > 0 {
        tracing::info!(existing, "Database already contains species, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded { existing });
    }

    tracing::info!(path = %path.display(), "Database is empty, starting seed");
    seed_from_file(pool, path).await
}

/// Import the dataset at `path` unconditionally.
///
/// # Errors
///
/// See [`seed_if_empty`].
pub async fn seed_from_file(pool: &SqlitePool, path: &Path) -> Result<SeedOutcome, DbError> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Seed file not found, store stays empty");
            return Ok(SeedOutcome::FileMissing);
        }
        Err(e) => return Err(e.into()),
    };

    let records = parse_document(&json)?;
    if records.is_empty() {
        tracing::warn!(path = %path.display(), "Seed file is empty, store stays empty");
        return Ok(SeedOutcome::EmptyDataset);
    }

    let batch = build_batch(records)?;
    SpeciesStore::new(pool).batch_insert(&batch).await?;

    tracing::info!(count = batch.len(), "Seeded database");
    Ok(SeedOutcome::Seeded { count: batch.len() })
}

/// Lower-case every object key, recursively.
fn fold_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            for (key, mut child) in entries {
                fold_keys(&mut child);
                map.insert(key.to_lowercase(), child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(fold_keys),
        _ => {}
    }
}

/// Map folded species names to numbers. Blank names are left out.
fn name_index(records: &[SeedRecord]) -> Result<BTreeMap<String, i32>, DbError> {
    let mut index = BTreeMap::new();
    for record in records {
        let Some(name) = record.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        let number = record.number.unwrap_or_default();
        if let Some(previous) = index.insert(name.to_lowercase(), number) {
            return Err(DbError::SeedData(format!(
                "species name {name:?} is used by both #{previous} and #{number}"
            )));
        }
    }
    Ok(index)
}

fn lookup(index: &BTreeMap<String, i32>, name: &str) -> Option<i32> {
    if name.trim().is_empty() {
        return None;
    }
    index.get(&name.to_lowercase()).copied()
}

fn resolve(record: SeedRecord, index: &BTreeMap<String, i32>) -> NewSpecies {
    let evolution = record.evolution.unwrap_or_default();
    let from_number = evolution.from.as_deref().and_then(|name| lookup(index, name));
    let targets = evolution
        .to
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|name| lookup(index, &name).map(|number| NewEvolutionTarget { name, number }))
        .collect();

    NewSpecies {
        number: record.number.unwrap_or_default(),
        name: record.name.unwrap_or_default(),
        generation: record.generation.unwrap_or_default(),
        height: record.height.unwrap_or_default(),
        weight: record.weight.unwrap_or_default(),
        image: record.image.unwrap_or_default(),
        types: record.types.unwrap_or_default(),
        stats: record
            .stats
            .unwrap_or_default()
            .into_iter()
            .map(|s| Stat {
                name: s.name.unwrap_or_default(),
                value: s.value.unwrap_or_default(),
            })
            .collect(),
        moves: record.moves.unwrap_or_default(),
        abilities: record.abilities.unwrap_or_default(),
        evolution: NewEvolution {
            from: evolution.from,
            from_number,
            targets,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn record(number: i32, name: &str, from: Option<&str>, to: &[&str]) -> SeedRecord {
        SeedRecord {
            number: Some(number),
            name: Some(name.to_owned()),
            generation: Some(String::from("Generation I")),
            evolution: Some(SeedEvolution {
                from: from.map(str::to_owned),
                to: Some(to.iter().map(|t| Some((*t).to_owned())).collect()),
            }),
            ..SeedRecord::default()
        }
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let records = parse_document(
            r#"[{
                "Number": 25,
                "NAME": "Pikachu",
                "generation": "Generation I",
                "Height": 4,
                "Weight": 60,
                "Types": ["Electric"],
                "Stats": [{"Name": "HP", "VALUE": 35}],
                "Evolution": {"From": "Pichu", "TO": ["Raichu"]}
            }]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let pikachu = &records[0];
        assert_eq!(pikachu.number, Some(25));
        assert_eq!(pikachu.name.as_deref(), Some("Pikachu"));
        assert_eq!(pikachu.height, Some(4));
        assert_eq!(pikachu.types, Some(vec![String::from("Electric")]));
        let stats = pikachu.stats.as_ref().unwrap();
        assert_eq!(stats[0].name.as_deref(), Some("HP"));
        assert_eq!(stats[0].value, Some(35));
        let evolution = pikachu.evolution.as_ref().unwrap();
        assert_eq!(evolution.from.as_deref(), Some("Pichu"));
    }

    #[test]
    fn nulls_and_missing_fields_become_empty() {
        let records =
            parse_document(r#"[{"number": 132, "name": "Ditto", "types": null, "evolution": null}]"#)
                .unwrap();
        let batch = build_batch(records).unwrap();

        let ditto = &batch[0];
        assert_eq!(ditto.generation, "");
        assert_eq!(ditto.image, "");
        assert!(ditto.types.is_empty());
        assert!(ditto.moves.is_empty());
        assert_eq!(ditto.evolution, NewEvolution::default());
    }

    #[test]
    fn null_integers_become_zero() {
        let records = parse_document(
            r#"[{
                "number": 133,
                "name": "Eevee",
                "height": null,
                "weight": null,
                "stats": [{"name": "HP", "value": null}, {"name": "Speed"}]
            }]"#,
        )
        .unwrap();
        let batch = build_batch(records).unwrap();

        let eevee = &batch[0];
        assert_eq!(eevee.number, 133);
        assert_eq!(eevee.height, 0);
        assert_eq!(eevee.weight, 0);
        assert_eq!(
            eevee.stats,
            vec![
                Stat {
                    name: String::from("HP"),
                    value: 0,
                },
                Stat {
                    name: String::from("Speed"),
                    value: 0,
                },
            ]
        );
    }

    #[test]
    fn null_document_is_empty_dataset() {
        assert!(parse_document("null").unwrap().is_empty());
        assert!(parse_document("[]").unwrap().is_empty());
        assert!(parse_document("{\"not\": \"an array\"}").is_err());
    }

    #[test]
    fn evolution_names_resolve_case_insensitively() {
        let batch = build_batch(vec![
            record(1, "Bulbasaur", None, &["IVYSAUR"]),
            record(2, "Ivysaur", Some("bulbasaur"), &[]),
        ])
        .unwrap();

        assert_eq!(batch[0].evolution.from, None);
        assert_eq!(batch[0].evolution.from_number, None);
        assert_eq!(
            batch[0].evolution.targets,
            vec![NewEvolutionTarget {
                name: String::from("IVYSAUR"),
                number: 2,
            }]
        );
        // The name is copied verbatim; only the lookup is folded.
        assert_eq!(batch[1].evolution.from.as_deref(), Some("bulbasaur"));
        assert_eq!(batch[1].evolution.from_number, Some(1));
        assert!(batch[1].evolution.targets.is_empty());
    }

    #[test]
    fn unresolvable_targets_are_dropped() {
        let batch = build_batch(vec![
            record(1, "Bulbasaur", None, &["Ivysaur", "Missingno", "  "]),
            record(2, "Ivysaur", None, &[]),
        ])
        .unwrap();

        let targets = &batch[0].evolution.targets;
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "Ivysaur");
        assert_eq!(targets[0].number, 2);
    }

    #[test]
    fn unresolvable_predecessor_keeps_name_without_number() {
        let batch = build_batch(vec![record(2, "Ivysaur", Some("Seedling"), &[])]).unwrap();

        assert_eq!(batch[0].evolution.from.as_deref(), Some("Seedling"));
        assert_eq!(batch[0].evolution.from_number, None);
    }

    #[test]
    fn null_target_entries_are_skipped() {
        let records = parse_document(
            r#"[
                {"number": 1, "name": "Eevee", "evolution": {"to": [null, "Vaporeon"]}},
                {"number": 2, "name": "Vaporeon"}
            ]"#,
        )
        .unwrap();
        let batch = build_batch(records).unwrap();

        assert_eq!(batch[0].evolution.targets.len(), 1);
        assert_eq!(batch[0].evolution.targets[0].number, 2);
    }

    #[test]
    fn duplicate_folded_names_are_rejected() {
        let result = build_batch(vec![
            record(1, "Nidoran", None, &[]),
            record(2, "NIDORAN", None, &[]),
        ]);
        assert!(matches!(result, Err(DbError::SeedData(_))));
    }
}

//! Quest catalog loading from JSON seed files.
//!
//! All fail-open normalization lives here, at the catalog boundary, so the
//! resolver/partitioner/aggregator modules receive clean structured data
//! and contain no parsing or error-swallowing logic themselves. Malformed
//! structured fields degrade to empty defaults with a warning; only a
//! file-level read or parse failure is a real error.

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::logutil::escape_log;
use crate::metrics;
use crate::tracker::errors::TrackerError;
use crate::tracker::types::{ItemCategory, Quest, RequiredItem, ANY_LOCATION};

/// Raw on-disk quest shape. The upstream data source is loose: the
/// prerequisite field is sometimes a JSON array, sometimes a string
/// containing JSON, sometimes garbage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestSeed {
    id: String,
    name: String,
    trader: String,
    #[serde(default)]
    map_name: Option<String>,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    prerequisite_quests: Option<Value>,
    #[serde(default)]
    required_for_kappa: bool,
    #[serde(default)]
    required_items: Vec<Value>,
    #[serde(default)]
    objectives: Vec<String>,
    #[serde(default)]
    wiki_link: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    shopping_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RequiredItemSeed {
    category: String,
    name: String,
    #[serde(default = "default_item_count")]
    count: u32,
}

fn default_item_count() -> u32 {
    1
}

/// Parse the raw prerequisite field, or fall back to "no prerequisites".
/// The quest stays in the catalog either way.
fn normalize_prerequisites(quest_id: &str, raw: Option<Value>) -> Vec<String> {
    let value = match raw {
        None | Some(Value::Null) => return Vec::new(),
        Some(v) => v,
    };

    // Double-encoded variant: a string holding a JSON array.
    let value = match value {
        Value::String(inner) => match serde_json::from_str::<Value>(&inner) {
            Ok(parsed) => parsed,
            Err(_) => {
                metrics::inc_malformed_prerequisites();
                warn!(
                    "quest {}: unparseable prerequisite string, treating as none",
                    escape_log(quest_id)
                );
                return Vec::new();
            }
        },
        other => other,
    };

    match value {
        Value::Array(items) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(id) => ids.push(id),
                    _ => {
                        metrics::inc_malformed_prerequisites();
                        warn!(
                            "quest {}: non-string prerequisite entry dropped",
                            escape_log(quest_id)
                        );
                    }
                }
            }
            ids
        }
        _ => {
            metrics::inc_malformed_prerequisites();
            warn!(
                "quest {}: prerequisite field has unexpected shape, treating as none",
                escape_log(quest_id)
            );
            Vec::new()
        }
    }
}

fn normalize_category(raw: &str) -> Option<ItemCategory> {
    match raw {
        "keys" => Some(ItemCategory::Keys),
        "markers" => Some(ItemCategory::Markers),
        "jammers" => Some(ItemCategory::Jammers),
        "cameras" => Some(ItemCategory::Cameras),
        "fir" => Some(ItemCategory::Fir),
        _ => None,
    }
}

/// Keep well-formed item requirements, drop the rest with a warning.
fn normalize_required_items(quest_id: &str, raw: Vec<Value>) -> Vec<RequiredItem> {
    let mut items = Vec::with_capacity(raw.len());
    for value in raw {
        let seed: RequiredItemSeed = match serde_json::from_value(value) {
            Ok(seed) => seed,
            Err(_) => {
                metrics::inc_malformed_required_items();
                warn!(
                    "quest {}: malformed required-item entry dropped",
                    escape_log(quest_id)
                );
                continue;
            }
        };
        match normalize_category(&seed.category) {
            Some(category) => items.push(RequiredItem {
                category,
                name: seed.name,
                count: seed.count.max(1),
            }),
            None => {
                metrics::inc_malformed_required_items();
                warn!(
                    "quest {}: unknown item category '{}' dropped",
                    escape_log(quest_id),
                    escape_log(&seed.category)
                );
            }
        }
    }
    items
}

fn quest_from_seed(seed: QuestSeed) -> Quest {
    let prerequisite_quests = normalize_prerequisites(&seed.id, seed.prerequisite_quests);
    let required_items = normalize_required_items(&seed.id, seed.required_items);
    let map_name = match seed.map_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => ANY_LOCATION.to_string(),
    };
    Quest {
        id: seed.id,
        name: seed.name,
        trader: seed.trader,
        map_name,
        level: seed.level.unwrap_or(1).max(1),
        prerequisite_quests,
        required_for_kappa: seed.required_for_kappa,
        required_items,
        objectives: seed.objectives,
        wiki_link: seed.wiki_link,
        notes: seed.notes,
        images: seed.images,
        shopping_list: seed.shopping_list,
    }
}

/// Load a quest catalog from a JSON array at `path`.
pub fn load_quests_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Quest>, TrackerError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    load_quests_from_str(&contents).map_err(|e| {
        TrackerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to parse {}: {}", path.display(), e),
        ))
    })
}

/// Parse a catalog from an in-memory JSON string (used by tests and by
/// callers that fetch the catalog over the network).
pub fn load_quests_from_str(contents: &str) -> Result<Vec<Quest>, serde_json::Error> {
    let seeds: Vec<QuestSeed> = serde_json::from_str(contents)?;
    Ok(seeds.into_iter().map(quest_from_seed).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_encoded_prerequisites_parse() {
        let json = r#"[{
            "id": "gunsmith_1",
            "name": "Gunsmith - Part 1",
            "trader": "Mechanic",
            "requiredForKappa": true,
            "prerequisiteQuests": "[\"debut\",\"supplier\"]"
        }]"#;
        let quests = load_quests_from_str(json).unwrap();
        assert_eq!(quests[0].prerequisite_quests, vec!["debut", "supplier"]);
    }

    #[test]
    fn garbage_prerequisites_fail_open() {
        let before = metrics::snapshot().malformed_prerequisites;
        let json = r#"[{
            "id": "broken",
            "name": "Broken",
            "trader": "Skier",
            "requiredForKappa": true,
            "prerequisiteQuests": "not json at all"
        }]"#;
        let quests = load_quests_from_str(json).unwrap();
        assert!(quests[0].prerequisite_quests.is_empty());
        assert!(metrics::snapshot().malformed_prerequisites > before);
    }

    #[test]
    fn unknown_item_categories_are_dropped() {
        let json = r#"[{
            "id": "keyed",
            "name": "Keyed",
            "trader": "Therapist",
            "requiredForKappa": true,
            "requiredItems": [
                {"category": "keys", "name": "Dorm 114 key", "count": 1},
                {"category": "vehicles", "name": "UAZ", "count": 1}
            ]
        }]"#;
        let quests = load_quests_from_str(json).unwrap();
        assert_eq!(quests[0].required_items.len(), 1);
        assert_eq!(quests[0].required_items[0].category, ItemCategory::Keys);
    }

    #[test]
    fn missing_map_and_level_get_defaults() {
        let json = r#"[{"id": "bare", "name": "Bare", "trader": "Fence", "requiredForKappa": true}]"#;
        let quests = load_quests_from_str(json).unwrap();
        assert_eq!(quests[0].map_name, ANY_LOCATION);
        assert_eq!(quests[0].level, 1);
    }
}

/// Integration tests for catalog loading and graph construction from a
/// realistic seed file, including the fail-open normalization paths.
use kappatrack::tracker::types::{ItemCategory, ANY_LOCATION};
use kappatrack::tracker::{load_quests_from_json, load_quests_from_str, QuestGraph};
use std::io::Write;
use tempfile::NamedTempFile;

const SEED: &str = r#"[
    {
        "id": "debut",
        "name": "Debut",
        "trader": "Prapor",
        "mapName": "Customs",
        "level": 1,
        "requiredForKappa": true,
        "objectives": ["Eliminate 5 Scavs", "Hand over 2 MP-133 shotguns"]
    },
    {
        "id": "shortage",
        "name": "Shortage",
        "trader": "Therapist",
        "level": 2,
        "requiredForKappa": true,
        "prerequisiteQuests": ["debut"],
        "requiredItems": [
            {"category": "fir", "name": "Salewa", "count": 3}
        ]
    },
    {
        "id": "gunsmith_1",
        "name": "Gunsmith - Part 1",
        "trader": "Mechanic",
        "level": 5,
        "requiredForKappa": true,
        "prerequisiteQuests": "[\"debut\"]"
    },
    {
        "id": "legacy_junk",
        "name": "Legacy Junk",
        "trader": "Fence",
        "requiredForKappa": true,
        "prerequisiteQuests": {"unexpected": "object"}
    },
    {
        "id": "side_hustle",
        "name": "Side Hustle",
        "trader": "Fence",
        "requiredForKappa": false
    }
]"#;

#[test]
fn seed_file_loads_and_indexes() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SEED.as_bytes()).unwrap();

    let quests = load_quests_from_json(file.path()).unwrap();
    assert_eq!(quests.len(), 5);

    let graph = QuestGraph::new(quests);
    assert_eq!(graph.total_kappa(), 4, "non-Kappa quest excluded from count");
    assert_eq!(graph.prerequisites_of("shortage"), ["debut"]);

    let dependents: Vec<&str> = graph
        .dependents_of("debut")
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(dependents, vec!["shortage", "gunsmith_1"]);
}

#[test]
fn double_encoded_and_malformed_prerequisites_normalize() {
    let quests = load_quests_from_str(SEED).unwrap();
    let gunsmith = quests.iter().find(|q| q.id == "gunsmith_1").unwrap();
    assert_eq!(gunsmith.prerequisite_quests, vec!["debut"]);

    // Unexpected shape fails open: quest kept, prerequisites empty.
    let junk = quests.iter().find(|q| q.id == "legacy_junk").unwrap();
    assert!(junk.prerequisite_quests.is_empty());
}

#[test]
fn defaults_applied_at_the_boundary() {
    let quests = load_quests_from_str(SEED).unwrap();
    let shortage = quests.iter().find(|q| q.id == "shortage").unwrap();
    assert_eq!(shortage.map_name, ANY_LOCATION, "missing map defaults");
    assert_eq!(shortage.required_items[0].category, ItemCategory::Fir);
    assert_eq!(shortage.required_items[0].count, 3);

    let junk = quests.iter().find(|q| q.id == "legacy_junk").unwrap();
    assert_eq!(junk.level, 1, "missing level defaults to 1");
}

#[test]
fn file_level_garbage_is_a_real_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"this is not json").unwrap();
    assert!(load_quests_from_json(file.path()).is_err());
}

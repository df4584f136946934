use serde_json::{Value, json};

use canonical_merge::config::{FieldSpecTable, MergerConfig, SetLayout};
use canonical_merge::data::{CanonicalField, SetEntry, Sourced};
use canonical_merge::extract::Strategy;
use canonical_merge::{EntityType, canonicalize, merge};

fn build_table() -> FieldSpecTable {
    FieldSpecTable::builder("tools")
        .scalar("name", &["a.name", "b.name"])
        .per_language(
            "longDescription",
            vec![("en", vec!["a.about", "b.about"]), ("fr", vec!["b.apropos"])],
        )
        .set(
            "tags",
            SetLayout::ByLanguage,
            vec![
                ("x.cats", Strategy::list(Some("en"))),
                ("y.cat", Strategy::single("en")),
            ],
        )
        .scalar("website", &["a.url", "b.url"])
        .build()
        .unwrap()
}

fn build_record() -> Value {
    json!({
        "a": {"name": "  ", "about": "Realtime editor", "url": ""},
        "b": {"name": "Etherpad", "about": "Other text", "apropos": "Éditeur", "url": "https://etherpad.org"},
        "x": {"cats": ["wiki", "editor"]},
        "y": {"cat": "wiki"},
    })
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => out.push(text.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}

#[test]
fn blank_first_candidate_falls_through_to_next_source() {
    let canonical = merge(&build_record(), &build_table()).unwrap();
    assert_eq!(
        canonical.get("name"),
        Some(&CanonicalField::Scalar(Sourced {
            source: "b".into(),
            value: "Etherpad".into(),
        }))
    );
}

#[test]
fn first_listed_source_wins_regardless_of_content() {
    let canonical = merge(&build_record(), &build_table()).unwrap();
    let description = canonical.get("longDescription").unwrap();
    assert_eq!(description.in_language("en").unwrap().source, "a");
    assert_eq!(description.in_language("en").unwrap().value, "Realtime editor");
    assert_eq!(description.in_language("fr").unwrap().source, "b");
}

#[test]
fn identical_values_from_different_sources_are_unioned() {
    let canonical = merge(&build_record(), &build_table()).unwrap();
    let tags = canonical.get("tags").unwrap().set_entries(Some("en")).unwrap();
    assert_eq!(
        tags,
        &[
            SetEntry {
                value: "editor".into(),
                sources: vec!["x".into()],
            },
            SetEntry {
                value: "wiki".into(),
                sources: vec!["x".into(), "y".into()],
            },
        ]
    );
}

#[test]
fn set_values_differing_only_by_case_stay_distinct() {
    let record = json!({"x": {"cats": ["Python", "python", "python "]}, "y": {"cat": "Python"}});
    let canonical = merge(&record, &build_table()).unwrap();
    let tags = canonical.get("tags").unwrap().set_entries(Some("en")).unwrap();
    let values: Vec<&str> = tags.iter().map(|entry| entry.value.as_str()).collect();
    assert_eq!(values, vec!["Python", "python"]);
    assert_eq!(tags[0].sources, vec!["x", "y"]);
    assert_eq!(tags[1].sources, vec!["x"]);
}

#[test]
fn blank_values_never_reach_canonical_output() {
    let record = json!({
        "a": {"name": "\t", "about": " ", "url": "  "},
        "b": {"name": "Pad", "url": "\n"},
        "x": {"cats": ["", "  ", "wiki"]},
        "y": {"cat": " "},
    });
    let mut record = record;
    canonicalize(&mut record, &build_table(), &MergerConfig::default()).unwrap();
    let mut strings = Vec::new();
    collect_strings(&record["canonical"], &mut strings);
    assert!(!strings.is_empty());
    assert!(strings.iter().all(|text| !text.trim().is_empty()));
    assert!(strings.iter().all(|text| text.trim() == text));
}

#[test]
fn unresolved_fields_are_omitted() {
    let record = json!({"b": {"name": "Pad"}, "unrelated": {"url": "x"}});
    let canonical = merge(&record, &build_table()).unwrap();
    assert_eq!(canonical.len(), 1);
    assert!(canonical.get("website").is_none());
    assert!(canonical.get("tags").is_none());
    assert!(canonical.get("longDescription").is_none());
}

#[test]
fn remerging_is_byte_identical() {
    let table = build_table();
    let config = MergerConfig::default();
    let mut once = build_record();
    canonicalize(&mut once, &table, &config).unwrap();
    let mut twice = once.clone();
    canonicalize(&mut twice, &table, &config).unwrap();
    assert_eq!(
        serde_json::to_string(&once).unwrap(),
        serde_json::to_string(&twice).unwrap()
    );
    assert_eq!(merge(&build_record(), &table).unwrap(), merge(&once, &table).unwrap());
}

#[test]
fn stale_canonical_block_is_discarded() {
    let table = build_table();
    let mut record = json!({
        "canonical": {
            "name": {"source": "a", "value": "Old name"},
            "license": {"source": "z", "value": "GPL"},
        },
        "b": {"name": "Etherpad"},
        "y": {"cat": "wiki"},
    });
    canonicalize(&mut record, &table, &MergerConfig::default()).unwrap();
    assert_eq!(
        record["canonical"],
        json!({
            "name": {"source": "b", "value": "Etherpad"},
            "tags": {"en": [{"value": "wiki", "sources": ["y"]}]},
        })
    );
}

#[test]
fn canonical_output_follows_table_order() {
    let mut record = build_record();
    canonicalize(&mut record, &build_table(), &MergerConfig::default()).unwrap();
    let keys: Vec<&str> = record["canonical"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["name", "longDescription", "tags", "website"]);
    let top: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(top, vec!["a", "b", "x", "y", "canonical"]);
}

#[test]
fn builtin_tables_are_deterministic_across_runs() {
    let record = json!({
        "wikidata": {
            "label": [{"value": "Loomio", "xml:lang": "en"}],
            "genre_label": [{"value": "groupware", "xml:lang": "en"}, {"value": "collecticiel", "xml:lang": "fr"}],
        },
        "civicstack": {"tags": [{"name": {"en": "Decision making", "es": "Toma de decisiones"}}]},
        "nuit-debout": {"Fonction": "Décision"},
    });
    let table = EntityType::Tool.table().unwrap();
    let first = merge(&record, &table).unwrap().to_value().unwrap();
    for _ in 0..5 {
        let again = merge(&record, &table).unwrap().to_value().unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }
    let languages: Vec<&str> = first["tags"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(languages, vec!["en", "es", "fr"]);
    assert_eq!(
        first["tags"]["fr"],
        json!([
            {"value": "Décision", "sources": ["nuit-debout"]},
            {"value": "collecticiel", "sources": ["wikidata"]},
        ])
    );
}

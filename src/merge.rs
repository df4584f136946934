//! Canonical record derivation.
//!
//! Merge policy per field kind:
//! - scalar: the first candidate yielding a non-empty value wins and later
//!   candidates are never resolved;
//! - language map: the same rule, applied to every language slot on its own;
//! - sourced set: every candidate is evaluated and each distinct value keeps
//!   the sorted union of the sources that produced it.
//!
//! Fields that resolve to nothing are left out of the canonical record.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::{FieldSpec, FieldSpecTable, LanguageCandidates, MergerConfig, SetLayout};
use crate::data::{CanonicalField, CanonicalRecord, SetEntry, Sourced, SourcedSet};
use crate::errors::MergeError;
use crate::extract::{Candidate, extract};
use crate::types::{LanguageCode, SourceId};

/// Derive the canonical record of `record` from `table`.
///
/// Pure: `record` is only read, and only through the table's candidate paths.
pub fn merge(record: &Value, table: &FieldSpecTable) -> Result<CanonicalRecord, MergeError> {
    let mut canonical = CanonicalRecord::new();
    for (name, spec) in table.fields() {
        match merge_field(record, spec)? {
            Some(field) => {
                debug!(entity = table.entity(), field = %name, "canonical field resolved");
                canonical.insert(name.clone(), field);
            }
            None => debug!(entity = table.entity(), field = %name, "no candidate resolved"),
        }
    }
    Ok(canonical)
}

/// Merge `record` and store the result under the configured canonical key.
///
/// Any previous canonical block is discarded; when nothing resolves the key is
/// removed altogether.
pub fn canonicalize(
    record: &mut Value,
    table: &FieldSpecTable,
    config: &MergerConfig,
) -> Result<CanonicalRecord, MergeError> {
    if table.reads_source(&config.canonical_key) {
        return Err(MergeError::Configuration(format!(
            "{}: table reads from the canonical key '{}'",
            table.entity(),
            config.canonical_key
        )));
    }
    if !record.is_object() {
        return Err(MergeError::InvalidRecord(format!(
            "expected a mapping keyed by source, found {}",
            crate::utils::value_kind(record)
        )));
    }
    let canonical = merge(record, table)?;
    let rendered = if canonical.is_empty() {
        None
    } else {
        Some(canonical.to_value()?)
    };
    if let Some(raw) = record.as_object_mut() {
        match rendered {
            Some(rendered) => {
                raw.insert(config.canonical_key.clone(), rendered);
            }
            None => {
                raw.shift_remove(&config.canonical_key);
            }
        }
    }
    Ok(canonical)
}

/// A field-spec table bundled with merger options.
#[derive(Clone, Debug)]
pub struct Merger {
    table: FieldSpecTable,
    config: MergerConfig,
}

impl Merger {
    /// Merger over `table` with default options.
    pub fn new(table: FieldSpecTable) -> Self {
        Self::with_config(table, MergerConfig::default())
    }

    /// Merger over `table` with explicit options.
    pub fn with_config(table: FieldSpecTable, config: MergerConfig) -> Self {
        Self { table, config }
    }

    /// Field-spec table in use.
    pub fn table(&self) -> &FieldSpecTable {
        &self.table
    }

    /// Options in use.
    pub fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// See [`merge`].
    pub fn merge(&self, record: &Value) -> Result<CanonicalRecord, MergeError> {
        merge(record, &self.table)
    }

    /// See [`canonicalize`].
    pub fn canonicalize(&self, record: &mut Value) -> Result<CanonicalRecord, MergeError> {
        canonicalize(record, &self.table, &self.config)
    }
}

fn merge_field(record: &Value, spec: &FieldSpec) -> Result<Option<CanonicalField>, MergeError> {
    let field = match spec {
        FieldSpec::Scalar(candidates) => first_match(record, candidates)?.map(CanonicalField::Scalar),
        FieldSpec::LanguageMap(LanguageCandidates::PerLanguage(slots)) => {
            let mut by_language = BTreeMap::new();
            for (language, candidates) in slots {
                if let Some(sourced) = first_match(record, candidates)? {
                    by_language.insert(language.clone(), sourced);
                }
            }
            non_empty(by_language).map(CanonicalField::LanguageMap)
        }
        FieldSpec::LanguageMap(LanguageCandidates::Tagged(candidates)) => {
            let mut by_language: BTreeMap<LanguageCode, Sourced> = BTreeMap::new();
            for value in extract(record, candidates) {
                let value = value?;
                let Some(language) = value.language else {
                    continue;
                };
                by_language.entry(language).or_insert(Sourced {
                    source: value.source,
                    value: value.value,
                });
            }
            non_empty(by_language).map(CanonicalField::LanguageMap)
        }
        FieldSpec::SourcedSet { candidates, layout } => {
            union(record, candidates, layout)?.map(CanonicalField::SourcedSet)
        }
    };
    Ok(field)
}

fn first_match(record: &Value, candidates: &[Candidate]) -> Result<Option<Sourced>, MergeError> {
    match extract(record, candidates).next() {
        Some(value) => {
            let value = value?;
            Ok(Some(Sourced {
                source: value.source,
                value: value.value,
            }))
        }
        None => Ok(None),
    }
}

type SourcesByValue = BTreeMap<String, BTreeSet<SourceId>>;

fn union(
    record: &Value,
    candidates: &[Candidate],
    layout: &SetLayout,
) -> Result<Option<SourcedSet>, MergeError> {
    let mut by_language: BTreeMap<Option<LanguageCode>, SourcesByValue> = BTreeMap::new();
    for value in extract(record, candidates) {
        let value = value?;
        if !layout.accepts(value.language.as_deref()) {
            continue;
        }
        by_language
            .entry(value.language)
            .or_default()
            .entry(value.value)
            .or_default()
            .insert(value.source);
    }
    let set = match layout {
        SetLayout::ByLanguage => non_empty(
            by_language
                .into_iter()
                .filter_map(|(language, values)| language.map(|language| (language, entries(values))))
                .collect::<BTreeMap<_, _>>(),
        )
        .map(SourcedSet::ByLanguage),
        SetLayout::Flat { .. } => {
            let mut merged = SourcesByValue::new();
            for values in by_language.into_values() {
                for (value, sources) in values {
                    merged.entry(value).or_default().extend(sources);
                }
            }
            (!merged.is_empty()).then(|| SourcedSet::Flat(entries(merged)))
        }
    };
    Ok(set)
}

fn entries(values: SourcesByValue) -> Vec<SetEntry> {
    values
        .into_iter()
        .map(|(value, sources)| SetEntry {
            value,
            sources: sources.into_iter().collect(),
        })
        .collect()
}

fn non_empty<K: Ord, V>(map: BTreeMap<K, V>) -> Option<BTreeMap<K, V>> {
    (!map.is_empty()).then_some(map)
}

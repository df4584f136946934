use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::types::{EntityId, FieldName, LanguageCode, SourceId};

/// A single canonical value and the source it was taken from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sourced {
    /// Source that won the priority race for this slot.
    pub source: SourceId,
    /// Trimmed value.
    pub value: String,
}

/// One distinct value of a set field and every source that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Trimmed value, compared by exact string equality.
    pub value: String,
    /// Contributing sources, sorted and unique.
    pub sources: Vec<SourceId>,
}

/// Values of a set field, sorted by value.
pub type SetEntries = Vec<SetEntry>;

/// Layout of a canonical set field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourcedSet {
    /// One list of entries.
    Flat(SetEntries),
    /// Entries partitioned by language code.
    ByLanguage(BTreeMap<LanguageCode, SetEntries>),
}

/// A merged field of the canonical record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalField {
    /// First-match-wins value.
    Scalar(Sourced),
    /// Per-language first-match-wins values.
    LanguageMap(BTreeMap<LanguageCode, Sourced>),
    /// Union of values with provenance.
    SourcedSet(SourcedSet),
}

impl CanonicalField {
    /// Scalar value, if this is a scalar field.
    pub fn as_scalar(&self) -> Option<&Sourced> {
        match self {
            Self::Scalar(sourced) => Some(sourced),
            _ => None,
        }
    }

    /// Value for `language`, if this is a language map.
    pub fn in_language(&self, language: &str) -> Option<&Sourced> {
        match self {
            Self::LanguageMap(by_language) => by_language.get(language),
            _ => None,
        }
    }

    /// Set entries: the flat list, or the `language` partition.
    pub fn set_entries(&self, language: Option<&str>) -> Option<&[SetEntry]> {
        match (self, language) {
            (Self::SourcedSet(SourcedSet::Flat(entries)), _) => Some(entries),
            (Self::SourcedSet(SourcedSet::ByLanguage(by_language)), Some(language)) => {
                by_language.get(language).map(Vec::as_slice)
            }
            _ => None,
        }
    }

    /// Every source backing a value of this field, once per value slot.
    pub fn provenance(&self) -> Vec<&str> {
        match self {
            Self::Scalar(sourced) => vec![sourced.source.as_str()],
            Self::LanguageMap(by_language) => by_language
                .values()
                .map(|sourced| sourced.source.as_str())
                .collect(),
            Self::SourcedSet(SourcedSet::Flat(entries)) => entries_provenance(entries).collect(),
            Self::SourcedSet(SourcedSet::ByLanguage(by_language)) => by_language
                .values()
                .flat_map(|entries| entries_provenance(entries))
                .collect(),
        }
    }
}

fn entries_provenance(entries: &[SetEntry]) -> impl Iterator<Item = &str> {
    entries
        .iter()
        .flat_map(|entry| entry.sources.iter().map(String::as_str))
}

/// Merged view of one entity, keyed by canonical field name in table order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    fields: IndexMap<FieldName, CanonicalField>,
}

impl CanonicalRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<FieldName>, field: CanonicalField) {
        self.fields.insert(name.into(), field);
    }

    /// Field by canonical name.
    pub fn get(&self, name: &str) -> Option<&CanonicalField> {
        self.fields.get(name)
    }

    /// Fields in table order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CanonicalField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field resolved.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Scalar value text of `name`.
    pub fn scalar_value(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(CanonicalField::as_scalar)
            .map(|sourced| sourced.value.as_str())
    }

    /// Serialize into the JSON-like tree attached to raw records.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// One raw multi-source record in a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    /// Stable entity identifier (used in reports and logs).
    pub id: EntityId,
    /// Raw record keyed by source name.
    pub record: Value,
}

impl RawEntity {
    /// Pair `record` with its identifier.
    pub fn new(id: impl Into<EntityId>, record: Value) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}

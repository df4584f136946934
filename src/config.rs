use std::collections::HashSet;

use crate::constants::language::EN;
use crate::constants::record::CANONICAL_KEY;
use crate::errors::MergeError;
use crate::extract::{Candidate, Strategy};
use crate::types::{FieldName, LanguageCode};

/// Candidate lists of a language-keyed text field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LanguageCandidates {
    /// Each target language owns its own priority list.
    PerLanguage(Vec<(LanguageCode, Vec<Candidate>)>),
    /// One priority list whose strategies produce the languages; each language
    /// keeps the first value seen for it.
    Tagged(Vec<Candidate>),
}

/// Output layout of a set-valued field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetLayout {
    /// Partition values by language; untagged values are dropped.
    ByLanguage,
    /// Single sorted list; only values tagged with one of `languages` are kept.
    Flat { languages: Vec<Option<LanguageCode>> },
}

impl SetLayout {
    /// Flat layout accepting untagged and English values.
    pub fn flat() -> Self {
        Self::Flat {
            languages: vec![None, Some(EN.to_string())],
        }
    }

    /// True when a value tagged `language` belongs in this layout.
    pub fn accepts(&self, language: Option<&str>) -> bool {
        match self {
            Self::ByLanguage => language.is_some(),
            Self::Flat { languages } => languages
                .iter()
                .any(|accepted| accepted.as_deref() == language),
        }
    }
}

/// Merge policy and candidates of one canonical field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldSpec {
    /// First non-empty candidate wins.
    Scalar(Vec<Candidate>),
    /// Each language slot independently takes its first non-empty candidate.
    LanguageMap(LanguageCandidates),
    /// Union of every candidate, with the sources behind each value.
    SourcedSet {
        candidates: Vec<Candidate>,
        layout: SetLayout,
    },
}

impl FieldSpec {
    /// Every candidate of this field, in declaration order.
    pub fn candidates(&self) -> Box<dyn Iterator<Item = &Candidate> + '_> {
        match self {
            Self::Scalar(candidates)
            | Self::LanguageMap(LanguageCandidates::Tagged(candidates))
            | Self::SourcedSet { candidates, .. } => Box::new(candidates.iter()),
            Self::LanguageMap(LanguageCandidates::PerLanguage(slots)) => {
                Box::new(slots.iter().flat_map(|(_, candidates)| candidates.iter()))
            }
        }
    }
}

/// Ordered, immutable field-spec table for one entity type.
///
/// Field order is the order of the canonical record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpecTable {
    entity: String,
    fields: Vec<(FieldName, FieldSpec)>,
}

impl FieldSpecTable {
    /// Start a table for the entity type labelled `entity` (e.g. `tools`).
    pub fn builder(entity: impl Into<String>) -> FieldSpecTableBuilder {
        FieldSpecTableBuilder {
            entity: entity.into(),
            fields: Vec::new(),
            error: None,
        }
    }

    /// Entity type label.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Fields in canonical order.
    pub fn fields(&self) -> &[(FieldName, FieldSpec)] {
        &self.fields
    }

    /// Look up one field spec by canonical name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, spec)| spec)
    }

    /// True when any candidate reads from `source`.
    pub fn reads_source(&self, source: &str) -> bool {
        self.fields
            .iter()
            .flat_map(|(_, spec)| spec.candidates())
            .any(|candidate| candidate.path.source() == source)
    }

    /// Distinct source names referenced by this table, sorted.
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self
            .fields
            .iter()
            .flat_map(|(_, spec)| spec.candidates())
            .map(|candidate| candidate.path.source())
            .collect();
        sources.sort_unstable();
        sources.dedup();
        sources
    }
}

/// Builder for [`FieldSpecTable`]; the first invalid path is reported by `build`.
#[derive(Debug)]
pub struct FieldSpecTableBuilder {
    entity: String,
    fields: Vec<(FieldName, FieldSpec)>,
    error: Option<MergeError>,
}

impl FieldSpecTableBuilder {
    /// Scalar field read from plain strings at `paths`, most trusted first.
    pub fn scalar(self, name: &str, paths: &[&str]) -> Self {
        let candidates = paths
            .iter()
            .map(|path| (*path, Strategy::untagged()))
            .collect::<Vec<_>>();
        self.scalar_with(name, candidates)
    }

    /// Scalar field with explicit strategies.
    pub fn scalar_with(mut self, name: &str, candidates: Vec<(&str, Strategy)>) -> Self {
        if let Some(candidates) = self.candidates(candidates) {
            self.fields
                .push((name.to_string(), FieldSpec::Scalar(candidates)));
        }
        self
    }

    /// Language map with a priority list of plain-string paths per language.
    pub fn per_language(mut self, name: &str, slots: Vec<(&str, Vec<&str>)>) -> Self {
        let mut parsed = Vec::with_capacity(slots.len());
        for (language, paths) in slots {
            let candidates = paths
                .into_iter()
                .map(|path| (path, Strategy::single(language)))
                .collect();
            match self.candidates(candidates) {
                Some(candidates) => parsed.push((language.to_string(), candidates)),
                None => return self,
            }
        }
        self.fields.push((
            name.to_string(),
            FieldSpec::LanguageMap(LanguageCandidates::PerLanguage(parsed)),
        ));
        self
    }

    /// Language map fed by one priority list of language-producing candidates.
    pub fn tagged(mut self, name: &str, candidates: Vec<(&str, Strategy)>) -> Self {
        if let Some(candidates) = self.candidates(candidates) {
            self.fields.push((
                name.to_string(),
                FieldSpec::LanguageMap(LanguageCandidates::Tagged(candidates)),
            ));
        }
        self
    }

    /// Set-valued field unioned over every candidate.
    pub fn set(mut self, name: &str, layout: SetLayout, candidates: Vec<(&str, Strategy)>) -> Self {
        if let Some(candidates) = self.candidates(candidates) {
            self.fields.push((
                name.to_string(),
                FieldSpec::SourcedSet { candidates, layout },
            ));
        }
        self
    }

    /// Validate and freeze the table.
    pub fn build(self) -> Result<FieldSpecTable, MergeError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut seen = HashSet::new();
        for (name, spec) in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(MergeError::Configuration(format!(
                    "{}: field '{name}' is declared twice",
                    self.entity
                )));
            }
            let mut candidates = spec.candidates().peekable();
            if candidates.peek().is_none() {
                return Err(MergeError::Configuration(format!(
                    "{}: field '{name}' has no candidate paths",
                    self.entity
                )));
            }
            if let Some(candidate) = candidates.find(|c| c.path.source() == CANONICAL_KEY) {
                return Err(MergeError::Configuration(format!(
                    "{}: field '{name}' reads reserved key via '{}'",
                    self.entity, candidate.path
                )));
            }
        }
        Ok(FieldSpecTable {
            entity: self.entity,
            fields: self.fields,
        })
    }

    fn candidates(&mut self, raw: Vec<(&str, Strategy)>) -> Option<Vec<Candidate>> {
        if self.error.is_some() {
            return None;
        }
        match raw
            .into_iter()
            .map(|(path, strategy)| Candidate::new(path, strategy))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(candidates) => Some(candidates),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

/// Runtime options of the merger and the batch driver.
#[derive(Clone, Debug)]
pub struct MergerConfig {
    /// Raw-record key receiving the canonical record.
    pub canonical_key: String,
    /// Fan entities out over the rayon pool in `merge_batch`.
    pub parallel: bool,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            canonical_key: CANONICAL_KEY.to_string(),
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let table = FieldSpecTable::builder("tools")
            .scalar("name", &["a.name", "b.name"])
            .per_language(
                "longDescription",
                vec![("en", vec!["a.description"]), ("fr", vec![])],
            )
            .set("tags", SetLayout::ByLanguage, vec![("x.cats", Strategy::list(Some("en")))])
            .build()
            .unwrap();
        let names: Vec<&str> = table.fields().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["name", "longDescription", "tags"]);
        assert_eq!(table.entity(), "tools");
        assert_eq!(table.sources(), vec!["a", "b", "x"]);
        assert!(table.reads_source("x"));
        assert!(!table.reads_source("y"));
        assert!(matches!(table.field("name"), Some(FieldSpec::Scalar(c)) if c.len() == 2));
    }

    #[test]
    fn builder_reports_first_invalid_path() {
        let err = FieldSpecTable::builder("tools")
            .scalar("name", &["a..name"])
            .scalar("website", &["b.url"])
            .build()
            .unwrap_err();
        assert!(matches!(err, MergeError::Configuration(msg) if msg.contains("a..name")));
    }

    #[test]
    fn builder_rejects_duplicates_empty_fields_and_reserved_source() {
        let duplicate = FieldSpecTable::builder("tools")
            .scalar("name", &["a.name"])
            .scalar("name", &["b.name"])
            .build();
        assert!(matches!(duplicate, Err(MergeError::Configuration(msg)) if msg.contains("twice")));

        let empty = FieldSpecTable::builder("tools")
            .per_language("longDescription", vec![("en", vec![]), ("fr", vec![])])
            .build();
        assert!(matches!(empty, Err(MergeError::Configuration(msg)) if msg.contains("no candidate")));

        let reserved = FieldSpecTable::builder("tools")
            .scalar("name", &["canonical.name.value"])
            .build();
        assert!(matches!(reserved, Err(MergeError::Configuration(msg)) if msg.contains("reserved")));
    }

    #[test]
    fn flat_layout_accepts_untagged_and_english_only() {
        let flat = SetLayout::flat();
        assert!(flat.accepts(None));
        assert!(flat.accepts(Some("en")));
        assert!(!flat.accepts(Some("fr")));
        assert!(SetLayout::ByLanguage.accepts(Some("fr")));
        assert!(!SetLayout::ByLanguage.accepts(None));
    }
}

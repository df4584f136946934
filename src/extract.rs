//! Candidate evaluation: turn resolved source nodes into language-tagged values.
//!
//! Every candidate pairs a [`Path`] with a [`Strategy`] describing the shape of
//! the node found there. [`extract`] walks candidates in priority order and
//! yields one [`SourcedValue`] per non-empty value, lazily.

use serde_json::{Map, Value};

use crate::constants::language::{
    NAME_ID_DEFAULT, NAME_ID_KEY, TAGGED_LITERAL_LANGUAGE_KEY, TAGGED_LITERAL_VALUE_KEY,
};
use crate::errors::MergeError;
use crate::path::Path;
use crate::types::{LanguageCode, SourceId};
use crate::utils::{trimmed_non_empty, value_kind};

/// How a resolved node is read into `(language, value)` pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// The node is a single string.
    Single { language: Option<LanguageCode> },
    /// The node is a sequence of strings.
    List { language: Option<LanguageCode> },
    /// The node is a string or a sequence of strings.
    SingletonOrList { language: Option<LanguageCode> },
    /// The node is `{name: ...}` where `name` is a string (tagged `language`)
    /// or a mapping from language code to string.
    NameId { language: Option<LanguageCode> },
    /// The node is a sequence of name/id objects.
    NameIdList { language: Option<LanguageCode> },
    /// The node is a mapping from language code to string.
    ByLanguage,
    /// The node is a sequence of `{xml:lang, value}` literals.
    TaggedLiterals,
}

impl Strategy {
    /// Single string tagged with `language`.
    pub fn single(language: &str) -> Self {
        Self::Single {
            language: Some(language.to_string()),
        }
    }

    /// Single string without a language tag.
    pub fn untagged() -> Self {
        Self::Single { language: None }
    }

    /// Sequence of strings tagged with `language` (`None` for untagged).
    pub fn list(language: Option<&str>) -> Self {
        Self::List {
            language: language.map(str::to_string),
        }
    }

    /// String or sequence of strings tagged with `language`.
    pub fn singleton_or_list(language: &str) -> Self {
        Self::SingletonOrList {
            language: Some(language.to_string()),
        }
    }

    /// Name/id object whose plain-string names default to English.
    pub fn name_id() -> Self {
        Self::NameId {
            language: Some(NAME_ID_DEFAULT.to_string()),
        }
    }

    /// Sequence of name/id objects whose plain-string names default to English.
    pub fn name_id_list() -> Self {
        Self::NameIdList {
            language: Some(NAME_ID_DEFAULT.to_string()),
        }
    }

    /// Apply this strategy to a resolved node.
    ///
    /// `emit` receives every raw pair, before trimming. Shape mismatches are
    /// reported as `(expected, found)`.
    fn read<'a>(
        &'a self,
        node: &'a Value,
        emit: &mut impl FnMut(Option<&'a str>, &'a str),
    ) -> Result<(), (&'static str, &'static str)> {
        match self {
            Self::Single { language } => {
                emit(language.as_deref(), expect_str(node, "string")?);
            }
            Self::List { language } => {
                for item in expect_array(node, "sequence of strings")? {
                    if let Some(text) = optional_str(item, "sequence of strings")? {
                        emit(language.as_deref(), text);
                    }
                }
            }
            Self::SingletonOrList { language } => match node {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = optional_str(item, "string or sequence of strings")? {
                            emit(language.as_deref(), text);
                        }
                    }
                }
                _ => emit(
                    language.as_deref(),
                    expect_str(node, "string or sequence of strings")?,
                ),
            },
            Self::NameId { language } => read_name_id(node, language.as_deref(), emit)?,
            Self::NameIdList { language } => {
                for item in expect_array(node, "sequence of name/id objects")? {
                    if !item.is_null() {
                        read_name_id(item, language.as_deref(), emit)?;
                    }
                }
            }
            Self::ByLanguage => {
                read_by_language(expect_object(node, "language-keyed mapping")?, emit)?
            }
            Self::TaggedLiterals => {
                for item in expect_array(node, "sequence of tagged literals")? {
                    if item.is_null() {
                        continue;
                    }
                    let literal = expect_object(item, "tagged literal")?;
                    let language = match literal.get(TAGGED_LITERAL_LANGUAGE_KEY) {
                        None => None,
                        Some(tag) => optional_str(tag, "string language tag")?,
                    };
                    let text = literal
                        .get(TAGGED_LITERAL_VALUE_KEY)
                        .ok_or(("tagged literal with a value", "literal without value"))?;
                    if let Some(text) = optional_str(text, "string literal value")? {
                        emit(language, text);
                    }
                }
            }
        }
        Ok(())
    }
}

fn read_name_id<'a>(
    node: &'a Value,
    language: Option<&'a str>,
    emit: &mut impl FnMut(Option<&'a str>, &'a str),
) -> Result<(), (&'static str, &'static str)> {
    let object = expect_object(node, "name/id object")?;
    match object.get(NAME_ID_KEY) {
        None => Err(("name/id object", "mapping without name")),
        Some(Value::Null) => Ok(()),
        Some(Value::Object(by_language)) => read_by_language(by_language, emit),
        Some(name) => {
            emit(language, expect_str(name, "string or language-keyed name")?);
            Ok(())
        }
    }
}

fn read_by_language<'a>(
    by_language: &'a Map<String, Value>,
    emit: &mut impl FnMut(Option<&'a str>, &'a str),
) -> Result<(), (&'static str, &'static str)> {
    for (language, text) in by_language {
        if let Some(text) = optional_str(text, "string per language")? {
            emit(Some(language.as_str()), text);
        }
    }
    Ok(())
}

fn expect_str<'a>(
    node: &'a Value,
    expected: &'static str,
) -> Result<&'a str, (&'static str, &'static str)> {
    node.as_str().ok_or((expected, value_kind(node)))
}

fn optional_str<'a>(
    node: &'a Value,
    expected: &'static str,
) -> Result<Option<&'a str>, (&'static str, &'static str)> {
    match node {
        Value::Null => Ok(None),
        other => expect_str(other, expected).map(Some),
    }
}

fn expect_array<'a>(
    node: &'a Value,
    expected: &'static str,
) -> Result<&'a [Value], (&'static str, &'static str)> {
    node.as_array()
        .map(Vec::as_slice)
        .ok_or((expected, value_kind(node)))
}

fn expect_object<'a>(
    node: &'a Value,
    expected: &'static str,
) -> Result<&'a Map<String, Value>, (&'static str, &'static str)> {
    node.as_object().ok_or((expected, value_kind(node)))
}

/// One source path paired with the strategy used to read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Where to look in the raw record.
    pub path: Path,
    /// How to read the node found there.
    pub strategy: Strategy,
}

impl Candidate {
    /// Parse `dotted` and pair it with `strategy`.
    pub fn new(dotted: &str, strategy: Strategy) -> Result<Self, MergeError> {
        Ok(Self {
            path: Path::parse(dotted)?,
            strategy,
        })
    }

    /// Resolve and read this candidate, returning trimmed non-empty values.
    ///
    /// An absent path yields an empty list.
    pub fn read(&self, record: &Value) -> Result<Vec<SourcedValue>, MergeError> {
        let Some(node) = self.path.resolve(record) else {
            return Ok(Vec::new());
        };
        let source = self.path.source();
        let mut values = Vec::new();
        self.strategy
            .read(node, &mut |language: Option<&str>, raw: &str| {
                if let Some(value) = trimmed_non_empty(raw) {
                    values.push(SourcedValue {
                        source: source.to_string(),
                        language: language.map(str::to_string),
                        value: value.to_string(),
                    });
                }
            })
            .map_err(|(expected, found)| MergeError::MalformedNode {
                source_id: source.to_string(),
                path: self.path.to_string(),
                expected,
                found,
            })?;
        Ok(values)
    }
}

/// A trimmed, non-empty value with the source and language it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourcedValue {
    /// Leading segment of the candidate path that produced the value.
    pub source: SourceId,
    /// Language tag, `None` when the strategy produced untagged values.
    pub language: Option<LanguageCode>,
    /// Trimmed value text.
    pub value: String,
}

/// Lazy iterator over the values of a candidate list, in priority order.
///
/// A candidate is only resolved once the values of every earlier candidate
/// have been consumed. The first shape mismatch ends the iteration.
pub struct Extraction<'a> {
    record: &'a Value,
    candidates: std::slice::Iter<'a, Candidate>,
    pending: std::vec::IntoIter<SourcedValue>,
    failed: bool,
}

impl Iterator for Extraction<'_> {
    type Item = Result<SourcedValue, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(value) = self.pending.next() {
                return Some(Ok(value));
            }
            let candidate = self.candidates.next()?;
            match candidate.read(self.record) {
                Ok(values) => self.pending = values.into_iter(),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Evaluate `candidates` against `record` lazily.
pub fn extract<'a>(record: &'a Value, candidates: &'a [Candidate]) -> Extraction<'a> {
    Extraction {
        record,
        candidates: candidates.iter(),
        pending: Vec::new().into_iter(),
        failed: false,
    }
}

//! Dotted source paths and their resolution against raw records.
//!
//! A path such as `wikidata.license_label.0.value` is parsed once, when a
//! field-spec table is built. Resolution never fails: a path that does not
//! lead anywhere is simply absent.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::constants::record::PATH_SEPARATOR;
use crate::errors::MergeError;

/// One step of a source path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key lookup.
    Key(String),
    /// Sequence index lookup.
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw.bytes().all(|byte| byte.is_ascii_digit()) {
            // Indexes too large for usize can never be in range.
            Self::Index(raw.parse().unwrap_or(usize::MAX))
        } else {
            Self::Key(raw.to_string())
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Immutable source path whose leading segment names the contributing source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    source: String,
    rest: Vec<Segment>,
}

impl Path {
    /// Parse a dotted path, e.g. `civicstack.license.name.en`.
    ///
    /// The leading segment must be a non-numeric source name and no segment may be empty.
    pub fn parse(dotted: &str) -> Result<Self, MergeError> {
        let mut raw_segments = dotted.split(PATH_SEPARATOR);
        let source = raw_segments.next().unwrap_or_default();
        if source.is_empty() {
            return Err(MergeError::Configuration(format!(
                "path '{dotted}' has no source segment"
            )));
        }
        if matches!(Segment::parse(source), Segment::Index(_)) {
            return Err(MergeError::Configuration(format!(
                "path '{dotted}' must start with a source name, not an index"
            )));
        }
        let rest = raw_segments
            .map(|raw| {
                if raw.is_empty() {
                    Err(MergeError::Configuration(format!(
                        "path '{dotted}' contains an empty segment"
                    )))
                } else {
                    Ok(Segment::parse(raw))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.to_string(),
            rest,
        })
    }

    /// Source name this path reads from (its leading segment).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Segments below the source sub-tree.
    pub fn segments(&self) -> &[Segment] {
        &self.rest
    }

    /// Resolve this path against a whole raw record.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let source = record.as_object()?.get(&self.source)?;
        resolve(source, &self.rest)
    }
}

impl FromStr for Path {
    type Err = MergeError;

    fn from_str(dotted: &str) -> Result<Self, Self::Err> {
        Self::parse(dotted)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)?;
        for segment in &self.rest {
            write!(f, "{PATH_SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

/// Walk `segments` down from `node`.
///
/// Index segments only match sequences and key segments only match mappings;
/// any mismatch, missing key, out-of-range index, or `null` leaf is absent.
pub fn resolve<'a>(node: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    match segments {
        [] => (!node.is_null()).then_some(node),
        [head, rest @ ..] => {
            let child = match head {
                Segment::Index(index) => node.as_array()?.get(*index)?,
                Segment::Key(key) => node.as_object()?.get(key)?,
            };
            resolve(child, rest)
        }
    }
}

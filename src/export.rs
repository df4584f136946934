//! Flat tabular view of canonical records, one row per named entity.
//!
//! Set fields spread over repeated columns (`Tag`, `Tag`, ...) padded to the
//! widest record. Rows are sorted by name; serializing them is up to the caller.

use tracing::debug;

use crate::catalog::EntityType;
use crate::constants::{export as headers, fields, language::EN};
use crate::data::CanonicalRecord;

/// Header and rows of a flat export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportTable {
    /// Column headers.
    pub header: Vec<String>,
    /// Rows, each as wide as `header`.
    pub rows: Vec<Vec<String>>,
}

struct Projected {
    name: String,
    fixed: Vec<String>,
    tags: Vec<String>,
    tools: Vec<String>,
}

/// Project canonical records of `entity` into a flat table.
///
/// Records without a canonical name are skipped.
pub fn project<'a, I>(entity: EntityType, records: I) -> ExportTable
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut projected: Vec<Projected> = Vec::new();
    for record in records {
        let Some(name) = record.scalar_value(fields::NAME) else {
            debug!(entity = %entity, "skipping canonical record without name");
            continue;
        };
        projected.push(Projected {
            name: name.to_string(),
            fixed: fixed_columns(entity)
                .iter()
                .map(|(_, field)| cell(record, field).unwrap_or_default().to_string())
                .collect(),
            tags: set_values(record, fields::TAGS, Some(EN)),
            tools: set_values(record, fields::TOOLS, None),
        });
    }
    projected.sort_by(|a, b| a.name.cmp(&b.name));

    let tag_columns = projected.iter().map(|row| row.tags.len()).max().unwrap_or(0);
    let tool_columns = match entity {
        EntityType::Project => projected.iter().map(|row| row.tools.len()).max().unwrap_or(0),
        EntityType::Actor | EntityType::Tool => 0,
    };

    let mut header = vec![headers::NAME.to_string()];
    header.extend(fixed_columns(entity).iter().map(|(title, _)| title.to_string()));
    header.extend(std::iter::repeat_n(headers::TAG.to_string(), tag_columns));
    header.extend(std::iter::repeat_n(headers::TOOL.to_string(), tool_columns));

    let rows = projected
        .into_iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(header.len());
            cells.push(row.name);
            cells.extend(row.fixed);
            cells.extend(padded(row.tags, tag_columns));
            cells.extend(padded(row.tools, tool_columns));
            cells
        })
        .collect();

    ExportTable { header, rows }
}

/// Header and canonical field of each fixed column after `Name`.
fn fixed_columns(entity: EntityType) -> &'static [(&'static str, &'static str)] {
    match entity {
        EntityType::Actor | EntityType::Project => &[
            (headers::DESCRIPTION, fields::LONG_DESCRIPTION),
            (headers::WEBSITE, fields::WEBSITE),
        ],
        EntityType::Tool => &[
            (headers::DESCRIPTION, fields::LONG_DESCRIPTION),
            (headers::LICENSE, fields::LICENSE),
            (headers::SOURCE_CODE, fields::SOURCE_CODE),
            (headers::BUG_TRACKER, fields::BUG_TRACKER),
            (headers::SCREENSHOT, fields::SCREENSHOT),
            (headers::STACKEXCHANGE_TAG, fields::STACKEXCHANGE_TAG),
        ],
    }
}

/// Scalar value, or the English slot of a language map.
fn cell<'a>(record: &'a CanonicalRecord, field: &str) -> Option<&'a str> {
    let field = record.get(field)?;
    field
        .as_scalar()
        .or_else(|| field.in_language(EN))
        .map(|sourced| sourced.value.as_str())
}

fn set_values(record: &CanonicalRecord, field: &str, language: Option<&str>) -> Vec<String> {
    record
        .get(field)
        .and_then(|field| field.set_entries(language))
        .map(|entries| entries.iter().map(|entry| entry.value.clone()).collect())
        .unwrap_or_default()
}

fn padded(values: Vec<String>, width: usize) -> impl Iterator<Item = String> {
    let missing = width.saturating_sub(values.len());
    values
        .into_iter()
        .chain(std::iter::repeat_n(String::new(), missing))
}

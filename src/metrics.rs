use std::collections::BTreeMap;

use crate::data::CanonicalRecord;
use crate::types::SourceId;

/// How much of the canonical output each source backs.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceCoverage {
    pub total: usize,
    pub sources: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub per_source: Vec<SourceShare>,
}

/// Per-source share of canonical value slots.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceShare {
    pub source: SourceId,
    pub count: usize,
    pub share: f64,
}

/// Count, per source, the canonical value slots it backs across `records`.
///
/// A scalar counts once, a language slot once, and a set entry once per
/// contributing source.
pub fn provenance_counts<'a, I>(records: I) -> BTreeMap<SourceId, usize>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        for (_, field) in record.fields() {
            for source in field.provenance() {
                *counts.entry(source.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Summarize provenance counts; `None` when no source contributed.
pub fn source_coverage(counts: &BTreeMap<SourceId, usize>) -> Option<SourceCoverage> {
    let min = *counts.values().min()?;
    let max = *counts.values().max()?;
    let total: usize = counts.values().sum();
    let sources = counts.len();
    let mean = total as f64 / sources as f64;
    let mut per_source: Vec<SourceShare> = counts
        .iter()
        .map(|(source, count)| SourceShare {
            source: source.clone(),
            count: *count,
            share: if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64
            },
        })
        .collect();
    per_source.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
    Some(SourceCoverage {
        total,
        sources,
        min,
        max,
        mean,
        per_source,
    })
}

//! Batch canonicalization.
//!
//! Entities share no state, so they can be merged in any order or in
//! parallel. A failing entity keeps its raw record untouched and never stops
//! the rest of the batch.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::{FieldSpecTable, MergerConfig};
use crate::data::{CanonicalRecord, RawEntity};
use crate::errors::MergeError;
use crate::merge::canonicalize;
use crate::metrics::provenance_counts;
use crate::types::{EntityId, SourceId};

/// An entity whose merge was aborted.
#[derive(Debug)]
pub struct BatchFailure {
    /// Identifier of the failed entity.
    pub id: EntityId,
    /// Why its merge was aborted.
    pub error: MergeError,
}

/// Outcome of one `merge_batch` run.
#[derive(Debug)]
pub struct BatchReport {
    /// Entity type label of the table used.
    pub entity: String,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
    /// Entities that received a non-empty canonical record.
    pub merged: usize,
    /// Entities where no field resolved (canonical key removed).
    pub empty: usize,
    /// Aborted entities, in input order.
    pub failures: Vec<BatchFailure>,
    /// Canonical value slots backed by each source across merged entities.
    pub provenance: BTreeMap<SourceId, usize>,
}

impl BatchReport {
    /// Number of entities processed.
    pub fn processed(&self) -> usize {
        self.merged + self.empty + self.failures.len()
    }

    /// True when no entity failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Canonicalize every entity of `entities` in place.
///
/// Only configuration problems (a table reading the canonical key) fail the
/// whole batch; per-entity errors are collected in the report.
pub fn merge_batch(
    entities: &mut [RawEntity],
    table: &FieldSpecTable,
    config: &MergerConfig,
) -> Result<BatchReport, MergeError> {
    if table.reads_source(&config.canonical_key) {
        return Err(MergeError::Configuration(format!(
            "{}: table reads from the canonical key '{}'",
            table.entity(),
            config.canonical_key
        )));
    }
    let started_at = Utc::now();
    let run = |entity: &mut RawEntity| -> Result<CanonicalRecord, MergeError> {
        canonicalize(&mut entity.record, table, config)
    };
    let outcomes: Vec<Result<CanonicalRecord, MergeError>> = if config.parallel {
        entities.par_iter_mut().map(run).collect()
    } else {
        entities.iter_mut().map(run).collect()
    };

    let mut merged = Vec::new();
    let mut empty = 0;
    let mut failures = Vec::new();
    for (entity, outcome) in entities.iter().zip(outcomes) {
        match outcome {
            Ok(canonical) if canonical.is_empty() => empty += 1,
            Ok(canonical) => merged.push(canonical),
            Err(error) => {
                warn!(
                    entity = table.entity(),
                    id = %entity.id,
                    error = %error,
                    "skipping entity: canonical merge aborted"
                );
                failures.push(BatchFailure {
                    id: entity.id.clone(),
                    error,
                });
            }
        }
    }

    let report = BatchReport {
        entity: table.entity().to_string(),
        started_at,
        finished_at: Utc::now(),
        merged: merged.len(),
        empty,
        failures,
        provenance: provenance_counts(&merged),
    };
    info!(
        entity = %report.entity,
        merged = report.merged,
        empty = report.empty,
        failed = report.failures.len(),
        "canonical batch finished"
    );
    Ok(report)
}

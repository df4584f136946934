#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Batch canonicalization over many entities.
pub mod batch;
/// Built-in field-spec tables per entity type.
pub mod catalog;
/// Field-spec configuration and merger options.
pub mod config;
/// Centralized constants: reserved keys, languages, field names, export headers.
pub mod constants;
/// Canonical output types.
pub mod data;
/// Flat tabular projection of canonical records.
pub mod export;
/// Candidate evaluation and extraction strategies.
pub mod extract;
/// Canonical merge policy.
pub mod merge;
/// Provenance coverage metrics.
pub mod metrics;
/// Source path parsing and resolution.
pub mod path;
/// Shared type aliases.
pub mod types;
/// Value normalization helpers.
pub mod utils;

mod errors;

pub use batch::{BatchFailure, BatchReport, merge_batch};
pub use catalog::EntityType;
pub use config::{
    FieldSpec, FieldSpecTable, FieldSpecTableBuilder, LanguageCandidates, MergerConfig, SetLayout,
};
pub use data::{CanonicalField, CanonicalRecord, RawEntity, SetEntry, Sourced, SourcedSet};
pub use errors::MergeError;
pub use export::{ExportTable, project};
pub use extract::{Candidate, Extraction, SourcedValue, Strategy, extract};
pub use merge::{Merger, canonicalize, merge};
pub use metrics::{SourceCoverage, SourceShare, provenance_counts, source_coverage};
pub use path::{Path, Segment, resolve};
pub use types::{EntityId, FieldName, LanguageCode, PathString, SourceId};

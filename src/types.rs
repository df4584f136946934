/// Name of the catalog that contributed a sub-tree to a raw record.
/// Examples: `wikidata`, `debian`, `civicstack`, `ogptoolbox-framacalc`
pub type SourceId = String;
/// Language tag attached to extracted values (usually ISO-639-1).
/// Examples: `en`, `fr`, `es`
pub type LanguageCode = String;
/// Canonical field name as it appears in the canonical record.
/// Examples: `name`, `longDescription`, `tags`, `programmingLanguages`
pub type FieldName = String;
/// Identifier of one entity in a batch (typically its file stem).
/// Example: `tools/etherpad`
pub type EntityId = String;
/// Dotted source path as written in field-spec tables.
/// Example: `wikidata.license_label.0.value`
pub type PathString = String;

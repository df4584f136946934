//! Built-in field-spec tables.
//!
//! Candidate paths are listed most trusted first. Adding a catalog means
//! appending candidates here; merge logic never changes.

use std::fmt;

use crate::config::{FieldSpecTable, SetLayout};
use crate::constants::fields;
use crate::constants::language::{EN, ES, FR};
use crate::errors::MergeError;
use crate::extract::Strategy;

/// Kind of entity described by a raw record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// Organisation or person behind projects and tools.
    Actor,
    /// Deployment or initiative using tools.
    Project,
    /// Software tool.
    Tool,
}

impl EntityType {
    /// All entity types, in processing order.
    pub const ALL: [Self; 3] = [Self::Actor, Self::Project, Self::Tool];

    /// Conventional collection (directory) name of this entity type.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Actor => "actors",
            Self::Project => "projects",
            Self::Tool => "tools",
        }
    }

    /// Parse a collection name such as `tools`.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|entity| entity.dir_name() == name)
    }

    /// Field-spec table for this entity type.
    pub fn table(self) -> Result<FieldSpecTable, MergeError> {
        match self {
            Self::Actor => actors(),
            Self::Project => projects(),
            Self::Tool => tools(),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Actors: civic-graph is the only contributing catalog.
pub fn actors() -> Result<FieldSpecTable, MergeError> {
    FieldSpecTable::builder(EntityType::Actor.dir_name())
        .scalar(fields::NAME, &["civic-graph.name"])
        .per_language(
            fields::LONG_DESCRIPTION,
            vec![
                (EN, vec!["civic-graph.description"]),
                (ES, vec![]),
                (FR, vec![]),
            ],
        )
        .set(
            fields::TAGS,
            SetLayout::ByLanguage,
            vec![
                ("civic-graph.categories", Strategy::name_id_list()),
                ("civic-graph.type", Strategy::single(EN)),
            ],
        )
        .scalar(fields::WEBSITE, &["civic-graph.url"])
        .build()
}

/// Projects: harvested from participatedb.
pub fn projects() -> Result<FieldSpecTable, MergeError> {
    FieldSpecTable::builder(EntityType::Project.dir_name())
        .scalar(fields::NAME, &["participatedb.Name"])
        .per_language(
            fields::LONG_DESCRIPTION,
            vec![
                (EN, vec!["participatedb.Description"]),
                (ES, vec![]),
                (FR, vec![]),
            ],
        )
        .set(
            fields::TAGS,
            SetLayout::ByLanguage,
            vec![
                ("participatedb.Category", Strategy::singleton_or_list(EN)),
                ("participatedb.category", Strategy::single(EN)),
            ],
        )
        .set(
            fields::TOOLS,
            SetLayout::flat(),
            vec![("participatedb.Tools used", Strategy::list(None))],
        )
        .scalar(fields::WEBSITE, &["participatedb.Web"])
        .build()
}

/// Tools: the widest table, fed by package databases, wikis and spreadsheets.
pub fn tools() -> Result<FieldSpecTable, MergeError> {
    FieldSpecTable::builder(EntityType::Tool.dir_name())
        .scalar(
            fields::BUG_TRACKER,
            &[
                "wikidata.bug_tracking_system.0.value",
                "ogptoolbox-framacalc.URL suivi de bogues",
            ],
        )
        .scalar(
            fields::LICENSE,
            &[
                "wikidata.license_label.0.value",
                "civicstack.license.name.en",
                "nuit-debout.Nom de la licence",
                "ogptoolbox-framacalc.Licence",
            ],
        )
        .scalar(
            fields::NAME,
            &[
                "debian_appstream.Name.C",
                "wikidata.label.0.value",
                "civic-tech-field-guide.name",
                "civicstack.name",
                "tech-plateforms.Name",
                "nuit-debout.Outil",
                "participatedb.Name",
                "harnessing-collaborative-technologies.title",
                "ogptoolbox-framacalc.Nom",
            ],
        )
        .tagged(
            fields::LONG_DESCRIPTION,
            vec![
                ("wikidata.description", Strategy::TaggedLiterals),
                ("debian.description.en.long_description", Strategy::single(EN)),
                ("debian.description.es.long_description", Strategy::single(ES)),
                ("debian.description.fr.long_description", Strategy::single(FR)),
                ("civicstack.description", Strategy::ByLanguage),
                ("tech-plateforms.About", Strategy::single(EN)),
                ("participatedb.Description", Strategy::single(EN)),
                (
                    "harnessing-collaborative-technologies.description",
                    Strategy::single(EN),
                ),
                ("nuit-debout.Détails", Strategy::single(FR)),
                ("ogptoolbox-framacalc.Description", Strategy::single(FR)),
            ],
        )
        .set(
            fields::PROGRAMMING_LANGUAGES,
            SetLayout::flat(),
            vec![("civicstack.technology", Strategy::name_id_list())],
        )
        .scalar(
            fields::SCREENSHOT,
            &[
                "debian.screenshot.large_image_url",
                "wikidata.image.0.value",
                "ogptoolbox-framacalc.Capture d'écran",
                "harnessing-collaborative-technologies.logo_url",
            ],
        )
        .scalar(
            fields::SOURCE_CODE,
            &[
                "wikidata.source_code_repository.0.value",
                "civicstack.github",
                "nuit-debout.Lien vers le code",
                "ogptoolbox-framacalc.URL code source",
            ],
        )
        .scalar(
            fields::STACKEXCHANGE_TAG,
            &[
                "wikidata.stack_exchange_tag.0.value",
                "ogptoolbox-framacalc.Tag stack exchange",
            ],
        )
        .set(
            fields::TAGS,
            SetLayout::ByLanguage,
            vec![
                ("civic-tech-field-guide.category", Strategy::single(EN)),
                ("civicstack.tags", Strategy::name_id_list()),
                ("debian_appstream.Categories", Strategy::list(Some(EN))),
                ("harnessing-collaborative-technologies.category", Strategy::single(EN)),
                ("nuit-debout.Fonction", Strategy::single(FR)),
                ("ogptoolbox-framacalc.Catégorie", Strategy::single(FR)),
                ("participatedb.Category", Strategy::singleton_or_list(EN)),
                ("participatedb.category", Strategy::single(EN)),
                ("tech-plateforms.CivicTech or GeneralPurpose", Strategy::single(EN)),
                ("tech-plateforms.Functions", Strategy::single(EN)),
                ("tech-plateforms.AppCivist Service 1", Strategy::single(EN)),
                ("tech-plateforms.AppCivist Service 2", Strategy::single(EN)),
                ("tech-plateforms.AppCivist Service 3", Strategy::single(EN)),
                ("wikidata.genre_label", Strategy::TaggedLiterals),
                ("wikidata.instance_of_label", Strategy::TaggedLiterals),
            ],
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldSpec, LanguageCandidates};

    #[test]
    fn every_builtin_table_builds() {
        for entity in EntityType::ALL {
            let table = entity.table().unwrap();
            assert_eq!(table.entity(), entity.dir_name());
            assert!(!table.fields().is_empty());
        }
    }

    #[test]
    fn tool_fields_follow_declaration_order() {
        let table = tools().unwrap();
        let names: Vec<&str> = table.fields().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "bugTracker",
                "license",
                "name",
                "longDescription",
                "programmingLanguages",
                "screenshot",
                "sourceCode",
                "stackexchangeTag",
                "tags",
            ]
        );
    }

    #[test]
    fn tool_name_prefers_appstream_then_wikidata() {
        let table = tools().unwrap();
        let Some(FieldSpec::Scalar(candidates)) = table.field("name") else {
            panic!("name must be a scalar field");
        };
        assert_eq!(candidates[0].path.source(), "debian_appstream");
        assert_eq!(candidates[1].path.to_string(), "wikidata.label.0.value");
    }

    #[test]
    fn actor_description_declares_three_language_slots() {
        let table = actors().unwrap();
        let Some(FieldSpec::LanguageMap(LanguageCandidates::PerLanguage(slots))) =
            table.field("longDescription")
        else {
            panic!("longDescription must be a per-language map");
        };
        let languages: Vec<&str> = slots.iter().map(|(language, _)| language.as_str()).collect();
        assert_eq!(languages, vec!["en", "es", "fr"]);
    }

    #[test]
    fn dir_names_round_trip() {
        for entity in EntityType::ALL {
            assert_eq!(EntityType::from_dir_name(entity.dir_name()), Some(entity));
            assert_eq!(entity.to_string(), entity.dir_name());
        }
        assert_eq!(EntityType::from_dir_name("people"), None);
    }
}

/// Reserved keys and separators of the raw record layout.
pub mod record {
    /// Key under which the canonical record is attached to the raw record.
    pub const CANONICAL_KEY: &str = "canonical";
    /// Separator between segments of a dotted source path.
    pub const PATH_SEPARATOR: char = '.';
}

/// Language codes and the keys used by language-aware extraction strategies.
pub mod language {
    /// English.
    pub const EN: &str = "en";
    /// Spanish.
    pub const ES: &str = "es";
    /// French.
    pub const FR: &str = "fr";
    /// Language assumed for a name/id object whose `name` is a plain string.
    pub const NAME_ID_DEFAULT: &str = EN;
    /// Key holding the display name inside a name/id object.
    pub const NAME_ID_KEY: &str = "name";
    /// Key holding the language of a tagged literal (`{xml:lang, value}`).
    pub const TAGGED_LITERAL_LANGUAGE_KEY: &str = "xml:lang";
    /// Key holding the text of a tagged literal.
    pub const TAGGED_LITERAL_VALUE_KEY: &str = "value";
}

/// Canonical field names shared by the built-in catalogs and the export projection.
pub mod fields {
    pub const BUG_TRACKER: &str = "bugTracker";
    pub const LICENSE: &str = "license";
    pub const LONG_DESCRIPTION: &str = "longDescription";
    pub const NAME: &str = "name";
    pub const PROGRAMMING_LANGUAGES: &str = "programmingLanguages";
    pub const SCREENSHOT: &str = "screenshot";
    pub const SOURCE_CODE: &str = "sourceCode";
    pub const STACKEXCHANGE_TAG: &str = "stackexchangeTag";
    pub const TAGS: &str = "tags";
    pub const TOOLS: &str = "tools";
    pub const WEBSITE: &str = "website";
}

/// Column headers of the flat export projection.
pub mod export {
    pub const NAME: &str = "Name";
    pub const DESCRIPTION: &str = "Description";
    pub const WEBSITE: &str = "Website";
    pub const LICENSE: &str = "License";
    pub const SOURCE_CODE: &str = "Source Code URL";
    pub const BUG_TRACKER: &str = "Bug Tracker URL";
    pub const SCREENSHOT: &str = "Screenshot URL";
    pub const STACKEXCHANGE_TAG: &str = "StackExchange Tag";
    /// Header repeated once per tag column.
    pub const TAG: &str = "Tag";
    /// Header repeated once per tool column.
    pub const TOOL: &str = "Tool";
}

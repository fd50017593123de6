use thiserror::Error;

/// Error type for template parsing and mutation.
#[derive(Debug, Error)]
pub enum Error {
    /// A value outside the fixed vocabulary of its field.
    #[error(
        "invalid {field} value(s): {}. supports {} only",
        .values.join(", "),
        .allowed.join(", ")
    )]
    InvalidVocabulary {
        field: &'static str,
        values: Vec<String>,
        allowed: &'static [&'static str],
    },
    /// A record count outside the range allowed by the active output format.
    #[error("count {value} for {scope} is out of range; all count values must be within {min}-{max}{}", .context)]
    CountOutOfRange {
        scope: String,
        value: u32,
        min: u32,
        max: u32,
        context: &'static str,
    },
    /// A flag that the targeted scope does not accept.
    #[error("'{flag}' is not permitted in current command for {scope}")]
    FlagNotAllowedInScope { flag: &'static str, scope: String },
    /// A global-only flag combined with an object-scope flag.
    #[error("you cannot use global flag '{global_flag}' with the '{object_flag}' flag")]
    ConflictingScope {
        global_flag: &'static str,
        object_flag: &'static str,
    },
    /// Values requested for removal that are not present.
    #[error("'{}' not found in {target}", .values.join(", "))]
    ValueNotFound { values: Vec<String>, target: String },
    /// The named object has no entry in `sObjects`.
    #[error("object '{0}' does not exist in data template file")]
    ObjectNotFound(String),
    /// A removal that would leave a required array empty.
    #[error("all the values from '{0}' cannot be deleted! You must leave at least one value")]
    EmptyResultingSet(&'static str),
    /// The document-level default of a field that can only be removed per object.
    #[error("default '{0}' can not be deleted! You can update it instead")]
    UndeletableDefault(&'static str),
    /// A list flag that contains no usable token.
    #[error("the '{0}' flag cannot be empty or contain only separators")]
    EmptyFlagValue(&'static str),
    /// Remove invoked without any setting flag.
    #[error("data template file can not be deleted! You must specify at least one setting flag to remove")]
    TemplateNotDeletable,
    /// The document does not match the template schema.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias for results returned by the template engine.
pub type Result<T> = std::result::Result<T, Error>;

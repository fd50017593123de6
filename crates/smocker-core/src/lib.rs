//! Template mutation engine for data generation templates.
//!
//! A command loads a [`TemplateDocument`], passes it by value to [`upsert`] or
//! [`remove`], and persists the returned document only when the call succeeds.

pub mod defaults;
pub mod error;
pub mod outcome;
pub mod parse;
pub mod remove;
pub mod scope;
pub mod template;
pub mod upsert;
pub mod validation;
pub mod vocabulary;

pub use defaults::{
    default_template, default_template_file_name, normalize_template_file_name, with_json_suffix,
};
pub use error::{Error, Result};
pub use outcome::Applied;
pub use remove::{FieldRemoval, RemoveRequest, remove};
pub use scope::{FieldKind, ListField, Scope, TemplateField};
pub use template::{ConsiderValue, ObjectEntry, ObjectSettings, TemplateDocument};
pub use upsert::{Confirm, FieldUpdate, UpsertRequest, upsert};
pub use validation::{
    IssueSeverity, ValidationIssue, ValidationReport, check_template_json, lint_template,
    template_json_schema,
};
pub use vocabulary::{Language, OutputFormat};

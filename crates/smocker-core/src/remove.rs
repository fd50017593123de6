//! Remove rules: subtract list values, delete object-level scalars, drop objects.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::outcome::Applied;
use crate::parse::{parse_object_names, split_tokens};
use crate::scope::{ListField, SOBJECT_FLAG, Scope, TemplateField, check_scope_conflict};
use crate::template::{TemplateDocument, contains_ignore_case};

/// Flags accepted by the remove command.
///
/// `language` and `count` are presence flags: passing them deletes the field.
#[derive(Debug, Clone, Default)]
pub struct RemoveRequest {
    pub sobjects: Option<String>,
    pub language: bool,
    pub count: bool,
    pub namespace_to_exclude: Option<String>,
    pub output_format: Option<String>,
    pub fields_to_exclude: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRemoval {
    ListSubtract(ListField, String),
    ScalarDelete(TemplateField),
}

impl FieldRemoval {
    pub fn field(&self) -> TemplateField {
        match self {
            FieldRemoval::ListSubtract(list, _) => list.field(),
            FieldRemoval::ScalarDelete(field) => *field,
        }
    }
}

impl RemoveRequest {
    pub fn removals(&self) -> Vec<FieldRemoval> {
        let mut removals = Vec::new();
        if self.language {
            removals.push(FieldRemoval::ScalarDelete(TemplateField::Language));
        }
        if self.count {
            removals.push(FieldRemoval::ScalarDelete(TemplateField::Count));
        }
        if let Some(raw) = &self.namespace_to_exclude {
            removals.push(FieldRemoval::ListSubtract(ListField::NamespaceToExclude, raw.clone()));
        }
        if let Some(raw) = &self.output_format {
            removals.push(FieldRemoval::ListSubtract(ListField::OutputFormat, raw.clone()));
        }
        if let Some(raw) = &self.fields_to_exclude {
            removals.push(FieldRemoval::ListSubtract(ListField::FieldsToExclude, raw.clone()));
        }
        removals
    }
}

/// Apply a removal to `document`.
///
/// Stored values are matched case-insensitively and are not checked against
/// the vocabularies, so an invalid value already in the file can be removed.
pub fn remove(document: TemplateDocument, request: &RemoveRequest) -> Result<Applied> {
    let original = document.clone();
    let mut document = document;
    let mut messages = Vec::new();
    let removals = request.removals();

    let Some(raw_names) = request.sobjects.as_deref() else {
        if removals.is_empty() {
            return Err(Error::TemplateNotDeletable);
        }
        debug!(event = "scope_resolved", scope = "global");
        for removal in &removals {
            apply_removal(&mut document, Scope::Global, removal, &mut messages)?;
        }
        return Ok(Applied::new(&original, document, messages));
    };

    check_scope_conflict(true, removals.iter().map(FieldRemoval::field))?;

    let names = parse_object_names(raw_names);
    if names.is_empty() {
        return Err(Error::EmptyFlagValue(SOBJECT_FLAG));
    }
    if let Some(missing) = names.iter().find(|name| document.find_object(name).is_none()) {
        return Err(Error::ObjectNotFound(missing.clone()));
    }

    if removals.is_empty() {
        let mut removed = Vec::new();
        for name in &names {
            if let Some(index) = document.find_object(name) {
                removed.push(document.sobjects.remove(index).name);
            }
        }
        info!(event = "objects_removed", objects = %removed.join(", "));
        messages.push(format!(
            "Removing '{}' from the sObjects.",
            removed.join(", ")
        ));
        return Ok(Applied::new(&original, document, messages));
    }

    for name in &names {
        let Some(index) = document.find_object(name) else {
            return Err(Error::ObjectNotFound(name.clone()));
        };
        debug!(event = "scope_resolved", scope = "object", object = %name);
        check_scalars_present(&document, index, &removals)?;
        for removal in &removals {
            apply_removal(&mut document, Scope::Object(index), removal, &mut messages)?;
        }
    }

    Ok(Applied::new(&original, document, messages))
}

/// Scalars requested for deletion must all exist on the object.
fn check_scalars_present(
    document: &TemplateDocument,
    index: usize,
    removals: &[FieldRemoval],
) -> Result<()> {
    let entry = &document.sobjects[index];
    let missing: Vec<String> = removals
        .iter()
        .filter_map(|removal| match removal {
            FieldRemoval::ScalarDelete(TemplateField::Language)
                if entry.settings.language.is_none() =>
            {
                Some(TemplateField::Language.key().to_string())
            }
            FieldRemoval::ScalarDelete(TemplateField::Count) if entry.settings.count.is_none() => {
                Some(TemplateField::Count.key().to_string())
            }
            _ => None,
        })
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::ValueNotFound {
        values: missing,
        target: format!("object '{}' settings", entry.name),
    })
}

fn apply_removal(
    document: &mut TemplateDocument,
    scope: Scope,
    removal: &FieldRemoval,
    messages: &mut Vec<String>,
) -> Result<()> {
    let field = removal.field();
    match (scope, removal) {
        (Scope::Global, FieldRemoval::ScalarDelete(field)) => {
            Err(Error::UndeletableDefault(field.key()))
        }
        (scope, _) if !scope.allows(field) => Err(Error::FlagNotAllowedInScope {
            flag: field.flag(),
            scope: scope_label(document, scope),
        }),
        (scope, FieldRemoval::ListSubtract(list, raw)) => {
            subtract_list(document, scope, *list, raw, messages)
        }
        (Scope::Object(index), FieldRemoval::ScalarDelete(field)) => {
            let entry = &mut document.sobjects[index];
            match field {
                TemplateField::Language => entry.settings.language = None,
                TemplateField::Count => entry.settings.count = None,
                other => {
                    return Err(Error::FlagNotAllowedInScope {
                        flag: other.flag(),
                        scope: format!("object '{}'", entry.name),
                    });
                }
            }
            info!(event = "field_removed", field = field.key(), object = %entry.name);
            messages.push(format!(
                "Removing '{}' from the sobject {} settings.",
                field.key(),
                entry.name
            ));
            Ok(())
        }
    }
}

fn scope_label(document: &TemplateDocument, scope: Scope) -> String {
    match scope {
        Scope::Global => "global settings".to_string(),
        Scope::Object(index) => format!("object '{}'", document.sobjects[index].name),
    }
}

fn subtract_list(
    document: &mut TemplateDocument,
    scope: Scope,
    list: ListField,
    raw: &str,
    messages: &mut Vec<String>,
) -> Result<()> {
    let field = list.field();
    let mut tokens: Vec<String> = Vec::new();
    for token in split_tokens(raw) {
        if !contains_ignore_case(&tokens, token) {
            tokens.push(token.to_string());
        }
    }
    if tokens.is_empty() {
        return Err(Error::EmptyFlagValue(field.flag()));
    }

    let target = match scope {
        Scope::Global => format!("'{}'", field.key()),
        Scope::Object(index) => format!(
            "'{}' of object '{}'",
            field.key(),
            document.sobjects[index].name
        ),
    };
    let values = document.list_mut(scope, list)?;
    let not_found: Vec<String> = tokens
        .iter()
        .filter(|token| !contains_ignore_case(values, token))
        .cloned()
        .collect();
    if !not_found.is_empty() {
        return Err(Error::ValueNotFound {
            values: not_found,
            target,
        });
    }

    let remaining: Vec<String> = values
        .iter()
        .filter(|value| !contains_ignore_case(&tokens, value))
        .cloned()
        .collect();
    if list == ListField::OutputFormat && remaining.is_empty() {
        return Err(Error::EmptyResultingSet(field.key()));
    }
    *values = remaining;

    info!(event = "field_removed", field = field.key(), values = %tokens.join(", "));
    messages.push(format!(
        "Removing '{}' from the {}.",
        tokens.join(", "),
        field.key()
    ));
    Ok(())
}


//! Upsert rules: merge list values, replace scalars, create missing objects.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::outcome::Applied;
use crate::parse::{parse_fields_to_consider, parse_object_names, split_list};
use crate::scope::{ListField, SOBJECT_FLAG, Scope, TemplateField, check_scope_conflict};
use crate::template::{ObjectEntry, TemplateDocument, contains_ignore_case};
use crate::vocabulary::{
    DI_RECORD_CEILING, MIN_RECORD_COUNT, OutputFormat, check_count, check_language,
    check_output_formats,
};

/// Confirmation capability consulted before an unknown object is added.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Flags accepted by the upsert command. `None` means the flag was not passed.
#[derive(Debug, Clone, Default)]
pub struct UpsertRequest {
    /// Comma-separated object names.
    pub sobjects: Option<String>,
    pub language: Option<String>,
    pub count: Option<u32>,
    pub namespace_to_exclude: Option<String>,
    pub output_format: Option<String>,
    pub fields_to_exclude: Option<String>,
    pub fields_to_consider: Option<String>,
    pub pick_left_fields: Option<bool>,
}

/// One field change, tagged by the rule family that applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    ListMerge(ListField, String),
    StructuredMap(String),
    ScalarLocale(String),
    ScalarCount(u32),
    ScalarBool(bool),
}

impl FieldUpdate {
    pub fn field(&self) -> TemplateField {
        match self {
            FieldUpdate::ListMerge(list, _) => list.field(),
            FieldUpdate::StructuredMap(_) => TemplateField::FieldsToConsider,
            FieldUpdate::ScalarLocale(_) => TemplateField::Language,
            FieldUpdate::ScalarCount(_) => TemplateField::Count,
            FieldUpdate::ScalarBool(_) => TemplateField::PickLeftFields,
        }
    }
}

impl UpsertRequest {
    /// Field updates in flag declaration order.
    pub fn updates(&self) -> Vec<FieldUpdate> {
        let mut updates = Vec::new();
        if let Some(language) = &self.language {
            updates.push(FieldUpdate::ScalarLocale(language.clone()));
        }
        if let Some(count) = self.count {
            updates.push(FieldUpdate::ScalarCount(count));
        }
        if let Some(raw) = &self.namespace_to_exclude {
            updates.push(FieldUpdate::ListMerge(ListField::NamespaceToExclude, raw.clone()));
        }
        if let Some(raw) = &self.output_format {
            updates.push(FieldUpdate::ListMerge(ListField::OutputFormat, raw.clone()));
        }
        if let Some(raw) = &self.fields_to_exclude {
            updates.push(FieldUpdate::ListMerge(ListField::FieldsToExclude, raw.clone()));
        }
        if let Some(raw) = &self.fields_to_consider {
            updates.push(FieldUpdate::StructuredMap(raw.clone()));
        }
        if let Some(value) = self.pick_left_fields {
            updates.push(FieldUpdate::ScalarBool(value));
        }
        updates
    }
}

/// Apply an upsert to `document`.
///
/// Any error discards every change made by the call; the caller only persists
/// the returned document.
pub fn upsert(
    document: TemplateDocument,
    request: &UpsertRequest,
    confirm: &mut dyn Confirm,
) -> Result<Applied> {
    let original = document.clone();
    let mut document = document;
    let mut messages = Vec::new();
    let updates = request.updates();

    check_scope_conflict(
        request.sobjects.is_some(),
        updates.iter().map(FieldUpdate::field),
    )?;

    match request.sobjects.as_deref() {
        None => {
            debug!(event = "scope_resolved", scope = "global");
            apply_updates(&mut document, Scope::Global, &updates, &mut messages)?;
        }
        Some(raw) => {
            let names = parse_object_names(raw);
            if names.is_empty() {
                return Err(Error::EmptyFlagValue(SOBJECT_FLAG));
            }
            for name in names {
                messages.push(format!("Working on the object level settings for {name}"));
                let index = match document.find_object(&name) {
                    Some(index) => index,
                    None => {
                        let prompt =
                            format!("'{name}' does not exist in data template! Do you want to add?");
                        if !confirm.confirm(&prompt) {
                            info!(event = "object_declined", object = %name);
                            messages.push(format!("Skipped: '{name}' was not added to the data template"));
                            continue;
                        }
                        document.sobjects.push(ObjectEntry::new(name.clone()));
                        info!(event = "object_added", object = %name);
                        messages.push(format!("Added '{name}' to the data template"));
                        document.sobjects.len() - 1
                    }
                };
                debug!(event = "scope_resolved", scope = "object", object = %name);
                apply_updates(&mut document, Scope::Object(index), &updates, &mut messages)?;
            }
        }
    }

    Ok(Applied::new(&original, document, messages))
}

fn apply_updates(
    document: &mut TemplateDocument,
    scope: Scope,
    updates: &[FieldUpdate],
    messages: &mut Vec<String>,
) -> Result<()> {
    for update in updates {
        let field = update.field();
        if !scope.allows(field) {
            warn!(event = "flag_skipped", flag = field.flag());
            messages.push(format!(
                "Skipped: '{}' flag cannot be passed in the current command",
                field.flag()
            ));
            continue;
        }

        match update {
            FieldUpdate::ListMerge(list, raw) => merge_list(document, scope, *list, raw, messages)?,
            FieldUpdate::StructuredMap(raw) => merge_fields_to_consider(document, scope, raw, messages)?,
            FieldUpdate::ScalarLocale(value) => set_language(document, scope, value, messages)?,
            FieldUpdate::ScalarCount(value) => set_count(document, scope, *value, messages)?,
            FieldUpdate::ScalarBool(value) => set_pick_left_fields(document, scope, *value, messages),
        }
        info!(event = "field_updated", field = field.key());
    }
    Ok(())
}

fn merge_list(
    document: &mut TemplateDocument,
    scope: Scope,
    list: ListField,
    raw: &str,
    messages: &mut Vec<String>,
) -> Result<()> {
    let field = list.field();
    let tokens = split_list(raw);
    if tokens.is_empty() {
        return Err(Error::EmptyFlagValue(field.flag()));
    }

    if list == ListField::OutputFormat {
        let formats = check_output_formats(&tokens)?;
        let direct_insert =
            formats.contains(&OutputFormat::Di) || document.has_output_format(OutputFormat::Di);
        if direct_insert {
            check_direct_insert_ceiling(document)?;
        }
    }

    let values = document.list_mut(scope, list)?;
    for token in tokens {
        if !contains_ignore_case(values, &token) {
            values.push(token);
        }
    }
    messages.push(format!("Updated '{}' to: {}", field.key(), values.join(", ")));
    Ok(())
}

/// Every count in the document must fit under the direct insertion ceiling.
fn check_direct_insert_ceiling(document: &TemplateDocument) -> Result<()> {
    match document
        .counts()
        .into_iter()
        .find(|(_, count)| *count > DI_RECORD_CEILING)
    {
        Some((scope, value)) => Err(Error::CountOutOfRange {
            scope,
            value,
            min: MIN_RECORD_COUNT,
            max: DI_RECORD_CEILING,
            context: " to add DI-direct insertion in template",
        }),
        None => Ok(()),
    }
}

fn merge_fields_to_consider(
    document: &mut TemplateDocument,
    scope: Scope,
    raw: &str,
    messages: &mut Vec<String>,
) -> Result<()> {
    let Scope::Object(index) = scope else {
        return Err(Error::FlagNotAllowedInScope {
            flag: TemplateField::FieldsToConsider.flag(),
            scope: "global settings".to_string(),
        });
    };
    let parsed = parse_fields_to_consider(raw)?;
    let fields = document.sobjects[index]
        .settings
        .fields_to_consider
        .get_or_insert_with(Default::default);
    fields.extend(parsed);
    let rendered = serde_json::to_string(fields)?;
    messages.push(format!("Updated 'fieldsToConsider' to: {rendered}"));
    Ok(())
}

fn set_language(
    document: &mut TemplateDocument,
    scope: Scope,
    value: &str,
    messages: &mut Vec<String>,
) -> Result<()> {
    let language = check_language(value)?.as_str().to_string();
    match scope {
        Scope::Global => document.language = language.clone(),
        Scope::Object(index) => document.sobjects[index].settings.language = Some(language.clone()),
    }
    messages.push(format!("Setting 'language' to: {language}"));
    Ok(())
}

fn set_count(
    document: &mut TemplateDocument,
    scope: Scope,
    value: u32,
    messages: &mut Vec<String>,
) -> Result<()> {
    let direct_insert = document.has_output_format(OutputFormat::Di);
    match scope {
        Scope::Global => {
            check_count(value, direct_insert, "template")?;
            document.count = value;
        }
        Scope::Object(index) => {
            let entry = &mut document.sobjects[index];
            check_count(value, direct_insert, &format!("object '{}'", entry.name))?;
            entry.settings.count = Some(value);
        }
    }
    messages.push(format!("Setting 'count' to: {value}"));
    Ok(())
}

/// Stores `false` whatever the flag says. Kept as observed until the intended
/// semantics of `pickLeftFields` are confirmed.
fn set_pick_left_fields(
    document: &mut TemplateDocument,
    scope: Scope,
    requested: bool,
    messages: &mut Vec<String>,
) {
    if let Scope::Object(index) = scope {
        debug!(event = "pick_left_fields_forced", requested);
        document.sobjects[index].settings.pick_left_fields = Some(false);
        messages.push("Setting 'pickLeftFields' to: false".to_string());
    }
}

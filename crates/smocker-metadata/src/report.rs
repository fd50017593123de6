use smocker_core::TemplateDocument;
use smocker_core::parse::DEPENDENT_PICKLIST_PREFIX;
use tracing::{info, warn};

use crate::errors::Result;
use crate::source::{MetadataSource, SessionInfo};

/// Fields of one object that the org does not know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields {
    pub object: String,
    pub fields: Vec<String>,
}

/// Outcome of checking a template against org metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataReport {
    pub checked_objects: usize,
    pub missing_objects: Vec<String>,
    pub missing_fields: Vec<MissingFields>,
}

impl MetadataReport {
    pub fn is_clean(&self) -> bool {
        self.missing_objects.is_empty() && self.missing_fields.is_empty()
    }
}

/// Field names an object entry refers to: `fieldsToExclude` entries and
/// `fieldsToConsider` keys with the dependent-picklist prefix stripped.
pub fn referenced_fields(document: &TemplateDocument, object: &str) -> Vec<String> {
    let Some(entry) = document.object(object) else {
        return Vec::new();
    };
    let mut fields: Vec<String> = Vec::new();
    let excluded = entry.settings.fields_to_exclude.iter().flatten().cloned();
    let considered = entry
        .settings
        .fields_to_consider
        .iter()
        .flat_map(|fields| fields.keys())
        .map(|key| {
            key.strip_prefix(DEPENDENT_PICKLIST_PREFIX)
                .unwrap_or(key)
                .to_string()
        });
    for field in excluded.chain(considered) {
        let field = field.to_lowercase();
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// Describe every object in the template and collect unknown objects and fields.
///
/// Lookup failures other than a missing object are returned as errors; callers
/// report them as warnings since the template stays usable.
pub async fn check_template(
    source: &dyn MetadataSource,
    session: &SessionInfo,
    document: &TemplateDocument,
) -> Result<MetadataReport> {
    let mut report = MetadataReport::default();

    for name in document.object_names() {
        report.checked_objects += 1;
        let Some(metadata) = source.describe(session, name).await? else {
            warn!(event = "object_missing", object = %name, source = source.name());
            report.missing_objects.push(name.to_string());
            continue;
        };

        let known = metadata.known_fields();
        let missing: Vec<String> = referenced_fields(document, name)
            .into_iter()
            .filter(|field| !known.contains(field))
            .collect();
        if !missing.is_empty() {
            warn!(event = "fields_missing", object = %name, fields = %missing.join(", "));
            report.missing_fields.push(MissingFields {
                object: name.to_string(),
                fields: missing,
            });
        }
    }

    info!(
        event = "metadata_checked",
        objects = report.checked_objects,
        missing_objects = report.missing_objects.len(),
        objects_with_missing_fields = report.missing_fields.len()
    );
    Ok(report)
}

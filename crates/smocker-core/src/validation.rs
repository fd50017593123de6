use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::template::{TemplateDocument, normalize_legacy_keys};
use crate::vocabulary::{Language, MIN_RECORD_COUNT, OutputFormat, count_ceiling};

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Structured validation issue with a JSON-pointer location and hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: String,
    pub path: String,
    pub message: String,
    pub hint: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        severity: IssueSeverity,
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            path: path.into(),
            message: message.into(),
            hint,
        }
    }
}

/// Issues found in a stored template, split by severity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Every issue, errors first.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().chain(self.warnings.iter())
    }
}

/// Emit the JSON Schema of a template document.
pub fn template_json_schema() -> RootSchema {
    schema_for!(TemplateDocument)
}

/// Check raw template JSON against the generated schema. Legacy key names are
/// normalized first, so paths use the camelCase names.
pub fn check_template_json(template_json: &Value) -> Result<ValidationReport> {
    let schema = serde_json::to_value(template_json_schema())?;
    let compiled = JSONSchema::compile(&schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut normalized = template_json.clone();
    normalize_legacy_keys(&mut normalized);

    let mut report = ValidationReport::default();
    if let Err(errors) = compiled.validate(&normalized) {
        for error in errors {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                normalized_json_pointer(&error.instance_path.to_string()),
                error.to_string(),
                None,
            ));
        }
    }
    Ok(report)
}

/// Check a parsed template against the document invariants.
pub fn lint_template(document: &TemplateDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    lint_output_format(document, &mut report);
    lint_language(&document.language, "/language", &mut report);
    lint_duplicates(&document.namespace_to_exclude, "/namespaceToExclude", &mut report);

    let direct_insert = document.has_output_format(OutputFormat::Di);
    lint_count(document.count, direct_insert, "/count", &mut report);

    let mut seen: Vec<String> = Vec::new();
    for (index, entry) in document.sobjects.iter().enumerate() {
        let base = format!("/sObjects/{index}/{}", escape_pointer(&entry.name));
        let lowered = entry.name.to_lowercase();
        if seen.contains(&lowered) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "duplicate_object",
                format!("/sObjects/{index}"),
                format!("object '{}' appears more than once; only the first entry is edited", entry.name),
                Some("merge the duplicate entries into one".to_string()),
            ));
        } else {
            seen.push(lowered);
        }

        let settings = &entry.settings;
        if let Some(language) = &settings.language {
            lint_language(language, &format!("{base}/language"), &mut report);
        }
        if let Some(count) = settings.count {
            lint_count(count, direct_insert, &format!("{base}/count"), &mut report);
        }
        if let Some(fields) = &settings.fields_to_exclude {
            lint_duplicates(fields, &format!("{base}/fieldsToExclude"), &mut report);
        }
    }

    report
}

fn lint_output_format(document: &TemplateDocument, report: &mut ValidationReport) {
    if document.output_format.is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "empty_output_format",
            "/outputFormat",
            "outputFormat must contain at least one value",
            Some(format!("add one of: {}", OutputFormat::NAMES.join(", "))),
        ));
    }
    for (index, value) in document.output_format.iter().enumerate() {
        if OutputFormat::parse(value).is_none() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_output_format",
                format!("/outputFormat/{index}"),
                format!("output format '{value}' is not supported"),
                Some(format!("use one of: {}", OutputFormat::NAMES.join(", "))),
            ));
        }
    }
    lint_duplicates(&document.output_format, "/outputFormat", report);
}

fn lint_language(value: &str, path: &str, report: &mut ValidationReport) {
    if Language::parse(value).is_none() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "unknown_language",
            path,
            format!("language '{value}' is not supported"),
            Some(format!("use one of: {}", Language::NAMES.join(", "))),
        ));
    }
}

fn lint_count(value: u32, direct_insert: bool, path: &str, report: &mut ValidationReport) {
    let max = count_ceiling(direct_insert);
    if (MIN_RECORD_COUNT..=max).contains(&value) {
        return;
    }
    let (code, hint) = if direct_insert && value > max {
        (
            "direct_insert_ceiling",
            "lower the count or remove 'di' from outputFormat",
        )
    } else {
        ("count_out_of_range", "pick a count inside the allowed range")
    };
    report.push_error(ValidationIssue::new(
        IssueSeverity::Error,
        code,
        path,
        format!("count {value} must be within {MIN_RECORD_COUNT}-{max}"),
        Some(hint.to_string()),
    ));
}

fn lint_duplicates(values: &[String], path: &str, report: &mut ValidationReport) {
    let mut seen: Vec<String> = Vec::new();
    for (index, value) in values.iter().enumerate() {
        let lowered = value.to_lowercase();
        if seen.contains(&lowered) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "duplicate_value",
                format!("{path}/{index}"),
                format!("'{value}' is listed more than once"),
                None,
            ));
        } else {
            seen.push(lowered);
        }
    }
}

fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}

//! Default template content and template file naming.

use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::template::TemplateDocument;
use crate::vocabulary::{Language, OutputFormat};

/// Base name of the template written by `template init --default`.
pub const DEFAULT_TEMPLATE_STEM: &str = "default_data_template";
/// Suffix every named template gets on creation.
pub const TEMPLATE_SUFFIX: &str = "_data_template.json";

const IMPORTANT_NOTE: &str = "We highly recommend removing all the comments for a cleaner experience once you are comfortable with this json format";

fn object(entries: Vec<(&str, Value)>) -> Value {
    let map: Map<String, Value> = entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Value::Object(map)
}

/// Starter template: three objects, csv output, one record per object.
///
/// Every setting is preceded by a `_comment_*` note (and an `_example_*` for
/// list settings) describing it.
pub fn default_template(file_name: &str) -> Result<TemplateDocument> {
    let lead = object(vec![
        (
            "_comment_sobjectLevel",
            json!("These settings are object specific, so here these are set for lead object only"),
        ),
        (
            "_comment_fieldsToExclude",
            json!("Lists fields to exclude from generating test data for the Lead object."),
        ),
        ("fieldsToExclude", json!(["fax", "website"])),
        (
            "_comment_language",
            json!("Specifies language for generating test data for the Lead object."),
        ),
        ("language", json!(Language::En.as_str())),
        (
            "_comment_count",
            json!("Specifies count for generating test data for the Lead object."),
        ),
        ("count", json!(5)),
    ]);

    let template = object(vec![
        ("_comment_importantNote", json!(IMPORTANT_NOTE)),
        ("_comment_templateFileName", json!("The filename of the data template.")),
        ("templateFileName", json!(file_name)),
        (
            "_comment_namespaceToExclude",
            json!("Fields from these namespace(s) will be excluded while generating test data"),
        ),
        (
            "_example_namespaceToExclude",
            json!("namespaceToExclude:['namespace1','namespace2']"),
        ),
        ("namespaceToExclude", json!([])),
        (
            "_comment_outputFormat",
            json!("Desired output format(s) for storing the generated test data; only csv, json and di (direct insertion of up to 200 records into the connected org) are valid"),
        ),
        ("_example_outputFormat", json!("outputFormat:['csv','json','di']")),
        ("outputFormat", json!([OutputFormat::Csv.as_str()])),
        (
            "_comment_language",
            json!("Specifies the default language for data generation; applies to all sObjects unless overridden (e.g., 'en' for English)."),
        ),
        ("language", json!(Language::En.as_str())),
        (
            "_comment_count",
            json!("Specifies the default count for data generation; applies to all sObjects unless overridden"),
        ),
        ("count", json!(1)),
        (
            "_comment_sObjects",
            json!("Lists Salesforce objects (API names) to generate test data for."),
        ),
        (
            "sObjects",
            json!([{ "account": {} }, { "contact": {} }, { "lead": lead }]),
        ),
    ]);

    TemplateDocument::from_value(template)
}

/// File name for the `n`th default template; `0` is the unnumbered one.
pub fn default_template_file_name(n: u32) -> String {
    if n == 0 {
        format!("{DEFAULT_TEMPLATE_STEM}.json")
    } else {
        format!("{DEFAULT_TEMPLATE_STEM}_{n}.json")
    }
}

/// Normalize a user-chosen name so it ends with `_data_template.json`.
pub fn normalize_template_file_name(name: &str) -> String {
    let name = name.trim();
    let lowered = name.to_lowercase();
    if lowered.ends_with(TEMPLATE_SUFFIX) {
        name.to_string()
    } else if lowered.ends_with("_data_template") {
        format!("{name}.json")
    } else {
        format!("{name}{TEMPLATE_SUFFIX}")
    }
}

/// Name of an existing template file as typed on the command line.
pub fn with_json_suffix(name: &str) -> String {
    let name = name.trim();
    if name.to_lowercase().ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}

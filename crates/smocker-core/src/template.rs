use std::collections::BTreeMap;

use indexmap::IndexMap;
use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::scope::{ListField, Scope};
use crate::vocabulary::OutputFormat;

/// Data generation template persisted as `data_gen/templates/<name>.json`.
///
/// Keys are serialized in camelCase. Unknown keys are kept in `extra` and the
/// key order of the loaded file is remembered, so a load/save cycle keeps
/// annotations such as `_comment_*` entries next to the fields they describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    /// File name the template was created with.
    pub template_file_name: String,
    /// Namespaces whose fields are skipped during generation.
    #[serde(default)]
    pub namespace_to_exclude: Vec<String>,
    /// Output formats for generated records (`csv`, `json`, `di`).
    pub output_format: Vec<String>,
    /// Default locale for every object.
    pub language: String,
    /// Default record count for every object.
    pub count: u32,
    /// Objects to generate records for, with optional overrides.
    #[serde(default, rename = "sObjects")]
    pub sobjects: Vec<ObjectEntry>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    #[serde(skip)]
    pub(crate) key_order: KeyOrder,
}

/// Per-object overrides of the global settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_exclude: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_consider: Option<IndexMap<String, ConsiderValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Whether fields not listed in `fieldsToConsider` are still generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_left_fields: Option<bool>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    #[serde(skip)]
    pub(crate) key_order: KeyOrder,
}

/// Key order of an object as it was read from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct KeyOrder(Vec<String>);

impl KeyOrder {
    pub(crate) fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self(map.keys().cloned().collect()),
            _ => Self::default(),
        }
    }

    /// Reorder `map` so remembered keys come first in their remembered order.
    /// Keys that were not in the file keep their serialized order at the end.
    fn apply(&self, map: &mut Map<String, Value>) {
        if self.0.is_empty() {
            return;
        }
        let mut remaining: IndexMap<String, Value> = std::mem::take(map).into_iter().collect();
        for key in &self.0 {
            if let Some(value) = remaining.shift_remove(key) {
                map.insert(key.clone(), value);
            }
        }
        map.extend(remaining);
    }
}

/// Value of a `fieldsToConsider` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConsiderValue {
    /// Allowed values for the field; empty means any value.
    Values(Vec<String>),
    /// Controlling field of a `dp-` dependent picklist.
    Controller(String),
}

/// Single-key mapping from an object API name to its settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub name: String,
    pub settings: ObjectSettings,
}

impl ObjectEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: ObjectSettings::default(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl Serialize for ObjectEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.settings)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObjectEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = IndexMap::<String, ObjectSettings>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(de::Error::custom(format!(
                "sObjects entry must have exactly one object name, found {}",
                map.len()
            )));
        }
        let (name, settings) = map
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::custom("empty sObjects entry"))?;
        Ok(Self { name, settings })
    }
}

impl JsonSchema for ObjectEntry {
    fn schema_name() -> String {
        "ObjectEntry".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut schema = <BTreeMap<String, ObjectSettings>>::json_schema(generator).into_object();
        let object = schema.object();
        object.min_properties = Some(1);
        object.max_properties = Some(1);
        Schema::Object(schema)
    }
}

const LEGACY_DOCUMENT_KEYS: &[(&str, &str)] = &[
    ("template-file-name", "templateFileName"),
    ("namespace-to-exclude", "namespaceToExclude"),
    ("output-format", "outputFormat"),
    ("sobjects", "sObjects"),
];

const LEGACY_OBJECT_KEYS: &[(&str, &str)] = &[
    ("fields-to-exclude", "fieldsToExclude"),
    ("fields-to-consider", "fieldsToConsider"),
    ("pick-left-fields", "pickLeftFields"),
    ("pickLeftField", "pickLeftFields"),
];

/// Rewrite hyphenated legacy keys to their camelCase names, in place.
pub fn normalize_legacy_keys(value: &mut Value) {
    let Value::Object(document) = value else {
        return;
    };
    rename_keys(document, LEGACY_DOCUMENT_KEYS);

    if let Some(Value::Array(entries)) = document.get_mut("sObjects") {
        for entry in entries {
            if let Value::Object(entry) = entry {
                for settings in entry.values_mut() {
                    if let Value::Object(settings) = settings {
                        rename_keys(settings, LEGACY_OBJECT_KEYS);
                    }
                }
            }
        }
    }
}

fn rename_keys(map: &mut Map<String, Value>, renames: &[(&str, &str)]) {
    let original = std::mem::take(map);
    for (key, value) in original {
        let key = renames
            .iter()
            .find(|(legacy, _)| *legacy == key)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(key);
        map.insert(key, value);
    }
}

impl TemplateDocument {
    /// Parse a template from JSON text, accepting legacy key names.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self> {
        normalize_legacy_keys(&mut value);
        let key_order = KeyOrder::of(&value);
        let object_orders: Vec<KeyOrder> = match value.get("sObjects") {
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| match entry {
                    Value::Object(entry) => entry.values().next().map(KeyOrder::of).unwrap_or_default(),
                    _ => KeyOrder::default(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let mut document: Self = serde_json::from_value(value)
            .map_err(|err| Error::InvalidTemplate(err.to_string()))?;
        document.key_order = key_order;
        for (entry, order) in document.sobjects.iter_mut().zip(object_orders) {
            entry.settings.key_order = order;
        }
        Ok(document)
    }

    /// Canonical JSON value with keys in the order they were loaded.
    pub fn to_value(&self) -> Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(document) = &mut value {
            self.key_order.apply(document);
            if let Some(Value::Array(entries)) = document.get_mut("sObjects") {
                for (entry, object) in entries.iter_mut().zip(&self.sobjects) {
                    if let Some(Value::Object(settings)) = entry.get_mut(object.name.as_str()) {
                        object.settings.key_order.apply(settings);
                    }
                }
            }
        }
        Ok(value)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_value()?).map_err(Error::from)
    }

    /// Index of the first entry whose name matches case-insensitively.
    pub fn find_object(&self, name: &str) -> Option<usize> {
        self.sobjects.iter().position(|entry| entry.matches(name))
    }

    pub fn object(&self, name: &str) -> Option<&ObjectEntry> {
        self.find_object(name).map(|index| &self.sobjects[index])
    }

    pub fn object_names(&self) -> Vec<&str> {
        self.sobjects.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn has_output_format(&self, format: OutputFormat) -> bool {
        self.output_format
            .iter()
            .any(|value| OutputFormat::parse(value) == Some(format))
    }

    /// Array behind `list` in `scope`. `fieldsToExclude` only exists per object.
    pub(crate) fn list_mut(&mut self, scope: Scope, list: ListField) -> Result<&mut Vec<String>> {
        match (scope, list) {
            (_, ListField::OutputFormat) => Ok(&mut self.output_format),
            (_, ListField::NamespaceToExclude) => Ok(&mut self.namespace_to_exclude),
            (Scope::Object(index), ListField::FieldsToExclude) => Ok(self.sobjects[index]
                .settings
                .fields_to_exclude
                .get_or_insert_with(Vec::new)),
            (Scope::Global, ListField::FieldsToExclude) => Err(Error::FlagNotAllowedInScope {
                flag: list.field().flag(),
                scope: "global settings".to_string(),
            }),
        }
    }

    /// Global count followed by every object-level count, labelled by scope.
    pub fn counts(&self) -> Vec<(String, u32)> {
        let mut counts = vec![("template".to_string(), self.count)];
        for entry in &self.sobjects {
            if let Some(count) = entry.settings.count {
                counts.push((format!("object '{}'", entry.name), count));
            }
        }
        counts
    }
}

/// Case-insensitive membership test used by every list field.
pub fn contains_ignore_case(values: &[String], token: &str) -> bool {
    let token = token.to_lowercase();
    values.iter().any(|value| value.to_lowercase() == token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_keys_are_normalized() {
        let document = TemplateDocument::from_value(json!({
            "template-file-name": "legacy.json",
            "namespace-to-exclude": ["ns1"],
            "output-format": ["csv"],
            "language": "en",
            "count": 3,
            "sobjects": [{ "lead": { "fields-to-exclude": ["fax"], "count": 2 } }]
        }))
        .expect("parse legacy template");

        assert_eq!(document.template_file_name, "legacy.json");
        assert_eq!(document.namespace_to_exclude, ["ns1"]);
        assert_eq!(
            document.sobjects[0].settings.fields_to_exclude.as_deref(),
            Some(&["fax".to_string()][..])
        );
        let written = document.to_json_string().expect("serialize");
        assert!(written.contains("\"sObjects\""));
        assert!(!written.contains("fields-to-exclude"));
    }

    #[test]
    fn object_entry_requires_exactly_one_key() {
        let result = TemplateDocument::from_value(json!({
            "templateFileName": "t.json",
            "outputFormat": ["csv"],
            "language": "en",
            "count": 1,
            "sObjects": [{ "lead": {}, "contact": {} }]
        }));
        assert!(matches!(result, Err(Error::InvalidTemplate(_))));
    }

    #[test]
    fn find_object_is_case_insensitive() {
        let mut document = TemplateDocument::from_value(json!({
            "templateFileName": "t.json",
            "outputFormat": ["csv"],
            "language": "en",
            "count": 1,
            "sObjects": [{ "Lead": {} }]
        }))
        .expect("parse template");
        assert_eq!(document.find_object("LEAD"), Some(0));
        document.sobjects.push(ObjectEntry::new("lead"));
        assert_eq!(document.find_object("lead"), Some(0));
        assert_eq!(document.find_object("contact"), None);
    }

    #[test]
    fn fields_to_exclude_has_no_global_array() {
        let mut document = TemplateDocument::from_value(json!({
            "templateFileName": "t.json",
            "namespaceToExclude": ["ns1"],
            "outputFormat": ["csv"],
            "language": "en",
            "count": 1,
            "sObjects": [{ "lead": {} }]
        }))
        .expect("parse template");

        let err = document
            .list_mut(Scope::Global, ListField::FieldsToExclude)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FlagNotAllowedInScope { flag: "--fields-to-exclude", .. }
        ));
        assert_eq!(document.namespace_to_exclude, ["ns1"]);

        document
            .list_mut(Scope::Object(0), ListField::FieldsToExclude)
            .expect("object array")
            .push("fax".to_string());
        assert_eq!(
            document.sobjects[0].settings.fields_to_exclude.as_deref(),
            Some(&["fax".to_string()][..])
        );
    }

    #[test]
    fn new_keys_follow_the_remembered_ones() {
        let mut document = TemplateDocument::from_value(json!({
            "_comment_count": "records per object",
            "count": 1,
            "templateFileName": "t.json",
            "outputFormat": ["csv"],
            "language": "en",
            "sObjects": [{ "lead": { "_comment_lead": "lead only", "count": 2 } }]
        }))
        .expect("parse template");
        document.sobjects[0].settings.language = Some("jp".to_string());

        let value = document.to_value().expect("to value");
        let keys: Vec<&str> = value
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(
            keys,
            ["_comment_count", "count", "templateFileName", "outputFormat", "language", "sObjects", "namespaceToExclude"]
        );
        let lead_keys: Vec<&str> = value["sObjects"][0]["lead"]
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(lead_keys, ["_comment_lead", "count", "language"]);
    }
}

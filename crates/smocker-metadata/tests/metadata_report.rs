use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;
use smocker_core::TemplateDocument;
use smocker_metadata::{
    MetadataError, MetadataSource, MissingFields, ObjectMetadata, SessionInfo, check_template,
    referenced_fields,
};

/// In-memory org with a fixed set of described objects.
struct StubOrg {
    objects: HashMap<String, ObjectMetadata>,
}

impl StubOrg {
    fn new(objects: Vec<ObjectMetadata>) -> Self {
        Self {
            objects: objects
                .into_iter()
                .map(|object| (object.name.to_lowercase(), object))
                .collect(),
        }
    }
}

#[async_trait]
impl MetadataSource for StubOrg {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn open_session(&self, alias: &str) -> smocker_metadata::Result<SessionInfo> {
        if alias == "offline" {
            return Err(MetadataError::Session {
                alias: alias.to_string(),
                message: "no authorization".to_string(),
            });
        }
        Ok(SessionInfo {
            username: format!("{alias}@example.com"),
            instance_url: None,
        })
    }

    async fn describe(
        &self,
        _session: &SessionInfo,
        object: &str,
    ) -> smocker_metadata::Result<Option<ObjectMetadata>> {
        Ok(self.objects.get(&object.to_lowercase()).cloned())
    }
}

fn object(name: &str, fields: &[&str], has_name_field: bool) -> ObjectMetadata {
    ObjectMetadata {
        name: name.to_string(),
        fields: fields.iter().map(|field| field.to_string()).collect(),
        has_name_field,
    }
}

fn template() -> TemplateDocument {
    TemplateDocument::from_value(json!({
        "templateFileName": "check_data_template.json",
        "outputFormat": ["csv"],
        "language": "en",
        "count": 1,
        "sObjects": [
            { "lead": {
                "fieldsToExclude": ["fax", "shoe_size__c"],
                "fieldsToConsider": { "name": [], "dp-state__c": "country__c" }
            } },
            { "widget__c": {} },
            { "contact": { "fieldsToExclude": ["Department"] } }
        ]
    }))
    .expect("parse template")
}

fn org() -> StubOrg {
    StubOrg::new(vec![
        object("Lead", &["Id", "Fax", "State__c"], true),
        object("Contact", &["Id", "Department"], false),
    ])
}

#[tokio::test]
async fn unknown_objects_and_fields_are_reported() {
    let org = org();
    let session = org.open_session("dev").await.expect("session");
    let report = check_template(&org, &session, &template())
        .await
        .expect("check template");

    assert_eq!(report.checked_objects, 3);
    assert_eq!(report.missing_objects, ["widget__c"]);
    assert_eq!(
        report.missing_fields,
        [MissingFields {
            object: "lead".to_string(),
            fields: vec!["shoe_size__c".to_string()],
        }]
    );
    assert!(!report.is_clean());
}

#[tokio::test]
async fn name_field_counts_only_when_the_object_has_one() {
    let org = StubOrg::new(vec![
        object("Lead", &["Id", "Fax", "State__c", "Shoe_Size__c"], false),
        object("Widget__c", &["Id"], true),
        object("Contact", &["Id", "Department"], false),
    ]);
    let session = org.open_session("dev").await.expect("session");
    let report = check_template(&org, &session, &template())
        .await
        .expect("check template");

    assert!(report.missing_objects.is_empty());
    assert_eq!(report.missing_fields[0].fields, ["name"]);
}

#[tokio::test]
async fn session_failure_surfaces_as_an_error() {
    let err = org().open_session("offline").await.unwrap_err();
    assert!(matches!(err, MetadataError::Session { .. }));
}

#[test]
fn dependent_picklist_prefix_is_stripped() {
    assert_eq!(
        referenced_fields(&template(), "lead"),
        ["fax", "shoe_size__c", "name", "state__c"]
    );
    assert!(referenced_fields(&template(), "account").is_empty());
}

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::{MetadataError, Result};
use crate::source::{MetadataSource, ObjectMetadata, SessionInfo};

/// Metadata source backed by the Salesforce `sf` command line tool.
///
/// Every call runs `sf ... --json` and reads the JSON envelope it prints on
/// stdout, including on failure.
#[derive(Debug, Clone)]
pub struct SfCliSource {
    program: String,
}

impl Default for SfCliSource {
    fn default() -> Self {
        Self::new("sf")
    }
}

impl SfCliSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Envelope> {
        debug!(event = "sf_cli_invoked", program = %self.program, args = %args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .arg("--json")
            .output()
            .await
            .map_err(|source| MetadataError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        parse_envelope(&output.stdout)
    }
}

/// Common shape of every `sf --json` response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub status: i32,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    fn is_success(&self) -> bool {
        self.status == 0
    }

    fn failure_message(&self) -> String {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => format!("{name}: {message}"),
            (None, Some(message)) => message.clone(),
            (Some(name), None) => name.clone(),
            (None, None) => format!("exited with status {}", self.status),
        }
    }

    fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        let result = self.result.unwrap_or(Value::Null);
        Ok(serde_json::from_value(result)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgDisplay {
    username: String,
    #[serde(default)]
    instance_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescribeResult {
    name: String,
    #[serde(default)]
    fields: Vec<DescribeField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeField {
    name: String,
    #[serde(default)]
    name_field: bool,
}

pub(crate) fn parse_envelope(stdout: &[u8]) -> Result<Envelope> {
    Ok(serde_json::from_slice(stdout)?)
}

fn session_from_envelope(alias: &str, envelope: Envelope) -> Result<SessionInfo> {
    if !envelope.is_success() {
        return Err(MetadataError::Session {
            alias: alias.to_string(),
            message: envelope.failure_message(),
        });
    }
    let display: OrgDisplay = envelope.into_result()?;
    Ok(SessionInfo {
        username: display.username,
        instance_url: display.instance_url,
    })
}

fn describe_from_envelope(object: &str, envelope: Envelope) -> Result<Option<ObjectMetadata>> {
    if !envelope.is_success() {
        warn!(event = "describe_failed", object = %object, reason = %envelope.failure_message());
        return Ok(None);
    }
    let describe: DescribeResult = envelope.into_result()?;
    let has_name_field = describe.fields.iter().any(|field| field.name_field);
    Ok(Some(ObjectMetadata {
        name: describe.name,
        fields: describe.fields.into_iter().map(|field| field.name).collect(),
        has_name_field,
    }))
}

#[async_trait::async_trait]
impl MetadataSource for SfCliSource {
    fn name(&self) -> &'static str {
        "sf-cli"
    }

    async fn open_session(&self, alias: &str) -> Result<SessionInfo> {
        let envelope = self.run(&["org", "display", "--target-org", alias]).await?;
        session_from_envelope(alias, envelope)
    }

    async fn describe(
        &self,
        session: &SessionInfo,
        object: &str,
    ) -> Result<Option<ObjectMetadata>> {
        let envelope = self
            .run(&[
                "sobject",
                "describe",
                "--sobject",
                object,
                "--target-org",
                session.username.as_str(),
            ])
            .await?;
        describe_from_envelope(object, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_envelope_maps_fields_and_name_field() {
        let stdout = br#"{
            "status": 0,
            "result": {
                "name": "Lead",
                "fields": [
                    { "name": "Id", "nameField": false },
                    { "name": "Name", "nameField": true },
                    { "name": "Fax" }
                ]
            },
            "warnings": []
        }"#;
        let envelope = parse_envelope(stdout).expect("parse envelope");
        let metadata = describe_from_envelope("lead", envelope)
            .expect("describe")
            .expect("object exists");

        assert_eq!(metadata.name, "Lead");
        assert_eq!(metadata.fields, ["Id", "Name", "Fax"]);
        assert!(metadata.has_name_field);
        assert!(metadata.known_fields().contains("fax"));
    }

    #[test]
    fn failed_describe_means_missing_object() {
        let stdout = br#"{ "status": 1, "name": "NOT_FOUND", "message": "The requested resource does not exist" }"#;
        let envelope = parse_envelope(stdout).expect("parse envelope");
        assert_eq!(describe_from_envelope("widget__c", envelope).expect("describe"), None);
    }

    #[test]
    fn failed_org_display_is_a_session_error() {
        let stdout = br#"{ "status": 1, "name": "NoOrgFound", "message": "No authorization information found for nope." }"#;
        let envelope = parse_envelope(stdout).expect("parse envelope");
        let err = session_from_envelope("nope", envelope).unwrap_err();
        assert!(matches!(err, MetadataError::Session { alias, .. } if alias == "nope"));
    }

    #[test]
    fn org_display_yields_username() {
        let stdout = br#"{ "status": 0, "result": { "username": "dev@example.com", "instanceUrl": "https://example.my.salesforce.com", "alias": "dev" } }"#;
        let envelope = parse_envelope(stdout).expect("parse envelope");
        let session = session_from_envelope("dev", envelope).expect("session");
        assert_eq!(session.username, "dev@example.com");
        assert_eq!(
            session.instance_url.as_deref(),
            Some("https://example.my.salesforce.com")
        );
    }
}

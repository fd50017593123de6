use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::Result;

/// Authenticated org session resolved from a username or alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub username: String,
    pub instance_url: Option<String>,
}

/// Object description as returned by the org.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub name: String,
    pub fields: Vec<String>,
    /// Objects with a name field accept `name` as a field reference.
    pub has_name_field: bool,
}

impl ObjectMetadata {
    /// Lower-cased field names, including `name` when the object has one.
    pub fn known_fields(&self) -> HashSet<String> {
        let mut fields: HashSet<String> =
            self.fields.iter().map(|field| field.to_lowercase()).collect();
        if self.has_name_field {
            fields.insert("name".to_string());
        }
        fields
    }
}

/// Remote capability that answers object and field existence questions.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Identifier used in logs (e.g. `sf-cli`).
    fn name(&self) -> &'static str;

    async fn open_session(&self, alias: &str) -> Result<SessionInfo>;

    /// Describe one object. `Ok(None)` means the object does not exist or is
    /// not accessible to the session.
    async fn describe(&self, session: &SessionInfo, object: &str)
    -> Result<Option<ObjectMetadata>>;
}

use serde::{Deserialize, Serialize};

use super::atomic::write_text_atomic;
use super::{DataGenPaths, WorkspaceResult};

/// Answer given when upsert meets an object that is not in the template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewObjectPolicy {
    #[default]
    AskEachTime,
    AlwaysAdd,
    NeverAdd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub new_object_policy: NewObjectPolicy,
    /// Org alias used by `template validate` when `--alias` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_alias: Option<String>,
}

/// Settings from `data_gen/settings.toml`, or defaults when the file is absent.
pub fn load_settings(paths: &DataGenPaths) -> WorkspaceResult<WorkspaceSettings> {
    let path = paths.settings_path();
    if !path.exists() {
        return Ok(WorkspaceSettings::default());
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}

pub fn load_or_create_settings(paths: &DataGenPaths) -> WorkspaceResult<WorkspaceSettings> {
    if paths.settings_path().exists() {
        return load_settings(paths);
    }

    let settings = WorkspaceSettings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

fn save_settings(paths: &DataGenPaths, settings: &WorkspaceSettings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_text_atomic(&paths.settings_path(), &encoded)
}

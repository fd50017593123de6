mod atomic;
mod paths;
mod settings;
mod templates;

pub use paths::DataGenPaths;
pub use settings::{NewObjectPolicy, WorkspaceSettings, load_or_create_settings, load_settings};
pub use templates::{TemplateFile, load_template, read_template_value, write_template};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("template directory does not exist at {}. Please initialize the setup first", .0.display())]
    MissingTemplateDirectory(PathBuf),
    #[error("data template file not found at {}", .0.display())]
    MissingTemplateFile(PathBuf),
    #[error(transparent)]
    Template(#[from] smocker_core::Error),
    #[error("invalid workspace state: {0}")]
    Invalid(String),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

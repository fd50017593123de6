use std::path::PathBuf;

use serde_json::Value;
use smocker_core::{TemplateDocument, with_json_suffix};
use tracing::{debug, info};

use super::atomic::write_text_atomic;
use super::{DataGenPaths, WorkspaceError, WorkspaceResult};

/// A template located on disk.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub file_name: String,
    pub path: PathBuf,
}

impl TemplateFile {
    /// Resolve `--template-name` to an existing file under `data_gen/templates`.
    pub fn locate(paths: &DataGenPaths, template_name: &str) -> WorkspaceResult<Self> {
        if !paths.templates_dir.is_dir() {
            return Err(WorkspaceError::MissingTemplateDirectory(
                paths.templates_dir.clone(),
            ));
        }
        let file_name = with_json_suffix(template_name);
        let path = paths.template_path(&file_name);
        if !path.is_file() {
            return Err(WorkspaceError::MissingTemplateFile(path));
        }
        Ok(Self { file_name, path })
    }
}

/// Raw JSON of a template, before any normalization.
pub fn read_template_value(file: &TemplateFile) -> WorkspaceResult<Value> {
    let content = std::fs::read_to_string(&file.path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_template(file: &TemplateFile) -> WorkspaceResult<TemplateDocument> {
    let content = std::fs::read_to_string(&file.path)?;
    let document = TemplateDocument::from_json_str(&content)?;
    debug!(
        event = "template_loaded",
        path = %file.path.display(),
        objects = document.sobjects.len()
    );
    Ok(document)
}

/// Pretty-print the document with a trailing newline and replace the file.
pub fn write_template(path: &std::path::Path, document: &TemplateDocument) -> WorkspaceResult<()> {
    let mut text = document.to_json_string()?;
    text.push('\n');
    write_text_atomic(path, &text)?;
    info!(event = "template_written", path = %path.display());
    Ok(())
}

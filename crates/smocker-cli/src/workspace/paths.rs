use std::path::{Path, PathBuf};

use super::{WorkspaceError, WorkspaceResult};

/// Layout of the `data_gen` directory inside a project.
#[derive(Debug, Clone)]
pub struct DataGenPaths {
    pub root: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl DataGenPaths {
    pub fn new(project_dir: &Path) -> Self {
        let root = project_dir.join("data_gen");
        let templates_dir = root.join("templates");
        let output_dir = root.join("output");
        let logs_dir = root.join("logs");
        Self {
            root,
            templates_dir,
            output_dir,
            logs_dir,
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.logs_dir.join("smocker.ndjson")
    }

    pub fn template_path(&self, file_name: &str) -> PathBuf {
        self.templates_dir.join(file_name)
    }

    pub fn ensure_dirs(&self) -> WorkspaceResult<()> {
        create_if_missing(&self.root)?;
        create_if_missing(&self.templates_dir)?;
        create_if_missing(&self.output_dir)?;
        create_if_missing(&self.logs_dir)?;
        Ok(())
    }
}

fn create_if_missing(path: &Path) -> WorkspaceResult<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(WorkspaceError::from)
}

pub mod init;
pub mod remove;
pub mod upsert;
pub mod validate;

use smocker_core::Applied;

use crate::CliError;
use crate::workspace::{TemplateFile, write_template};

/// Print the engine's status lines and persist the document if it changed.
fn finish_mutation(file: &TemplateFile, applied: Applied) -> Result<(), CliError> {
    for line in &applied.messages {
        println!("{line}");
    }
    if !applied.changed {
        tracing::info!(event = "template_unchanged", path = %file.path.display());
        println!("No changes to write to '{}'", file.file_name);
        return Ok(());
    }
    write_template(&file.path, &applied.document)?;
    println!("Success: data template '{}' updated", file.file_name);
    Ok(())
}

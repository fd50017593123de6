use clap::Args;
use smocker_core::{TemplateDocument, ValidationIssue, check_template_json, lint_template};
use smocker_metadata::{MetadataReport, MetadataSource, check_template};
use tracing::{info, warn};

use crate::CliError;
use crate::workspace::{DataGenPaths, TemplateFile, WorkspaceSettings, read_template_value};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template file in data_gen/templates (`.json` is optional).
    #[arg(short = 't', long)]
    pub template_name: String,
    /// Username or alias of an authenticated org. Falls back to `default_alias`.
    #[arg(short = 'a', long)]
    pub alias: Option<String>,
}

/// Report local and remote problems in a template. Only a missing or
/// unparseable template fails the command.
pub async fn run(
    paths: &DataGenPaths,
    settings: &WorkspaceSettings,
    args: &ValidateArgs,
    source: &dyn MetadataSource,
) -> Result<(), CliError> {
    let file = TemplateFile::locate(paths, &args.template_name)?;
    let value = read_template_value(&file)?;

    let structural = check_template_json(&value)?;
    print_issues(structural.issues());

    let document = TemplateDocument::from_value(value)?;
    let lint = lint_template(&document);
    print_issues(lint.issues());
    let local_clean = structural.is_clean() && lint.is_clean();
    info!(
        event = "template_linted",
        errors = structural.errors.len() + lint.errors.len(),
        warnings = structural.warnings.len() + lint.warnings.len()
    );

    let Some(alias) = args.alias.clone().or_else(|| settings.default_alias.clone()) else {
        println!("Warning: no org alias given; skipped the object and field check");
        return Ok(());
    };

    let session = match source.open_session(&alias).await {
        Ok(session) => session,
        Err(err) => {
            warn!(event = "session_failed", alias = %alias, error = %err);
            println!("Warning: {err}");
            return Ok(());
        }
    };
    println!("Success: SF Connection established as {}", session.username);

    match check_template(source, &session, &document).await {
        Ok(report) => print_report(&file, &report, local_clean),
        Err(err) => {
            warn!(event = "metadata_check_failed", error = %err);
            println!("Warning: could not check objects and fields: {err}");
        }
    }
    Ok(())
}

fn print_issues<'a>(issues: impl Iterator<Item = &'a ValidationIssue>) {
    for issue in issues {
        warn!(event = "template_issue", code = %issue.code, path = %issue.path);
        match &issue.hint {
            Some(hint) => println!("Warning: {} ({}): {} ({hint})", issue.path, issue.code, issue.message),
            None => println!("Warning: {} ({}): {}", issue.path, issue.code, issue.message),
        }
    }
}

fn print_report(file: &TemplateFile, report: &MetadataReport, local_clean: bool) {
    if !report.missing_objects.is_empty() {
        println!(
            "Warning: SObjects do not exist or cannot be accessed:\n -> {}",
            report.missing_objects.join(", ")
        );
    }
    if !report.missing_fields.is_empty() {
        println!("Warning: Fields do not exist or cannot be accessed:");
        for missing in &report.missing_fields {
            println!(" -> {}: {}", missing.object, missing.fields.join(", "));
        }
    }

    if !report.is_clean() {
        println!("Note: these values are kept in the data template; you can change them anytime");
    } else if local_clean {
        println!(
            "Success: validated '{}' and no invalid object/fields were found",
            file.file_name
        );
    }
}

mod commands;
mod logging;
mod prompt;
mod workspace;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use commands::init::InitArgs;
use commands::remove::RemoveArgs;
use commands::upsert::UpsertArgs;
use commands::validate::ValidateArgs;
use smocker_metadata::{MetadataError, SfCliSource};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;
use workspace::{DataGenPaths, WorkspaceError, load_settings};

/// Environment variable naming the `sf` executable used by `template validate`.
const SF_BIN_ENV: &str = "SMOCKER_SF_BIN";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Template(#[from] smocker_core::Error),
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error("cannot resolve project directory: {0}")]
    ProjectDir(#[from] std::io::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("aborted: {0}")]
    Aborted(String),
}

#[derive(Parser, Debug)]
#[command(name = "smocker", version, about = "Edit data generation templates")]
struct Cli {
    /// Raise console log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Directory that holds `data_gen` (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, edit and check data generation templates.
    #[command(subcommand)]
    Template(TemplateCommand),
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Create the data_gen directory structure and a starter template.
    Init(InitArgs),
    /// Add or update settings in a template.
    Upsert(UpsertArgs),
    /// Remove settings or objects from a template.
    Remove(RemoveArgs),
    /// Check a template locally and against a connected org.
    Validate(ValidateArgs),
}

impl TemplateCommand {
    fn name(&self) -> &'static str {
        match self {
            TemplateCommand::Init(_) => "init",
            TemplateCommand::Upsert(_) => "upsert",
            TemplateCommand::Remove(_) => "remove",
            TemplateCommand::Validate(_) => "validate",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = match resolve_paths(cli.project_dir.clone()) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("Process halted: {err}");
            return ExitCode::FAILURE;
        }
    };

    let log_path = paths.logs_dir.is_dir().then(|| paths.log_path());
    if let Err(err) = logging::init_logging(cli.verbose, log_path.as_deref()) {
        eprintln!("Warning: {err}");
    }

    let Command::Template(command) = &cli.command;
    let invocation_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "invocation",
        invocation_id = %invocation_id,
        command = command.name()
    );

    let result = run(&paths, command).instrument(span.clone()).await;
    let _entered = span.enter();
    match result {
        Ok(()) => {
            tracing::info!(event = "command_finished", status = "success");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(event = "command_failed", error = %err);
            eprintln!("Process halted: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_paths(project_dir: Option<PathBuf>) -> Result<DataGenPaths, CliError> {
    let project_dir = match project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    Ok(DataGenPaths::new(&project_dir))
}

async fn run(paths: &DataGenPaths, command: &TemplateCommand) -> Result<(), CliError> {
    tracing::info!(event = "command_started", project = %paths.root.display());

    match command {
        TemplateCommand::Init(args) => commands::init::run(paths, args, &mut prompt::ConsolePrompt),
        TemplateCommand::Upsert(args) => {
            let settings = load_settings(paths)?;
            commands::upsert::run(paths, &settings, args)
        }
        TemplateCommand::Remove(args) => commands::remove::run(paths, args),
        TemplateCommand::Validate(args) => {
            let settings = load_settings(paths)?;
            let source = match std::env::var(SF_BIN_ENV) {
                Ok(program) => SfCliSource::new(program),
                Err(_) => SfCliSource::default(),
            };
            commands::validate::run(paths, &settings, args, &source).await
        }
    }
}

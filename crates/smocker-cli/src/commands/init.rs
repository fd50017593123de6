use clap::{ArgGroup, Args};
use smocker_core::{
    Confirm, default_template, default_template_file_name, normalize_template_file_name,
};
use tracing::info;

use crate::CliError;
use crate::workspace::{DataGenPaths, load_or_create_settings, write_template};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["default", "template_name"])))]
pub struct InitArgs {
    /// Write the starter template as default_data_template[_N].json.
    #[arg(long)]
    pub default: bool,
    /// Write the starter template under this name (`_data_template.json` is appended).
    #[arg(short = 't', long)]
    pub template_name: Option<String>,
    /// Overwrite an existing template without asking.
    #[arg(long)]
    pub force: bool,
}

pub fn run(
    paths: &DataGenPaths,
    args: &InitArgs,
    confirm: &mut dyn Confirm,
) -> Result<(), CliError> {
    let created = !paths.root.exists();
    paths.ensure_dirs()?;
    load_or_create_settings(paths)?;
    if created {
        println!("Success: data_gen structure created: {}", paths.root.display());
    }

    let file_name = match args.template_name.as_deref() {
        Some(name) => named_template(paths, name, args.force, confirm)?,
        None => next_default_name(paths),
    };

    let path = paths.template_path(&file_name);
    write_template(&path, &default_template(&file_name)?)?;
    info!(event = "template_created", path = %path.display());
    println!("Success: data template created at {}", path.display());
    Ok(())
}

fn next_default_name(paths: &DataGenPaths) -> String {
    let mut n = 0;
    loop {
        let name = default_template_file_name(n);
        if !paths.template_path(&name).exists() {
            return name;
        }
        n += 1;
    }
}

fn named_template(
    paths: &DataGenPaths,
    name: &str,
    force: bool,
    confirm: &mut dyn Confirm,
) -> Result<String, CliError> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidArgs(
            "please provide a template file name".to_string(),
        ));
    }
    let file_name = normalize_template_file_name(name);
    if force || !paths.template_path(&file_name).exists() {
        return Ok(file_name);
    }
    if confirm.confirm("Warning: Template name already exists! Do you want to overwrite?") {
        Ok(file_name)
    } else {
        Err(CliError::Aborted(format!(
            "'{file_name}' already exists and was not overwritten"
        )))
    }
}

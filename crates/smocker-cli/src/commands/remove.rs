use clap::Args;
use smocker_core::{RemoveRequest, remove};

use super::finish_mutation;
use crate::CliError;
use crate::workspace::{DataGenPaths, TemplateFile, load_template};

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Template file in data_gen/templates (`.json` is optional).
    #[arg(short = 't', long)]
    pub template_name: String,
    /// Comma-separated object API names. Alone, removes the objects.
    #[arg(short = 'o', long)]
    pub sobject: Option<String>,
    /// Delete the object-level language.
    #[arg(short = 'l', long)]
    pub language: bool,
    /// Delete the object-level count.
    #[arg(short = 'c', long)]
    pub count: bool,
    /// Namespaces to drop from namespaceToExclude.
    #[arg(short = 'x', long)]
    pub namespace_to_exclude: Option<String>,
    /// Formats to drop from outputFormat.
    #[arg(short = 'f', long)]
    pub output_format: Option<String>,
    /// Fields to drop from the object's fieldsToExclude.
    #[arg(short = 'e', long)]
    pub fields_to_exclude: Option<String>,
}

impl RemoveArgs {
    fn request(&self) -> RemoveRequest {
        RemoveRequest {
            sobjects: self.sobject.clone(),
            language: self.language,
            count: self.count,
            namespace_to_exclude: self.namespace_to_exclude.clone(),
            output_format: self.output_format.clone(),
            fields_to_exclude: self.fields_to_exclude.clone(),
        }
    }
}

pub fn run(paths: &DataGenPaths, args: &RemoveArgs) -> Result<(), CliError> {
    let file = TemplateFile::locate(paths, &args.template_name)?;
    let document = load_template(&file)?;
    let applied = remove(document, &args.request())?;
    finish_mutation(&file, applied)
}

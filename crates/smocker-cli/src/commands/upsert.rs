use clap::Args;
use smocker_core::{UpsertRequest, upsert};

use super::finish_mutation;
use crate::CliError;
use crate::prompt::{ConsolePrompt, PolicyConfirm};
use crate::workspace::{DataGenPaths, TemplateFile, WorkspaceSettings, load_template};

#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Template file in data_gen/templates (`.json` is optional).
    #[arg(short = 't', long)]
    pub template_name: String,
    /// Comma-separated object API names; switches to object scope.
    #[arg(short = 'o', long)]
    pub sobject: Option<String>,
    /// Locale for generated values (en, jp).
    #[arg(short = 'l', long)]
    pub language: Option<String>,
    /// Number of records to generate.
    #[arg(short = 'c', long)]
    pub count: Option<u32>,
    /// Namespaces whose fields are skipped.
    #[arg(short = 'x', long)]
    pub namespace_to_exclude: Option<String>,
    /// Output formats (csv, json, di).
    #[arg(short = 'f', long)]
    pub output_format: Option<String>,
    /// Fields skipped for the object.
    #[arg(short = 'e', long)]
    pub fields_to_exclude: Option<String>,
    /// Fields to generate, as `field: [value, value], dp-field: [controller]`.
    #[arg(short = 'i', long)]
    pub fields_to_consider: Option<String>,
    /// Generate fields not listed in --fields-to-consider.
    #[arg(short = 'p', long, num_args = 0..=1, default_missing_value = "true")]
    pub pick_left_fields: Option<bool>,
}

impl UpsertArgs {
    fn request(&self) -> UpsertRequest {
        UpsertRequest {
            sobjects: self.sobject.clone(),
            language: self.language.clone(),
            count: self.count,
            namespace_to_exclude: self.namespace_to_exclude.clone(),
            output_format: self.output_format.clone(),
            fields_to_exclude: self.fields_to_exclude.clone(),
            fields_to_consider: self.fields_to_consider.clone(),
            pick_left_fields: self.pick_left_fields,
        }
    }
}

pub fn run(
    paths: &DataGenPaths,
    settings: &WorkspaceSettings,
    args: &UpsertArgs,
) -> Result<(), CliError> {
    let file = TemplateFile::locate(paths, &args.template_name)?;
    let document = load_template(&file)?;

    let mut confirm = PolicyConfirm::new(settings.new_object_policy, ConsolePrompt);
    let applied = upsert(document, &args.request(), &mut confirm)?;
    finish_mutation(&file, applied)
}

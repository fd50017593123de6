//! Org metadata lookups used by `template validate`.

pub mod errors;
pub mod report;
pub mod sf_cli;
pub mod source;

pub use errors::{MetadataError, Result};
pub use report::{MetadataReport, MissingFields, check_template, referenced_fields};
pub use sf_cli::SfCliSource;
pub use source::{MetadataSource, ObjectMetadata, SessionInfo};

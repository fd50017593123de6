//! Flag-scope resolution: which part of the document a command targets and
//! which fields that part accepts.

use std::fmt;

use crate::error::{Error, Result};

/// Name of the flag that switches a command to object scope.
pub const SOBJECT_FLAG: &str = "--sobject";

/// Every setting a command flag can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    OutputFormat,
    NamespaceToExclude,
    FieldsToExclude,
    FieldsToConsider,
    Language,
    Count,
    PickLeftFields,
}

/// Mutation rule family of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    ListMerge,
    StructuredMap,
    ScalarLocale,
    ScalarCount,
    ScalarBool,
}

impl TemplateField {
    /// Key of the field in the serialized document.
    pub fn key(self) -> &'static str {
        match self {
            TemplateField::OutputFormat => "outputFormat",
            TemplateField::NamespaceToExclude => "namespaceToExclude",
            TemplateField::FieldsToExclude => "fieldsToExclude",
            TemplateField::FieldsToConsider => "fieldsToConsider",
            TemplateField::Language => "language",
            TemplateField::Count => "count",
            TemplateField::PickLeftFields => "pickLeftFields",
        }
    }

    /// Command-line flag that addresses the field.
    pub fn flag(self) -> &'static str {
        match self {
            TemplateField::OutputFormat => "--output-format",
            TemplateField::NamespaceToExclude => "--namespace-to-exclude",
            TemplateField::FieldsToExclude => "--fields-to-exclude",
            TemplateField::FieldsToConsider => "--fields-to-consider",
            TemplateField::Language => "--language",
            TemplateField::Count => "--count",
            TemplateField::PickLeftFields => "--pick-left-fields",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            TemplateField::OutputFormat
            | TemplateField::NamespaceToExclude
            | TemplateField::FieldsToExclude => FieldKind::ListMerge,
            TemplateField::FieldsToConsider => FieldKind::StructuredMap,
            TemplateField::Language => FieldKind::ScalarLocale,
            TemplateField::Count => FieldKind::ScalarCount,
            TemplateField::PickLeftFields => FieldKind::ScalarBool,
        }
    }

    /// Global array fields that may not be combined with `--sobject`.
    pub fn is_global_only(self) -> bool {
        matches!(
            self,
            TemplateField::OutputFormat | TemplateField::NamespaceToExclude
        )
    }
}

impl fmt::Display for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Array-valued fields, the subset of [`TemplateField`] handled by list rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    OutputFormat,
    NamespaceToExclude,
    FieldsToExclude,
}

impl ListField {
    pub fn field(self) -> TemplateField {
        match self {
            ListField::OutputFormat => TemplateField::OutputFormat,
            ListField::NamespaceToExclude => TemplateField::NamespaceToExclude,
            ListField::FieldsToExclude => TemplateField::FieldsToExclude,
        }
    }
}

const GLOBAL_FIELDS: &[TemplateField] = &[
    TemplateField::OutputFormat,
    TemplateField::NamespaceToExclude,
    TemplateField::Language,
    TemplateField::Count,
];

const OBJECT_FIELDS: &[TemplateField] = &[
    TemplateField::FieldsToExclude,
    TemplateField::FieldsToConsider,
    TemplateField::Language,
    TemplateField::Count,
    TemplateField::PickLeftFields,
];

/// Region of the document a command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    /// Index into `sObjects`.
    Object(usize),
}

impl Scope {
    pub fn allowed_fields(self) -> &'static [TemplateField] {
        match self {
            Scope::Global => GLOBAL_FIELDS,
            Scope::Object(_) => OBJECT_FIELDS,
        }
    }

    pub fn allows(self, field: TemplateField) -> bool {
        self.allowed_fields().contains(&field)
    }
}

/// Reject global-only array flags combined with an object-scope flag.
pub fn check_scope_conflict(
    object_scope: bool,
    fields: impl IntoIterator<Item = TemplateField>,
) -> Result<()> {
    if !object_scope {
        return Ok(());
    }
    match fields.into_iter().find(|field| field.is_global_only()) {
        Some(field) => Err(Error::ConflictingScope {
            global_flag: field.flag(),
            object_flag: SOBJECT_FLAG,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_and_object_scopes_allow_different_fields() {
        assert!(Scope::Global.allows(TemplateField::OutputFormat));
        assert!(!Scope::Global.allows(TemplateField::FieldsToExclude));
        assert!(Scope::Object(0).allows(TemplateField::PickLeftFields));
        assert!(!Scope::Object(0).allows(TemplateField::NamespaceToExclude));
        assert!(Scope::Object(3).allows(TemplateField::Count));
    }

    #[test]
    fn every_field_has_one_rule_family() {
        assert_eq!(TemplateField::FieldsToExclude.kind(), FieldKind::ListMerge);
        assert_eq!(TemplateField::FieldsToConsider.kind(), FieldKind::StructuredMap);
        assert_eq!(TemplateField::PickLeftFields.kind(), FieldKind::ScalarBool);
    }

    #[test]
    fn conflict_names_the_global_flag() {
        let err = check_scope_conflict(
            true,
            [TemplateField::Language, TemplateField::NamespaceToExclude],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ConflictingScope {
                global_flag: "--namespace-to-exclude",
                object_flag: "--sobject"
            }
        ));
        assert!(check_scope_conflict(false, [TemplateField::OutputFormat]).is_ok());
    }
}

//! Fixed vocabularies and numeric limits shared by every template scope.

use std::fmt;

use crate::error::{Error, Result};

/// Smallest record count a template may request.
pub const MIN_RECORD_COUNT: u32 = 1;
/// Record ceiling when generated data is inserted directly into the org.
pub const DI_RECORD_CEILING: u32 = 200;
/// Record ceiling for file-based output formats.
pub const RECORD_CEILING: u32 = 1000;

/// Output format for generated records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Csv,
    Json,
    /// Direct insertion into the connected org.
    Di,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Di];
    pub const NAMES: &'static [&'static str] = &["csv", "json", "di"];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Di => "di",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locale used to generate record values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Jp,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Jp];
    pub const NAMES: &'static [&'static str] = &["en", "jp"];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Jp => "jp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject the whole token list if any token is not a known output format.
pub fn check_output_formats(tokens: &[String]) -> Result<Vec<OutputFormat>> {
    let invalid: Vec<String> = tokens
        .iter()
        .filter(|token| OutputFormat::parse(token).is_none())
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(Error::InvalidVocabulary {
            field: "outputFormat",
            values: invalid,
            allowed: OutputFormat::NAMES,
        });
    }
    Ok(tokens
        .iter()
        .filter_map(|token| OutputFormat::parse(token))
        .collect())
}

pub fn check_language(value: &str) -> Result<Language> {
    Language::parse(value).ok_or_else(|| Error::InvalidVocabulary {
        field: "language",
        values: vec![value.to_string()],
        allowed: Language::NAMES,
    })
}

/// Upper bound for record counts given whether direct insertion is enabled.
pub fn count_ceiling(direct_insert: bool) -> u32 {
    if direct_insert {
        DI_RECORD_CEILING
    } else {
        RECORD_CEILING
    }
}

pub fn check_count(value: u32, direct_insert: bool, scope: &str) -> Result<()> {
    let max = count_ceiling(direct_insert);
    if !(MIN_RECORD_COUNT..=max).contains(&value) {
        return Err(Error::CountOutOfRange {
            scope: scope.to_string(),
            value,
            min: MIN_RECORD_COUNT,
            max,
            context: if direct_insert {
                " with DI-direct insertion"
            } else {
                ""
            },
        });
    }
    Ok(())
}

//! Parsers for raw flag values.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::Result;
use crate::template::ConsiderValue;

/// Key prefix marking a dependent-picklist field in `fieldsToConsider`.
pub const DEPENDENT_PICKLIST_PREFIX: &str = "dp-";

const CONSIDER_PATTERN: &str = r"([\w-]+):\s*(\[[^\]]*\])|([\w-]+)";

/// Split a raw list flag on any run of commas or whitespace, keeping the
/// original case. Empty tokens are dropped.
pub fn split_tokens(raw: &str) -> Vec<&str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Lower-cased [`split_tokens`]. Duplicates are kept; callers decide how
/// repeated tokens behave.
pub fn split_list(raw: &str) -> Vec<String> {
    split_tokens(raw).into_iter().map(str::to_lowercase).collect()
}

/// Like [`split_list`], keeping only the first occurrence of each token.
pub fn split_unique(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in split_list(raw) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Object names from the `--sobject` flag, lower-cased and de-duplicated.
pub fn parse_object_names(raw: &str) -> Vec<String> {
    split_unique(raw)
}

/// Parse the `fieldsToConsider` grammar: `field(: [value, value])?`, repeated.
///
/// A bare field yields an empty value list. A `dp-` field stores the trimmed
/// bracket content as the name of its controlling field.
pub fn parse_fields_to_consider(raw: &str) -> Result<IndexMap<String, ConsiderValue>> {
    let pattern = Regex::new(CONSIDER_PATTERN)?;
    let mut fields = IndexMap::new();

    for captures in pattern.captures_iter(raw) {
        let Some(key) = captures.get(1).or_else(|| captures.get(3)) else {
            continue;
        };
        let key = key.as_str().to_string();
        let inner = captures
            .get(2)
            .map(|bracketed| bracketed.as_str())
            .map(|bracketed| &bracketed[1..bracketed.len() - 1]);

        let value = if key.starts_with(DEPENDENT_PICKLIST_PREFIX) {
            ConsiderValue::Controller(inner.map(str::trim).unwrap_or_default().to_string())
        } else {
            let values = inner
                .map(|inner| {
                    inner
                        .split(',')
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            ConsiderValue::Values(values)
        };
        fields.insert(key, value);
    }

    Ok(fields)
}

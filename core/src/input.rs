use std::collections::HashMap;
use anyhow::{anyhow, Result};

/// Field names accepted by `heatlog log`.
pub const LOG_FIELDS: [&str; 2] = ["duration", "date"];

/// Free words become the label; `key:value` words become fields.
#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub label: String,
    pub fields: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut label_parts = Vec::new();
    let mut fields = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !key.contains(' ') {
                fields.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        label_parts.push(arg.as_str());
    }

    ParsedInput {
        label: label_parts.join(" "),
        fields,
    }
}

/// Expands an abbreviated key to the single candidate it prefixes.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|c| c.starts_with(key))
        .collect();

    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Expands every field key; keys that fail to expand are reported as warnings.
pub fn normalize_fields(
    fields: HashMap<String, String>,
    candidates: &[&str],
) -> (HashMap<String, String>, Vec<String>) {
    let mut normalized = HashMap::new();
    let mut warnings = Vec::new();
    for (key, value) in fields {
        match expand_key(&key, candidates) {
            Ok(full_key) => {
                normalized.insert(full_key, value);
            }
            Err(e) => warnings.push(e.to_string()),
        }
    }
    (normalized, warnings)
}

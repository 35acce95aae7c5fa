//! Prompt and style list loading.
//!
//! Both prompt and style files are flat JSON arrays of strings:
//!
//! ```json
//! ["a field of tulips at dawn", "https://example.org/headlines.xml"]
//! ```
//!
//! Loading validates the shape explicitly — the file must parse as a list of
//! strings, the list must be non-empty, and every entry must be non-blank.
//! A malformed file fails here with a [`ConfigError`] naming the file, not
//! three stages later with an opaque selection failure.

use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path} is not a JSON list of strings: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Load a JSON array of strings from `path`.
///
/// Fails if the file is missing or unreadable, parses as anything other than
/// a list of strings, is empty, or contains a blank entry.
pub fn load_string_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entries: Vec<String> =
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
    if entries.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} contains no entries",
            path.display()
        )));
    }
    if let Some(idx) = entries.iter().position(|e| e.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} entry {} is blank",
            path.display(),
            idx
        )));
    }
    Ok(entries)
}

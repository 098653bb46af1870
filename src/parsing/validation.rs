use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ConfigurationError, SchemaError};

/* Resolve the single activity export of a run.

An explicit path wins. Otherwise `inbox` must hold exactly one `.csv` file (hidden files ignored):
none or several is fatal, and the error names every candidate found.
*/
pub fn resolve_source(explicit: Option<&Path>, inbox: &Path) -> Result<PathBuf, ConfigurationError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigurationError::UnreadableSource {
                path: path.display().to_string(),
                reason: String::from("not a file"),
            });
        }
        return Ok(path.to_path_buf());
    }
    return discover_source(inbox);
}

pub fn discover_source(inbox: &Path) -> Result<PathBuf, ConfigurationError> {
    let entries = fs::read_dir(inbox).map_err(|e| ConfigurationError::UnreadableSource {
        path: inbox.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_candidate(path))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(ConfigurationError::NoCandidates {
            dir: inbox.display().to_string(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(ConfigurationError::MultipleCandidates {
            candidates: candidates
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        }),
    }
}

fn is_candidate(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| name.starts_with('.'));
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    return !hidden && is_csv;
}

/* Every missing header is reported, not only the first one */
pub fn check_headers(headers: &[String], required: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !headers.iter().any(|header| header.as_str() == **name))
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(SchemaError::new(missing));
    }
    Ok(())
}

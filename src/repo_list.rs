use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

lazy_static::lazy_static! {
    static ref REGEX_REPOSITORY_NAME: Regex = Regex::new(r"^[\w/-]+\.git$").unwrap();
}

/// Extract repository names from a list with one name per line.
///
/// Blank lines and `#` comments are ignored, anything else that does not look
/// like `name.git` is skipped with a warning.
pub fn parse_repository_list(content: &str) -> Vec<String> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            if !REGEX_REPOSITORY_NAME.is_match(line) {
                warn!(line = idx + 1, content = line, "skipping malformed repository name");
                return None;
            }

            Some(line.to_string())
        })
        .collect()
}

pub fn read_repository_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::RepositoryList {
        path: path.to_path_buf(),
        source,
    })?;

    let names = parse_repository_list(&content);
    debug!(path = %path.display(), count = names.len(), "read repository list");
    Ok(names)
}

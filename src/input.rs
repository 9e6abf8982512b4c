//! Token flattening for command-line values that name files

use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Replace every token naming an existing file by the file's entries, in place.
///
/// Other tokens pass through untouched. An unreadable file is logged and
/// contributes nothing.
pub fn flatten_tokens(raw: &[String]) -> Vec<String> {
    let mut tokens = Vec::with_capacity(raw.len());

    for token in raw {
        let path = Path::new(token);
        if !path.is_file() {
            tokens.push(token.clone());
            continue;
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                let before = tokens.len();
                tokens.extend(parse_lines(&content));
                debug!("Read {} entries from {:?}", tokens.len() - before, path);
            }
            Err(e) => warn!("Cannot read {:?}: {}", path, e),
        }
    }

    tokens
}

/// Trimmed lines, skipping blanks and `#` comments
pub fn parse_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

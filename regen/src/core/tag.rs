//! Parser-tag extraction from fixture filenames.
//!
//! Fixture inputs are named `<digits>-<tag>`, where the tag tells the scanner
//! which lockfile parser to use (e.g. `03-package-lock.json` is scanned as
//! `package-lock.json:<path>`).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^[0-9]+-(.+)$").unwrap());

/// Extract the parser tag from a fixture filename.
///
/// Returns `None` when the name does not start with a run of digits followed
/// by a hyphen and at least one more character.
pub fn parser_tag(file_name: &str) -> Option<&str> {
    TAG_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build the single positional argument passed to the scanner: `<tag>:<path>`.
///
/// A missing tag yields an empty prefix (`:<path>`).
pub fn scanner_arg(tag: Option<&str>, relative_path: &Path) -> String {
    format!("{}:{}", tag.unwrap_or_default(), relative_path.display())
}

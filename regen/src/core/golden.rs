//! Comparison of scanner output against golden files.
//!
//! Golden files store normalized output where every `%%` stands for some
//! non-empty run of text on a single line.

use anyhow::{Context, Result};
use regex::Regex;

/// Placeholder written by [`crate::core::normalize::wildcard_database_stats`].
pub const WILDCARD: &str = "%%";

/// Returns true if `actual` matches `expected`, treating each `%%` in
/// `expected` as "any text".
pub fn matches_golden(actual: &str, expected: &str) -> Result<bool> {
    let pattern = regex::escape(expected).replace(WILDCARD, ".+");
    let re = Regex::new(&format!("^{pattern}$")).context("compile golden pattern")?;
    Ok(re.is_match(actual))
}

//! Masking of volatile database statistics in scanner output.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a database stats block such as
/// `npm (1234 vulnerabilities, including withdrawn - last updated Mon, 01 Jan 2024 00:00:00 GMT)`.
///
/// ASCII-only classes: the scanner prints ecosystem names and RFC 1123 dates.
static DATABASE_STATS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?-u)(\w+) \(\d+ vulnerabilities, including withdrawn - last updated \w{3}, \d\d \w{3} \d{4} [012]\d:\d\d:\d\d GMT\)",
    )
    .unwrap()
});

const DATABASE_STATS_REPLACEMENT: &str =
    "${1} (%% vulnerabilities, including withdrawn - last updated %%)";

/// Replace every database stats block in `output` with the `%%` placeholder form,
/// keeping the leading database name.
pub fn wildcard_database_stats(output: &str) -> String {
    DATABASE_STATS_RE
        .replace_all(output, DATABASE_STATS_REPLACEMENT)
        .into_owned()
}

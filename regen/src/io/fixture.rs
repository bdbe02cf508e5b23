//! Golden output files written next to each fixture input.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Suffix appended to an input filename to form its golden output filename.
pub const GOLDEN_SUFFIX: &str = ".out.txt";

/// Returns true if `file_name` is a golden output rather than a fixture input.
pub fn is_golden(file_name: &str) -> bool {
    file_name.ends_with(GOLDEN_SUFFIX)
}

/// Path of the golden file for `file_name` inside `dir`.
pub fn golden_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(format!("{file_name}{GOLDEN_SUFFIX}"))
}

/// Write (truncating any previous content) the golden file for `file_name`.
pub fn write_fixture(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let path = golden_path(dir, file_name);
    fs::write(&path, contents).with_context(|| format!("write fixture {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "fixture written");
    Ok(path)
}

/// Async variant of [`write_fixture`] for the concurrent pipeline.
pub async fn write_fixture_async(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let path = golden_path(dir, file_name);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("write fixture {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "fixture written");
    Ok(path)
}

/// Read the golden file for `file_name`, returning `None` if it does not exist.
pub fn read_fixture(dir: &Path, file_name: &str) -> Result<Option<String>> {
    let path = golden_path(dir, file_name);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read fixture {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_suffix_detection() {
        assert!(is_golden("01-yarn.lock.out.txt"));
        assert!(!is_golden("01-yarn.lock"));
        assert!(!is_golden("01-out.txt.lock"));
    }

    #[test]
    fn write_overwrites_existing_golden() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("01-yarn.lock.out.txt"), "stale content that is longer")
            .expect("seed");

        let path = write_fixture(temp.path(), "01-yarn.lock", "fresh").expect("write");

        assert_eq!(path, temp.path().join("01-yarn.lock.out.txt"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "fresh");
    }

    #[test]
    fn write_fails_when_directory_is_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = write_fixture(&temp.path().join("gone"), "01-yarn.lock", "x")
            .expect_err("missing dir");
        assert!(format!("{err:#}").contains("write fixture"));
    }

    #[test]
    fn read_missing_returns_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(read_fixture(temp.path(), "01-yarn.lock").expect("read"), None);
    }

    #[tokio::test]
    async fn async_write_matches_blocking_write() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture_async(temp.path(), "02-Gemfile.lock", "out\n")
            .await
            .expect("write");
        assert_eq!(
            read_fixture(temp.path(), "02-Gemfile.lock").expect("read"),
            Some("out\n".to_string())
        );
        assert_eq!(path, golden_path(temp.path(), "02-Gemfile.lock"));
    }
}

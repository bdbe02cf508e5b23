//! Discovery of fixture inputs in a target directory.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::io::fixture::is_golden;

/// List the fixture inputs in `dir`: regular files whose name does not end in
/// the golden suffix. Subdirectories are not descended into.
///
/// Names are returned sorted so runs are reproducible.
pub fn list_fixture_inputs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        let name = utf8_name(entry.file_name(), dir)?;
        if !is_golden(&name) {
            names.push(name);
        }
    }
    names.sort();
    debug!(dir = %dir.display(), count = names.len(), "listed fixture inputs");
    Ok(names)
}

/// Async variant of [`list_fixture_inputs`].
pub async fn list_fixture_inputs_async(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("read dir {}", dir.display()))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("read entry in {}", dir.display()))?
    {
        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        let name = utf8_name(entry.file_name(), dir)?;
        if !is_golden(&name) {
            names.push(name);
        }
    }
    names.sort();
    debug!(dir = %dir.display(), count = names.len(), "listed fixture inputs");
    Ok(names)
}

fn utf8_name(name: OsString, dir: &Path) -> Result<String> {
    name.into_string().map_err(|raw| {
        anyhow!(
            "non-utf8 file name {} in {}",
            raw.to_string_lossy(),
            dir.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(dir: &Path) {
        fs::write(dir.join("02-yarn.lock"), "").expect("write");
        fs::write(dir.join("01-package-lock.json"), "").expect("write");
        fs::write(dir.join("01-package-lock.json.out.txt"), "").expect("write");
        fs::create_dir(dir.join("03-nested")).expect("mkdir");
        fs::write(dir.join("03-nested").join("04-Cargo.lock"), "").expect("write");
    }

    #[test]
    fn lists_regular_non_golden_files_sorted() {
        let temp = tempfile::tempdir().expect("tempdir");
        seed(temp.path());

        let names = list_fixture_inputs(temp.path()).expect("list");
        assert_eq!(names, vec!["01-package-lock.json", "02-yarn.lock"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = list_fixture_inputs(&temp.path().join("missing")).expect_err("missing");
        assert!(format!("{err:#}").contains("read dir"));
    }

    #[tokio::test]
    async fn async_listing_matches_blocking_listing() {
        let temp = tempfile::tempdir().expect("tempdir");
        seed(temp.path());

        let blocking = list_fixture_inputs(temp.path()).expect("list");
        let async_names = list_fixture_inputs_async(temp.path()).await.expect("list");
        assert_eq!(async_names, blocking);
    }
}

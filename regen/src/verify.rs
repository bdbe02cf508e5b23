//! Read-only check that golden files match current scanner output.
//!
//! Runs the same list/tag/scan/normalize steps as regeneration but compares
//! against the existing `.out.txt` instead of writing it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::golden::matches_golden;
use crate::core::normalize::wildcard_database_stats;
use crate::io::fixture::{golden_path, read_fixture};
use crate::io::listing::list_fixture_inputs;
use crate::io::scanner::Scanner;
use crate::regenerate::{Job, resolve_scan};

/// Outcome of verifying one fixture directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of inputs checked.
    pub checked: usize,
    /// Golden files that are missing or no longer match.
    pub stale: Vec<PathBuf>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Compare every input's normalized scanner output with its golden file.
#[instrument(skip_all, fields(target_dir = %job.target_dir.display()))]
pub fn verify_fixtures<S: Scanner>(job: &Job, scanner: &S) -> Result<VerifyReport> {
    let dir = job.fixture_dir();
    let inputs = list_fixture_inputs(&dir)?;
    info!(count = inputs.len(), "verifying fixtures");

    let mut report = VerifyReport::default();
    for file_name in inputs {
        let plan = resolve_scan(job, &file_name);
        let output = scanner
            .scan(&plan.arg)
            .with_context(|| format!("scan {}", plan.relative.display()))?;
        let actual = wildcard_database_stats(&output);
        report.checked += 1;

        let fresh = match read_fixture(&dir, &file_name)? {
            Some(expected) => matches_golden(&actual, &expected)
                .with_context(|| format!("compare {}", plan.relative.display()))?,
            None => false,
        };
        if !fresh {
            debug!(file_name, "golden is stale");
            report.stale.push(golden_path(&dir, &file_name));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::fixture::write_fixture;
    use crate::test_support::{ScriptedScanner, TestRepo};

    const TARGET: &str = "testdata/locks-e2e";

    #[test]
    fn fresh_goldens_are_clean() {
        let repo = TestRepo::new().expect("repo");
        repo.add_input(TARGET, "01-yarn.lock").expect("input");
        let job = repo.job(TARGET, "unused");
        write_fixture(
            &job.fixture_dir(),
            "01-yarn.lock",
            "npm (%% vulnerabilities, including withdrawn - last updated %%)\n",
        )
        .expect("seed");
        let scanner = ScriptedScanner::echo(
            "npm (9 vulnerabilities, including withdrawn - last updated Sun, 14 Apr 2024 08:00:00 GMT)\n",
        );

        let report = verify_fixtures(&job, &scanner).expect("verify");

        assert_eq!(report.checked, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn changed_and_missing_goldens_are_stale() {
        let repo = TestRepo::new().expect("repo");
        repo.add_input(TARGET, "01-yarn.lock").expect("input");
        repo.add_input(TARGET, "02-Gemfile.lock").expect("input");
        let job = repo.job(TARGET, "unused");
        write_fixture(&job.fixture_dir(), "01-yarn.lock", "old output\n").expect("seed");
        let scanner = ScriptedScanner::echo("new output\n");

        let report = verify_fixtures(&job, &scanner).expect("verify");

        assert_eq!(report.checked, 2);
        assert_eq!(
            report.stale,
            vec![
                golden_path(&job.fixture_dir(), "01-yarn.lock"),
                golden_path(&job.fixture_dir(), "02-Gemfile.lock"),
            ]
        );
    }

    #[test]
    fn verification_never_writes() {
        let repo = TestRepo::new().expect("repo");
        repo.add_input(TARGET, "01-yarn.lock").expect("input");
        let job = repo.job(TARGET, "unused");

        verify_fixtures(&job, &ScriptedScanner::echo("x\n")).expect("verify");

        assert_eq!(repo.golden_count(TARGET).expect("count"), 0);
    }
}

//! Fixture regeneration pipelines.
//!
//! For every input in the target directory: extract the parser tag from the
//! filename, run the scanner with `<tag>:<relative-path>`, mask volatile
//! database stats, and write `<name>.out.txt` next to the input.
//!
//! [`regenerate_sequential`] processes inputs one at a time in listing order
//! and stops at the first failure. [`regenerate_concurrent`] dispatches every
//! input at once and only reports failure after all pipelines have settled.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::core::normalize::wildcard_database_stats;
use crate::core::tag::{parser_tag, scanner_arg};
use crate::io::fixture::{write_fixture, write_fixture_async};
use crate::io::listing::{list_fixture_inputs, list_fixture_inputs_async};
use crate::io::scanner::{ProcessScanner, Scanner, scan_async};

/// Explicit inputs for one regeneration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Working directory for the scanner; target paths are relative to it.
    pub repo_root: PathBuf,
    /// Fixture directory relative to `repo_root`.
    pub target_dir: PathBuf,
    /// Scanner executable name or path.
    pub scanner_command: String,
}

impl Job {
    /// Absolute (or `repo_root`-based) path of the fixture directory.
    pub fn fixture_dir(&self) -> PathBuf {
        self.repo_root.join(&self.target_dir)
    }

    /// Path of an input as passed to the scanner.
    pub fn relative_path(&self, file_name: &str) -> PathBuf {
        self.target_dir.join(file_name)
    }

    /// Blocking scanner bound to this job's command and working directory.
    pub fn process_scanner(&self) -> ProcessScanner {
        ProcessScanner::new(&self.scanner_command, &self.repo_root)
    }
}

/// What a completed run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegenSummary {
    /// Golden files written, in listing order.
    pub written: Vec<PathBuf>,
    /// Inputs whose filename carried no parser tag.
    pub untagged: Vec<String>,
}

/// Per-input scan parameters derived from the filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub relative: PathBuf,
    pub tag: Option<String>,
    pub arg: String,
}

impl ScanPlan {
    fn tag_label(&self) -> &str {
        self.tag.as_deref().unwrap_or_default()
    }
}

/// Resolve the scanner argument for an input, reporting unparseable names.
///
/// An unparseable name still produces an argument (with an empty tag) so the
/// scanner gets to decide what to do with it.
pub fn resolve_scan(job: &Job, file_name: &str) -> ScanPlan {
    let relative = job.relative_path(file_name);
    let tag = parser_tag(file_name).map(str::to_string);
    if tag.is_none() {
        eprintln!("could not determine parser for {}", relative.display());
    }
    let arg = scanner_arg(tag.as_deref(), &relative);
    ScanPlan { relative, tag, arg }
}

/// Regenerate every fixture in `job`'s directory one at a time.
#[instrument(skip_all, fields(target_dir = %job.target_dir.display()))]
pub fn regenerate_sequential<S: Scanner>(job: &Job, scanner: &S) -> Result<RegenSummary> {
    let dir = job.fixture_dir();
    let inputs = list_fixture_inputs(&dir)?;
    info!(count = inputs.len(), "regenerating fixtures sequentially");

    let mut summary = RegenSummary::default();
    for file_name in inputs {
        let plan = resolve_scan(job, &file_name);
        println!(
            "(re)generating {} fixture (parsing as {})",
            plan.relative.display(),
            plan.tag_label()
        );
        let output = scanner
            .scan(&plan.arg)
            .with_context(|| format!("scan {}", plan.relative.display()))?;
        let path = write_fixture(&dir, &file_name, &wildcard_database_stats(&output))?;
        summary.written.push(path);
        if plan.tag.is_none() {
            summary.untagged.push(file_name);
        }
    }

    debug!(written = summary.written.len(), "sequential regeneration complete");
    Ok(summary)
}

/// Regenerate every fixture in `job`'s directory concurrently.
///
/// All inputs are dispatched together. If any pipeline fails, the first error
/// observed is returned once every other pipeline has finished.
#[instrument(skip_all, fields(target_dir = %job.target_dir.display()))]
pub async fn regenerate_concurrent(job: &Job) -> Result<RegenSummary> {
    let dir = job.fixture_dir();
    let inputs = list_fixture_inputs_async(&dir).await?;
    let total = inputs.len();
    info!(count = total, "regenerating fixtures concurrently");

    let job = Arc::new(job.clone());
    let mut tasks = JoinSet::new();
    for (index, file_name) in inputs.into_iter().enumerate() {
        let job = Arc::clone(&job);
        tasks.spawn(async move {
            let result = regenerate_one(&job, &file_name).await;
            (index, file_name, result)
        });
    }

    let mut settled = Vec::with_capacity(total);
    let mut first_err = None;
    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .context("join fixture task")
            .and_then(|(index, file_name, result)| {
                let relative = job.relative_path(&file_name);
                result
                    .with_context(|| format!("regenerate {}", relative.display()))
                    .map(|(path, tagged)| (index, file_name, path, tagged))
            });
        match outcome {
            Ok(done) => settled.push(done),
            Err(err) => {
                failed += 1;
                error!(err = %format!("{err:#}"), "fixture regeneration failed");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }

    if let Some(err) = first_err {
        return Err(err.context(format!("{failed} of {total} fixture(s) failed")));
    }

    settled.sort_by_key(|(index, ..)| *index);
    let mut summary = RegenSummary::default();
    for (_, file_name, path, tagged) in settled {
        summary.written.push(path);
        if !tagged {
            summary.untagged.push(file_name);
        }
    }

    debug!(written = summary.written.len(), "concurrent regeneration complete");
    Ok(summary)
}

/// Scan, normalize, and write one fixture. Returns the golden path and
/// whether the filename carried a parser tag.
async fn regenerate_one(job: &Job, file_name: &str) -> Result<(PathBuf, bool)> {
    let plan = resolve_scan(job, file_name);
    let output = scan_async(&job.scanner_command, &plan.arg, &job.repo_root).await?;

    println!(
        "(re)generated {} fixture (parsed as {})",
        plan.relative.display(),
        plan.tag_label()
    );

    let normalized = wildcard_database_stats(&output);
    let path = write_fixture_async(&job.fixture_dir(), file_name, &normalized).await?;
    Ok((path, plan.tag.is_some()))
}

//! Regenerate golden-output fixtures for the vulnerability scanner's
//! end-to-end tests.
//!
//! Run from the repository root. The scanner executable defaults to
//! `osv-detector` and can be overridden with `OSV_DETECTOR_CMD`.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regen::exit_codes;
use regen::io::config::{RegenConfig, Target, load_repo_config};
use regen::regenerate::{regenerate_concurrent, regenerate_sequential};
use regen::verify::verify_fixtures;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "regen",
    version,
    about = "Regenerate scanner golden-output fixtures"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate `fixtures/locks-e2e` one file at a time.
    Fixtures,
    /// Regenerate `testdata/locks-e2e` with all scans running concurrently.
    Testdata,
    /// Report golden files that no longer match scanner output, without writing.
    Check {
        /// Fixture directory to check.
        #[arg(value_enum)]
        target: Target,
    },
}

fn main() {
    regen::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let repo_root = std::env::current_dir().context("resolve repository root")?;
    let config = load_repo_config(&repo_root)?;
    info!(scanner = %config.scanner_command, root = %repo_root.display(), "config loaded");
    match cli.command {
        Command::Fixtures => cmd_fixtures(&config, &repo_root),
        Command::Testdata => cmd_testdata(&config, &repo_root),
        Command::Check { target } => cmd_check(&config, &repo_root, target),
    }
}

fn cmd_fixtures(config: &RegenConfig, repo_root: &Path) -> Result<i32> {
    let job = config.job(repo_root, Target::Fixtures);
    regenerate_sequential(&job, &job.process_scanner())?;
    Ok(exit_codes::OK)
}

fn cmd_testdata(config: &RegenConfig, repo_root: &Path) -> Result<i32> {
    let job = config.job(repo_root, Target::Testdata);
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    runtime.block_on(regenerate_concurrent(&job))?;
    Ok(exit_codes::OK)
}

fn cmd_check(config: &RegenConfig, repo_root: &Path, target: Target) -> Result<i32> {
    let job = config.job(repo_root, target);
    let report = verify_fixtures(&job, &job.process_scanner())?;
    for path in &report.stale {
        let shown = path.strip_prefix(repo_root).unwrap_or(path);
        println!("stale {}", shown.display());
    }
    println!(
        "check: target={} checked={} stale={}",
        job.target_dir.display(),
        report.checked,
        report.stale.len()
    );
    if report.is_clean() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::STALE)
    }
}

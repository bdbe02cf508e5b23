//! Regeneration configuration: optional `regen.toml` at the repository root,
//! overridden by `OSV_DETECTOR_CMD`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::scanner::DEFAULT_SCANNER_COMMAND;
use crate::regenerate::Job;

/// Config file looked up in the repository root.
pub const CONFIG_FILE: &str = "regen.toml";

/// Environment variable overriding the scanner executable.
pub const SCANNER_ENV: &str = "OSV_DETECTOR_CMD";

/// Fixture directories the regeneration commands operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    /// `fixtures/locks-e2e`, regenerated sequentially.
    Fixtures,
    /// `testdata/locks-e2e`, regenerated concurrently.
    Testdata,
}

/// Regeneration configuration (TOML).
///
/// Missing fields default to the layout the scanner's end-to-end tests expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegenConfig {
    /// Scanner executable name or path.
    pub scanner_command: String,

    /// Sequentially regenerated fixture directory, relative to the repository root.
    pub fixtures_dir: PathBuf,

    /// Concurrently regenerated fixture directory, relative to the repository root.
    pub testdata_dir: PathBuf,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            scanner_command: DEFAULT_SCANNER_COMMAND.to_string(),
            fixtures_dir: PathBuf::from("fixtures/locks-e2e"),
            testdata_dir: PathBuf::from("testdata/locks-e2e"),
        }
    }
}

impl RegenConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scanner_command.trim().is_empty() {
            return Err(anyhow!("scanner_command must be non-empty"));
        }
        for (label, dir) in [
            ("fixtures_dir", &self.fixtures_dir),
            ("testdata_dir", &self.testdata_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(anyhow!("{label} must be non-empty"));
            }
            if dir.is_absolute() {
                return Err(anyhow!(
                    "{label} must be relative to the repository root, got {}",
                    dir.display()
                ));
            }
        }
        Ok(())
    }

    /// Replace the scanner command with `value` unless it is unset or empty.
    pub fn with_scanner_override(mut self, value: Option<String>) -> Self {
        if let Some(command) = value.filter(|v| !v.is_empty()) {
            self.scanner_command = command;
        }
        self
    }

    pub fn target_dir(&self, target: Target) -> &Path {
        match target {
            Target::Fixtures => &self.fixtures_dir,
            Target::Testdata => &self.testdata_dir,
        }
    }

    /// Build the job for `target` rooted at `repo_root`.
    pub fn job(&self, repo_root: &Path, target: Target) -> Job {
        Job {
            repo_root: repo_root.to_path_buf(),
            target_dir: self.target_dir(target).to_path_buf(),
            scanner_command: self.scanner_command.clone(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RegenConfig::default()`.
pub fn load_config(path: &Path) -> Result<RegenConfig> {
    if !path.exists() {
        let cfg = RegenConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RegenConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `regen.toml` from `repo_root` and apply the `OSV_DETECTOR_CMD` override.
pub fn load_repo_config(repo_root: &Path) -> Result<RegenConfig> {
    let cfg = load_config(&repo_root.join(CONFIG_FILE))?
        .with_scanner_override(std::env::var(SCANNER_ENV).ok());
    cfg.validate()?;
    Ok(cfg)
}

//! Test-only helpers for scratch repositories and scanner doubles.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::io::fixture::golden_path;
use crate::io::scanner::Scanner;
use crate::regenerate::Job;

/// Temporary repository root holding fixture directories and stub scanners.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp repo")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create `<target_dir>/<name>` (and the directory) with placeholder contents.
    pub fn add_input(&self, target_dir: &str, name: &str) -> Result<PathBuf> {
        let dir = self.path().join(target_dir);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(name);
        fs::write(&path, format!("lockfile {name}\n"))
            .with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Read the golden output written for `<target_dir>/<name>`.
    pub fn read_golden(&self, target_dir: &str, name: &str) -> Result<String> {
        let path = golden_path(&self.path().join(target_dir), name);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Count golden files in `target_dir`.
    pub fn golden_count(&self, target_dir: &str) -> Result<usize> {
        let dir = self.path().join(target_dir);
        let mut count = 0;
        for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().ends_with(".out.txt") {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn job(&self, target_dir: &str, scanner_command: &str) -> Job {
        Job {
            repo_root: self.path().to_path_buf(),
            target_dir: PathBuf::from(target_dir),
            scanner_command: scanner_command.to_string(),
        }
    }

    /// Write an executable `/bin/sh` script under `bin/` and return its absolute path.
    #[cfg(unix)]
    pub fn write_stub_scanner(&self, name: &str, body: &str) -> Result<PathBuf> {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let bin = self.path().join("bin");
        fs::create_dir_all(&bin).with_context(|| format!("create {}", bin.display()))?;
        let path = bin.join(name);
        {
            let mut file =
                fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
            writeln!(file, "#!/bin/sh")?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
        }
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("chmod {}", path.display()))?;
        Ok(path)
    }
}

/// Scanner double that returns fixed output and records every argument.
pub struct ScriptedScanner {
    output: String,
    fail_on: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedScanner {
    /// Return `output` for every scan.
    pub fn echo(output: &str) -> Self {
        Self {
            output: output.to_string(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Fail any scan whose argument contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Arguments received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Scanner for ScriptedScanner {
    fn scan(&self, arg: &str) -> Result<String> {
        self.calls.borrow_mut().push(arg.to_string());
        if let Some(needle) = &self.fail_on
            && arg.contains(needle.as_str())
        {
            bail!("scripted scanner exited with unexpected code 2: {arg}");
        }
        Ok(self.output.clone())
    }
}

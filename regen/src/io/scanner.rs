//! Invocation of the external vulnerability scanner.
//!
//! The scanner is called once per fixture with a single `<tag>:<path>`
//! argument and the repository root as working directory. Exit codes 0 and 1
//! both mean "ran to completion" (1 signals that vulnerabilities were found);
//! anything else is a hard failure.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error, instrument, warn};

/// Scanner executable used when no override is configured.
pub const DEFAULT_SCANNER_COMMAND: &str = "osv-detector";

/// Captured scanner process output.
#[derive(Debug)]
pub struct ScanOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Abstraction over scanner backends.
///
/// Tests use scripted scanners that return predetermined output without
/// spawning processes.
pub trait Scanner {
    /// Scan with the given `<tag>:<path>` argument and return the scanner's stdout.
    fn scan(&self, arg: &str) -> Result<String>;
}

/// Scanner that spawns an external executable and blocks until it exits.
#[derive(Debug, Clone)]
pub struct ProcessScanner {
    command: String,
    workdir: PathBuf,
}

impl ProcessScanner {
    pub fn new(command: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            workdir: workdir.into(),
        }
    }
}

impl Scanner for ProcessScanner {
    fn scan(&self, arg: &str) -> Result<String> {
        let output = run_scanner(&self.command, arg, &self.workdir)?;
        accept_output(&self.command, output)
    }
}

/// Run the scanner to completion, capturing stdout and stderr.
#[instrument(skip_all, fields(command = %command, arg = %arg))]
pub fn run_scanner(command: &str, arg: &str, workdir: &Path) -> Result<ScanOutput> {
    debug!("spawning scanner");
    let output = match Command::new(command)
        .arg(arg)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            error!(err = %e, "failed to spawn scanner");
            return Err(e).with_context(|| format!("spawn scanner {command}"));
        }
    };

    debug!(exit_code = ?output.status.code(), "scanner finished");
    Ok(ScanOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Async variant of [`run_scanner`].
///
/// Each invocation owns its stdout/stderr buffers, which grow as data arrives
/// and are decoded only once the process has exited.
#[instrument(skip_all, fields(command = %command, arg = %arg))]
pub async fn run_scanner_async(command: &str, arg: &str, workdir: &Path) -> Result<ScanOutput> {
    debug!("spawning scanner");
    let mut child = match tokio::process::Command::new(command)
        .arg(arg)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            error!(err = %e, "failed to spawn scanner");
            return Err(e).with_context(|| format!("spawn scanner {command}"));
        }
    };

    let stdout = child.stdout.take().context("scanner stdout was not piped")?;
    let stderr = child.stderr.take().context("scanner stderr was not piped")?;

    let (stdout, stderr, status) = tokio::try_join!(
        read_stream(stdout),
        read_stream(stderr),
        async { child.wait().await.context("wait for scanner") },
    )?;

    debug!(exit_code = ?status.code(), "scanner finished");
    Ok(ScanOutput {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// Run the scanner asynchronously and apply [`accept_output`].
pub async fn scan_async(command: &str, arg: &str, workdir: &Path) -> Result<String> {
    let output = run_scanner_async(command, arg, workdir).await?;
    accept_output(command, output)
}

/// Check the exit status of a finished scan and return its stdout.
///
/// Status 0 and 1 are success; stderr on success is reported but tolerated.
pub fn accept_output(command: &str, output: ScanOutput) -> Result<String> {
    match output.status.code() {
        Some(0 | 1) => {}
        Some(code) => bail!(
            "{command} exited with unexpected code {code}: {}",
            output.stderr
        ),
        None => bail!("{command} was terminated by a signal: {}", output.stderr),
    }

    if !output.stderr.is_empty() {
        warn!(command, "scanner wrote to stderr");
        eprintln!("warning: unexpected output to stderr {}", output.stderr);
    }

    Ok(output.stdout)
}

async fn read_stream<R: AsyncRead + Unpin>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).await.context("read scanner output")?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(buf)
}

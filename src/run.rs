//! Run-and-capture step
//!
//! Executes a built artifact and persists its output. Capture discipline is
//! uniform: stdout and stderr both redirect into the log file through
//! duplicated handles, so the log holds the complete interleaved output up to
//! process exit. The log is truncated on every run, never appended.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::artifact::log_file_name;
use crate::error::{HarnessError, HarnessResult};

/// Outcome of a successful run
#[derive(Debug)]
pub struct RunReport {
    pub artifact: PathBuf,
    pub log: PathBuf,
}

/// Execute `artifact` with no arguments, cwd set to `dir`, capturing combined
/// stdout+stderr to `log-<artifactBaseName>.log` inside `dir`.
///
/// A non-zero child exit propagates as [`HarnessError::RunFailed`]; the log
/// still holds everything the process wrote. The call blocks until the child
/// exits; no timeout is applied.
pub fn run_and_capture(dir: &Path, artifact: &Path) -> HarnessResult<RunReport> {
    if !artifact.exists() {
        return Err(HarnessError::ArtifactNotFound {
            path: artifact.to_path_buf(),
        });
    }
    // Absolute program path: relative resolution against the child's cwd is
    // platform-dependent.
    let program = fs::canonicalize(artifact)?;

    let log = dir.join(log_file_name(artifact));
    // File::create truncates, which is what gives overwrite-not-append.
    let log_out = File::create(&log)?;
    let log_err = log_out.try_clone()?;

    let status = Command::new(&program)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log_out))
        .stderr(Stdio::from(log_err))
        .status()
        .map_err(HarnessError::Io)?;

    if !status.success() {
        return Err(HarnessError::RunFailed {
            artifact: artifact.to_path_buf(),
            code: status.code(),
        });
    }

    Ok(RunReport {
        artifact: artifact.to_path_buf(),
        log,
    })
}

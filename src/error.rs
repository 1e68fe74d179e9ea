//! Error types for samplerun
//!
//! Uses `thiserror` for library errors. Every stage failure is fatal to the
//! current invocation; nothing here is caught-and-continued. Native tool
//! diagnostics (compiler, linker, the sample itself) stream through to the
//! caller unmodified.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The pre-built shared helper object is absent
    #[error("missing shared helper object: {path} - build it before this example")]
    MissingDependency { path: PathBuf },

    /// A source file named by the manifest does not exist
    #[error("source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The artifact to run does not exist
    #[error("artifact not found: {path} - run 'build' first")]
    ArtifactNotFound { path: PathBuf },

    /// Compiler exited non-zero for one translation unit
    #[error("compilation of {source_file} failed with exit code {code:?}")]
    CompileFailed {
        source_file: PathBuf,
        code: Option<i32>,
    },

    /// Linker exited non-zero
    #[error("linking {artifact} failed with exit code {code:?}")]
    LinkFailed {
        artifact: PathBuf,
        code: Option<i32>,
    },

    /// The executed artifact exited non-zero
    #[error("{artifact} exited with code {code:?}")]
    RunFailed {
        artifact: PathBuf,
        code: Option<i32>,
    },

    /// Manifest file is missing or unreadable
    #[error("cannot read manifest {path}: {message}")]
    ManifestRead { path: PathBuf, message: String },

    /// Manifest TOML failed to parse
    #[error("invalid manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Exit code to forward to the invoking shell.
    ///
    /// A failed artifact run forwards the child's own exit code; every other
    /// failure maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::RunFailed { code, .. } => code.unwrap_or(1),
            _ => 1,
        }
    }
}

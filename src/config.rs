//! Manifest and run-time configuration
//!
//! Each example directory carries a `harness.toml` build description. The
//! compiler and linker invocation strings usually come from a shared include
//! named by `extends`, so individual examples only declare which sources feed
//! which artifact. Section-level override: a section present in the local
//! manifest replaces the included one wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::log_file_name;
use crate::error::{HarnessError, HarnessResult};

/// Environment variable gating conditional post-run cleanup.
///
/// Any non-empty value triggers the purge of generated data files and logs
/// after a plain `run`.
pub const CLEAN_AFTER_RUN_ENV: &str = "SAMPLERUN_CLEAN_AFTER_RUN";

/// Default manifest file name inside an example directory
pub const DEFAULT_MANIFEST: &str = "harness.toml";

/// Which sources feed which artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// The one executable artifact this directory produces
    pub artifact: PathBuf,

    /// Translation units, compiled independently
    pub sources: Vec<PathBuf>,

    /// Pre-built shared helper object linked into the artifact
    pub shared_object: PathBuf,
}

/// Compiler/linker invocation strings, normally supplied by the shared include
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default = "default_compiler")]
    pub compiler: String,

    #[serde(default)]
    pub compile_flags: Vec<String>,

    #[serde(default)]
    pub link_flags: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: default_compiler(),
            compile_flags: Vec::new(),
            link_flags: Vec::new(),
        }
    }
}

fn default_compiler() -> String {
    "c++".to_string()
}

/// Runtime-output conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Reserved extensions marking "runtime output, safe to purge"
    #[serde(default = "default_data_extensions")]
    pub data_extensions: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_extensions: default_data_extensions(),
        }
    }
}

fn default_data_extensions() -> Vec<String> {
    vec!["trt".to_string(), "ts".to_string()]
}

/// Raw on-disk shape, before `extends` resolution
#[derive(Debug, Clone, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    extends: Option<PathBuf>,

    #[serde(default)]
    build: Option<BuildConfig>,

    #[serde(default)]
    toolchain: Option<ToolchainConfig>,

    #[serde(default)]
    output: Option<OutputConfig>,
}

/// Resolved build description for one example directory
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Example directory; all relative manifest paths resolve against it
    pub root: PathBuf,

    pub build: BuildConfig,
    pub toolchain: ToolchainConfig,
    pub output: OutputConfig,
}

impl Manifest {
    /// Load a manifest, following at most one `extends` include.
    ///
    /// A missing or unparsable manifest is fatal; an example directory without
    /// a build description is not something the harness can work with.
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let local = Self::read_raw(path)?;
        // `Path::new("harness.toml").parent()` is the empty path; normalize to
        // "." so it stays usable as a process working directory.
        let root = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let base = match &local.extends {
            Some(include) => Self::read_raw(&root.join(include))?,
            None => RawManifest::default(),
        };

        Self::resolve(root, base, local, path)
    }

    /// Parse a manifest from a string, with the current directory as root.
    /// No `extends` resolution. Intended for tests.
    pub fn from_toml_str(toml: &str) -> HarnessResult<Self> {
        let raw: RawManifest =
            toml::from_str(toml).map_err(|e| HarnessError::ManifestParse {
                path: PathBuf::from("<inline>"),
                message: e.to_string(),
            })?;
        Self::resolve(PathBuf::from("."), RawManifest::default(), raw, Path::new("<inline>"))
    }

    fn read_raw(path: &Path) -> HarnessResult<RawManifest> {
        let text = fs::read_to_string(path).map_err(|e| HarnessError::ManifestRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| HarnessError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn resolve(
        root: PathBuf,
        base: RawManifest,
        local: RawManifest,
        path: &Path,
    ) -> HarnessResult<Self> {
        let build = local.build.or(base.build).ok_or_else(|| {
            HarnessError::ManifestParse {
                path: path.to_path_buf(),
                message: "missing [build] section".to_string(),
            }
        })?;

        if build.sources.is_empty() {
            return Err(HarnessError::ManifestParse {
                path: path.to_path_buf(),
                message: "[build] sources must name at least one file".to_string(),
            });
        }

        Ok(Self {
            root,
            build,
            toolchain: local.toolchain.or(base.toolchain).unwrap_or_default(),
            output: local.output.or(base.output).unwrap_or_default(),
        })
    }

    /// Absolute-or-root-relative path of the executable artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.root.join(&self.build.artifact)
    }

    /// Path of the shared helper object
    pub fn shared_object_path(&self) -> PathBuf {
        self.root.join(&self.build.shared_object)
    }

    /// Paths of all translation units
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.build.sources.iter().map(|s| self.root.join(s)).collect()
    }

    /// Path of the log file the artifact's run writes
    pub fn log_path(&self) -> PathBuf {
        self.root.join(log_file_name(&self.build.artifact))
    }
}

/// Settings read once from the process environment at the entry point.
///
/// Deeper logic receives this value explicitly instead of re-reading ambient
/// state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSettings {
    /// Purge generated data files and logs after a plain `run`
    pub clean_after_run: bool,
}

impl RunSettings {
    pub fn from_env() -> Self {
        let clean_after_run = std::env::var(CLEAN_AFTER_RUN_ENV)
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        Self { clean_after_run }
    }
}

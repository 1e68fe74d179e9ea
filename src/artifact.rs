//! Artifact taxonomy for the harness
//!
//! Every file the harness touches carries an explicit [`ArtifactKind`] tag,
//! assigned once by the [`Classifier`]. Purge decisions key off the tag, never
//! off ad-hoc suffix matching at the use site.

use std::path::{Path, PathBuf};

use crate::config::Manifest;

/// Kind of file tracked by the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Input translation unit; immutable, never purged
    Source,
    /// Object file produced by the compile sub-step
    Object,
    /// Dependency metadata emitted alongside an object (e.g. `-MMD` output)
    DepInfo,
    /// The linked executable artifact
    Executable,
    /// Pre-built shared helper object; consumed, not owned, never purged
    SharedObject,
    /// Captured run output (`log-<artifact>.log`)
    Log,
    /// Runtime output carrying a reserved extension; safe to purge
    GeneratedData,
    /// Anything else in the directory; left alone
    Other,
}

impl ArtifactKind {
    /// Whether `clean` removes files of this kind
    pub fn purged_by_clean(self) -> bool {
        matches!(
            self,
            ArtifactKind::Object
                | ArtifactKind::DepInfo
                | ArtifactKind::Executable
                | ArtifactKind::Log
                | ArtifactKind::GeneratedData
        )
    }

    /// Whether conditional post-run cleanup removes files of this kind.
    ///
    /// Only runtime outputs; build artifacts are never touched here.
    pub fn purged_after_run(self) -> bool {
        matches!(self, ArtifactKind::Log | ArtifactKind::GeneratedData)
    }
}

/// A path paired with its resolved kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Log file name for an artifact: `log-<artifactBaseName>.log`
pub fn log_file_name(artifact: &Path) -> String {
    let base = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("log-{base}.log")
}

/// Object file path for a source file (`main.cpp` -> `main.o`)
pub fn object_file(source: &Path) -> PathBuf {
    source.with_extension("o")
}

/// Classifies directory entries against one example's manifest
pub struct Classifier {
    artifact_name: String,
    shared_object_name: String,
    source_names: Vec<String>,
    data_extensions: Vec<String>,
}

impl Classifier {
    pub fn new(manifest: &Manifest) -> Self {
        let file_name = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        Self {
            artifact_name: file_name(&manifest.build.artifact),
            shared_object_name: file_name(&manifest.build.shared_object),
            source_names: manifest.build.sources.iter().map(|s| file_name(s)).collect(),
            data_extensions: manifest.output.data_extensions.clone(),
        }
    }

    /// Resolve the kind of one directory entry
    pub fn classify(&self, path: &Path) -> ArtifactKind {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => return ArtifactKind::Other,
        };

        // The shared helper object usually lives outside the example directory,
        // but classify it defensively in case it sits alongside the sources.
        if name == self.shared_object_name {
            return ArtifactKind::SharedObject;
        }
        if name == self.artifact_name {
            return ArtifactKind::Executable;
        }
        if self.source_names.iter().any(|s| *s == name) {
            return ArtifactKind::Source;
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        if ext == "o" {
            return ArtifactKind::Object;
        }
        if ext == "d" {
            return ArtifactKind::DepInfo;
        }
        if ext == "log" && name.starts_with("log-") {
            return ArtifactKind::Log;
        }
        if self.data_extensions.iter().any(|e| *e == ext) {
            return ArtifactKind::GeneratedData;
        }

        ArtifactKind::Other
    }

    /// Classify and tag one path
    pub fn track(&self, path: PathBuf) -> TrackedFile {
        let kind = self.classify(&path);
        TrackedFile { path, kind }
    }
}

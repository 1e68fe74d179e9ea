//! Compiler/linker step
//!
//! Turns the manifest's sources plus the pre-built shared helper object into
//! exactly one executable artifact. Translation units compile concurrently;
//! the link joins on all of them. Tool diagnostics are inherited, so compiler
//! and linker output reaches the caller's terminal unmodified.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;
use std::thread;

use crate::artifact::object_file;
use crate::config::Manifest;
use crate::error::{HarnessError, HarnessResult};

/// Outcome of a successful build
#[derive(Debug)]
pub struct BuildReport {
    pub artifact: PathBuf,
    pub objects: Vec<PathBuf>,
}

/// Build the example's executable artifact.
///
/// Fails fast on a missing shared helper object before any compiler is
/// spawned, and guarantees that a failed link never leaves a stale artifact
/// behind.
pub fn build(manifest: &Manifest) -> HarnessResult<BuildReport> {
    let shared_object = manifest.shared_object_path();
    if !shared_object.exists() {
        return Err(HarnessError::MissingDependency {
            path: shared_object,
        });
    }

    let sources = manifest.source_paths();
    for source in &sources {
        if !source.exists() {
            return Err(HarnessError::SourceNotFound {
                path: source.clone(),
            });
        }
    }

    let objects = compile_all(manifest, &sources)?;

    let artifact = manifest.artifact_path();
    link(manifest, &objects, &shared_object, &artifact)?;

    Ok(BuildReport { artifact, objects })
}

/// Compile every source to its object file, one worker per translation unit.
fn compile_all(manifest: &Manifest, sources: &[PathBuf]) -> HarnessResult<Vec<PathBuf>> {
    let results: Vec<HarnessResult<PathBuf>> = thread::scope(|scope| {
        let workers: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || compile_one(manifest, source)))
            .collect();

        workers
            .into_iter()
            .map(|w| w.join().expect("compile worker panicked"))
            .collect()
    });

    results.into_iter().collect()
}

fn compile_one(manifest: &Manifest, source: &PathBuf) -> HarnessResult<PathBuf> {
    let object = object_file(source);

    let status = Command::new(&manifest.toolchain.compiler)
        .args(&manifest.toolchain.compile_flags)
        .arg("-c")
        .arg(source)
        .arg("-o")
        .arg(&object)
        .status()
        .map_err(HarnessError::Io)?;

    if !status.success() {
        return Err(HarnessError::CompileFailed {
            source_file: source.clone(),
            code: status.code(),
        });
    }

    Ok(object)
}

fn link(
    manifest: &Manifest,
    objects: &[PathBuf],
    shared_object: &PathBuf,
    artifact: &PathBuf,
) -> HarnessResult<()> {
    // A previous build's executable must not survive a failed link and pass
    // for current.
    remove_if_present(artifact)?;

    let status = Command::new(&manifest.toolchain.compiler)
        .args(&manifest.toolchain.link_flags)
        .args(objects)
        .arg(shared_object)
        .arg("-o")
        .arg(artifact)
        .status()
        .map_err(HarnessError::Io)?;

    if !status.success() {
        remove_if_present(artifact)?;
        return Err(HarnessError::LinkFailed {
            artifact: artifact.clone(),
            code: status.code(),
        });
    }

    Ok(())
}

fn remove_if_present(path: &PathBuf) -> HarnessResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HarnessError::Io(e)),
    }
}

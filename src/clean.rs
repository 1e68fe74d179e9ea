//! Clean step and the two narrower purges
//!
//! All three operations scan the example directory once, classify each entry
//! through the artifact taxonomy, and delete what the taxonomy marks as
//! purgeable. Deletion is idempotent: a target vanishing between scan and
//! unlink is not an error.

use std::fs;
use std::io::ErrorKind;

use crate::artifact::{ArtifactKind, Classifier, TrackedFile};
use crate::config::{Manifest, RunSettings};
use crate::error::{HarnessError, HarnessResult};

/// Files removed by one purge pass
#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: Vec<TrackedFile>,
}

/// Full clean: restore the directory to source-only state.
///
/// Removes objects, dependency metadata, the executable, logs, and generated
/// data files. Sources and the shared helper object survive.
pub fn clean(manifest: &Manifest) -> HarnessResult<CleanReport> {
    purge(manifest, ArtifactKind::purged_by_clean)
}

/// Defensive pre-run sweep: remove stray generated data files left by a
/// prior, unrelated run. Leaves the just-built executable alone.
pub fn sweep_generated_data(manifest: &Manifest) -> HarnessResult<CleanReport> {
    purge(manifest, |kind| kind == ArtifactKind::GeneratedData)
}

/// Conditional post-run cleanup, gated on the settings read at entry.
///
/// Purges runtime outputs only (generated data files and logs); build
/// artifacts are never touched. With the flag unset this is a no-op, leaving
/// logs in place for inspection.
pub fn post_run_cleanup(manifest: &Manifest, settings: RunSettings) -> HarnessResult<CleanReport> {
    if !settings.clean_after_run {
        return Ok(CleanReport::default());
    }
    purge(manifest, ArtifactKind::purged_after_run)
}

fn purge(manifest: &Manifest, should_remove: impl Fn(ArtifactKind) -> bool) -> HarnessResult<CleanReport> {
    let classifier = Classifier::new(manifest);
    let mut report = CleanReport::default();

    let entries = match fs::read_dir(&manifest.root) {
        Ok(entries) => entries,
        // Nothing to purge if the directory itself is gone.
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(report),
        Err(e) => return Err(HarnessError::Io(e)),
    };

    for entry in entries {
        let entry = entry.map_err(HarnessError::Io)?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let tracked = classifier.track(path);
        if !should_remove(tracked.kind) {
            continue;
        }

        match fs::remove_file(&tracked.path) {
            Ok(()) => report.removed.push(tracked),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(HarnessError::Io(e)),
        }
    }

    Ok(report)
}

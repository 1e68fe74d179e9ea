//! Test orchestrator
//!
//! One reproducible verification cycle per invocation:
//! clean, build, sweep stray generated data, run-and-capture. Strictly
//! sequential and fail-fast; each stage's `Result` gates the next and the
//! first failure propagates unmodified. No retries.
//!
//! Caller responsibility, not enforced here: no two cycles may run against
//! the same example directory concurrently.

use std::path::PathBuf;

use crate::clean::{clean, sweep_generated_data};
use crate::compile::build;
use crate::config::Manifest;
use crate::error::HarnessResult;
use crate::run::run_and_capture;

/// Stage of the verification cycle, reported as each begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Cleaning,
    Building,
    PreRunSweep,
    Running,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Cleaning => "clean",
            Stage::Building => "build",
            Stage::PreRunSweep => "sweep",
            Stage::Running => "run",
        }
    }
}

/// Outcome of a completed cycle
#[derive(Debug)]
pub struct TestReport {
    pub artifact: PathBuf,
    pub log: PathBuf,
}

/// Run the full cycle against one example directory.
///
/// `on_stage` fires as each stage starts, for progress reporting.
pub fn run_test_cycle(
    manifest: &Manifest,
    mut on_stage: impl FnMut(Stage),
) -> HarnessResult<TestReport> {
    on_stage(Stage::Cleaning);
    clean(manifest)?;

    on_stage(Stage::Building);
    let built = build(manifest)?;

    on_stage(Stage::PreRunSweep);
    sweep_generated_data(manifest)?;

    on_stage(Stage::Running);
    let run = run_and_capture(&manifest.root, &built.artifact)?;

    Ok(TestReport {
        artifact: built.artifact,
        log: run.log,
    })
}

//! Samplerun - per-example build-and-run harness
//!
//! Samplerun gives each isolated native code sample a single-command
//! verification cycle: build the example's executable from its sources plus a
//! shared helper object, run it with combined output captured to a log file,
//! and keep the directory clean of generated artifacts.

pub mod artifact;
pub mod clean;
pub mod compile;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod run;

// Re-exports for convenience
pub use artifact::{log_file_name, ArtifactKind, Classifier, TrackedFile};
pub use clean::{clean, post_run_cleanup, sweep_generated_data, CleanReport};
pub use compile::{build, BuildReport};
pub use config::{Manifest, RunSettings, CLEAN_AFTER_RUN_ENV, DEFAULT_MANIFEST};
pub use error::{HarnessError, HarnessResult};
pub use pipeline::{run_test_cycle, Stage, TestReport};
pub use run::{run_and_capture, RunReport};

//! Samplerun CLI - per-example build-and-run harness
//!
//! Usage: samplerun [COMMAND]
//!
//! Commands:
//!   build   Compile and link the example's executable (default)
//!   test    Clean, build, and run with output captured to a log
//!   clean   Purge generated artifacts
//!   run     Run an artifact and capture its output

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use samplerun::{HarnessError, Manifest, RunSettings, Stage, DEFAULT_MANIFEST};

/// Samplerun - per-example build-and-run harness
#[derive(Parser, Debug)]
#[command(name = "samplerun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Machine-readable JSON event lines for CI
    #[arg(long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile and link the example's executable (the `all` target)
    Build {
        /// Path to the build description
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },

    /// Clean, build, sweep stray data files, then run with capture
    Test {
        /// Path to the build description
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },

    /// Purge objects, dep files, the executable, logs, and generated data
    Clean {
        /// Path to the build description
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },

    /// Run an artifact, capture its output, then apply conditional cleanup
    Run {
        /// Artifact to run (defaults to the manifest's)
        artifact: Option<PathBuf>,

        /// Path to the build description
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    // Read the ambient cleanup flag exactly once, here at the entry point.
    let settings = RunSettings::from_env();

    let command = cli.command.unwrap_or(Commands::Build {
        manifest: PathBuf::from(DEFAULT_MANIFEST),
    });

    let result = match command {
        Commands::Build { manifest } => cmd_build(&manifest, cli.json),
        Commands::Test { manifest } => cmd_test(&manifest, cli.json),
        Commands::Clean { manifest } => cmd_clean(&manifest, cli.json),
        Commands::Run { artifact, manifest } => cmd_run(&manifest, artifact, settings, cli.json),
    };

    if let Err(err) = result {
        eprintln!("✗ {err}");
        let code = err
            .downcast_ref::<HarnessError>()
            .map(HarnessError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn cmd_build(manifest_path: &PathBuf, json: bool) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let report = samplerun::build(&manifest)?;

    if json {
        let output = serde_json::json!({
            "event": "build",
            "artifact": report.artifact.display().to_string(),
            "objects": report.objects.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "✓ Built {} ({} object{})",
            report.artifact.display(),
            report.objects.len(),
            if report.objects.len() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

fn cmd_test(manifest_path: &PathBuf, json: bool) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;

    if !json {
        println!("🧪 Samplerun Test");
    }

    let report = samplerun::run_test_cycle(&manifest, |stage: Stage| {
        if json {
            let line = serde_json::json!({ "event": "stage", "stage": stage.name() });
            println!("{line}");
        } else {
            println!("  {}", stage.name());
        }
    })?;

    if json {
        let output = serde_json::json!({
            "event": "test",
            "status": "success",
            "artifact": report.artifact.display().to_string(),
            "log": report.log.display().to_string(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "✓ {} -> {}",
            report.artifact.display(),
            report.log.display()
        );
    }

    Ok(())
}

fn cmd_clean(manifest_path: &PathBuf, json: bool) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let report = samplerun::clean(&manifest)?;

    if json {
        let output = serde_json::json!({
            "event": "clean",
            "removed": report.removed.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("✓ Removed {} file(s)", report.removed.len());
        for file in &report.removed {
            println!("  - {}", file.path.display());
        }
    }

    Ok(())
}

fn cmd_run(
    manifest_path: &PathBuf,
    artifact: Option<PathBuf>,
    settings: RunSettings,
    json: bool,
) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let artifact = artifact.unwrap_or_else(|| manifest.artifact_path());

    let report = samplerun::run_and_capture(&manifest.root, &artifact)?;
    let cleaned = samplerun::post_run_cleanup(&manifest, settings)?;

    if json {
        let output = serde_json::json!({
            "event": "run",
            "artifact": report.artifact.display().to_string(),
            "log": report.log.display().to_string(),
            "cleaned": cleaned.removed.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "✓ {} -> {}",
            report.artifact.display(),
            report.log.display()
        );
        if !cleaned.removed.is_empty() {
            println!("✓ Cleaned {} runtime output(s)", cleaned.removed.len());
        }
    }

    Ok(())
}

//! Test environment builder for isolated samplerun testing.
//!
//! Provides `ExampleEnv` - a temp example directory populated with sources, a
//! shared helper object, a manifest, and a fake shell-script toolchain, plus
//! helpers to run the samplerun CLI against it. Unix-only: the fake toolchain
//! and the linked "executable" are `/bin/sh` scripts.

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running a samplerun CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated example directory with a fake toolchain.
///
/// The fake compiler touches the `-o` target for `-c` invocations; the fake
/// link step writes a `/bin/sh` script whose body comes from
/// `artifact_body.sh`, so tests control exactly what the "executable" prints,
/// generates, and exits with.
pub struct ExampleEnv {
    pub dir: TempDir,
    bin: PathBuf,
}

impl ExampleEnv {
    pub fn builder() -> ExampleEnvBuilder {
        ExampleEnvBuilder::new()
    }

    /// Path relative to the example directory
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    pub fn write(&self, relative: &str, content: &str) {
        fs::write(self.path(relative), content).expect("Failed to write file");
    }

    /// Run samplerun in the example directory
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run samplerun with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.dir.path())
            .args(args)
            .env_remove("SAMPLERUN_CLEAN_AFTER_RUN");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute samplerun");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Builder for ExampleEnv with fluent API
pub struct ExampleEnvBuilder {
    sources: Vec<(String, String)>,
    artifact: String,
    shared_object: bool,
    artifact_body: String,
    extra_manifest: String,
}

impl ExampleEnvBuilder {
    pub fn new() -> Self {
        Self {
            sources: vec![("main.cpp".to_string(), "int main() {}\n".to_string())],
            artifact: "main.exe".to_string(),
            shared_object: true,
            artifact_body: "echo sample output\n".to_string(),
            extra_manifest: String::new(),
        }
    }

    /// Replace the default source set
    pub fn with_sources(mut self, names: &[&str]) -> Self {
        self.sources = names
            .iter()
            .map(|n| (n.to_string(), format!("// {n}\n")))
            .collect();
        self
    }

    pub fn with_artifact(mut self, name: &str) -> Self {
        self.artifact = name.to_string();
        self
    }

    /// Do not create the shared helper object
    pub fn without_shared_object(mut self) -> Self {
        self.shared_object = false;
        self
    }

    /// Shell body of the linked "executable"
    pub fn with_artifact_body(mut self, body: &str) -> Self {
        self.artifact_body = body.to_string();
        self
    }

    /// Extra TOML appended to the manifest
    pub fn with_extra_manifest(mut self, toml: &str) -> Self {
        self.extra_manifest = toml.to_string();
        self
    }

    pub fn build(self) -> ExampleEnv {
        let dir = TempDir::new().expect("Failed to create temp dir");

        for (name, content) in &self.sources {
            fs::write(dir.path().join(name), content).expect("Failed to write source");
        }

        if self.shared_object {
            fs::write(dir.path().join("cookbook.o"), b"\x7fELF").expect("Failed to write object");
        }

        fs::write(dir.path().join("artifact_body.sh"), &self.artifact_body)
            .expect("Failed to write artifact body");

        write_fake_toolchain(dir.path());

        let source_list = self
            .sources
            .iter()
            .map(|(n, _)| format!("\"{n}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let manifest = format!(
            r#"[build]
artifact = "{artifact}"
sources = [{source_list}]
shared_object = "cookbook.o"

[toolchain]
compiler = "{cc}"
{extra}
"#,
            artifact = self.artifact,
            cc = dir.path().join("fake-cc").display(),
            extra = self.extra_manifest,
        );
        fs::write(dir.path().join("harness.toml"), manifest).expect("Failed to write manifest");

        ExampleEnv {
            dir,
            bin: find_samplerun_binary(),
        }
    }
}

impl Default for ExampleEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_fake_toolchain(dir: &Path) {
    let script = r#"#!/bin/sh
out=""
compile=0
prev=""
for a in "$@"; do
  [ "$a" = "-c" ] && compile=1
  [ "$prev" = "-o" ] && out="$a"
  prev="$a"
done
if [ "$compile" = "1" ]; then
  : > "$out"
else
  { printf '#!/bin/sh\n'; cat "$(dirname "$0")/artifact_body.sh"; } > "$out"
  chmod +x "$out"
fi
"#;
    let path = dir.join("fake-cc");
    fs::write(&path, script).expect("Failed to write fake compiler");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod fake compiler");
}

/// Find the samplerun binary to use for testing
fn find_samplerun_binary() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());

    let debug_bin = PathBuf::from(&manifest_dir).join("target/debug/samplerun");
    if debug_bin.exists() {
        return debug_bin;
    }

    let release_bin = PathBuf::from(&manifest_dir).join("target/release/samplerun");
    if release_bin.exists() {
        return release_bin;
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("debug")
        .join("samplerun")
}

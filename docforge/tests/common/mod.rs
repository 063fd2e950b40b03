//! Shared integration-test harness for running the `docforge` binary
//! against scratch copies of the fixture trees.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use walkdir::WalkDir;

/// Helpers for invoking the built `docforge` binary.
pub struct DocforgeProcess;

impl DocforgeProcess {
    /// Runs `docforge` with `args` in the current directory.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::command(args).output().expect("failed to run docforge")
    }

    /// Runs `docforge` with `args` in `dir`.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_in(dir: &Path, args: &[&str]) -> Output {
        Self::command(args)
            .current_dir(dir)
            .output()
            .expect("failed to run docforge")
    }

    /// Runs `docforge` with `args` in `dir` and extra environment.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn spawn_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Self::command(args);
        cmd.current_dir(dir);
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("failed to run docforge")
    }

    fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_docforge"));
        cmd.args(args)
            .env_remove("CI")
            .env_remove("DOCFORGE_CONFIG")
            .env_remove("DOCFORGE_LOG_LEVEL")
            .env_remove("DOCFORGE_COLOR")
            .env_remove("DOCFORGE_LOG_FORMAT");
        cmd
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Copies a fixture directory into a fresh temporary directory.
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn scratch_copy(name: &str) -> TempDir {
        let source = Self::fixture_path(name);
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        for entry in WalkDir::new(&source) {
            let entry = entry.expect("failed to walk fixture");
            let relative = entry.path().strip_prefix(&source).expect("entry under fixture");
            let target = dir.path().join(relative);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target).expect("failed to create dir");
            } else {
                std::fs::copy(entry.path(), &target).expect("failed to copy fixture");
            }
        }
        dir
    }
}

/// Exit code of a finished process.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("process was killed by a signal")
}

/// Reads a file to a string.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("failed to read file")
}

//! TestWorld pattern for declarative project-tree setup.
//!
//! Provides a fluent interface for:
//! - Creating isolated search roots
//! - Writing pipeline artifacts with deterministic modification times
//! - Executing CLI commands against the tree

use anyhow::Result;
use assert_cmd::Command;
use filetime::{FileTime, set_file_mtime};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Marker directory that makes a directory a project root.
const MARKER_DIR: &str = ".pipeline";

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use pipetrace_testing::TestWorld;
///
/// let world = TestWorld::new()
///     .with_project("shop")
///     .write_at("shop/spec.md", "# Shop", 1_000);
///
/// let result = world.run(&["projects", "--format", "json"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated search root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(".pipetrace-test/config.toml");
        Self {
            temp_dir,
            config_path,
        }
    }

    /// Search root for this world.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a location inside the world.
    pub fn path<P: AsRef<Path>>(&self, rel: P) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    /// Config file handed to the CLI (absent unless written).
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Create a project directory carrying the marker directory.
    pub fn with_project(self, name: &str) -> Self {
        std::fs::create_dir_all(self.path(name).join(MARKER_DIR))
            .expect("Failed to create project dir");
        self
    }

    /// Create a directory (and parents).
    pub fn mkdir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.path(rel)).expect("Failed to create directory");
        self
    }

    /// Write a file, creating parents as needed.
    pub fn write(self, rel: &str, content: &str) -> Self {
        self.put(rel, content).expect("Failed to write file");
        self
    }

    /// Write a file and pin its modification time to `unix_secs`.
    pub fn write_at(self, rel: &str, content: &str, unix_secs: i64) -> Self {
        self.put(rel, content).expect("Failed to write file");
        self.touch_at(rel, unix_secs)
            .expect("Failed to set modification time");
        self
    }

    /// Write the CLI config file.
    pub fn with_config(self, toml: &str) -> Self {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create config dir");
        }
        std::fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    /// Write a file without consuming the world.
    pub fn put(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pin the modification time of an existing file or directory.
    pub fn touch_at(&self, rel: &str, unix_secs: i64) -> Result<()> {
        set_file_mtime(self.path(rel), FileTime::from_unix_time(unix_secs, 0))?;
        Ok(())
    }

    /// Configure a CLI command with this world's config file.
    ///
    /// The caller provides the base command (e.g. from `cargo_bin_cmd!("pipetrace")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config")
            .arg(&self.config_path)
            .current_dir(self.root())
            .env_remove("PIPETRACE_CONFIG")
            .env_remove("RUST_LOG")
    }

    /// Execute the pipetrace binary in this world and capture its output.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("pipetrace")
            .map_err(|e| anyhow::anyhow!("Failed to find pipetrace binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_at_pins_mtime() {
        let world = TestWorld::new().write_at("p/spec.md", "# spec", 1_234);
        let meta = std::fs::metadata(world.path("p/spec.md")).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), 1_234);
    }

    #[test]
    fn test_with_project_creates_marker() {
        let world = TestWorld::new().with_project("alpha");
        assert!(world.path("alpha/.pipeline").is_dir());
    }
}

//! # Version-Control Adapter
//!
//! The walkers only need two questions answered about a project directory:
//! whether a clone exists there, and which upstream URL it was cloned from.
//! The [`Vcs`] trait captures that contract, and [`Git`] implements it by
//! shelling out to the system `git` binary. Using the system binary means
//! SSH keys, credential helpers and everything else configured in
//! `~/.gitconfig` work without any extra handling here.
//!
//! Tests (and alternative version-control backends) can substitute their own
//! [`Vcs`] implementation.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Read-only version-control queries consumed by the walkers.
pub trait Vcs {
    /// Returns `true` if a clone exists at `path`.
    fn is_cloned(&self, path: &Path) -> bool;

    /// Return the configured upstream URL of the clone at `path`.
    ///
    /// Must only be called when [`Vcs::is_cloned`] is `true`; calling it on a
    /// path without a clone is a precondition violation, not a recoverable
    /// error.
    fn get_remote_url(&self, path: &Path) -> Result<String>;
}

/// [`Vcs`] implementation backed by the system `git` binary.
#[derive(Debug, Default)]
pub struct Git;

impl Git {
    /// Create a system-git adapter.
    pub fn new() -> Self {
        Git
    }

    fn run(&self, path: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .args(args)
            .output()
            .map_err(|err| Error::GitCommand {
                command: args.join(" "),
                path: path.to_path_buf(),
                stderr: err.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Vcs for Git {
    fn is_cloned(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    fn get_remote_url(&self, path: &Path) -> Result<String> {
        self.run(path, &["remote", "get-url", "origin"])
    }
}

//! # Workspace Handling
//!
//! A workspace is the on-disk root directory containing the main project and
//! all resolved dependency projects. The workspace itself is *not* a version
//! controlled clone; it refers to a main project, which defines the workspace
//! content through its manifest.
//!
//! ## Key Components
//!
//! - **`Info`**: the information persisted between tool invocations, stored
//!   as TOML at `.polyrepo/info.toml` under the workspace root. Currently
//!   this is just the path of the main project, relative to the root.
//!
//! - **`Workspace`**: locates the root directory (by searching for the
//!   `.polyrepo` marker directory upwards from a starting point), loads the
//!   `Info` record, and answers path questions for the rest of the system:
//!   root path, main project path and name, and the effective manifest path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::manifest::MANIFEST_PATH_DEFAULT;

/// The sub-folder in which workspace related data is stored, relative to the
/// workspace root.
pub const POLYREPO_PATH: &str = ".polyrepo";

/// Name of the workspace information file within [`POLYREPO_PATH`].
pub const INFO_FILE: &str = "info.toml";

/// Workspace information persisted between tool invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Path to the main project, relative to the workspace root.
    pub main_path: PathBuf,
}

impl Info {
    /// Load the workspace information from the root directory at `root`.
    pub fn load(root: &Path) -> Result<Info> {
        let path = root.join(POLYREPO_PATH).join(INFO_FILE);
        let content = fs::read_to_string(&path).map_err(|err| Error::Info {
            path: path.clone(),
            details: err.to_string(),
        })?;
        toml::from_str(&content).map_err(|err| Error::Info {
            path,
            details: err.to_string(),
        })
    }

    /// Save the workspace information below the root directory at `root`,
    /// creating the marker directory as needed.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(POLYREPO_PATH).join(INFO_FILE);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = String::from("# polyrepo system file. DO NOT EDIT.\n\n");
        content.push_str(&toml::to_string(self).map_err(|err| Error::Info {
            path: path.clone(),
            details: err.to_string(),
        })?);
        fs::write(path, content)?;
        Ok(())
    }
}

/// The filesystem location containing the main project and all dependency
/// clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace root directory.
    pub path: PathBuf,
    /// Persisted workspace information.
    pub info: Info,
}

impl Workspace {
    /// Find the workspace root directory containing `start`.
    ///
    /// The root directory contains a `.polyrepo` sub-directory, which is
    /// searched upwards from `start`. Fails with [`Error::Uninitialized`] if
    /// no marker is found.
    pub fn find_path(start: &Path) -> Result<PathBuf> {
        let mut current = Some(start);
        while let Some(path) = current {
            if path.join(POLYREPO_PATH).is_dir() {
                return Ok(path.to_path_buf());
            }
            current = path.parent();
        }
        Err(Error::Uninitialized)
    }

    /// Locate and load the workspace containing `start`.
    pub fn from_path(start: &Path) -> Result<Workspace> {
        let path = Self::find_path(start)?;
        let info = Info::load(&path)?;
        Ok(Workspace { path, info })
    }

    /// Initialize a workspace at `path` with the main project at `main_path`.
    ///
    /// `main_path` may be given absolute or relative to `path`, but must be
    /// located inside the workspace. Fails with [`Error::Initialized`] if a
    /// workspace already exists at `path`.
    pub fn init(path: &Path, main_path: &Path) -> Result<Workspace> {
        if path.join(POLYREPO_PATH).exists() {
            return Err(Error::Initialized {
                path: path.to_path_buf(),
            });
        }
        let main_path = if main_path.is_absolute() {
            main_path
                .strip_prefix(path)
                .map_err(|_| Error::OutsideWorkspace {
                    path: path.to_path_buf(),
                    project_path: main_path.to_path_buf(),
                })?
                .to_path_buf()
        } else {
            main_path.to_path_buf()
        };
        let info = Info { main_path };
        info.save(path)?;
        Ok(Workspace {
            path: path.to_path_buf(),
            info,
        })
    }

    /// Path of the main project.
    pub fn main_path(&self) -> PathBuf {
        self.path.join(&self.info.main_path)
    }

    /// Name of the main project (the last component of its path).
    pub fn main_project_name(&self) -> String {
        self.info
            .main_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The effective manifest file path.
    ///
    /// An absolute override is taken as-is, a relative one is resolved
    /// against the main project path. Without an override the default
    /// manifest file name inside the main project is used.
    pub fn get_manifest_path(&self, manifest_path: Option<PathBuf>) -> PathBuf {
        match manifest_path {
            Some(path) if path.is_absolute() => path,
            Some(path) => self.main_path().join(path),
            None => self.main_path().join(MANIFEST_PATH_DEFAULT),
        }
    }
}

//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `polyrepo` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur during manifest resolution. Each variant corresponds to a specific
//!   type of error and includes contextual information (the offending file
//!   path, project name, or remote name) to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library to simplify function signatures.
//!
//! All errors are raised synchronously at the point of failure and propagate
//! to the immediate caller; nothing is retried internally. Transient
//! filesystem or version-control failures are the collaborator's concern.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for polyrepo operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest file is absent where one is required.
    #[error("Manifest has not been found at {path:?}.")]
    ManifestNotFound { path: PathBuf },

    /// A project declaration violates one of the mutual-exclusion rules
    /// (`remote`/`url`, `url`/`sub-url`, or `sub-url` without `remote`).
    #[error("Invalid project {project:?}: {message}")]
    ManifestValidation { project: String, message: String },

    /// A manifest file exists but cannot be deserialized into a structurally
    /// valid document. Wraps the underlying parse or validation failure text.
    #[error("Manifest {path:?} is broken: {details}")]
    Manifest { path: PathBuf, details: String },

    /// A project declaration references a remote name that is absent from
    /// its manifest's remote list.
    #[error("Unknown remote {remote:?} for project {project:?}")]
    UnknownRemote { remote: String, project: String },

    /// No workspace has been initialized at or above the given location.
    #[error("polyrepo has not been initialized yet.")]
    Uninitialized,

    /// A workspace has already been initialized at this location.
    #[error("polyrepo has already been initialized at {path:?}.")]
    Initialized { path: PathBuf },

    /// The main project is located outside the workspace root.
    #[error("Project {project_path:?} is located outside {path:?}.")]
    OutsideWorkspace {
        path: PathBuf,
        project_path: PathBuf,
    },

    /// The workspace information file exists but cannot be read.
    #[error("The workspace information file {path:?} cannot be read: {details}")]
    Info { path: PathBuf, details: String },

    /// An error occurred while executing a git command.
    #[error("Git command failed in {path:?}: {command} - {stderr}")]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

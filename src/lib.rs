//! # Polyrepo Manifest Resolution Library
//!
//! This library provides the core functionality for managing a workspace
//! composed of many version-controlled projects that reference each other
//! through declarative manifest files. Each project's manifest can declare
//! further dependent projects, each potentially carrying its own manifest,
//! forming a dependency tree that is resolved into a flat, deduplicated,
//! ordered list of concrete projects before the workspace is materialized.
//!
//! ## Quick Example
//!
//! ```
//! use polyrepo::manifest::{ManifestSpec, Project};
//!
//! let yaml = r#"
//! manifest:
//!   remotes:
//!     - name: origin
//!       url-base: https://example.com/base
//!   dependencies:
//!     - name: dep1
//!       remote: origin
//! "#;
//! let spec = ManifestSpec::parse(yaml).unwrap();
//! let dep1 = Project::from_spec(
//!     &spec.defaults,
//!     &spec.remotes,
//!     &spec.dependencies[0],
//!     None,
//! ).unwrap();
//! assert_eq!(dep1.url.as_deref(), Some("https://example.com/base/dep1"));
//! assert_eq!(dep1.path, "dep1");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: The `polyrepo.yaml` schema — remote aliases,
//!   default values and dependency declarations — together with validation,
//!   load/save, and the pure resolution step from declaration to concrete
//!   project.
//! - **Walkers (`iters`)**: Lazy iterators that traverse the manifest tree:
//!   `ManifestIter` yields every reachable manifest, `ProjectIter` yields the
//!   flat resolved project list, both deduplicated by project path with
//!   first-seen-wins priority.
//! - **Workspace (`workspace`)**: The on-disk root directory containing the
//!   main project and all dependency clones, plus the persisted information
//!   needed to find it again.
//! - **Version Control (`git`)**: The adapter the walkers use to query a
//!   project's upstream URL when resolving relative dependency URLs.
//!
//! ## Execution Flow
//!
//! A caller locates the `Workspace`, asks it for the effective manifest path,
//! and then pulls from a `ProjectIter` to learn, in priority order, which
//! projects the workspace should contain and where their sources live. The
//! resolution engine itself never mutates the filesystem or invokes any
//! mutating version-control operation; it only computes *what* the workspace
//! should contain and *where* definitions come from.

pub mod error;
pub mod git;
pub mod iters;
pub mod manifest;
pub mod workspace;

#[cfg(test)]
mod manifest_proptest;

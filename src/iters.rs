//! # Manifest and Project Walkers
//!
//! This module implements the two traversals that turn a root manifest into
//! (a) the full manifest tree and (b) the flat, deduplicated, ordered list of
//! resolved projects that drives workspace synchronization.
//!
//! ## Key Components
//!
//! - **`ManifestIter`**: Depth-first, pre-order traversal that yields every
//!   reachable manifest exactly once per distinct project path, paired with
//!   its own file path.
//!
//! - **`ProjectIter`**: Traversal that yields the main project (optionally),
//!   followed by every reachable resolved [`Project`] exactly once per
//!   distinct path, recursively expanding nested manifests.
//!
//! ## Traversal Order
//!
//! Both walkers process each manifest in two phases: all of a node's direct
//! dependencies are scanned (and, for `ProjectIter`, yielded) in declaration
//! order before recursing into any of their sub-manifests. A child's subtree
//! is then fully exhausted before moving to the next sibling. This preserves
//! declaration priority: a diamond dependency is attributed to whichever
//! declaration chain reaches its path first, and later references to the same
//! path are skipped with a debug-level note.
//!
//! ## Laziness and Termination
//!
//! Both iterators are pull-based, single-use and fuse after the first error.
//! They keep an explicit work-list instead of recursing on the call stack, so
//! very large workspaces cannot exhaust stack space. The visited-path set
//! strictly grows and no path is revisited, which guarantees termination even
//! when manifest files mutually reference each other.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::git::Vcs;
use crate::manifest::{ManifestSpec, Project, MANIFEST_PATH_DEFAULT};
use crate::workspace::Workspace;

/// Iterator over all manifests reachable from a root manifest.
///
/// Yields `(manifest_path, manifest)` pairs in pre-order: a node's own
/// manifest is always yielded before any of its children's. Each distinct
/// dependency path is visited at most once.
///
/// The iterator is single-use; construct a fresh one to traverse again.
pub struct ManifestIter<'a> {
    workspace: &'a Workspace,
    /// The manifest yielded last, whose dependencies have not been scanned
    /// yet.
    pending: Option<ManifestSpec>,
    /// Work-list of manifest file paths, most recently discovered subtree on
    /// top.
    stack: Vec<PathBuf>,
    done: HashSet<String>,
    finished: bool,
}

impl<'a> ManifestIter<'a> {
    /// Create a traversal starting at `manifest_path`.
    pub fn new(workspace: &'a Workspace, manifest_path: PathBuf) -> Self {
        ManifestIter {
            workspace,
            pending: None,
            stack: vec![manifest_path],
            done: HashSet::new(),
            finished: false,
        }
    }

    /// Scan the dependencies of the most recently yielded manifest and queue
    /// the children that carry their own manifest file.
    fn scan(&mut self, manifest: &ManifestSpec) -> Result<()> {
        let mut children = Vec::new();
        for spec in &manifest.dependencies {
            let dep = Project::from_spec(&manifest.defaults, &manifest.remotes, spec, None)?;

            // Visit every path just once.
            if self.done.contains(&dep.path) {
                debug!("skipping duplicate {:?}", dep);
                continue;
            }
            self.done.insert(dep.path.clone());

            let dep_manifest_path = self
                .workspace
                .path
                .join(&dep.path)
                .join(MANIFEST_PATH_DEFAULT);
            if dep_manifest_path.exists() {
                children.push(dep_manifest_path);
            }
        }
        // LIFO work-list: reversed push keeps declaration order and exhausts
        // a child's subtree before its next sibling.
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }
        Ok(())
    }
}

impl Iterator for ManifestIter<'_> {
    type Item = Result<(PathBuf, ManifestSpec)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(manifest) = self.pending.take() {
            if let Err(err) = self.scan(&manifest) {
                self.finished = true;
                return Some(Err(err));
            }
        }
        let Some(manifest_path) = self.stack.pop() else {
            self.finished = true;
            return None;
        };
        match ManifestSpec::load(&manifest_path) {
            Ok(manifest) => {
                debug!("loaded manifest {:?}", manifest_path);
                self.pending = Some(manifest.clone());
                Some(Ok((manifest_path, manifest)))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Iterator over all resolved projects reachable from a root manifest.
///
/// Unless `skip_main` is set, the main project itself is yielded first,
/// derived from the workspace information. Dependencies follow in
/// declaration-priority order with first-seen-path-wins deduplication; leaf
/// projects without their own manifest are treated as having an empty
/// dependency list.
///
/// When a [`Vcs`] adapter is supplied, each expanded project's own upstream
/// URL is queried once and used to resolve its children's relative URLs.
/// This requires the project to already be cloned at its workspace path.
///
/// The iterator is single-use; construct a fresh one to traverse again.
pub struct ProjectIter<'a> {
    workspace: &'a Workspace,
    vcs: Option<&'a dyn Vcs>,
    /// Resolved projects ready to be handed out.
    ready: VecDeque<Project>,
    /// Work-list of `(project_path, manifest_path)` nodes awaiting expansion.
    stack: Vec<(PathBuf, PathBuf)>,
    done: HashSet<String>,
    finished: bool,
}

impl<'a> ProjectIter<'a> {
    /// Create a traversal starting at `manifest_path`, rooted at the
    /// workspace's main project.
    ///
    /// Pass a [`Vcs`] adapter to resolve relative dependency URLs against
    /// each project's actual upstream location.
    pub fn new(
        workspace: &'a Workspace,
        manifest_path: PathBuf,
        skip_main: bool,
        vcs: Option<&'a dyn Vcs>,
    ) -> Self {
        let mut ready = VecDeque::new();
        if !skip_main {
            ready.push_back(Project {
                name: workspace.main_project_name(),
                path: workspace.info.main_path.to_string_lossy().into_owned(),
                url: None,
                revision: None,
            });
        }
        ProjectIter {
            workspace,
            vcs,
            ready,
            stack: vec![(workspace.main_path(), manifest_path)],
            done: HashSet::new(),
            finished: false,
        }
    }

    /// Resolve and queue all direct dependencies of one manifest, then queue
    /// their project paths for recursion.
    fn expand(&mut self, project_path: &Path, manifest: &ManifestSpec) -> Result<()> {
        let refurl = match self.vcs {
            Some(vcs) => {
                // The caller guarantees the project is already cloned here.
                debug_assert!(vcs.is_cloned(project_path));
                Some(vcs.get_remote_url(project_path)?)
            }
            None => None,
        };

        let mut children = Vec::new();
        for spec in &manifest.dependencies {
            let dep =
                Project::from_spec(&manifest.defaults, &manifest.remotes, spec, refurl.as_deref())?;

            // Visit every path just once.
            if self.done.contains(&dep.path) {
                debug!("skipping duplicate {:?}", dep);
                continue;
            }
            self.done.insert(dep.path.clone());

            let dep_project_path = self.workspace.path.join(&dep.path);
            let dep_manifest_path = dep_project_path.join(MANIFEST_PATH_DEFAULT);
            self.ready.push_back(dep);
            children.push((dep_project_path, dep_manifest_path));
        }
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }
        Ok(())
    }
}

impl Iterator for ProjectIter<'_> {
    type Item = Result<Project>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if let Some(project) = self.ready.pop_front() {
                return Some(Ok(project));
            }
            let Some((project_path, manifest_path)) = self.stack.pop() else {
                self.finished = true;
                return None;
            };
            let manifest = match ManifestSpec::load_or_default(&manifest_path) {
                Ok(manifest) => manifest,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            };
            if manifest.is_empty() {
                continue;
            }
            if let Err(err) = self.expand(&project_path, &manifest) {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}

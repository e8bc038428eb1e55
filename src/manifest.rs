//! # Manifest Schema, Parsing and Resolution
//!
//! This module defines the data structures that represent a `polyrepo.yaml`
//! manifest file, the logic for parsing and saving it, and the pure
//! resolution step that turns a declared dependency into a concrete project.
//!
//! ## Key Components
//!
//! - **`ManifestSpec`**: The parsed content of one manifest file: an optional
//!   self-description of the owning project, default values, remote aliases
//!   and an ordered list of dependency declarations.
//!
//! - **`ProjectSpec`**: One dependency entry as written in a manifest, prior
//!   to resolution. Carries optional `remote`/`url`/`sub-url`/`revision`/
//!   `path` overrides.
//!
//! - **`Project`**: A `ProjectSpec` merged against `Defaults` and `Remote`
//!   aliases into a concrete `(name, path, url, revision)` record. Produced
//!   by [`Project::from_spec`].
//!
//! - **`create_project_filter`**: Builds a predicate selecting projects by an
//!   explicit allow-list of paths.
//!
//! ## File Format
//!
//! Manifests are YAML documents under a top-level `manifest:` key:
//!
//! ```yaml
//! manifest:
//!   defaults:
//!     revision: main
//!   remotes:
//!     - name: origin
//!       url-base: https://example.com/base
//!   dependencies:
//!     - name: dep1
//!       remote: origin
//! ```
//!
//! Fields left at their zero/absent value are omitted on save, which keeps
//! generated manifests minimal and diff-friendly.
//!
//! ## Validation
//!
//! Cross-field rules (`remote`/`url` mutually exclusive, `url`/`sub-url`
//! mutually exclusive, `sub-url` requires `remote`) are checked once, right
//! after deserialization. Resolution treats all declarations as
//! pre-validated.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// The default manifest file name, relative to the project directory.
pub const MANIFEST_PATH_DEFAULT: &str = "polyrepo.yaml";

/// Remote alias: a named base URL usable by projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// Remote name, referenced by `ProjectSpec::remote` and
    /// `Defaults::remote`.
    pub name: String,
    /// Base URL. Project URLs are assembled as `{url_base}/{sub-url-or-name}`.
    #[serde(default, rename = "url-base", skip_serializing_if = "Option::is_none")]
    pub url_base: Option<String>,
}

/// Default values applied when a project declaration omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Fallback remote name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Fallback revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl Defaults {
    /// Returns `true` if no default value is set.
    pub fn is_empty(&self) -> bool {
        self.remote.is_none() && self.revision.is_none()
    }
}

/// One dependency entry as written in a manifest, prior to resolution.
///
/// `remote` and `url` are mutually exclusive. `url` and `sub-url` are
/// likewise mutually exclusive, and `sub-url` requires `remote` to be set on
/// the declaration itself (a default remote does not satisfy the rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Unique project name.
    pub name: String,
    /// Remote alias name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// URL relative to the remote's `url-base`.
    #[serde(default, rename = "sub-url", skip_serializing_if = "Option::is_none")]
    pub sub_url: Option<String>,
    /// Explicit URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Revision (branch, tag or commit hash).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Project filesystem path, relative to the workspace directory.
    /// Defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ProjectSpec {
    /// Create a declaration with the given name and no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectSpec {
            name: name.into(),
            remote: None,
            sub_url: None,
            url: None,
            revision: None,
            path: None,
        }
    }

    /// Check the cross-field rules.
    ///
    /// This runs once at manifest-parse time; resolution assumes the
    /// invariants hold.
    pub fn validate(&self) -> Result<()> {
        if self.remote.is_some() && self.url.is_some() {
            return Err(Error::ManifestValidation {
                project: self.name.clone(),
                message: "'remote' and 'url' are mutually exclusive".to_string(),
            });
        }
        if self.url.is_some() && self.sub_url.is_some() {
            return Err(Error::ManifestValidation {
                project: self.name.clone(),
                message: "'url' and 'sub-url' are mutually exclusive".to_string(),
            });
        }
        if self.sub_url.is_some() && self.remote.is_none() {
            return Err(Error::ManifestValidation {
                project: self.name.clone(),
                message: "'sub-url' requires 'remote'".to_string(),
            });
        }
        Ok(())
    }
}

fn default_main() -> ProjectSpec {
    ProjectSpec::new("main")
}

fn is_default_main(main: &ProjectSpec) -> bool {
    *main == default_main()
}

/// The parsed content of one manifest file.
///
/// Dependency order is significant: it defines resolution and traversal
/// priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSpec {
    /// Description of the owning project. Defaults to `{name: "main"}`.
    #[serde(
        rename = "self",
        default = "default_main",
        skip_serializing_if = "is_default_main"
    )]
    pub main: ProjectSpec,
    /// Default values applied when a dependency omits them.
    #[serde(default, skip_serializing_if = "Defaults::is_empty")]
    pub defaults: Defaults,
    /// Remote aliases, looked up by name (first match wins).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<Remote>,
    /// Dependency declarations, in priority order. Also accepted under the
    /// key `projects`.
    #[serde(default, alias = "projects", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ProjectSpec>,
}

impl Default for ManifestSpec {
    fn default() -> Self {
        ManifestSpec {
            main: default_main(),
            defaults: Defaults::default(),
            remotes: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

/// On-disk wrapper: manifests live under a top-level `manifest:` key.
#[derive(Debug, Serialize, Deserialize)]
struct ManifestFile {
    manifest: ManifestSpec,
}

impl ManifestSpec {
    /// Parse a manifest from its YAML text and validate all declarations.
    pub fn parse(content: &str) -> Result<ManifestSpec> {
        let file: ManifestFile = serde_yaml::from_str(content)?;
        let spec = file.manifest;
        spec.main.validate()?;
        for dep in &spec.dependencies {
            dep.validate()?;
        }
        Ok(spec)
    }

    /// Load a manifest file.
    ///
    /// Fails with [`Error::ManifestNotFound`] if the file does not exist and
    /// [`Error::Manifest`] if the content does not deserialize into a
    /// structurally valid document (including declaration-validation
    /// failures).
    pub fn load(path: &Path) -> Result<ManifestSpec> {
        let content = fs::read_to_string(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                Error::ManifestNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(err)
            }
        })?;
        Self::parse(&content).map_err(|err| Error::Manifest {
            path: path.to_path_buf(),
            details: err.to_string(),
        })
    }

    /// Load a manifest file, substituting an empty default when the file is
    /// missing.
    ///
    /// Parse failures still propagate; only absence is tolerated. Used by the
    /// walkers so that leaf projects without their own manifest are treated
    /// as having an empty dependency list.
    pub fn load_or_default(path: &Path) -> Result<ManifestSpec> {
        match Self::load(path) {
            Err(Error::ManifestNotFound { .. }) => Ok(ManifestSpec::default()),
            other => other,
        }
    }

    /// Save the manifest, creating parent directories as needed.
    ///
    /// Fields left at their zero/absent value are omitted from the serialized
    /// form.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = ManifestFile {
            manifest: self.clone(),
        };
        let content = serde_yaml::to_string(&file)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` if this manifest carries no information beyond the
    /// defaults of a freshly constructed document.
    pub fn is_empty(&self) -> bool {
        *self == ManifestSpec::default()
    }
}

/// A dependency declaration merged with defaults and remote aliases into a
/// concrete project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Project filesystem path, relative to the workspace directory. Never
    /// empty; this is the deduplication key across a traversal.
    pub path: String,
    /// Source URL, if one was declared or resolvable through a remote.
    pub url: Option<String>,
    /// Revision, if one was declared or inherited from the defaults.
    pub revision: Option<String>,
}

impl Project {
    /// Resolve one declaration against `defaults` and `remotes`.
    ///
    /// - `path` falls back to `name`, `revision` falls back to
    ///   `defaults.revision`.
    /// - An explicit `url` is taken verbatim. Otherwise the effective remote
    ///   (declaration first, then defaults) is looked up by name and the URL
    ///   is assembled as `{url_base}/{sub-url-or-name}`. A remote alias
    ///   without `url-base` contributes only the sub-URL. No effective remote
    ///   means no URL, which is not an error by itself.
    /// - When `refurl` is given (the upstream URL of the enclosing project)
    ///   and the resulting URL is relative (starts with `./` or `../`), it is
    ///   resolved against `refurl` with URL join semantics, treating `refurl`
    ///   as a directory base. This lets forks and mirrors of a whole project
    ///   tree resolve consistently without editing every manifest.
    pub fn from_spec(
        defaults: &Defaults,
        remotes: &[Remote],
        spec: &ProjectSpec,
        refurl: Option<&str>,
    ) -> Result<Project> {
        let url = match &spec.url {
            Some(url) => Some(resolve_url(url, refurl)?),
            None => {
                let remote_name = spec.remote.as_deref().or(defaults.remote.as_deref());
                match remote_name {
                    None => None,
                    Some(remote_name) => {
                        let remote = remotes
                            .iter()
                            .find(|remote| remote.name == remote_name)
                            .ok_or_else(|| Error::UnknownRemote {
                                remote: remote_name.to_string(),
                                project: spec.name.clone(),
                            })?;
                        let sub_url = spec.sub_url.as_deref().unwrap_or(&spec.name);
                        let url = match &remote.url_base {
                            Some(url_base) => {
                                format!("{}/{}", url_base.trim_end_matches('/'), sub_url)
                            }
                            None => sub_url.to_string(),
                        };
                        Some(resolve_url(&url, refurl)?)
                    }
                }
            }
        };
        Ok(Project {
            name: spec.name.clone(),
            path: spec.path.clone().unwrap_or_else(|| spec.name.clone()),
            url,
            revision: spec.revision.clone().or_else(|| defaults.revision.clone()),
        })
    }
}

/// Resolve `url` against the upstream URL of the referencing project.
///
/// Absolute URLs (and relative ones when no `refurl` is available) pass
/// through unchanged. `refurl` is treated as a directory, so `../dep4`
/// against `https://example.com/base/dep1` yields
/// `https://example.com/base/dep4`.
fn resolve_url(url: &str, refurl: Option<&str>) -> Result<String> {
    if !(url.starts_with("./") || url.starts_with("../")) {
        return Ok(url.to_string());
    }
    let Some(refurl) = refurl else {
        return Ok(url.to_string());
    };
    let base = Url::parse(&format!("{}/", refurl.trim_end_matches('/')))?;
    let joined = base.join(url)?;
    Ok(joined.to_string().trim_end_matches('/').to_string())
}

/// A predicate over resolved projects.
pub type ProjectFilter = Box<dyn Fn(&Project) -> bool>;

/// Build a predicate selecting projects by an explicit allow-list of paths.
///
/// An empty list accepts all projects.
///
/// # Examples
///
/// ```
/// use polyrepo::manifest::{create_project_filter, Project};
///
/// let filter = create_project_filter(vec!["dep1".to_string()]);
/// let dep1 = Project {
///     name: "dep1".to_string(),
///     path: "dep1".to_string(),
///     url: None,
///     revision: None,
/// };
/// assert!(filter(&dep1));
///
/// let all = create_project_filter(Vec::new());
/// assert!(all(&dep1));
/// ```
pub fn create_project_filter(project_paths: Vec<String>) -> ProjectFilter {
    if project_paths.is_empty() {
        Box::new(|_| true)
    } else {
        Box::new(move |project| project_paths.contains(&project.path))
    }
}

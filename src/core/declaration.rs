//! Parsed module declarations.
//!
//! A [`ModuleDeclaration`] is the structured form of one manifest: its
//! identity, toolchain version, requirements and overrides. Declarations are
//! immutable once built and carry no filesystem state beyond the manifest's
//! location relative to the repository root.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A dependency path, used as the key for requirements and overrides.
///
/// Kept as its own type so that internal module paths and third-party paths
/// are only ever compared whole, never by prefix or concatenation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn new(path: impl Into<String>) -> Self {
        ModulePath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for ModulePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModulePath {
    fn from(s: &str) -> Self {
        ModulePath(s.to_string())
    }
}

impl From<String> for ModulePath {
    fn from(s: String) -> Self {
        ModulePath(s)
    }
}

/// A declared requirement: `path` at `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub path: ModulePath,
    pub version: String,
}

/// The right-hand side of an override.
///
/// A target without a version points at a directory on the local
/// filesystem rather than a versioned artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OverrideTarget {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl OverrideTarget {
    /// A filesystem override pointing at `dir`.
    pub fn local(dir: impl Into<String>) -> Self {
        OverrideTarget {
            path: dir.into(),
            version: None,
        }
    }

    /// An override pinning `path` at `version`.
    pub fn pinned(path: impl Into<String>, version: impl Into<String>) -> Self {
        OverrideTarget {
            path: path.into(),
            version: Some(version.into()),
        }
    }

    /// Whether this target is a local filesystem override.
    pub fn is_local(&self) -> bool {
        self.version.as_deref().map_or(true, str::is_empty)
    }
}

impl fmt::Display for OverrideTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version.as_deref() {
            Some(v) if !v.is_empty() => write!(f, "{} {}", self.path, v),
            _ => f.write_str(&self.path),
        }
    }
}

/// One override entry: "when resolving `original` [at `original_version`],
/// use `target` instead".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Override {
    pub original: ModulePath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_version: Option<String>,
    pub target: OverrideTarget,
}

/// The parsed representation of one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDeclaration {
    /// Module identity, unique within the validated set.
    pub import_path: ModulePath,

    /// Manifest file location relative to the repository root
    /// (e.g. `cmd/ctl/go.mod`).
    pub repo_relative_path: PathBuf,

    /// Declared toolchain version (e.g. `1.21`). Empty when undeclared.
    pub toolchain_version: String,

    /// Optional toolchain name directive. Recorded but not checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<String>,

    pub requirements: Vec<Requirement>,

    pub overrides: Vec<Override>,
}

impl ModuleDeclaration {
    /// Create an empty declaration for `import_path` whose manifest lives at
    /// `repo_relative_path`.
    pub fn new(import_path: impl Into<ModulePath>, repo_relative_path: impl Into<PathBuf>) -> Self {
        ModuleDeclaration {
            import_path: import_path.into(),
            repo_relative_path: repo_relative_path.into(),
            toolchain_version: String::new(),
            toolchain: None,
            requirements: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_toolchain_version(mut self, version: impl Into<String>) -> Self {
        self.toolchain_version = version.into();
        self
    }

    /// Add a requirement.
    pub fn require(mut self, path: impl Into<ModulePath>, version: impl Into<String>) -> Self {
        self.requirements.push(Requirement {
            path: path.into(),
            version: version.into(),
        });
        self
    }

    /// Add an override of any version of `original`.
    pub fn override_with(mut self, original: impl Into<ModulePath>, target: OverrideTarget) -> Self {
        self.overrides.push(Override {
            original: original.into(),
            original_version: None,
            target,
        });
        self
    }

    /// Directory containing the manifest, relative to the repository root.
    /// Empty for the manifest at the root itself.
    pub fn dir(&self) -> &Path {
        self.repo_relative_path.parent().unwrap_or(Path::new(""))
    }

    /// Whether the manifest sits directly at the repository root.
    pub fn is_at_root(&self) -> bool {
        self.dir().as_os_str().is_empty()
    }

    /// The first override declared for `path`, if any.
    pub fn override_for(&self, path: &str) -> Option<&Override> {
        self.overrides.iter().find(|o| o.original.as_str() == path)
    }

    /// Whether `path` appears in this module's requirements.
    pub fn requires(&self, path: &str) -> bool {
        self.requirements.iter().any(|r| r.path.as_str() == path)
    }
}

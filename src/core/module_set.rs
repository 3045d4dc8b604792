//! The internal module set.
//!
//! An [`InternalModuleSet`] owns every declaration found under the
//! repository root and records which one is the core module. It is built
//! once, validated up front, and handed by reference to every checker.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::declaration::{ModuleDeclaration, ModulePath};
use crate::core::error::ConfigError;

/// Every module manifest in the repository, partitioned into the core
/// module and its submodules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalModuleSet {
    /// Repository root, used for display only.
    root: PathBuf,

    /// All declarations in input order.
    modules: Vec<ModuleDeclaration>,

    /// Index of the core module in `modules`.
    core: usize,

    internal_names: BTreeSet<ModulePath>,
}

impl InternalModuleSet {
    /// Assemble the set from parsed declarations.
    ///
    /// Fails if no declaration sits at the root, if import paths collide, if a
    /// manifest location escapes the root, or if any declared version is
    /// malformed.
    pub fn new(
        root: impl Into<PathBuf>,
        declarations: Vec<ModuleDeclaration>,
    ) -> Result<Self, ConfigError> {
        let root = root.into();
        let mut modules: Vec<ModuleDeclaration> = Vec::with_capacity(declarations.len());
        let mut seen: BTreeMap<ModulePath, PathBuf> = BTreeMap::new();
        let mut core: Option<usize> = None;

        for mut decl in declarations {
            decl.repo_relative_path = normalize_manifest_path(&decl)?;
            validate_versions(&decl)?;

            if let Some(first) = seen.get(&decl.import_path) {
                return Err(ConfigError::DuplicateModule {
                    path: decl.import_path.clone(),
                    first: first.clone(),
                    second: decl.repo_relative_path.clone(),
                });
            }
            seen.insert(decl.import_path.clone(), decl.repo_relative_path.clone());

            if decl.is_at_root() {
                if let Some(idx) = core {
                    let first = &modules[idx];
                    return Err(ConfigError::AmbiguousCoreModule {
                        first: first.repo_relative_path.clone(),
                        second: decl.repo_relative_path.clone(),
                    });
                }
                core = Some(modules.len());
            }

            debug!(
                "loaded module {} from {}",
                decl.import_path,
                decl.repo_relative_path.display()
            );
            modules.push(decl);
        }

        let core = core.ok_or_else(|| ConfigError::MissingCoreModule { root: root.clone() })?;
        let internal_names = seen.into_keys().collect();

        Ok(InternalModuleSet {
            root,
            modules,
            core,
            internal_names,
        })
    }

    /// The repository root this set was discovered under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The module whose manifest sits at the repository root.
    pub fn core(&self) -> &ModuleDeclaration {
        &self.modules[self.core]
    }

    /// Import path of the core module.
    pub fn core_path(&self) -> &ModulePath {
        &self.core().import_path
    }

    /// Every module other than the core module, in input order.
    pub fn submodules(&self) -> impl Iterator<Item = &ModuleDeclaration> {
        let core = self.core;
        self.modules
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != core)
            .map(|(_, m)| m)
    }

    /// Every module, core included, in input order.
    pub fn modules(&self) -> &[ModuleDeclaration] {
        &self.modules
    }

    /// Import paths of every internal module.
    pub fn internal_names(&self) -> &BTreeSet<ModulePath> {
        &self.internal_names
    }

    /// Whether `path` names a module inside this repository.
    pub fn is_internal(&self, path: &str) -> bool {
        self.internal_names.contains(path)
    }

    /// Look up a module by import path.
    pub fn get(&self, path: &str) -> Option<&ModuleDeclaration> {
        self.modules.iter().find(|m| m.import_path.as_str() == path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Strip `.` components and reject anything that isn't a plain relative path.
fn normalize_manifest_path(decl: &ModuleDeclaration) -> Result<PathBuf, ConfigError> {
    let mut normalized = PathBuf::new();
    for component in decl.repo_relative_path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ConfigError::MalformedLocalPath {
                    module: decl.import_path.clone(),
                    manifest: decl.repo_relative_path.clone(),
                });
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(ConfigError::MalformedLocalPath {
            module: decl.import_path.clone(),
            manifest: decl.repo_relative_path.clone(),
        });
    }

    Ok(normalized)
}

fn validate_versions(decl: &ModuleDeclaration) -> Result<(), ConfigError> {
    let malformed = |path: &str, version: &str, reason: String| ConfigError::MalformedVersion {
        module: decl.import_path.clone(),
        path: path.to_string(),
        version: version.to_string(),
        reason,
    };

    for req in &decl.requirements {
        parse_module_version(&req.version)
            .map_err(|reason| malformed(req.path.as_str(), &req.version, reason))?;
    }

    for ov in &decl.overrides {
        if let Some(v) = ov.original_version.as_deref().filter(|v| !v.is_empty()) {
            parse_module_version(v).map_err(|reason| malformed(ov.original.as_str(), v, reason))?;
        }
        if let Some(v) = ov.target.version.as_deref().filter(|v| !v.is_empty()) {
            parse_module_version(v).map_err(|reason| malformed(&ov.target.path, v, reason))?;
        }
    }

    Ok(())
}

/// Parse a `v`-prefixed module version such as `v1.2.3` or a pseudo-version.
pub fn parse_module_version(version: &str) -> Result<semver::Version, String> {
    let bare = version
        .strip_prefix('v')
        .ok_or_else(|| "missing `v` prefix".to_string())?;
    semver::Version::parse(bare).map_err(|e| e.to_string())
}

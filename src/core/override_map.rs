//! Canonical override map.
//!
//! The map records, for every dependency path the repository cares about,
//! the one override every module must declare for it:
//!
//! - third-party paths overridden by the core module keep the core's target;
//! - every submodule path resolves to its directory in the local checkout;
//! - the core module path resolves to the repository root.
//!
//! Local entries are stored as repository-relative directories and rendered
//! per consuming module, so modules nested at different depths each get the
//! right number of `../` segments.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::declaration::{ModuleDeclaration, ModulePath, OverrideTarget};
use crate::core::error::ConfigError;
use crate::core::module_set::InternalModuleSet;
use crate::util::fs::relative_path;

/// The expected override for one dependency path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalTarget {
    /// Copied verbatim from the core module's overrides.
    Declared(OverrideTarget),

    /// A directory in the local checkout, relative to the repository root.
    Local { dir: PathBuf },
}

impl CanonicalTarget {
    /// The concrete target `consumer` is expected to declare.
    pub fn resolve_for(&self, consumer: &ModuleDeclaration) -> OverrideTarget {
        match self {
            CanonicalTarget::Declared(target) => target.clone(),
            CanonicalTarget::Local { dir } => OverrideTarget::local(local_target(consumer.dir(), dir)),
        }
    }
}

/// Source-of-truth mapping from dependency path to expected override.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOverrideMap {
    entries: BTreeMap<ModulePath, CanonicalTarget>,
    core_path: ModulePath,
}

impl CanonicalOverrideMap {
    /// Derive the map from the module set.
    ///
    /// Fails only if the core module overrides the same third-party path
    /// twice with different targets.
    pub fn build(set: &InternalModuleSet) -> Result<Self, ConfigError> {
        let core = set.core();
        let mut entries: BTreeMap<ModulePath, CanonicalTarget> = BTreeMap::new();

        for ov in &core.overrides {
            if set.is_internal(ov.original.as_str()) {
                continue;
            }

            if let Some(CanonicalTarget::Declared(existing)) = entries.get(&ov.original) {
                if *existing != ov.target {
                    return Err(ConfigError::ConflictingOverride {
                        path: ov.original.clone(),
                        first: existing.clone(),
                        second: ov.target.clone(),
                    });
                }
                continue;
            }

            entries.insert(ov.original.clone(), CanonicalTarget::Declared(ov.target.clone()));
        }

        for sub in set.submodules() {
            entries.insert(
                sub.import_path.clone(),
                CanonicalTarget::Local {
                    dir: sub.dir().to_path_buf(),
                },
            );
        }

        entries.insert(
            core.import_path.clone(),
            CanonicalTarget::Local { dir: PathBuf::new() },
        );

        debug!("canonical override map has {} entries", entries.len());

        Ok(CanonicalOverrideMap {
            entries,
            core_path: core.import_path.clone(),
        })
    }

    pub fn get(&self, path: &str) -> Option<&CanonicalTarget> {
        self.entries.get(path)
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&ModulePath, &CanonicalTarget)> {
        self.entries.iter()
    }

    /// Whether `path` is the core module's own import path.
    pub fn is_core(&self, path: &str) -> bool {
        self.core_path.as_str() == path
    }

    pub fn core_path(&self) -> &ModulePath {
        &self.core_path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render the filesystem override a module in `consumer_dir` must use to
/// reach `target_dir`, both relative to the repository root.
///
/// The path always goes up to the root first and then down, with `/`
/// separators and a trailing `/`: `../../cmd/ctl/`, `../../`, `./cmd/ctl/`.
pub fn local_target(consumer_dir: &Path, target_dir: &Path) -> String {
    let joined = relative_path(consumer_dir, Path::new("")).join(target_dir);

    let parts: Vec<_> = joined
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let climbs = matches!(joined.components().next(), Some(Component::ParentDir));

    let mut rendered = if climbs {
        parts.join("/")
    } else if parts.is_empty() {
        ".".to_string()
    } else {
        format!("./{}", parts.join("/"))
    };
    rendered.push('/');
    rendered
}

//! Find and parse every module manifest under a repository root.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::{parse_manifest, InternalModuleSet, ModuleDeclaration, MANIFEST_NAME};
use crate::util::fs::{find_manifests, read_to_string};
use crate::util::Config;

/// Options controlling manifest discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// File name of module manifests.
    pub manifest_name: String,

    /// Extra directory names to skip.
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        DiscoveryOptions {
            manifest_name: MANIFEST_NAME.to_string(),
            skip_dirs: Vec::new(),
        }
    }
}

impl From<&Config> for DiscoveryOptions {
    fn from(config: &Config) -> Self {
        DiscoveryOptions {
            manifest_name: config.manifest_name.clone(),
            skip_dirs: config.discovery.skip_dirs.clone(),
        }
    }
}

/// Parse every manifest under `root`. Paths in the returned declarations
/// are relative to `root`.
pub fn load_declarations(root: &Path, opts: &DiscoveryOptions) -> Result<Vec<ModuleDeclaration>> {
    let manifests = find_manifests(root, &opts.manifest_name, &opts.skip_dirs)?;
    debug!("found {} manifests under {}", manifests.len(), root.display());

    let mut declarations = Vec::with_capacity(manifests.len());
    for path in manifests {
        let rel = path
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
        let contents = read_to_string(&path)?;
        declarations.push(parse_manifest(rel, &contents)?);
    }

    Ok(declarations)
}

/// Discover the internal module set under `root`.
pub fn discover(root: &Path, opts: &DiscoveryOptions) -> Result<InternalModuleSet> {
    let declarations = load_declarations(root, opts)?;
    let set = InternalModuleSet::new(root, declarations)?;

    info!(
        "discovered core module {} and {} submodules",
        set.core_path(),
        set.len() - 1
    );

    Ok(set)
}

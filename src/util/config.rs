//! Configuration file support for modcheck.
//!
//! An optional `.modcheck.toml` at the repository root supplies exemptions
//! and discovery settings. Command-line flags are merged on top of it.
//!
//! ```toml
//! manifest-name = "go.mod"
//!
//! [exemptions]
//! direct-import = ["example.com/repo/test/e2e"]
//! no-dummy = ["example.com/repo/cmd/tool"]
//!
//! [discovery]
//! skip-dirs = ["vendor"]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::MANIFEST_NAME;

/// Name of the configuration file looked up at the repository root.
pub const CONFIG_FILE: &str = ".modcheck.toml";

/// modcheck configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// File name of module manifests.
    pub manifest_name: String,

    /// Exemption lists
    pub exemptions: ExemptionsConfig,

    /// Discovery settings
    pub discovery: DiscoveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest_name: MANIFEST_NAME.to_string(),
            exemptions: ExemptionsConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExemptionsConfig {
    /// Modules that may require the core module without a local override.
    pub direct_import: Vec<String>,

    /// Modules that may require internal modules at real versions.
    pub no_dummy: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscoveryConfig {
    /// Extra directory names to skip, on top of hidden and build output
    /// directories.
    pub skip_dirs: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load `.modcheck.toml` from `root`, or defaults if there is none.
    pub fn load_for_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

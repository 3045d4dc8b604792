//! Fatal configuration errors.
//!
//! These stop validation outright: they mean the tool cannot produce a
//! trustworthy answer, not that the repository is inconsistent.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::declaration::{ModulePath, OverrideTarget};
use crate::util::diagnostic::Diagnostic;

/// Error raised while assembling the module set or the override map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("couldn't find the core module: no manifest at the root of `{}`", root.display())]
    MissingCoreModule { root: PathBuf },

    #[error("both `{}` and `{}` claim to be the root manifest", first.display(), second.display())]
    AmbiguousCoreModule { first: PathBuf, second: PathBuf },

    #[error("module `{path}` is declared by both `{}` and `{}`", first.display(), second.display())]
    DuplicateModule {
        path: ModulePath,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("core module overrides `{path}` twice with different targets: `{first}` and `{second}`")]
    ConflictingOverride {
        path: ModulePath,
        first: OverrideTarget,
        second: OverrideTarget,
    },

    #[error("manifest `{}` for `{module}` is not inside the repository root", manifest.display())]
    MalformedLocalPath {
        module: ModulePath,
        manifest: PathBuf,
    },

    #[error("module `{module}` declares `{path}` with malformed version `{version}`: {reason}")]
    MalformedVersion {
        module: ModulePath,
        path: String,
        version: String,
        reason: String,
    },

    #[error("{list} exemption `{module}` doesn't name any internal module")]
    UnknownExemption { list: &'static str, module: String },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ConfigError::MissingCoreModule { .. } => diag
                .with_suggestion("Pass the repository root with `--path`")
                .with_suggestion("Check that the root manifest isn't inside a skipped directory"),
            ConfigError::AmbiguousCoreModule { .. } => {
                diag.with_suggestion("Only one manifest may sit at the repository root")
            }
            ConfigError::DuplicateModule { .. } => {
                diag.with_suggestion("Give every internal module a unique module path")
            }
            ConfigError::ConflictingOverride { path, .. } => diag
                .with_context(format!(
                    "overrides are keyed by module path only; version-qualified overrides such as `replace {} v1.0.0 => ...` are not supported",
                    path
                ))
                .with_suggestion("Keep a single override for each third-party path in the core manifest"),
            ConfigError::MalformedLocalPath { manifest, .. } => diag
                .with_location(manifest.clone())
                .with_suggestion("Manifests must live below the repository root"),
            ConfigError::MalformedVersion { .. } => {
                diag.with_context("versions must be `v`-prefixed semantic versions, e.g. `v1.2.3`")
            }
            ConfigError::UnknownExemption { .. } => {
                diag.with_suggestion("Run `modcheck modules` to list the internal module paths")
            }
        }
    }
}

//! Consistency rules over the internal module set.
//!
//! Each checker is an independent pure function returning every violation it
//! finds. None of them short-circuit, and none depend on another's output.

pub mod consistency;
pub mod dummy;
pub mod purity;
pub mod toolchain;

use std::fmt;

use serde::Serialize;

use crate::core::{ModulePath, OverrideTarget};

pub use consistency::check_override_consistency;
pub use dummy::{check_dummy_versions, DUMMY_VERSION};
pub use purity::check_core_purity;
pub use toolchain::check_toolchain_versions;

/// Category of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    CoreHasLocalOverride,
    OverrideMismatch,
    MissingOverride,
    NonDummyInternalVersion,
    ToolchainVersionMismatch,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::CoreHasLocalOverride => "core_has_local_override",
            ViolationKind::OverrideMismatch => "override_mismatch",
            ViolationKind::MissingOverride => "missing_override",
            ViolationKind::NonDummyInternalVersion => "non_dummy_internal_version",
            ViolationKind::ToolchainVersionMismatch => "toolchain_version_mismatch",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured finding that the manifests disagree.
///
/// Every variant names the offending module and carries both the observed
/// and the expected value, so it renders without further lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The core module declares filesystem overrides. All offending paths
    /// are reported in one violation.
    CoreHasLocalOverride {
        module: ModulePath,
        paths: Vec<ModulePath>,
    },

    /// A module overrides `path` differently from the canonical map.
    OverrideMismatch {
        module: ModulePath,
        path: ModulePath,
        got: OverrideTarget,
        want: OverrideTarget,
        /// Whether `path` is the core module itself.
        targets_core: bool,
    },

    /// A module requires `path` but declares no override for it.
    MissingOverride {
        module: ModulePath,
        path: ModulePath,
        want: OverrideTarget,
        targets_core: bool,
    },

    /// A module requires an internal module at a real version.
    NonDummyInternalVersion {
        module: ModulePath,
        path: ModulePath,
        got: String,
        want: String,
    },

    /// A submodule's toolchain version differs from the core module's.
    ToolchainVersionMismatch {
        module: ModulePath,
        got: String,
        want: String,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::CoreHasLocalOverride { .. } => ViolationKind::CoreHasLocalOverride,
            Violation::OverrideMismatch { .. } => ViolationKind::OverrideMismatch,
            Violation::MissingOverride { .. } => ViolationKind::MissingOverride,
            Violation::NonDummyInternalVersion { .. } => ViolationKind::NonDummyInternalVersion,
            Violation::ToolchainVersionMismatch { .. } => ViolationKind::ToolchainVersionMismatch,
        }
    }

    /// The module whose manifest needs fixing.
    pub fn module(&self) -> &ModulePath {
        match self {
            Violation::CoreHasLocalOverride { module, .. }
            | Violation::OverrideMismatch { module, .. }
            | Violation::MissingOverride { module, .. }
            | Violation::NonDummyInternalVersion { module, .. }
            | Violation::ToolchainVersionMismatch { module, .. } => module,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::CoreHasLocalOverride { module, paths } => {
                let paths: Vec<_> = paths.iter().map(ModulePath::as_str).collect();
                write!(
                    f,
                    "core module `{}` must have no local (filesystem) overrides, but overrides: {}",
                    module,
                    paths.join(", ")
                )
            }
            Violation::OverrideMismatch {
                module,
                got,
                want,
                targets_core: true,
                ..
            } => write!(
                f,
                "module `{}` replaces core with `{}`, expected `{}`. Core overrides must point at the core module",
                module, got, want
            ),
            Violation::OverrideMismatch {
                module,
                path,
                got,
                want,
                targets_core: false,
            } => write!(
                f,
                "module `{}` replaces `{}` with `{}` but expected `{}`. All overrides must match the core manifest",
                module, path, got, want
            ),
            Violation::MissingOverride {
                module,
                path,
                want,
                targets_core: true,
            } => write!(
                f,
                "module `{}` requires the core module `{}` without overriding it. The core module must be replaced with `{}`",
                module, path, want
            ),
            Violation::MissingOverride {
                module,
                path,
                want,
                targets_core: false,
            } => write!(
                f,
                "module `{}` requires `{}` which must be replaced with `{}`, but has no override for it. Submodules must have the same overrides as the core module",
                module, path, want
            ),
            Violation::NonDummyInternalVersion {
                module,
                path,
                got,
                want,
            } => write!(
                f,
                "module `{}` requires internal module `{}` at `{}`; should be `{}`",
                module, path, got, want
            ),
            Violation::ToolchainVersionMismatch { module, got, want } => write!(
                f,
                "module `{}` declares toolchain version `{}` but should declare `{}` to match the core manifest",
                module, got, want
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_messages_distinguish_core() {
        let core = Violation::OverrideMismatch {
            module: "example.com/repo/cmd/ctl".into(),
            path: "example.com/repo".into(),
            got: OverrideTarget::local("../"),
            want: OverrideTarget::local("../../"),
            targets_core: true,
        };
        let msg = core.to_string();
        assert!(msg.contains("replaces core with `../`, expected `../../`"));
        assert!(msg.contains("Core overrides must point at the core module"));

        let third_party = Violation::OverrideMismatch {
            module: "example.com/repo/cmd/ctl".into(),
            path: "example.com/dep".into(),
            got: OverrideTarget::pinned("example.com/dep", "v1.1.2"),
            want: OverrideTarget::pinned("example.com/dep", "v1.0.1"),
            targets_core: false,
        };
        let msg = third_party.to_string();
        assert!(msg.contains("replaces `example.com/dep` with `example.com/dep v1.1.2`"));
        assert!(msg.contains("All overrides must match the core manifest"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let v = Violation::ToolchainVersionMismatch {
            module: "example.com/repo/cmd/ctl".into(),
            got: "1.20".into(),
            want: "1.21".into(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "toolchain_version_mismatch");
        assert_eq!(json["module"], "example.com/repo/cmd/ctl");
        assert_eq!(v.kind().as_str(), "toolchain_version_mismatch");
    }
}

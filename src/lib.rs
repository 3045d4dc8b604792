//! modcheck - dependency override consistency for multi-module repositories
//!
//! This crate inspects every module manifest in a repository and checks that
//! overrides, internal cross-references and toolchain versions agree with
//! the core manifest at the repository root.

pub mod checks;
pub mod core;
pub mod ops;
pub mod util;

/// Test fixtures for modcheck unit tests.
///
/// Only compiled for tests. Provides a small consistent repository that
/// individual tests perturb.
#[cfg(test)]
pub mod test_support;

pub use checks::{Violation, ViolationKind, DUMMY_VERSION};
pub use core::{
    CanonicalOverrideMap, ConfigError, InternalModuleSet, ModuleDeclaration, ModulePath,
    OverrideTarget,
};
pub use ops::{validate, Exemptions, ValidationReport};

//! Core data structures for modcheck.
//!
//! This module contains the types every check works from:
//! - Module declarations and the dependency path key type
//! - go.mod manifest parsing
//! - The internal module set (core module + submodules)
//! - The canonical override map derived from it

pub mod declaration;
pub mod error;
pub mod manifest;
pub mod module_set;
pub mod override_map;

pub use declaration::{ModuleDeclaration, ModulePath, Override, OverrideTarget, Requirement};
pub use error::ConfigError;
pub use manifest::{parse_manifest, ManifestError, ManifestErrorKind, MANIFEST_NAME};
pub use module_set::{parse_module_version, InternalModuleSet};
pub use override_map::{local_target, CanonicalOverrideMap, CanonicalTarget};

//! Test fixtures for modcheck unit tests.
//!
//! Provides a small, fully consistent three-module repository that tests
//! perturb to seed exactly the problem they want to observe.
//!
//! ```text
//! go.mod            example.com/repo            (core)
//! cmd/ctl/go.mod    example.com/repo/cmd/ctl
//! test/e2e/go.mod   example.com/repo/test/e2e
//! ```

pub use crate::checks::DUMMY_VERSION;
use crate::core::{InternalModuleSet, ModuleDeclaration, OverrideTarget};


pub const CORE: &str = "example.com/repo";
pub const CTL: &str = "example.com/repo/cmd/ctl";
pub const E2E: &str = "example.com/repo/test/e2e";
pub const DEP: &str = "example.com/dep";
pub const DEP_FORK: &str = "example.com/dep-fork";
pub const GO_VERSION: &str = "1.21";

/// Declarations for the consistent fixture repository, core first.
pub fn consistent_repo() -> Vec<ModuleDeclaration> {
    let core = ModuleDeclaration::new(CORE, "go.mod")
        .with_toolchain_version(GO_VERSION)
        .require(DEP, "v1.0.0")
        .override_with(DEP, OverrideTarget::pinned(DEP_FORK, "v1.0.1"));

    let ctl = ModuleDeclaration::new(CTL, "cmd/ctl/go.mod")
        .with_toolchain_version(GO_VERSION)
        .require(CORE, DUMMY_VERSION)
        .require(DEP, "v1.0.0")
        .override_with(CORE, OverrideTarget::local("../../"))
        .override_with(DEP, OverrideTarget::pinned(DEP_FORK, "v1.0.1"));

    let e2e = ModuleDeclaration::new(E2E, "test/e2e/go.mod")
        .with_toolchain_version(GO_VERSION)
        .require(CORE, DUMMY_VERSION)
        .require(CTL, DUMMY_VERSION)
        .override_with(CORE, OverrideTarget::local("../../"))
        .override_with(CTL, OverrideTarget::local("../../cmd/ctl/"));

    vec![core, ctl, e2e]
}

/// The consistent fixture repository as a module set.
pub fn consistent_set() -> InternalModuleSet {
    set_of(consistent_repo())
}

/// Build a set rooted at `repo`, panicking on fatal errors.
pub fn set_of(decls: Vec<ModuleDeclaration>) -> InternalModuleSet {
    InternalModuleSet::new("repo", decls).expect("fixture should form a valid module set")
}

/// Replace the declaration for `path` using `edit`.
pub fn edit_module(
    mut decls: Vec<ModuleDeclaration>,
    path: &str,
    edit: impl FnOnce(ModuleDeclaration) -> ModuleDeclaration,
) -> Vec<ModuleDeclaration> {
    if let Some(slot) = decls.iter_mut().find(|d| d.import_path.as_str() == path) {
        *slot = edit(slot.clone());
    }
    decls
}

/// A go.mod file for the core fixture module.
pub fn core_manifest() -> String {
    format!(
        r#"module {CORE}

go {GO_VERSION}

require {DEP} v1.0.0

replace {DEP} => {DEP_FORK} v1.0.1
"#
    )
}

/// A go.mod file for the `cmd/ctl` fixture module.
pub fn ctl_manifest() -> String {
    format!(
        r#"module {CTL}

go {GO_VERSION}

require (
	{CORE} {DUMMY_VERSION}
	{DEP} v1.0.0 // indirect
)

replace {CORE} => ../../

replace {DEP} => {DEP_FORK} v1.0.1
"#
    )
}

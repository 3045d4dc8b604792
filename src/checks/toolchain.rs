//! All modules build with the core module's toolchain version.

use crate::checks::Violation;
use crate::core::ModuleDeclaration;

/// Check that every submodule declares exactly the core toolchain version.
pub fn check_toolchain_versions<'a>(
    core: &ModuleDeclaration,
    submodules: impl IntoIterator<Item = &'a ModuleDeclaration>,
) -> Vec<Violation> {
    submodules
        .into_iter()
        .filter(|s| s.toolchain_version != core.toolchain_version)
        .map(|s| Violation::ToolchainVersionMismatch {
            module: s.import_path.clone(),
            got: s.toolchain_version.clone(),
            want: core.toolchain_version.clone(),
        })
        .collect()
}

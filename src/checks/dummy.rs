//! Internal cross-references must use the placeholder version, so that
//! resolution always goes through a local override.

use std::collections::BTreeSet;

use crate::checks::Violation;
use crate::core::{ModuleDeclaration, ModulePath};

/// The version every internal module must use when requiring another
/// internal module. Anyone importing a submodule from outside the repository
/// gets a resolution error instead of a silently wrong version.
pub const DUMMY_VERSION: &str = "v0.0.0-00010101000000-000000000000";

/// Check that requirements on internal modules use [`DUMMY_VERSION`].
///
/// Modules in `no_dummy` may pin real versions and are skipped entirely.
pub fn check_dummy_versions(
    modules: &[ModuleDeclaration],
    internal_names: &BTreeSet<ModulePath>,
    no_dummy: &BTreeSet<ModulePath>,
) -> Vec<Violation> {
    modules
        .iter()
        .filter(|m| !no_dummy.contains(&m.import_path))
        .flat_map(|m| {
            m.requirements
                .iter()
                .filter(|req| internal_names.contains(&req.path) && req.version != DUMMY_VERSION)
                .map(|req| Violation::NonDummyInternalVersion {
                    module: m.import_path.clone(),
                    path: req.path.clone(),
                    got: req.version.clone(),
                    want: DUMMY_VERSION.to_string(),
                })
        })
        .collect()
}

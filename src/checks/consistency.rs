//! Every module's overrides must agree with the canonical override map.

use std::collections::BTreeSet;

use crate::checks::Violation;
use crate::core::{CanonicalOverrideMap, ModuleDeclaration, ModulePath, OverrideTarget};

/// Check each module's overrides and requirements against `map`.
///
/// - A declared override for a mapped path must match the canonical target.
/// - A required mapped path must be overridden, except that modules in
///   `direct_import` may require the core module without an override.
pub fn check_override_consistency(
    modules: &[ModuleDeclaration],
    map: &CanonicalOverrideMap,
    direct_import: &BTreeSet<ModulePath>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for m in modules {
        for ov in &m.overrides {
            let Some(canonical) = map.get(ov.original.as_str()) else {
                // Extra overrides the core module doesn't have are fine.
                continue;
            };

            let want = canonical.resolve_for(m);
            if !same_target(&ov.target, &want) {
                violations.push(Violation::OverrideMismatch {
                    module: m.import_path.clone(),
                    path: ov.original.clone(),
                    got: ov.target.clone(),
                    want,
                    targets_core: map.is_core(ov.original.as_str()),
                });
            }
        }

        for req in &m.requirements {
            let Some(canonical) = map.get(req.path.as_str()) else {
                continue;
            };
            if m.override_for(req.path.as_str()).is_some() {
                continue;
            }

            let targets_core = map.is_core(req.path.as_str());
            if targets_core && direct_import.contains(&m.import_path) {
                continue;
            }

            violations.push(Violation::MissingOverride {
                module: m.import_path.clone(),
                path: req.path.clone(),
                want: canonical.resolve_for(m),
                targets_core,
            });
        }
    }

    violations
}

fn same_target(a: &OverrideTarget, b: &OverrideTarget) -> bool {
    a.path == b.path && a.version.as_deref().unwrap_or("") == b.version.as_deref().unwrap_or("")
}

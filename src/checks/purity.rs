//! The core module is imported by third parties, so a filesystem override in
//! its manifest would break outside this checkout.

use crate::checks::Violation;
use crate::core::ModuleDeclaration;

/// Report every local-filesystem override in the core module as a single
/// violation listing all offending paths.
pub fn check_core_purity(core: &ModuleDeclaration) -> Vec<Violation> {
    let paths: Vec<_> = core
        .overrides
        .iter()
        .filter(|o| o.target.is_local())
        .map(|o| o.original.clone())
        .collect();

    if paths.is_empty() {
        return Vec::new();
    }

    vec![Violation::CoreHasLocalOverride {
        module: core.import_path.clone(),
        paths,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ModulePath, OverrideTarget};
    use crate::test_support::*;

    #[test]
    fn test_clean_core_has_no_violations() {
        let set = consistent_set();
        assert!(check_core_purity(set.core()).is_empty());
    }

    #[test]
    fn test_single_local_override() {
        let core = consistent_repo()[0]
            .clone()
            .override_with("example.com/x", OverrideTarget::local("./third_party/x"));

        let violations = check_core_purity(&core);
        assert_eq!(
            violations,
            vec![Violation::CoreHasLocalOverride {
                module: CORE.into(),
                paths: vec![ModulePath::from("example.com/x")],
            }]
        );
        assert!(violations[0].to_string().contains("example.com/x"));
    }

    #[test]
    fn test_multiple_local_overrides_are_aggregated() {
        let core = consistent_repo()[0]
            .clone()
            .override_with("example.com/x", OverrideTarget::local("./x"))
            .override_with("example.com/y", OverrideTarget::local("./y"));

        let violations = check_core_purity(&core);
        assert_eq!(violations.len(), 1);
        let Violation::CoreHasLocalOverride { paths, .. } = &violations[0] else {
            panic!("unexpected violation: {:?}", violations[0]);
        };
        assert_eq!(paths.len(), 2);
    }
}

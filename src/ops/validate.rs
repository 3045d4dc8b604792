//! Run every check and collect the results.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::checks::{
    check_core_purity, check_dummy_versions, check_override_consistency,
    check_toolchain_versions, Violation,
};
use crate::core::{CanonicalOverrideMap, ConfigError, InternalModuleSet, ModulePath};

/// Modules allowed to bend the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exemptions {
    /// May require the core module without a local override. Implies
    /// `no_dummy`.
    pub direct_import: BTreeSet<ModulePath>,

    /// May require internal modules at real versions.
    pub no_dummy: BTreeSet<ModulePath>,
}

impl Exemptions {
    pub fn new<I, J, S, T>(direct_import: I, no_dummy: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<ModulePath>,
        T: Into<ModulePath>,
    {
        Exemptions {
            direct_import: direct_import.into_iter().map(Into::into).collect(),
            no_dummy: no_dummy.into_iter().map(Into::into).collect(),
        }
    }

    /// The effective no-dummy set, including direct-import modules.
    pub fn effective_no_dummy(&self) -> BTreeSet<ModulePath> {
        self.no_dummy.union(&self.direct_import).cloned().collect()
    }

    /// Fail if any exemption names a module outside `set`.
    pub fn check_known(&self, set: &InternalModuleSet) -> Result<(), ConfigError> {
        let lists = [
            ("direct-import", &self.direct_import),
            ("no-dummy", &self.no_dummy),
        ];
        for (list, names) in lists {
            if let Some(unknown) = names.iter().find(|n| !set.is_internal(n.as_str())) {
                return Err(ConfigError::UnknownExemption {
                    list,
                    module: unknown.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Number of modules inspected, core included.
    pub modules_checked: usize,

    /// Every violation, grouped by check in a fixed order: core purity,
    /// override consistency, dummy versions, toolchain versions.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Whether the repository passed every check.
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate `set` under `exemptions`.
///
/// Errors are fatal configuration problems; inconsistencies are returned as
/// violations in the report. The four checks are independent and run in
/// parallel, but their results are always concatenated in the same order.
pub fn validate(
    set: &InternalModuleSet,
    exemptions: &Exemptions,
) -> Result<ValidationReport, ConfigError> {
    exemptions.check_known(set)?;

    let map = CanonicalOverrideMap::build(set)?;
    for (path, target) in map.iter() {
        debug!("canonical override: {} => {:?}", path, target);
    }
    let no_dummy = exemptions.effective_no_dummy();

    let ((purity, consistency), (dummy, toolchain)) = rayon::join(
        || {
            rayon::join(
                || check_core_purity(set.core()),
                || check_override_consistency(set.modules(), &map, &exemptions.direct_import),
            )
        },
        || {
            rayon::join(
                || check_dummy_versions(set.modules(), set.internal_names(), &no_dummy),
                || check_toolchain_versions(set.core(), set.submodules()),
            )
        },
    );

    debug!(
        "core purity: {}, override consistency: {}, dummy versions: {}, toolchain versions: {}",
        purity.len(),
        consistency.len(),
        dummy.len(),
        toolchain.len()
    );

    let violations: Vec<_> = [purity, consistency, dummy, toolchain]
        .into_iter()
        .flatten()
        .collect();

    info!(
        "checked {} modules under {}, found {} violations",
        set.len(),
        set.root().display(),
        violations.len()
    );

    Ok(ValidationReport {
        modules_checked: set.len(),
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::ViolationKind;
    use crate::core::OverrideTarget;
    use crate::test_support::*;

    /// One independent problem per check.
    fn seeded_repo() -> Vec<crate::core::ModuleDeclaration> {
        let decls = consistent_repo();
        let decls = edit_module(decls, CORE, |d| {
            d.override_with("example.com/vendored", OverrideTarget::local("./third_party/vendored"))
        });
        let decls = edit_module(decls, CTL, |mut d| {
            d.overrides.retain(|o| o.original.as_str() != DEP);
            d.override_with(DEP, OverrideTarget::pinned(DEP_FORK, "v1.1.2"))
        });
        let decls = edit_module(decls, E2E, |mut d| {
            d.overrides.retain(|o| o.original.as_str() != CORE);
            for req in d.requirements.iter_mut().filter(|r| r.path.as_str() == CTL) {
                req.version = "v1.2.3".into();
            }
            d.with_toolchain_version("1.20")
        });
        decls
    }

    #[test]
    fn test_consistent_repo_is_ok() {
        let report = validate(&consistent_set(), &Exemptions::default()).unwrap();
        assert!(report.ok());
        assert_eq!(report.modules_checked, 3);
    }

    #[test]
    fn test_every_seeded_problem_is_reported() {
        let report = validate(&set_of(seeded_repo()), &Exemptions::default()).unwrap();

        let kinds: Vec<_> = report.violations.iter().map(Violation::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::CoreHasLocalOverride,
                ViolationKind::OverrideMismatch,
                ViolationKind::MissingOverride,
                ViolationKind::NonDummyInternalVersion,
                ViolationKind::ToolchainVersionMismatch,
            ]
        );
        assert!(!report.ok());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let set = set_of(seeded_repo());
        let first = validate(&set, &Exemptions::default()).unwrap();
        let second = validate(&set, &Exemptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_direct_import_implies_no_dummy() {
        let decls = edit_module(consistent_repo(), CTL, |mut d| {
            d.overrides.retain(|o| o.original.as_str() != CORE);
            for req in d.requirements.iter_mut().filter(|r| r.path.as_str() == CORE) {
                req.version = "v1.14.0".into();
            }
            d
        });
        let set = set_of(decls);

        let strict = validate(&set, &Exemptions::default()).unwrap();
        assert_eq!(strict.violations.len(), 2);

        let exempt = Exemptions::new([CTL], Vec::<String>::new());
        let report = validate(&set, &exempt).unwrap();
        assert!(report.ok(), "unexpected violations: {:?}", report.violations);
    }

    #[test]
    fn test_unknown_exemption_is_fatal() {
        let exempt = Exemptions::new(Vec::<String>::new(), ["example.com/typo"]);
        let err = validate(&consistent_set(), &exempt).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownExemption {
                list: "no-dummy",
                module: "example.com/typo".into(),
            }
        );
    }

    #[test]
    fn test_conflicting_core_overrides_are_fatal() {
        let decls = edit_module(consistent_repo(), CORE, |d| {
            d.override_with(DEP, OverrideTarget::pinned(DEP_FORK, "v9.9.9"))
        });
        let err = validate(&set_of(decls), &Exemptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingOverride { .. }));
    }
}

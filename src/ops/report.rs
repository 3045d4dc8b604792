//! Rendering validation results for humans and machines.

use std::path::PathBuf;

use serde_json::json;

use crate::checks::Violation;
use crate::core::InternalModuleSet;
use crate::ops::validate::ValidationReport;
use crate::util::Diagnostic;

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
    /// GitHub Actions annotations
    Github,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "github" | "github-actions" | "gha" => Ok(OutputFormat::Github),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl std::fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid output format '{}', valid values: human, json, github",
            self.0
        )
    }
}

impl std::error::Error for OutputFormatParseError {}

/// Manifest location of the module a violation is about.
fn manifest_of(violation: &Violation, set: &InternalModuleSet) -> Option<PathBuf> {
    set.get(violation.module().as_str())
        .map(|m| m.repo_relative_path.clone())
}

/// Build an actionable diagnostic for one violation.
pub fn violation_diagnostic(violation: &Violation, set: &InternalModuleSet) -> Diagnostic {
    let mut diag = Diagnostic::error(violation.to_string());
    if let Some(manifest) = manifest_of(violation, set) {
        diag = diag.with_location(manifest);
    }

    match violation {
        Violation::CoreHasLocalOverride { .. } => diag.with_suggestion(
            "Pin each of these to a published version, or move the override into the submodules that need it",
        ),
        Violation::OverrideMismatch { path, want, .. } | Violation::MissingOverride { path, want, .. } => {
            diag.with_suggestion(format!("use `replace {} => {}`", path, want))
        }
        Violation::NonDummyInternalVersion { path, want, .. } => {
            diag.with_suggestion(format!("use `require {} {}`", path, want))
        }
        Violation::ToolchainVersionMismatch { want, .. } => {
            diag.with_suggestion(format!("use `go {}`", want))
        }
    }
}

/// Render a report in the requested format.
pub fn format_report(
    report: &ValidationReport,
    set: &InternalModuleSet,
    format: OutputFormat,
    color: bool,
) -> String {
    match format {
        OutputFormat::Human => format_human(report, set, color),
        OutputFormat::Json => format_json(report, set),
        OutputFormat::Github => format_github(report, set),
    }
}

fn format_human(report: &ValidationReport, set: &InternalModuleSet, color: bool) -> String {
    let mut output = String::new();

    for violation in &report.violations {
        output.push_str(&violation_diagnostic(violation, set).format(color));
        output.push('\n');
    }

    if report.ok() {
        output.push_str(&format!(
            "validated {} modules: no violations\n",
            report.modules_checked
        ));
    } else {
        output.push_str(&format!(
            "validation failed: {} violation{} across {} modules\n",
            report.violations.len(),
            if report.violations.len() == 1 { "" } else { "s" },
            report.modules_checked
        ));
    }

    output
}

fn format_json(report: &ValidationReport, set: &InternalModuleSet) -> String {
    let violations: Vec<_> = report
        .violations
        .iter()
        .map(|v| {
            let mut value = serde_json::to_value(v).unwrap_or_else(|_| json!({}));
            if let Some(obj) = value.as_object_mut() {
                obj.insert("message".into(), json!(v.to_string()));
                if let Some(manifest) = manifest_of(v, set) {
                    obj.insert("manifest".into(), json!(manifest.display().to_string()));
                }
            }
            value
        })
        .collect();

    let doc = json!({
        "ok": report.ok(),
        "modules_checked": report.modules_checked,
        "violations": violations,
    });

    let mut output = serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string());
    output.push('\n');
    output
}

fn format_github(report: &ValidationReport, set: &InternalModuleSet) -> String {
    let mut output = String::new();

    for violation in &report.violations {
        let file = manifest_of(violation, set)
            .map(|p| format!("file={},", escape_property(&p.display().to_string())))
            .unwrap_or_default();
        output.push_str(&format!(
            "::error {}title={}::{}\n",
            file,
            violation.kind(),
            escape_data(&violation.to_string())
        ));
    }

    output.push_str(&format!(
        "{} violations across {} modules\n",
        report.violations.len(),
        report.modules_checked
    ));
    output
}

/// Escape workflow command message data.
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape workflow command property values.
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

/// One line per module: import path, manifest, toolchain version.
pub fn format_module_list(set: &InternalModuleSet) -> String {
    let width = set
        .modules()
        .iter()
        .map(|m| m.import_path.as_str().len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for m in set.modules() {
        let marker = if m.import_path == *set.core_path() { " (core)" } else { "" };
        let toolchain = if m.toolchain_version.is_empty() {
            "-"
        } else {
            m.toolchain_version.as_str()
        };
        output.push_str(&format!(
            "{:width$}  {}  go {}{}\n",
            m.import_path,
            m.repo_relative_path.display(),
            toolchain,
            marker,
            width = width
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OverrideTarget;
    use crate::ops::validate::{validate, Exemptions};
    use crate::test_support::*;

    fn failing() -> (InternalModuleSet, ValidationReport) {
        let decls = edit_module(consistent_repo(), CTL, |mut d| {
            d.overrides.retain(|o| o.original.as_str() != CORE);
            d
        });
        let set = set_of(decls);
        let report = validate(&set, &Exemptions::default()).unwrap();
        (set, report)
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("GHA".parse::<OutputFormat>().unwrap(), OutputFormat::Github);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_human_output() {
        let (set, report) = failing();
        let output = format_report(&report, &set, OutputFormat::Human, false);

        assert!(output.contains("error: module `example.com/repo/cmd/ctl` requires the core module"));
        assert!(output.contains("--> cmd/ctl/go.mod"));
        assert!(output.contains("help: use `replace example.com/repo => ../../`"));
        assert!(output.contains("validation failed: 1 violation across 3 modules"));
    }

    #[test]
    fn test_human_output_when_clean() {
        let set = consistent_set();
        let report = validate(&set, &Exemptions::default()).unwrap();
        let output = format_report(&report, &set, OutputFormat::Human, false);
        assert_eq!(output, "validated 3 modules: no violations\n");
    }

    #[test]
    fn test_json_output() {
        let (set, report) = failing();
        let output = format_report(&report, &set, OutputFormat::Json, false);
        let doc: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(doc["ok"], false);
        assert_eq!(doc["modules_checked"], 3);
        let v = &doc["violations"][0];
        assert_eq!(v["kind"], "missing_override");
        assert_eq!(v["path"], CORE);
        assert_eq!(v["want"]["path"], "../../");
        assert_eq!(v["manifest"], "cmd/ctl/go.mod");
        assert!(v["message"].as_str().unwrap().contains("requires the core module"));
    }

    #[test]
    fn test_github_output() {
        let (set, report) = failing();
        let output = format_report(&report, &set, OutputFormat::Github, false);
        assert!(output.starts_with("::error file=cmd/ctl/go.mod,title=missing_override::module"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_data("50%\nnext"), "50%25%0Anext");
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn test_module_list_marks_core() {
        let decls = edit_module(consistent_repo(), E2E, |d| {
            d.override_with("example.com/x", OverrideTarget::pinned("example.com/y", "v1.0.0"))
        });
        let output = format_module_list(&set_of(decls));
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(CORE));
        assert!(lines[0].ends_with("go 1.21 (core)"));
        assert!(lines[1].contains("cmd/ctl/go.mod"));
        assert!(!lines[1].contains("(core)"));
    }
}

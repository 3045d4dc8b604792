//! go.mod manifest parsing.
//!
//! Only the directives the validator needs are interpreted: `module`, `go`,
//! `toolchain`, `require` and `replace`. Other known directives are accepted
//! and skipped. Parsing is pure; callers read the file.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::declaration::{ModuleDeclaration, Override, OverrideTarget, Requirement};

/// File name of a module manifest.
pub const MANIFEST_NAME: &str = "go.mod";

/// Directives that are valid but irrelevant to validation.
const IGNORED_DIRECTIVES: &[&str] = &["exclude", "retract", "godebug", "tool", "ignore"];

/// What went wrong while parsing a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestErrorKind {
    #[error("missing `module` directive")]
    MissingModule,

    #[error("`module` declared more than once")]
    DuplicateModule,

    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    #[error("`{0}` does not take a block")]
    UnexpectedBlock(String),

    #[error("`{0}` block is never closed")]
    UnterminatedBlock(String),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("malformed `{directive}` line: {reason}")]
    Malformed {
        directive: String,
        reason: &'static str,
    },
}

/// Manifest syntax error with source location.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to parse `{name}` (line {line}): {kind}")]
#[diagnostic(code(modcheck::manifest::parse))]
pub struct ManifestError {
    pub name: String,
    pub line: usize,
    pub kind: ManifestErrorKind,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

#[derive(Debug)]
struct Token<'a> {
    text: &'a str,
    offset: usize,
}

/// Parse the manifest stored at `repo_relative_path` (relative to the
/// repository root) with the given contents.
pub fn parse_manifest(
    repo_relative_path: impl Into<PathBuf>,
    contents: &str,
) -> Result<ModuleDeclaration, ManifestError> {
    let repo_relative_path = repo_relative_path.into();
    let name = repo_relative_path.display().to_string();

    let fail = |kind: ManifestErrorKind, line: usize, offset: usize, len: usize| ManifestError {
        name: name.clone(),
        line,
        kind,
        src: NamedSource::new(name.clone(), contents.to_string()),
        span: (offset, len).into(),
    };

    let mut decl = ModuleDeclaration::new(String::new(), repo_relative_path);
    let mut module_seen = false;
    let mut block: Option<(String, usize, usize)> = None;
    let mut line_start = 0;

    for (idx, raw) in contents.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let offset = line_start;
        line_start += raw.len();

        let tokens = tokenize(raw, offset)
            .map_err(|at| fail(ManifestErrorKind::UnterminatedString, line_no, at, 1))?;
        let Some(first) = tokens.first() else {
            continue;
        };

        if block.is_some() && first.text == ")" && tokens.len() == 1 {
            block = None;
            continue;
        }

        let (directive, args) = match &block {
            Some((directive, _, _)) => (directive.clone(), &tokens[..]),
            None => (first.text.to_string(), &tokens[1..]),
        };

        if block.is_none() && args.len() == 1 && args[0].text == "(" {
            if !matches!(directive.as_str(), "require" | "replace")
                && !IGNORED_DIRECTIVES.contains(&directive.as_str())
            {
                let kind = if is_known(&directive) {
                    ManifestErrorKind::UnexpectedBlock(directive)
                } else {
                    ManifestErrorKind::UnknownDirective(directive)
                };
                return Err(fail(kind, line_no, first.offset, first.text.len()));
            }
            block = Some((directive, line_no, first.offset));
            continue;
        }

        let malformed = |reason: &'static str| {
            fail(
                ManifestErrorKind::Malformed {
                    directive: directive.clone(),
                    reason,
                },
                line_no,
                first.offset,
                raw.trim_end().len().saturating_sub(first.offset - offset),
            )
        };

        match directive.as_str() {
            "module" => {
                if module_seen {
                    return Err(fail(
                        ManifestErrorKind::DuplicateModule,
                        line_no,
                        first.offset,
                        first.text.len(),
                    ));
                }
                let [path] = args else {
                    return Err(malformed("expected a single module path"));
                };
                decl.import_path = path.text.into();
                module_seen = true;
            }
            "go" => {
                let [version] = args else {
                    return Err(malformed("expected a single version"));
                };
                decl.toolchain_version = version.text.to_string();
            }
            "toolchain" => {
                let [name] = args else {
                    return Err(malformed("expected a single toolchain name"));
                };
                decl.toolchain = Some(name.text.to_string());
            }
            "require" => {
                let [path, version] = args else {
                    return Err(malformed("expected `<path> <version>`"));
                };
                decl.requirements.push(Requirement {
                    path: path.text.into(),
                    version: version.text.to_string(),
                });
            }
            "replace" => {
                let ov = parse_override(args).map_err(malformed)?;
                decl.overrides.push(ov);
            }
            d if IGNORED_DIRECTIVES.contains(&d) => {}
            _ => {
                return Err(fail(
                    ManifestErrorKind::UnknownDirective(directive.clone()),
                    line_no,
                    first.offset,
                    first.text.len(),
                ));
            }
        }
    }

    if let Some((directive, line, offset)) = block {
        return Err(fail(
            ManifestErrorKind::UnterminatedBlock(directive.clone()),
            line,
            offset,
            directive.len(),
        ));
    }

    if !module_seen {
        return Err(fail(ManifestErrorKind::MissingModule, 1, 0, 0));
    }

    Ok(decl)
}

fn is_known(directive: &str) -> bool {
    matches!(directive, "module" | "go" | "toolchain" | "require" | "replace")
        || IGNORED_DIRECTIVES.contains(&directive)
}

/// `old [version] => new [version]`
fn parse_override(args: &[Token<'_>]) -> Result<Override, &'static str> {
    let arrow = args
        .iter()
        .position(|t| t.text == "=>")
        .ok_or("expected `=>`")?;
    let (lhs, rhs) = (&args[..arrow], &args[arrow + 1..]);

    let (original, original_version) = match lhs {
        [path] => (path.text, None),
        [path, version] => (path.text, Some(version.text.to_string())),
        _ => return Err("expected `<path> [version]` before `=>`"),
    };

    let target = match rhs {
        [dir] => OverrideTarget::local(dir.text),
        [path, version] => OverrideTarget::pinned(path.text, version.text),
        _ => return Err("expected `<path> [version]` after `=>`"),
    };

    Ok(Override {
        original: original.into(),
        original_version,
        target,
    })
}

/// Split one line into tokens, dropping `//` comments. Quoted tokens are
/// returned without their quotes. On an unterminated string, returns the
/// byte offset of the opening quote.
fn tokenize(line: &str, base: usize) -> Result<Vec<Token<'_>>, usize> {
    let mut tokens = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
        } else if bytes[i..].starts_with(b"//") {
            break;
        } else if c == b'"' || c == b'`' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != c {
                if c == b'"' && bytes[end] == b'\\' {
                    end += 1;
                }
                end += 1;
            }
            if end >= bytes.len() {
                return Err(base + i);
            }
            tokens.push(Token {
                text: &line[start..end],
                offset: base + start,
            });
            i = end + 1;
        } else if c == b'(' || c == b')' {
            tokens.push(Token {
                text: &line[i..i + 1],
                offset: base + i,
            });
            i += 1;
        } else {
            let start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'(' | b')')
                && !bytes[i..].starts_with(b"//")
            {
                i += 1;
            }
            tokens.push(Token {
                text: &line[start..i],
                offset: base + start,
            });
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn test_parse_single_line_directives() {
        let decl = parse_manifest("go.mod", &core_manifest()).unwrap();

        assert_eq!(decl.import_path.as_str(), CORE);
        assert_eq!(decl.toolchain_version, GO_VERSION);
        assert_eq!(decl.requirements.len(), 1);
        assert_eq!(decl.requirements[0].path.as_str(), DEP);
        assert_eq!(decl.requirements[0].version, "v1.0.0");
        assert_eq!(
            decl.overrides[0].target,
            OverrideTarget::pinned(DEP_FORK, "v1.0.1")
        );
    }

    #[test]
    fn test_parse_blocks_and_comments() {
        let decl = parse_manifest("cmd/ctl/go.mod", &ctl_manifest()).unwrap();

        assert_eq!(decl.import_path.as_str(), CTL);
        assert_eq!(decl.requirements.len(), 2);
        assert_eq!(decl.requirements[0].version, DUMMY_VERSION);
        assert_eq!(decl.requirements[1].version, "v1.0.0");
        assert_eq!(decl.overrides.len(), 2);
        assert_eq!(decl.overrides[0].target, OverrideTarget::local("../../"));
        assert!(decl.overrides[0].target.is_local());
    }

    #[test]
    fn test_parse_versioned_replace_block() {
        let src = r#"// leading comment
module "example.com/quoted"

go 1.22.1
toolchain go1.22.3

replace (
	example.com/a v1.0.0 => example.com/a-fork v1.0.2
	example.com/b => ./local/b
)

exclude example.com/c v0.1.0
retract (
	v1.0.0 // broken
)
"#;
        let decl = parse_manifest("go.mod", src).unwrap();

        assert_eq!(decl.import_path.as_str(), "example.com/quoted");
        assert_eq!(decl.toolchain.as_deref(), Some("go1.22.3"));
        assert_eq!(decl.overrides.len(), 2);
        assert_eq!(decl.overrides[0].original_version.as_deref(), Some("v1.0.0"));
        assert_eq!(decl.overrides[1].target, OverrideTarget::local("./local/b"));
    }

    #[test]
    fn test_block_paren_without_space() {
        let src = "module example.com/x\n\nrequire(\n\texample.com/y v1.0.0\n)\n\nreplace(\n\texample.com/y => ../y\n)\n";
        let decl = parse_manifest("go.mod", src).unwrap();

        assert_eq!(decl.requirements.len(), 1);
        assert_eq!(decl.requirements[0].path.as_str(), "example.com/y");
        assert_eq!(decl.overrides.len(), 1);
        assert_eq!(decl.overrides[0].target, OverrideTarget::local("../y"));
    }

    #[test]
    fn test_missing_module_directive() {
        let err = parse_manifest("go.mod", "go 1.21\n").unwrap_err();
        assert_eq!(err.kind, ManifestErrorKind::MissingModule);
    }

    #[test]
    fn test_unknown_directive_reports_line() {
        let err = parse_manifest("go.mod", "module example.com/x\n\nfrobnicate yes\n").unwrap_err();
        assert_eq!(err.kind, ManifestErrorKind::UnknownDirective("frobnicate".into()));
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse_manifest("go.mod", "module example.com/x\nrequire (\n\texample.com/y v1.0.0\n")
            .unwrap_err();
        assert_eq!(err.kind, ManifestErrorKind::UnterminatedBlock("require".into()));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_malformed_replace() {
        let err = parse_manifest("go.mod", "module example.com/x\nreplace example.com/y v1.0.0\n")
            .unwrap_err();
        assert!(matches!(err.kind, ManifestErrorKind::Malformed { ref directive, .. } if directive == "replace"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_manifest("go.mod", "module \"example.com/x\n").unwrap_err();
        assert_eq!(err.kind, ManifestErrorKind::UnterminatedString);
    }

    #[test]
    fn test_module_block_is_rejected() {
        let err = parse_manifest("go.mod", "module (\n)\n").unwrap_err();
        assert_eq!(err.kind, ManifestErrorKind::UnexpectedBlock("module".into()));
    }
}

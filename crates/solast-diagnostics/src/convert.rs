// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from each stage's errors to `Diagnostic`.

use solast_builder::{BuildError, BuildWarning, SourceError, WarningKind};

use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Lex and Parse Errors
// ============================================================================

impl ToDiagnostic for solast_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code("E0001")
            .with_primary(self.span, "unexpected character");

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

impl ToDiagnostic for solast_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code("E0100")
            .with_primary(self.span, "here");

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

// ============================================================================
// Build Errors and Warnings
// ============================================================================

impl ToDiagnostic for BuildError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::UnsupportedProduction { translator, rule, span, .. } => {
                Diagnostic::error(format!("unsupported production `{rule}`"))
                    .with_code("E0300")
                    .with_primary(*span, format!("the {translator} translator cannot build this"))
                    .with_note("skipping unsupported productions drops the enclosing member or statement instead")
            }
            BuildError::FunctionTypeName { span, .. } => {
                Diagnostic::error("function type names are not supported")
                    .with_code("E0301")
                    .with_primary(*span, "function type")
                    .with_help("store an address or an interface instead of a function value")
            }
        }
    }
}

impl ToDiagnostic for BuildWarning {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            WarningKind::MalformedLiteral => ("W0400", "read as 0"),
            WarningKind::UnresolvedReference => ("W0401", "no declaration found"),
            WarningKind::TypeNameExpression => ("W0402", "not a number literal"),
        };
        Diagnostic::warning(&self.message)
            .with_code(code)
            .with_primary(self.span, label)
    }
}

/// One diagnostic per error carried by a failed source build.
pub fn source_error_diagnostics(error: &SourceError) -> Vec<Diagnostic> {
    match error {
        SourceError::Lex(errors) => errors.iter().map(ToDiagnostic::to_diagnostic).collect(),
        SourceError::Parse(errors) => errors.iter().map(ToDiagnostic::to_diagnostic).collect(),
        SourceError::Build(error) => vec![error.to_diagnostic()],
    }
}

/// The stage a failed source build stopped in.
pub fn source_error_phase(error: &SourceError) -> &'static str {
    match error {
        SourceError::Lex(_) => "lex",
        SourceError::Parse(_) => "parse",
        SourceError::Build(_) => "build",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use solast_ast::{NodeId, Span};
    use solast_builder::BuildOptions;

    fn code(diag: &Diagnostic) -> &str {
        diag.code.as_ref().map(|c| c.0.as_str()).unwrap_or_default()
    }

    #[test]
    fn warning_codes() {
        let warning = |kind| BuildWarning { kind, node: NodeId(3), span: Span::new(1, 4), message: "m".into() };
        let codes: Vec<String> = [WarningKind::MalformedLiteral, WarningKind::UnresolvedReference, WarningKind::TypeNameExpression]
            .into_iter()
            .map(|kind| code(&warning(kind).to_diagnostic()).to_string())
            .collect();
        assert_eq!(codes, ["W0400", "W0401", "W0402"]);
        let diag = warning(WarningKind::UnresolvedReference).to_diagnostic();
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.primary_span(), Some(Span::new(1, 4)));
    }

    #[test]
    fn function_type_name_is_e0301() {
        let source = "contract C { function (uint256) external f; }";
        let error = solast_builder::build_source(source, BuildOptions::default()).unwrap_err();
        let diags = source_error_diagnostics(&error);
        assert_eq!(diags.len(), 1);
        assert_eq!(code(&diags[0]), "E0301");
        assert_eq!(source_error_phase(&error), "build");
        let span = diags[0].primary_span().unwrap();
        assert_eq!(&source[span.start..span.end], "function (uint256) external");
    }

    #[test]
    fn parse_errors_are_e0100() {
        let error = solast_builder::build_source("contract {", BuildOptions::default()).unwrap_err();
        let diags = source_error_diagnostics(&error);
        assert!(!diags.is_empty());
        assert!(diags.iter().all(|d| code(d) == "E0100" && d.is_error()));
        assert_eq!(source_error_phase(&error), "parse");
    }
}

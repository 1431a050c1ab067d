// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output.
//!
//! `--format json` prints one [`DiagnosticReport`] per run with 1-based
//! line and column positions resolved against the source.

use serde::Serialize;
use solast_ast::LineMap;

use crate::{codes::ErrorCodeRegistry, Diagnostic, LabelStyle, Severity};

#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version.
    pub version: u32,
    pub file: String,
    /// No error diagnostics.
    pub success: bool,
    /// Stage that produced the diagnostics: `lex`, `parse` or `build`.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let lines = SourceLines { source, map: LineMap::new(source) };

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: diagnostics.iter().map(|d| to_json_diagnostic(d, &lines, &registry)).collect(),
        error_count,
        warning_count,
    }
}

pub fn to_json_string(report: &DiagnosticReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

struct SourceLines<'a> {
    source: &'a str,
    map: LineMap,
}

impl SourceLines<'_> {
    fn position(&self, offset: usize) -> LineCol {
        let (line, column) = self.map.offset_to_line_col(offset);
        LineCol { line: line as usize, column: column as usize, byte_offset: offset }
    }

    fn text(&self, line: usize) -> String {
        self.map.line_text(self.source, line as u32).unwrap_or("").to_string()
    }
}

fn to_json_diagnostic(diag: &Diagnostic, lines: &SourceLines<'_>, registry: &ErrorCodeRegistry) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category = code
        .as_deref()
        .and_then(|c| registry.get(c))
        .map(|info| info.category.to_string());

    let location = diag
        .labels
        .iter()
        .find(|l| l.style == LabelStyle::Primary)
        .or(diag.labels.first())
        .map(|l| {
            let at = lines.position(l.span.start);
            SourceLocation {
                line: at.line,
                column: at.column,
                byte_offset: at.byte_offset,
                source_line: lines.text(at.line),
            }
        });

    let labels = diag
        .labels
        .iter()
        .map(|l| {
            let start = lines.position(l.span.start);
            let end = lines.position(l.span.end);
            let source_line = lines.text(start.line);
            JsonLabel { role: l.style, message: l.message.clone(), start, end, source_line }
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solast_ast::Span;

    #[test]
    fn report_counts_and_positions() {
        let source = "contract C {\n    Missing m;\n}\n";
        let start = source.find("Missing").unwrap();
        let diags = vec![
            Diagnostic::warning("unresolved reference `Missing`")
                .with_code("W0401")
                .with_primary(Span::new(start, start + 7), "not declared"),
        ];
        let report = to_json_report(&diags, source, "C.sol", "build");
        assert!(report.success);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.warning_count, 1);

        let diag = &report.diagnostics[0];
        assert_eq!(diag.category.as_deref(), Some("Resolution"));
        let location = diag.location.as_ref().unwrap();
        assert_eq!((location.line, location.column), (2, 5));
        assert_eq!(location.source_line, "    Missing m;");
        assert_eq!(diag.labels[0].end.column, 12);
    }

    #[test]
    fn serialized_shape() {
        let diags = vec![Diagnostic::error("unexpected token").with_code("E0100")];
        let report = to_json_report(&diags, "", "x.sol", "parse");
        let value: serde_json::Value = serde_json::from_str(&to_json_string(&report).unwrap()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["phase"], "parse");
        assert_eq!(value["diagnostics"][0]["severity"], "error");
        assert_eq!(value["diagnostics"][0]["category"], "Syntax");
        assert!(value["diagnostics"][0].get("location").is_none());
    }
}

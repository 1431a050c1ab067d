// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Front-end phase commands: lex, parse.

use colored::Colorize;
use serde_json::json;
use solast_diagnostics::{Diagnostic, ToDiagnostic};

use crate::{exit_on_errors, output, print_json, read_source, show_diagnostics, Format};

pub fn cmd_lex(path: &str, format: Format) {
    let source = read_source(path);
    let result = solast_lexer::tokenize(&source);
    let diags: Vec<Diagnostic> = result.errors.iter().map(|e| e.to_diagnostic()).collect();

    if !result.is_ok() {
        show_diagnostics(&diags, &source, path, "lex", format);
        if format == Format::Human {
            eprintln!("\n{}", output::banner_fail("Lex", diags.len()));
        }
        exit_on_errors(&diags);
    }

    match format {
        Format::Human => {
            println!("{}\n", output::heading(&format!("Tokens ({})", result.tokens.len())));
            for tok in &result.tokens {
                println!("{:4}:{:<3} {:<20} {}", tok.line, tok.column, format!("{:?}", tok.kind), tok.text.dimmed());
            }
            println!("\n{}", output::banner_ok(&format!("Lex: {}", output::count(result.tokens.len(), "token"))));
        }
        Format::Json => {
            let tokens: Vec<_> = result
                .tokens
                .iter()
                .map(|t| {
                    json!({
                        "kind": format!("{:?}", t.kind),
                        "text": t.text,
                        "line": t.line,
                        "column": t.column,
                        "start": t.span.start,
                        "end": t.span.end,
                    })
                })
                .collect();
            print_json(&json!({ "file": path, "tokens": tokens }));
        }
    }
}

pub fn cmd_parse(path: &str, format: Format) {
    let source = read_source(path);
    let (parsed, lex_errors) = solast_parser::parse_source(&source);

    let mut diags: Vec<Diagnostic> = lex_errors.iter().map(|e| e.to_diagnostic()).collect();
    let phase = if diags.is_empty() { "parse" } else { "lex" };
    diags.extend(parsed.errors.iter().map(|e| e.to_diagnostic()));

    if !diags.is_empty() {
        show_diagnostics(&diags, &source, path, phase, format);
        if format == Format::Human {
            eprintln!("\n{}", output::banner_fail("Parse", diags.len()));
        }
        exit_on_errors(&diags);
    }

    match format {
        Format::Human => {
            println!("{}\n", output::heading("Parse tree"));
            print!("{}", parsed.tree.dump());
            println!("\n{}", output::banner_ok("Parse"));
        }
        Format::Json => print_json(&json!({ "file": path, "tree": parsed.tree.dump() })),
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Commands over the typed AST: build, signatures, inspect.

use colored::Colorize;
use serde_json::json;
use solast_ast::visit::walk;
use solast_ast::{Node, NodeRef};
use solast_builder::{build_source, BuildOptions, BuildOutput};
use solast_diagnostics::convert::{source_error_diagnostics, source_error_phase};
use solast_diagnostics::json::to_json_report;
use solast_diagnostics::{Diagnostic, Severity, ToDiagnostic};
use solast_inspect::{InspectOpts, Inspector};
use tracing::debug;

use crate::{exit_on_errors, output, print_json, read_source, show_diagnostics, Format};

/// A successful build and the warnings it produced.
struct Built {
    source: String,
    output: BuildOutput,
    diags: Vec<Diagnostic>,
}

/// Build `path`, or report why it failed and exit.
fn build_or_exit(path: &str, format: Format, options: BuildOptions) -> Built {
    let source = read_source(path);
    match build_source(&source, options) {
        Ok(output) => {
            let mut diags: Vec<Diagnostic> = output.warnings.iter().map(|w| w.to_diagnostic()).collect();
            // skipped productions were tolerated, so they only warn
            diags.extend(output.skipped.iter().map(|e| {
                let mut diag = e.to_diagnostic();
                diag.severity = Severity::Warning;
                diag
            }));
            debug!(nodes = output.node_count, warnings = diags.len(), "built");
            Built { source, output, diags }
        }
        Err(error) => {
            let diags = source_error_diagnostics(&error);
            let phase = source_error_phase(&error);
            show_diagnostics(&diags, &source, path, phase, format);
            if format == Format::Human {
                eprintln!("\n{}", output::banner_fail("Build", diags.len()));
            }
            std::process::exit(1);
        }
    }
}

pub fn cmd_build(path: &str, format: Format, options: BuildOptions) {
    let built = build_or_exit(path, format, options);
    let unit = &built.output.unit;

    match format {
        Format::Human => {
            show_diagnostics(&built.diags, &built.source, path, "build", format);
            println!("{}\n", output::heading(&format!("Typed AST ({} nodes)", built.output.node_count)));
            walk(NodeRef::SourceUnit(unit), &mut |node, depth| print_node(node, depth));
            println!("\n{}", output::banner_ok("Build"));
        }
        Format::Json => {
            let report = to_json_report(&built.diags, &built.source, path, "build");
            print_json(&json!({ "diagnostics": report, "ast": unit }));
        }
    }
    exit_on_errors(&built.diags);
}

fn print_node(node: NodeRef<'_>, depth: usize) {
    let src = node.src();
    let mut line = format!("{}{} #{} {}:{}", "  ".repeat(depth), node.kind(), node.id(), src.line, src.column);
    if let Some(td) = node.type_description() {
        line.push_str(&format!(" {}", output::type_string(&td.type_string)));
    }
    if let Some(target) = node.referenced_declaration() {
        line.push_str(&format!(" {}", format!("-> #{}", target).dimmed()));
    }
    println!("{}", line);
}

pub fn cmd_signatures(path: &str, format: Format, options: BuildOptions) {
    let built = build_or_exit(path, format, options);
    let signatures = built.output.unit.signatures();

    match format {
        Format::Human => {
            show_diagnostics(&built.diags, &built.source, path, "build", format);
            for contract in &signatures {
                println!("{} {}", output::section_header("contract"), contract.name.bold());
                for function in &contract.functions {
                    let outputs: Vec<&str> = function.outputs.iter().map(|p| p.type_string.as_str()).collect();
                    if outputs.is_empty() {
                        println!("  {}", output::command(&function.selector_text()));
                    } else {
                        println!("  {} returns ({})", output::command(&function.selector_text()), outputs.join(","));
                    }
                }
                for event in &contract.events {
                    let inputs: Vec<String> = event
                        .inputs
                        .iter()
                        .map(|p| if p.indexed { format!("{} indexed", p.type_string) } else { p.type_string.clone() })
                        .collect();
                    println!("  event {}({})", output::arg(&event.name), inputs.join(","));
                }
            }
        }
        Format::Json => print_json(&signatures),
    }
    exit_on_errors(&built.diags);
}

pub fn cmd_inspect(path: &str, format: Format, options: BuildOptions, opts: &InspectOpts) {
    let built = build_or_exit(path, format, options);
    let mut registry = solast_inspect::builtin_registry();
    let report = Inspector::new(opts.clone()).with_file(path).inspect(&mut registry, &built.output.unit);

    match format {
        Format::Human => {
            show_diagnostics(&built.diags, &built.source, path, "build", format);
            for (name, findings) in &report.detectors {
                println!("{}", output::heading(name));
                match serde_json::to_string_pretty(findings) {
                    Ok(text) => println!("{}", text),
                    Err(e) => eprintln!("{}: {}", output::error_label(), e),
                }
            }
            println!("\n{}", output::banner_ok(&format!("Inspect: {}", output::count(report.detectors.len(), "detector"))));
        }
        Format::Json => print_json(&report),
    }
    exit_on_errors(&built.diags);
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Solast CLI: inspect each stage of the Solidity front end.

mod commands;
mod output;

use std::env;
use std::fs;
use std::process;

use solast_builder::BuildOptions;
use solast_diagnostics::formatter::DiagnosticFormatter;
use solast_diagnostics::{has_errors, json, Diagnostic};
use solast_inspect::InspectOpts;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for diagnostics and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Human,
    Json,
}

/// A parsed command line.
#[derive(Debug)]
struct Invocation {
    command: String,
    path: Option<String>,
    format: Format,
    build: BuildOptions,
    inspect: InspectOpts,
}

fn main() {
    output::init();
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return;
    }

    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(msg) => {
            eprintln!("{}: {}", output::error_label(), msg);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    let Invocation { command, path, format, build, inspect } = invocation;
    let require_path = |usage: &str| -> String {
        match &path {
            Some(p) => p.clone(),
            None => {
                eprintln!("Usage: solast {} <file.sol> [--format human|json]", usage);
                process::exit(1);
            }
        }
    };

    match command.as_str() {
        "lex" => commands::phase::cmd_lex(&require_path("lex"), format),
        "parse" => commands::phase::cmd_parse(&require_path("parse"), format),
        "build" => commands::analysis::cmd_build(&require_path("build"), format, build),
        "signatures" => commands::analysis::cmd_signatures(&require_path("signatures"), format, build),
        "inspect" => commands::analysis::cmd_inspect(&require_path("inspect"), format, build, &inspect),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => println!("solast {}", VERSION),
        other => {
            // a bare file name builds it
            if other.ends_with(".sol") {
                commands::analysis::cmd_build(other, format, build);
            } else {
                eprintln!("{}: unknown command `{}`", output::error_label(), other);
                eprintln!();
                print_usage();
                process::exit(1);
            }
        }
    }
}

/// Logs go to stderr so `--format json` output stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_env("SOLAST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut iter = args.iter();
    let command = iter.next().cloned().ok_or_else(|| "missing command".to_string())?;
    let mut invocation = Invocation {
        command,
        path: None,
        format: Format::Human,
        build: BuildOptions::default(),
        inspect: InspectOpts::default(),
    };

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--format" => {
                invocation.format = match iter.next().map(String::as_str) {
                    Some("human") => Format::Human,
                    Some("json") => Format::Json,
                    Some(other) => return Err(format!("unknown format `{}`, expected human or json", other)),
                    None => return Err("--format needs a value".to_string()),
                }
            }
            "--json" => invocation.format = Format::Json,
            "--skip-unsupported" => invocation.build = invocation.build.skip_unsupported(),
            "--report-unresolved" => invocation.build.report_unresolved = true,
            "--no-deferred" => invocation.build.resolve_deferred = false,
            "--detector" | "--exclude" => {
                let pattern = iter.next().ok_or_else(|| format!("{} needs a pattern", arg))?.clone();
                if arg == "--detector" {
                    invocation.inspect.detectors.push(pattern);
                } else {
                    invocation.inspect.excludes.push(pattern);
                }
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag `{}`", flag)),
            path => {
                if invocation.path.is_some() {
                    return Err(format!("unexpected argument `{}`", path));
                }
                invocation.path = Some(path.to_string());
            }
        }
    }

    Ok(invocation)
}

fn print_usage() {
    println!("{} {}", output::title("solast"), output::dim(VERSION));
    println!("Semantic front end for Solidity: source to typed AST");
    println!();
    println!("{}", output::section_header("Usage:"));
    println!("  solast {} {} [options]", output::arg("<command>"), output::arg("<file.sol>"));
    println!();
    println!("{}", output::section_header("Commands:"));
    for (name, description) in [
        ("lex", "Tokenize and print tokens"),
        ("parse", "Parse and print the parse tree"),
        ("build", "Build and print the typed AST"),
        ("signatures", "Print each contract's function and event signatures"),
        ("inspect", "Run detectors over the typed AST"),
        ("help", "Show this help"),
        ("version", "Show version"),
    ] {
        println!("{}", output::usage_row(&output::command(name).to_string(), description));
    }
    println!();
    println!("{}", output::section_header("Options:"));
    for (flag, description) in [
        ("--format human|json", "Output format (default human)"),
        ("--skip-unsupported", "Drop unsupported constructs instead of failing"),
        ("--report-unresolved", "Warn about names that never resolve"),
        ("--no-deferred", "Skip the second resolution pass"),
        ("--detector <pattern>", "Run only matching detectors (e.g. info/*)"),
        ("--exclude <pattern>", "Skip matching detectors"),
    ] {
        println!("{}", output::usage_row(&output::arg(flag).to_string(), description));
    }
    println!();
    println!("Set {} to control logging (default warn).", output::arg("SOLAST_LOG"));
}

/// Read a source file or exit with an error.
pub fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e);
            process::exit(1);
        }
    }
}

/// Human diagnostics go to stderr. JSON prints a report to stdout.
pub fn show_diagnostics(diags: &[Diagnostic], source: &str, path: &str, phase: &str, format: Format) {
    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(path);
            for diag in diags {
                eprintln!("{}", formatter.format(diag));
            }
        }
        Format::Json => {
            let report = json::to_json_report(diags, source, path, phase);
            print_json(&report);
        }
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("{}: serializing output: {}", output::error_label(), e);
            process::exit(1);
        }
    }
}

/// Exit with status 1 when any diagnostic is an error.
pub fn exit_on_errors(diags: &[Diagnostic]) {
    if has_errors(diags) {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solast_builder::UnsupportedPolicy;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn build_flags_map_to_options() {
        let invocation =
            parse_args(&args(&["build", "Token.sol", "--skip-unsupported", "--report-unresolved", "--no-deferred"]))
                .unwrap();
        assert_eq!(invocation.command, "build");
        assert_eq!(invocation.path.as_deref(), Some("Token.sol"));
        assert_eq!(invocation.build.on_unsupported, UnsupportedPolicy::Skip);
        assert!(invocation.build.report_unresolved);
        assert!(!invocation.build.resolve_deferred);
        assert_eq!(invocation.format, Format::Human);
    }

    #[test]
    fn format_and_detector_patterns() {
        let invocation =
            parse_args(&args(&["inspect", "--format", "json", "A.sol", "--detector", "info/*", "--exclude", "x/y"]))
                .unwrap();
        assert_eq!(invocation.format, Format::Json);
        assert_eq!(invocation.inspect.detectors, ["info/*"]);
        assert_eq!(invocation.inspect.excludes, ["x/y"]);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(&args(&["build", "--format", "yaml"])).is_err());
        assert!(parse_args(&args(&["build", "--format"])).is_err());
        assert!(parse_args(&args(&["build", "--verbose"])).is_err());
        assert!(parse_args(&args(&["build", "a.sol", "b.sol"])).is_err());
    }
}

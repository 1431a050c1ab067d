// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal styling for the CLI.
//!
//! Honours NO_COLOR and FORCE_COLOR; otherwise `colored` decides from the
//! terminal.

use colored::{ColoredString, Colorize};

/// Apply the color environment variables. Call once at startup.
pub fn init() {
    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    } else if std::env::var_os("FORCE_COLOR").is_some() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

/// `1 error`, `3 errors`.
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// `=== text ===` with dimmed rules.
pub fn heading(text: &str) -> String {
    format!("{} {} {}", "===".dimmed(), text, "===".dimmed())
}

pub fn banner_ok(stage: &str) -> String {
    heading(&format!("{stage} OK").green().bold().to_string())
}

pub fn banner_fail(stage: &str, errors: usize) -> String {
    heading(&format!("{stage} FAILED: {}", count(errors, "error")).red().bold().to_string())
}

/// One `name  description` row of the usage text.
pub fn usage_row(name: &str, description: &str) -> String {
    format!("  {:<22} {}", name, description)
}

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn dim(text: &str) -> ColoredString {
    text.dimmed()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

pub fn type_string(ty: &str) -> ColoredString {
    ty.cyan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pluralize() {
        assert_eq!(count(1, "error"), "1 error");
        assert_eq!(count(0, "warning"), "0 warnings");
        assert_eq!(count(2, "detector"), "2 detectors");
    }
}

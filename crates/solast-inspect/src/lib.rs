// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Detectors over a finished AST.
//!
//! A [`Detector`] watches a [`SourceUnit`] through three walks (enter,
//! detect, exit) and reports its findings as JSON. Detectors live in a
//! [`DetectorRegistry`] the caller builds once and hands to the
//! [`Inspector`].

pub mod detector;
pub mod inspector;
pub mod registry;
pub mod state_variables;
pub mod types;

pub use detector::{Detector, DetectorType};
pub use inspector::Inspector;
pub use registry::{DetectorRegistry, RegistryError};
pub use state_variables::StateVariableDetector;
pub use types::{InspectOpts, InspectionReport};

use solast_ast::decl::SourceUnit;

/// Registry holding every built-in detector.
pub fn builtin_registry() -> DetectorRegistry {
    let mut registry = DetectorRegistry::new();
    // a fresh registry has no conflicts
    let _ = registry.register(Box::new(StateVariableDetector::new()));
    registry
}

/// Run the built-in detectors selected by `opts` over `unit`.
pub fn inspect(unit: &SourceUnit, file: &str, opts: &InspectOpts) -> InspectionReport {
    let mut registry = builtin_registry();
    Inspector::new(opts.clone()).with_file(file).inspect(&mut registry, unit)
}

/// Serialize an inspection report to JSON.
pub fn report_json(report: &InspectionReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

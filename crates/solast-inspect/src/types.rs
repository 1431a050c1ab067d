// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Output types for inspection.

use std::collections::BTreeMap;

use serde::Serialize;

/// Findings of every detector that ran, keyed by detector name.
#[derive(Debug, Serialize)]
pub struct InspectionReport {
    pub version: u32,
    pub file: String,
    pub detectors: BTreeMap<String, serde_json::Value>,
}

impl InspectionReport {
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.detectors.get(name)
    }
}

/// Which detectors to run.
#[derive(Debug, Default, Clone)]
pub struct InspectOpts {
    /// Run only detectors matching these patterns (e.g. `info/*`).
    pub detectors: Vec<String>,
    /// Skip detectors matching these patterns.
    pub excludes: Vec<String>,
}

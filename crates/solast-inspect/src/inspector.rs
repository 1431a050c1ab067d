// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Drives registered detectors over a tree.

use std::collections::BTreeMap;

use solast_ast::decl::SourceUnit;
use solast_ast::NodeRef;
use tracing::{debug, trace};

use crate::detector::Detector;
use crate::registry::DetectorRegistry;
use crate::types::{InspectOpts, InspectionReport};

#[derive(Debug, Clone, Copy)]
enum Phase {
    Enter,
    Detect,
    Exit,
}

#[derive(Debug, Default)]
pub struct Inspector {
    opts: InspectOpts,
    file: String,
}

impl Inspector {
    pub fn new(opts: InspectOpts) -> Self {
        Self { opts, file: String::new() }
    }

    /// File name recorded in the report.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Run every selected detector over `unit`. Findings from an earlier
    /// run are discarded first.
    pub fn inspect(&self, registry: &mut DetectorRegistry, unit: &SourceUnit) -> InspectionReport {
        let root = NodeRef::SourceUnit(unit);
        let mut detectors = BTreeMap::new();

        for detector in registry.selected_mut(&self.opts) {
            debug!(detector = detector.name(), "inspecting");
            detector.reset();
            for phase in [Phase::Enter, Phase::Detect, Phase::Exit] {
                walk(detector.as_mut(), root, phase);
            }
            detectors.insert(detector.name().to_string(), detector.results());
        }

        InspectionReport { version: 1, file: self.file.clone(), detectors }
    }
}

fn walk(detector: &mut dyn Detector, node: NodeRef<'_>, phase: Phase) {
    let descend = match phase {
        Phase::Enter => detector.enter(node),
        Phase::Detect => detector.detect(node),
        Phase::Exit => detector.exit(node),
    };
    if !descend {
        trace!(detector = detector.name(), ?phase, "pruned");
        return;
    }
    for child in node.children() {
        walk(detector, child, phase);
    }
}

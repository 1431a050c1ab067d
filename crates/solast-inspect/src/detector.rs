// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The detector interface.

use std::fmt;

use serde::Serialize;
use solast_ast::NodeRef;

/// Registry key of a detector, `category/name` (e.g. `info/state-variables`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DetectorType(pub &'static str);

impl DetectorType {
    pub const STATE_VARIABLES: DetectorType = DetectorType("info/state-variables");

    pub fn as_str(self) -> &'static str {
        self.0
    }

    /// The part before `/`, or the whole key.
    pub fn category(self) -> &'static str {
        self.0.split('/').next().unwrap_or(self.0)
    }
}

impl fmt::Display for DetectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Something that inspects a finished tree.
///
/// The inspector walks the tree three times, pre-order, calling `enter`,
/// then `detect`, then `exit` on every node. A hook returning `false`
/// skips that node's children for the rest of the walk. Each walk is
/// complete before the next starts, so `detect` can rely on everything
/// `enter` collected.
pub trait Detector {
    fn name(&self) -> &str;

    fn detector_type(&self) -> DetectorType;

    fn enter(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }

    fn detect(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }

    fn exit(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }

    fn results(&self) -> serde_json::Value;

    /// Forget findings from an earlier run.
    fn reset(&mut self) {}
}

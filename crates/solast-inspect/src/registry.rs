// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Detector registry and selection.

use thiserror::Error;
use tracing::debug;

use crate::detector::{Detector, DetectorType};
use crate::types::InspectOpts;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a detector of type `{0}` is already registered")]
    AlreadyRegistered(DetectorType),
}

/// Detectors keyed by type, kept in registration order.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) -> Result<(), RegistryError> {
        let detector_type = detector.detector_type();
        if self.contains(detector_type) {
            return Err(RegistryError::AlreadyRegistered(detector_type));
        }
        debug!(%detector_type, name = detector.name(), "registered detector");
        self.detectors.push(detector);
        Ok(())
    }

    pub fn contains(&self, detector_type: DetectorType) -> bool {
        self.get(detector_type).is_some()
    }

    pub fn get(&self, detector_type: DetectorType) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.detector_type() == detector_type)
            .map(|d| d.as_ref())
    }

    pub fn get_mut(&mut self, detector_type: DetectorType) -> Option<&mut (dyn Detector + 'static)> {
        self.detectors
            .iter_mut()
            .find(|d| d.detector_type() == detector_type)
            .map(|d| d.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Detectors `opts` selects, in registration order.
    pub(crate) fn selected_mut<'a>(
        &'a mut self,
        opts: &'a InspectOpts,
    ) -> impl Iterator<Item = &'a mut Box<dyn Detector>> + 'a {
        self.detectors
            .iter_mut()
            .filter(move |d| should_run(d.detector_type(), opts))
    }
}

/// Check if a detector should run based on include/exclude filters.
pub(crate) fn should_run(detector_type: DetectorType, opts: &InspectOpts) -> bool {
    // Exclude takes priority
    if opts.excludes.iter().any(|p| matches_type(detector_type, p)) {
        return false;
    }
    opts.detectors.is_empty() || opts.detectors.iter().any(|p| matches_type(detector_type, p))
}

/// Exact match, or `category/*` for every detector in a category.
fn matches_type(detector_type: DetectorType, pattern: &str) -> bool {
    if pattern == detector_type.as_str() {
        return true;
    }
    match pattern.strip_suffix("/*") {
        Some(prefix) => detector_type.category() == prefix,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solast_ast::NodeRef;

    struct Counter {
        kind: DetectorType,
        seen: usize,
    }

    impl Detector for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn detector_type(&self) -> DetectorType {
            self.kind
        }

        fn detect(&mut self, _node: NodeRef<'_>) -> bool {
            self.seen += 1;
            true
        }

        fn results(&self) -> serde_json::Value {
            serde_json::json!(self.seen)
        }
    }

    fn counter(kind: &'static str) -> Box<dyn Detector> {
        Box::new(Counter { kind: DetectorType(kind), seen: 0 })
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let mut registry = DetectorRegistry::new();
        registry.register(counter("info/a")).unwrap();
        let err = registry.register(counter("info/a")).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered(DetectorType("info/a")));
        assert_eq!(err.to_string(), "a detector of type `info/a` is already registered");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registration_order_is_kept() {
        let mut registry = DetectorRegistry::new();
        for kind in ["token/b", "info/a", "token/c"] {
            registry.register(counter(kind)).unwrap();
        }
        let order: Vec<_> = registry.iter().map(|d| d.detector_type().as_str()).collect();
        assert_eq!(order, ["token/b", "info/a", "token/c"]);
        assert!(registry.contains(DetectorType("info/a")));
        assert!(registry.get(DetectorType("info/z")).is_none());
    }

    #[test]
    fn selection_patterns() {
        let kind = DetectorType("info/state-variables");
        let opts = |detectors: &[&str], excludes: &[&str]| InspectOpts {
            detectors: detectors.iter().map(|s| s.to_string()).collect(),
            excludes: excludes.iter().map(|s| s.to_string()).collect(),
        };
        assert!(should_run(kind, &InspectOpts::default()));
        assert!(should_run(kind, &opts(&["info/*"], &[])));
        assert!(should_run(kind, &opts(&["info/state-variables"], &[])));
        assert!(!should_run(kind, &opts(&["token/*"], &[])));
        assert!(!should_run(kind, &opts(&["info/*"], &["info/state-variables"])));
    }
}

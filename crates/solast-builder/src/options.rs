// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Build configuration.

/// What to do when a translator meets a production it cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Fail the whole build with the [`crate::BuildError`].
    #[default]
    Abort,
    /// Drop the enclosing member or statement, record the error and go on.
    Skip,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub on_unsupported: UnsupportedPolicy,
    /// Emit a warning for every name left unresolved after the build.
    pub report_unresolved: bool,
    /// Retry unresolved references once every declaration is known.
    pub resolve_deferred: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            on_unsupported: UnsupportedPolicy::Abort,
            report_unresolved: false,
            resolve_deferred: true,
        }
    }
}

impl BuildOptions {
    pub fn skip_unsupported(mut self) -> Self {
        self.on_unsupported = UnsupportedPolicy::Skip;
        self
    }
}

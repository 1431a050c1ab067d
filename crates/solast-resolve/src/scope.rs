// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration scopes.

use std::collections::HashMap;

use solast_ast::NodeId;

/// Which scope a declaration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// Top level of the source unit.
    File,
    /// Members of a contract, struct or enum.
    Node(NodeId),
}

/// Names bound in one scope. Each name maps to declaration slots in
/// declaration order; several slots mean an overload set.
#[derive(Debug, Default)]
pub struct Scope {
    pub bindings: HashMap<String, Vec<usize>>,
    /// Base contracts as written (`is A, B`). Empty for non-contracts.
    pub bases: Vec<NodeId>,
}

impl Scope {
    pub fn bind(&mut self, name: &str, slot: usize) {
        self.bindings.entry(name.to_string()).or_default().push(slot);
    }

    pub fn lookup(&self, name: &str) -> Option<&[usize]> {
        self.bindings.get(name).map(Vec::as_slice).filter(|slots| !slots.is_empty())
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Typed AST for Solidity source units.
//!
//! This crate defines the node model produced by the builder, the type
//! description model shared by every node, and the tokens the lexer hands
//! to the parser.

pub mod span;
pub mod token;
pub mod types;
pub mod node;
pub mod decl;
pub mod type_name;
pub mod expr;
pub mod stmt;
pub mod visit;
pub mod signature;

pub use node::{Node, NodeKind, NodeRef};
pub use span::{LineMap, Span, SrcNode};
pub use types::{StateMutability, TypeDescription, TypeTable};

/// Unique identifier for AST nodes.
///
/// Identifiers are handed out by a single [`IdAllocator`] per build, so
/// every node in one source unit has a distinct, strictly positive id.
/// `NodeId::ROOT` (zero) never names a node; it is the parent of roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic node id source. Starts at 1.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), NodeId(1));
        assert_eq!(ids.next_id(), NodeId(2));
        assert_eq!(ids.next_id(), NodeId(3));
        assert_eq!(ids.allocated(), 3);
    }

    #[test]
    fn root_sentinel_is_never_allocated() {
        let mut ids = IdAllocator::new();
        for _ in 0..100 {
            assert!(!ids.next_id().is_root());
        }
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolution error types.

use solast_ast::NodeId;
use thiserror::Error;

/// Errors raised while registering declarations.
///
/// Failed lookups are not errors: [`crate::Resolve::resolve`] returns
/// `None` and the caller decides what an unresolved name means.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("node {id} is already declared as `{name}`")]
    AlreadyDeclared { id: NodeId, name: String },

    #[error("no declaration with id {0}")]
    UnknownDeclaration(NodeId),

    #[error("`{name}` cannot inherit from itself")]
    SelfInheritance { name: String },
}

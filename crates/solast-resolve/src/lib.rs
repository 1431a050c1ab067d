// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Reference resolution for Solidity declarations.
//!
//! The builder asks a [`Resolve`] implementation which declaration a name
//! refers to and what type it has. Declarations are registered through
//! [`Declare`] while the tree is being built, so a lookup that fails early
//! (a forward reference) can succeed when retried later.

mod declaration;
mod error;
mod scope;
mod table;

pub use declaration::{Declaration, DeclarationKind};
pub use error::ResolveError;
pub use scope::ScopeKey;
pub use table::DeclarationTable;

use solast_ast::{NodeId, TypeDescription};

/// A name lookup on behalf of `node`.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    /// The node asking. Only used for tracing.
    pub node: NodeId,
    /// Bare identifier or dotted path (`Lib.Point`).
    pub name: &'a str,
    /// Contract whose members and bases are searched before file scope.
    pub contract: Option<NodeId>,
}

impl<'a> Request<'a> {
    pub fn new(node: NodeId, name: &'a str, contract: Option<NodeId>) -> Self {
        Self { node, name, contract }
    }
}

/// The declaration a name resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub declaration: NodeId,
    pub kind: DeclarationKind,
    /// Absent while the declaration's own type is still unknown.
    pub type_description: Option<TypeDescription>,
    /// Every declaration sharing the name in the winning scope, when more
    /// than one does (function, event and error overloads).
    pub overloaded_declarations: Vec<NodeId>,
}

/// Read side of a symbol table.
pub trait Resolve {
    /// Best matching declaration for `request.name`, innermost scope first.
    fn resolve(&self, request: &Request<'_>) -> Option<Resolution>;

    /// Member `member` of the declaration `container`: a struct member, an
    /// enum value, or a contract member including inherited ones.
    fn resolve_member(&self, container: NodeId, member: &str) -> Option<Resolution>;
}

/// Write side of a symbol table.
pub trait Declare {
    fn declare(&mut self, declaration: Declaration) -> Result<(), ResolveError>;

    /// Record the base contracts of `contract`, in the order written.
    fn declare_bases(&mut self, contract: NodeId, bases: Vec<NodeId>) -> Result<(), ResolveError>;

    /// Fill in or replace the type of an already declared node.
    fn update_type(&mut self, declaration: NodeId, type_description: TypeDescription) -> Result<(), ResolveError>;
}

/// A full symbol table, as the builder needs it.
pub trait SymbolTable: Resolve + Declare {}

impl<T: Resolve + Declare> SymbolTable for T {}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declarations known to the resolver.

use solast_ast::{NodeId, TypeDescription};

use crate::scope::ScopeKey;

/// What a declaration declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Contract,
    Function,
    Modifier,
    Event,
    Error,
    StateVariable,
    Variable,
    Struct,
    StructMember,
    Enum,
    EnumValue,
    UserDefinedValueType,
    ImportAlias,
}

impl DeclarationKind {
    /// Kinds that may share a name within one scope.
    pub fn is_overloadable(self) -> bool {
        matches!(self, DeclarationKind::Function | DeclarationKind::Event | DeclarationKind::Error)
    }

    /// Kinds that open a member scope of their own.
    pub fn has_members(self) -> bool {
        matches!(
            self,
            DeclarationKind::Contract | DeclarationKind::Struct | DeclarationKind::Enum | DeclarationKind::ImportAlias
        )
    }
}

/// A named declaration in the source unit.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: NodeId,
    pub name: String,
    pub kind: DeclarationKind,
    /// Enclosing contract, struct or enum. `None` is file scope.
    pub scope: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
}

impl Declaration {
    pub fn new(id: NodeId, name: impl Into<String>, kind: DeclarationKind, scope: Option<NodeId>) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            scope,
            type_description: None,
        }
    }

    pub fn with_type(mut self, type_description: Option<TypeDescription>) -> Self {
        self.type_description = type_description;
        self
    }

    pub(crate) fn scope_key(&self) -> ScopeKey {
        self.scope.map_or(ScopeKey::File, ScopeKey::Node)
    }
}

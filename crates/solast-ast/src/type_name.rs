// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type name nodes.

use crate::{NodeId, NodeKind, SrcNode, StateMutability, TypeDescription};

/// A type as written in source.
///
/// One struct covers every spelling; `node_type` tells which fields are
/// meaningful:
///
/// - `ElementaryTypeName`: `name`, `state_mutability` for addresses
/// - `MappingTypeName`: `key_type`, `value_type`
/// - `ArrayTypeName`: `base_type`, `length`
/// - `UserDefinedTypeName`: `path_node`, `referenced_declaration`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeName {
    pub id: NodeId,
    pub node_type: NodeKind,
    pub src: SrcNode,
    pub name: String,
    pub type_description: Option<TypeDescription>,
    pub key_type: Option<Box<TypeName>>,
    pub value_type: Option<Box<TypeName>>,
    pub base_type: Option<Box<TypeName>>,
    /// Literal array length; `None` for dynamic arrays.
    pub length: Option<String>,
    pub path_node: Option<PathNode>,
    pub state_mutability: Option<StateMutability>,
    pub referenced_declaration: Option<NodeId>,
}

impl TypeName {
    pub fn new(id: NodeId, src: SrcNode, name: impl Into<String>) -> Self {
        Self {
            id,
            node_type: NodeKind::ElementaryTypeName,
            src,
            name: name.into(),
            type_description: None,
            key_type: None,
            value_type: None,
            base_type: None,
            length: None,
            path_node: None,
            state_mutability: None,
            referenced_declaration: None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        self.node_type == NodeKind::MappingTypeName
    }

    pub fn is_array(&self) -> bool {
        self.node_type == NodeKind::ArrayTypeName
    }

    /// Point this type name, and its path node if any, at a declaration.
    pub fn set_reference(&mut self, declaration: NodeId, td: Option<TypeDescription>) {
        self.referenced_declaration = Some(declaration);
        if let Some(path) = &mut self.path_node {
            path.referenced_declaration = Some(declaration);
        }
        if td.is_some() {
            self.type_description = td;
        }
    }
}

/// Dotted name of a user-defined type, e.g. `IERC20` or `Lib.Point`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeKind,
    pub src: SrcNode,
    pub referenced_declaration: Option<NodeId>,
}

impl PathNode {
    pub fn new(id: NodeId, name: impl Into<String>, src: SrcNode) -> Self {
        Self {
            id,
            name: name.into(),
            node_type: NodeKind::IdentifierPath,
            src,
            referenced_declaration: None,
        }
    }
}

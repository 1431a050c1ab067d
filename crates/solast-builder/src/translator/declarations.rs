// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Variable, parameter and user-defined type declarations.

use solast_ast::decl::{
    EnumDefinition, EnumValue, ErrorDefinition, EventDefinition, ParameterList, StorageLocation, StructDefinition,
    UserDefinedValueTypeDefinition, UsingForDirective, VariableDeclaration, Visibility,
};
use solast_ast::token::{Token, TokenKind};
use solast_ast::types::{Composite, DeclaredKind};
use solast_ast::{NodeId, StateMutability, TypeDescription};
use solast_parser::{Production, Rule};
use solast_resolve::{Declaration, DeclarationKind};

use super::{Cx, Translator};
use crate::error::BuildError;

/// A direct `( ... )` group of a production and the productions inside it.
/// A `ParameterList` inside the group is flattened into its parameters.
pub(super) struct ParenGroup<'p> {
    pub open: &'p Token,
    pub close: &'p Token,
    pub items: Vec<&'p Production>,
}

pub(super) fn paren_groups(p: &Production) -> Vec<ParenGroup<'_>> {
    let mut groups = Vec::new();
    let mut open = None;
    let mut items = Vec::new();
    for child in &p.children {
        if let Some(token) = child.as_terminal() {
            match token.kind {
                TokenKind::LParen => open = Some(token),
                TokenKind::RParen => {
                    if let Some(open) = open.take() {
                        groups.push(ParenGroup { open, close: token, items: std::mem::take(&mut items) });
                    }
                }
                _ => {}
            }
        } else if let Some(node) = child.as_node() {
            if open.is_none() {
                continue;
            }
            if node.rule == Rule::ParameterList {
                items.extend(node.nodes());
            } else {
                items.push(node);
            }
        }
    }
    groups
}

pub(super) fn visibility_of(p: &Production) -> Visibility {
    p.terminals()
        .find_map(|t| match t.kind {
            TokenKind::Public => Some(Visibility::Public),
            TokenKind::Private => Some(Visibility::Private),
            TokenKind::Internal => Some(Visibility::Internal),
            TokenKind::External => Some(Visibility::External),
            _ => None,
        })
        .unwrap_or_default()
}

pub(super) fn mutability_of(p: &Production) -> StateMutability {
    p.terminals()
        .find_map(|t| match t.kind {
            TokenKind::Pure => Some(StateMutability::Pure),
            TokenKind::View => Some(StateMutability::View),
            TokenKind::Payable => Some(StateMutability::Payable),
            _ => None,
        })
        .unwrap_or_default()
}

fn storage_location_of(p: &Production) -> StorageLocation {
    p.terminals()
        .find_map(|t| match t.kind {
            TokenKind::Memory => Some(StorageLocation::Memory),
            TokenKind::Storage => Some(StorageLocation::Storage),
            TokenKind::Calldata => Some(StorageLocation::Calldata),
            _ => None,
        })
        .unwrap_or_default()
}

impl Translator<'_> {
    /// State variables and file-level constants.
    pub(super) fn translate_state_variable(&mut self, p: &Production, parent: NodeId) -> Result<VariableDeclaration, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let name = p.identifier().unwrap_or_default().to_string();
        let type_name = match p.child(Rule::TypeName) {
            Some(t) => self.translate_type_name(t, id)?,
            None => return Err(Self::unsupported("VariableDeclaration", p)),
        };
        let type_description = type_name.type_description.clone();

        let scope = self.contract_id();
        let kind = if scope.is_some() { DeclarationKind::StateVariable } else { DeclarationKind::Variable };
        self.declare(Declaration::new(id, &name, kind, scope).with_type(type_description.clone()));

        let value = match p.nodes().find(|n| n.rule.is_expression()) {
            Some(e) => Some(self.translate_expression(e, &Cx::new(id))?),
            None => None,
        };

        Ok(VariableDeclaration {
            id,
            src,
            name,
            type_name: Some(type_name),
            type_description,
            storage_location: StorageLocation::Default,
            visibility: match visibility_of(p) {
                Visibility::Default => Visibility::Internal,
                v => v,
            },
            state_variable: scope.is_some(),
            constant: p.has_terminal(&TokenKind::Constant),
            immutable: p.has_terminal(&TokenKind::Immutable),
            indexed: false,
            value,
            scope: scope.unwrap_or(NodeId::ROOT),
        })
    }

    /// `Type [location | indexed] [name]`: parameters, event and error
    /// parameters, struct members and local variables.
    pub(super) fn translate_parameter(&mut self, p: &Production, parent: NodeId, scope: NodeId) -> Result<VariableDeclaration, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let type_name = match p.child(Rule::TypeName) {
            Some(t) => self.translate_type_name(t, id)?,
            None => return Err(Self::unsupported("VariableDeclaration", p)),
        };
        Ok(VariableDeclaration {
            id,
            src,
            name: p.identifier().unwrap_or_default().to_string(),
            type_description: type_name.type_description.clone(),
            type_name: Some(type_name),
            storage_location: storage_location_of(p),
            visibility: Visibility::Internal,
            state_variable: false,
            constant: false,
            immutable: false,
            indexed: p.has_terminal(&TokenKind::Indexed),
            value: None,
            scope,
        })
    }

    /// A parameter list node for `group`. Owners without the group (no
    /// `returns`, a modifier without parentheses) get an empty list placed
    /// at the owner's last token.
    pub(super) fn translate_parameter_group(
        &mut self,
        group: Option<&ParenGroup<'_>>,
        owner: &Production,
        parent: NodeId,
        scope: NodeId,
    ) -> Result<ParameterList, BuildError> {
        let id = self.next_id();
        let Some(group) = group else {
            let src = Self::range_src(&owner.stop, &owner.stop, parent);
            return Ok(ParameterList { id, src, parameters: Vec::new() });
        };
        let src = Self::range_src(group.open, group.close, parent);
        let mut parameters = Vec::with_capacity(group.items.len());
        for item in &group.items {
            parameters.push(self.translate_parameter(item, id, scope)?);
        }
        Ok(ParameterList { id, src, parameters })
    }

    pub(super) fn translate_event(&mut self, p: &Production, parent: NodeId) -> Result<EventDefinition, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let name = p.identifier().unwrap_or_default().to_string();
        let groups = paren_groups(p);
        let parameters = self.translate_parameter_group(groups.first(), p, id, id)?;
        let type_description = self.function_type("event", StateMutability::NonPayable, &parameters, None);
        self.declare(
            Declaration::new(id, &name, DeclarationKind::Event, self.contract_id()).with_type(type_description.clone()),
        );
        Ok(EventDefinition {
            id,
            src,
            name,
            anonymous: p.has_terminal(&TokenKind::Anonymous),
            parameters,
            type_description,
        })
    }

    pub(super) fn translate_error(&mut self, p: &Production, parent: NodeId) -> Result<ErrorDefinition, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        // the first identifier is the contextual `error` keyword
        let name = p
            .terminals()
            .filter_map(|t| match &t.kind {
                TokenKind::Ident(name) => Some(name.clone()),
                _ => None,
            })
            .nth(1)
            .unwrap_or_default();
        let groups = paren_groups(p);
        let parameters = self.translate_parameter_group(groups.first(), p, id, id)?;
        let type_description = self.function_type("error", StateMutability::NonPayable, &parameters, None);
        self.declare(
            Declaration::new(id, &name, DeclarationKind::Error, self.contract_id()).with_type(type_description.clone()),
        );
        Ok(ErrorDefinition { id, src, name, parameters, type_description })
    }

    pub(super) fn translate_struct(&mut self, p: &Production, parent: NodeId) -> Result<StructDefinition, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let name = p.identifier().unwrap_or_default().to_string();
        let type_description = TypeDescription::structure(&name, id);
        self.types
            .insert(&type_description, Composite::Declared { declaration: id, kind: DeclaredKind::Struct });
        // declared before the members so they can refer to it
        self.declare(
            Declaration::new(id, &name, DeclarationKind::Struct, self.contract_id())
                .with_type(Some(type_description.clone())),
        );

        let mut members = Vec::new();
        for member in p.children_of(Rule::StructMember) {
            let member = self.translate_parameter(member, id, id)?;
            self.declare(
                Declaration::new(member.id, &member.name, DeclarationKind::StructMember, Some(id))
                    .with_type(member.type_description.clone()),
            );
            members.push(member);
        }

        Ok(StructDefinition { id, src, name, members, type_description })
    }

    pub(super) fn translate_enum(&mut self, p: &Production, parent: NodeId) -> EnumDefinition {
        let id = self.next_id();
        let src = self.src(p, parent);
        let mut names = p.terminals().filter(|t| matches!(t.kind, TokenKind::Ident(_)));
        let name = names.next().map(|t| t.text.clone()).unwrap_or_default();
        let type_description = TypeDescription::enumeration(&name, id);
        self.types
            .insert(&type_description, Composite::Declared { declaration: id, kind: DeclaredKind::Enum });
        self.declare(
            Declaration::new(id, &name, DeclarationKind::Enum, self.contract_id())
                .with_type(Some(type_description.clone())),
        );

        let mut members = Vec::new();
        for token in names {
            let value_id = self.next_id();
            self.declare(
                Declaration::new(value_id, &token.text, DeclarationKind::EnumValue, Some(id))
                    .with_type(Some(type_description.clone())),
            );
            members.push(EnumValue {
                id: value_id,
                src: Self::range_src(token, token, id),
                name: token.text.clone(),
            });
        }

        EnumDefinition { id, src, name, members, type_description }
    }

    pub(super) fn translate_user_defined_value_type(
        &mut self,
        p: &Production,
        parent: NodeId,
    ) -> Result<UserDefinedValueTypeDefinition, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let name = p.identifier().unwrap_or_default().to_string();
        let underlying_type = match p.child(Rule::ElementaryTypeName) {
            Some(t) => self.translate_type_name(t, id)?,
            None => return Err(Self::unsupported("UserDefinedValueTypeDefinition", p)),
        };
        let type_description = TypeDescription::user_defined_value(&name, id);
        self.types.insert(
            &type_description,
            Composite::Declared { declaration: id, kind: DeclaredKind::UserDefinedValueType },
        );
        self.declare(
            Declaration::new(id, &name, DeclarationKind::UserDefinedValueType, self.contract_id())
                .with_type(Some(type_description.clone())),
        );
        Ok(UserDefinedValueTypeDefinition { id, src, name, underlying_type, type_description })
    }

    pub(super) fn translate_using(&mut self, p: &Production, parent: NodeId) -> Result<UsingForDirective, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let library_name = match p.child(Rule::IdentifierPath) {
            Some(path) => self.translate_path(path, id),
            None => return Err(Self::unsupported("UsingForDirective", p)),
        };
        let type_name = match p.child(Rule::TypeName) {
            Some(t) => Some(self.translate_type_name(t, id)?),
            None => None,
        };
        let global = p
            .terminals()
            .any(|t| matches!(&t.kind, TokenKind::Ident(word) if word == "global"));
        Ok(UsingForDirective { id, src, library_name, type_name, global })
    }
}

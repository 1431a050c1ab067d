// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Contract, interface and library translation.

use solast_ast::decl::{ContractDefinition, ContractKind, ContractPart, FunctionKind, InheritanceSpecifier};
use solast_ast::token::TokenKind;
use solast_ast::types::{Composite, DeclaredKind};
use solast_ast::type_name::PathNode;
use solast_ast::{NodeId, TypeDescription};
use solast_parser::{Production, Rule};
use solast_resolve::{Declaration, DeclarationKind};
use tracing::{debug, trace};

use super::{ContractScope, Cx, Translator};
use crate::error::BuildError;

impl Translator<'_> {
    pub(super) fn translate_contract(&mut self, p: &Production, parent: NodeId) -> Result<ContractDefinition, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let name = p.identifier().unwrap_or_default().to_string();
        let kind = if p.has_terminal(&TokenKind::Interface) {
            ContractKind::Interface
        } else if p.has_terminal(&TokenKind::Library) {
            ContractKind::Library
        } else {
            ContractKind::Contract
        };
        let is_abstract = p.has_terminal(&TokenKind::Abstract);

        let type_description = TypeDescription::contract(kind.keyword(), &name, id);
        self.types.insert(
            &type_description,
            Composite::Declared { declaration: id, kind: DeclaredKind::Contract },
        );
        self.declare(
            Declaration::new(id, &name, DeclarationKind::Contract, None).with_type(Some(type_description.clone())),
        );

        // bases resolve before the contract scope opens
        let mut base_contracts = Vec::new();
        for specifier in p.children_of(Rule::InheritanceSpecifier) {
            base_contracts.push(self.translate_inheritance_specifier(specifier, id)?);
        }
        let bases: Vec<NodeId> = base_contracts
            .iter()
            .filter_map(|b| b.base_name.referenced_declaration)
            .collect();
        if let Err(error) = self.resolver.declare_bases(id, bases) {
            debug!(%error, "bases rejected");
        }

        let outer = self.contract.replace(ContractScope { id, type_description: type_description.clone() });
        let mut nodes = Vec::new();
        for member in p.nodes().filter(|n| n.rule != Rule::InheritanceSpecifier) {
            let result = self.translate_contract_part(member, id);
            if let Some(node) = self.guard(result)? {
                nodes.push(node);
            }
        }
        self.contract = outer;

        Ok(ContractDefinition {
            id,
            src,
            name,
            kind,
            is_abstract,
            base_contracts,
            nodes,
            type_description,
        })
    }

    fn translate_inheritance_specifier(&mut self, p: &Production, parent: NodeId) -> Result<InheritanceSpecifier, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let base_name = match p.child(Rule::IdentifierPath) {
            Some(path) => self.translate_path(path, id),
            None => return Err(Self::unsupported("InheritanceSpecifier", p)),
        };
        let arguments = match p.child(Rule::CallArgumentList) {
            Some(list) => self.translate_positional_arguments(list, &Cx::new(id))?,
            None => Vec::new(),
        };
        Ok(InheritanceSpecifier { id, src, base_name, arguments })
    }

    /// An identifier path, resolved now or deferred.
    pub(super) fn translate_path(&mut self, p: &Production, parent: NodeId) -> PathNode {
        let id = self.next_id();
        let mut path = PathNode::new(id, p.text(), self.src(p, parent));
        match self.resolve(id, &path.name) {
            Some(found) => path.referenced_declaration = Some(found.declaration),
            None => self.defer(id, &path.name, Self::span_of(p)),
        }
        path
    }

    fn translate_contract_part(&mut self, p: &Production, parent: NodeId) -> Result<ContractPart, BuildError> {
        trace!(rule = %p.rule, line = p.start.line, "contract member");
        Ok(match p.rule {
            Rule::StateVariableDeclaration => ContractPart::StateVariable(self.translate_state_variable(p, parent)?),
            Rule::FunctionDefinition => ContractPart::Function(self.translate_function(p, parent, FunctionKind::Function)?),
            Rule::ConstructorDefinition => {
                ContractPart::Function(self.translate_function(p, parent, FunctionKind::Constructor)?)
            }
            Rule::ModifierDefinition => ContractPart::Function(self.translate_function(p, parent, FunctionKind::Modifier)?),
            Rule::FallbackFunctionDefinition => {
                ContractPart::Function(self.translate_function(p, parent, FunctionKind::Fallback)?)
            }
            Rule::ReceiveFunctionDefinition => {
                ContractPart::Function(self.translate_function(p, parent, FunctionKind::Receive)?)
            }
            Rule::EventDefinition => ContractPart::Event(self.translate_event(p, parent)?),
            Rule::ErrorDefinition => ContractPart::Error(self.translate_error(p, parent)?),
            Rule::StructDefinition => ContractPart::Struct(self.translate_struct(p, parent)?),
            Rule::EnumDefinition => ContractPart::Enum(self.translate_enum(p, parent)),
            Rule::UserDefinedValueTypeDefinition => {
                ContractPart::UserDefinedValueType(self.translate_user_defined_value_type(p, parent)?)
            }
            Rule::UsingDirective => ContractPart::Using(self.translate_using(p, parent)?),
            _ => return Err(Self::unsupported("ContractDefinition", p)),
        })
    }
}

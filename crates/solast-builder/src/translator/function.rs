// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Functions, constructors, modifiers, fallback and receive.

use solast_ast::decl::{FunctionDefinition, FunctionKind, ModifierInvocation, ParameterList, Visibility};
use solast_ast::stmt::Block;
use solast_ast::token::TokenKind;
use solast_ast::NodeId;
use solast_parser::{Production, Rule};
use solast_resolve::{Declaration, DeclarationKind};

use super::declarations::{mutability_of, paren_groups, visibility_of};
use super::{Cx, FunctionScope, Local, Translator};
use crate::error::BuildError;

fn locals_of(list: &ParameterList) -> Vec<Local> {
    list.parameters
        .iter()
        .filter(|p| !p.name.is_empty())
        .map(|p| Local {
            name: p.name.clone(),
            id: p.id,
            type_description: p.type_description.clone(),
        })
        .collect()
}

/// Visibility when none is written.
fn implied_visibility(kind: FunctionKind) -> Visibility {
    match kind {
        FunctionKind::FreeFunction | FunctionKind::Modifier => Visibility::Internal,
        FunctionKind::Constructor => Visibility::Public,
        FunctionKind::Fallback | FunctionKind::Receive => Visibility::External,
        FunctionKind::Function => Visibility::Default,
    }
}

impl Translator<'_> {
    pub(super) fn translate_function(
        &mut self,
        p: &Production,
        parent: NodeId,
        kind: FunctionKind,
    ) -> Result<FunctionDefinition, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let name = match kind {
            FunctionKind::Function | FunctionKind::FreeFunction | FunctionKind::Modifier => {
                p.identifier().unwrap_or_default().to_string()
            }
            FunctionKind::Constructor | FunctionKind::Fallback | FunctionKind::Receive => String::new(),
        };
        let visibility = match visibility_of(p) {
            Visibility::Default => implied_visibility(kind),
            written => written,
        };
        let state_mutability = mutability_of(p);

        let groups = paren_groups(p);
        let returns_group = if p.has_terminal(&TokenKind::Returns) { groups.get(1) } else { None };
        let parameters = self.translate_parameter_group(groups.first(), p, id, id)?;
        let return_parameters = self.translate_parameter_group(returns_group, p, id, id)?;

        let override_specifier = p.child(Rule::OverrideSpecifier);
        let overrides: Vec<_> = match override_specifier {
            Some(o) => o.children_of(Rule::IdentifierPath).map(|path| self.translate_path(path, id)).collect(),
            None => Vec::new(),
        };

        let class = if visibility == Visibility::External { "external" } else { "internal" };
        let type_description = self.function_type(class, state_mutability, &parameters, Some(&return_parameters));

        // declared before the body so recursive calls resolve
        if !name.is_empty() {
            let declaration_kind = match kind {
                FunctionKind::Modifier => DeclarationKind::Modifier,
                _ => DeclarationKind::Function,
            };
            self.declare(
                Declaration::new(id, &name, declaration_kind, self.contract_id()).with_type(type_description.clone()),
            );
        }

        let outer = self.function.replace(FunctionScope {
            parameters: locals_of(&parameters),
            returns: locals_of(&return_parameters),
            return_list: return_parameters.id,
        });
        let outer_frames = std::mem::take(&mut self.frames);
        let tail = self.translate_function_tail(p, id);
        self.function = outer;
        self.frames = outer_frames;
        let (modifiers, body) = tail?;

        Ok(FunctionDefinition {
            id,
            src,
            name,
            kind,
            visibility,
            state_mutability,
            is_virtual: p.has_terminal(&TokenKind::Virtual),
            overrides,
            is_override: override_specifier.is_some(),
            modifiers,
            parameters,
            return_parameters,
            body,
            type_description,
            scope: self.contract_id().unwrap_or(NodeId::ROOT),
        })
    }

    /// Modifier invocations and body, translated with the function's
    /// parameters in scope.
    fn translate_function_tail(
        &mut self,
        p: &Production,
        id: NodeId,
    ) -> Result<(Vec<ModifierInvocation>, Option<Block>), BuildError> {
        let mut modifiers = Vec::new();
        for invocation in p.children_of(Rule::ModifierInvocation) {
            modifiers.push(self.translate_modifier_invocation(invocation, id)?);
        }
        let body = match p.child(Rule::Block) {
            Some(block) => Some(self.translate_block(block, id)?),
            None => None,
        };
        Ok((modifiers, body))
    }

    fn translate_modifier_invocation(&mut self, p: &Production, parent: NodeId) -> Result<ModifierInvocation, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let modifier_name = match p.child(Rule::IdentifierPath) {
            Some(path) => self.translate_path(path, id),
            None => return Err(Self::unsupported("ModifierInvocation", p)),
        };
        let arguments = match p.child(Rule::CallArgumentList) {
            Some(list) => self.translate_positional_arguments(list, &Cx::new(id))?,
            None => Vec::new(),
        };
        Ok(ModifierInvocation { id, src, modifier_name, arguments })
    }
}

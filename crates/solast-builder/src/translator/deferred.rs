// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Deferred resolution.
//!
//! Phase one resolves a name against whatever has been declared by the
//! time it is reached, so forward references (a function calling one
//! defined below it, a state variable of a struct declared later) come up
//! empty and are queued here. Once the whole unit is translated, every
//! declaration is registered and [`Translator::complete`] retries them in
//! two passes:
//!
//! 1. declarations: type names, paths, and the types of variables,
//!    functions, events and errors that depend on them;
//! 2. expressions: identifiers, then every expression type that was left
//!    unknown because an operand was.

use std::collections::HashMap;

use solast_ast::decl::{
    ContractDefinition, ContractPart, ErrorDefinition, EventDefinition, FunctionDefinition, SourceUnit,
    SourceUnitPart, VariableDeclaration, Visibility,
};
use solast_ast::expr::{Expression, FunctionCall, PrimaryExpression};
use solast_ast::type_name::{PathNode, TypeName};
use solast_ast::visit::{
    walk_contract, walk_expression, walk_function, walk_function_call, walk_source_unit, walk_type_name,
    walk_variable, VisitMut,
};
use solast_ast::{NodeId, NodeKind, Span, StateMutability, TypeDescription};
use solast_resolve::{Request, Resolution, Resolve, SymbolTable};
use tracing::{debug, trace};

use super::typing::{binary_type, conditional_type, tuple_type, unary_type};
use super::Translator;

/// A reference phase one could not resolve.
#[derive(Debug, Clone)]
pub(super) struct Deferred {
    pub node: NodeId,
    pub name: String,
    /// Contract the reference appeared in.
    pub contract: Option<NodeId>,
    pub span: Span,
}

/// Outstanding references by node id.
#[derive(Debug, Default)]
struct Pending(HashMap<NodeId, Deferred>);

impl Pending {
    /// Resolve `node` again in its original context. Succeeding removes it.
    fn retry(&mut self, resolver: &dyn SymbolTable, node: NodeId) -> Option<Resolution> {
        let entry = self.0.get(&node)?;
        let found = resolver.resolve(&Request::new(node, &entry.name, entry.contract))?;
        trace!(%node, name = %entry.name, "resolved on retry");
        self.0.remove(&node);
        Some(found)
    }
}

impl Translator<'_> {
    /// Phase two. References still unresolved afterwards stay queued.
    pub(super) fn complete(&mut self, unit: &mut SourceUnit) {
        if self.deferred.is_empty() {
            return;
        }
        debug!(count = self.deferred.len(), "resolving deferred references");
        let pending = Pending(std::mem::take(&mut self.deferred).into_iter().map(|d| (d.node, d)).collect());

        let mut declarations = DeclarationPass { tx: self, pending, completed: HashMap::new() };
        declarations.visit_source_unit(unit);
        let DeclarationPass { pending, completed, .. } = declarations;

        let mut expressions = ExpressionPass { tx: self, pending, completed, contract: None };
        expressions.visit_source_unit(unit);

        let mut remaining: Vec<Deferred> = expressions.pending.0.into_values().collect();
        remaining.sort_by_key(|d| d.node);
        debug!(count = remaining.len(), "references left unresolved");
        self.deferred = remaining;
    }
}

struct DeclarationPass<'t, 'r> {
    tx: &'t mut Translator<'r>,
    pending: Pending,
    /// Types of every variable and callable declaration, by id, for
    /// refreshing identifiers that were typed before their target was.
    completed: HashMap<NodeId, TypeDescription>,
}

impl DeclarationPass<'_, '_> {
    /// Returns whether the path was newly resolved.
    fn resolve_path(&mut self, path: &mut PathNode) -> bool {
        if path.referenced_declaration.is_some() {
            return false;
        }
        match self.pending.retry(&*self.tx.resolver, path.id) {
            Some(found) => {
                path.referenced_declaration = Some(found.declaration);
                true
            }
            None => false,
        }
    }

    fn settle(&mut self, id: NodeId, td: Option<&TypeDescription>) {
        if let Some(td) = td {
            self.tx.update_declared_type(id, td);
            self.completed.insert(id, td.clone());
        }
    }

    fn complete_event(&mut self, event: &mut EventDefinition) {
        if event.type_description.is_none() {
            event.type_description = self.tx.function_type("event", StateMutability::NonPayable, &event.parameters, None);
            self.settle(event.id, event.type_description.as_ref());
        }
    }

    fn complete_error(&mut self, error: &mut ErrorDefinition) {
        if error.type_description.is_none() {
            error.type_description = self.tx.function_type("error", StateMutability::NonPayable, &error.parameters, None);
            self.settle(error.id, error.type_description.as_ref());
        }
    }
}

impl VisitMut for DeclarationPass<'_, '_> {
    fn visit_source_unit(&mut self, unit: &mut SourceUnit) {
        for part in &mut unit.nodes {
            if let SourceUnitPart::Using(using) = part {
                self.resolve_path(&mut using.library_name);
            }
        }
        walk_source_unit(self, unit);
        for part in &mut unit.nodes {
            match part {
                SourceUnitPart::Event(event) => self.complete_event(event),
                SourceUnitPart::Error(error) => self.complete_error(error),
                _ => {}
            }
        }
    }

    fn visit_contract(&mut self, contract: &mut ContractDefinition) {
        let mut rebased = false;
        for base in &mut contract.base_contracts {
            rebased |= self.resolve_path(&mut base.base_name);
        }
        if rebased {
            let bases = contract.base_contracts.iter().filter_map(|b| b.base_name.referenced_declaration).collect();
            if let Err(error) = self.tx.resolver.declare_bases(contract.id, bases) {
                debug!(%error, "bases rejected");
            }
        }
        for part in &mut contract.nodes {
            if let ContractPart::Using(using) = part {
                self.resolve_path(&mut using.library_name);
            }
        }

        walk_contract(self, contract);

        for part in &mut contract.nodes {
            match part {
                ContractPart::Event(event) => self.complete_event(event),
                ContractPart::Error(error) => self.complete_error(error),
                _ => {}
            }
        }
    }

    fn visit_function(&mut self, function: &mut FunctionDefinition) {
        for path in function.overrides.iter_mut() {
            self.resolve_path(path);
        }
        for modifier in function.modifiers.iter_mut() {
            self.resolve_path(&mut modifier.modifier_name);
        }

        walk_function(self, function);

        if function.type_description.is_none() {
            let class = if function.visibility == Visibility::External { "external" } else { "internal" };
            function.type_description = self.tx.function_type(
                class,
                function.state_mutability,
                &function.parameters,
                Some(&function.return_parameters),
            );
            if !function.name.is_empty() {
                self.settle(function.id, function.type_description.as_ref());
            }
        }
    }

    fn visit_variable(&mut self, variable: &mut VariableDeclaration) {
        walk_variable(self, variable);
        match &variable.type_description {
            Some(td) => {
                self.completed.insert(variable.id, td.clone());
            }
            None => {
                variable.type_description = variable.type_name.as_ref().and_then(|t| t.type_description.clone());
                self.settle(variable.id, variable.type_description.as_ref());
            }
        }
    }

    /// Children first, so a mapping or array sees its resolved parts.
    fn visit_type_name(&mut self, type_name: &mut TypeName) {
        walk_type_name(self, type_name);
        match type_name.node_type {
            NodeKind::UserDefinedTypeName if type_name.referenced_declaration.is_none() => {
                if let Some(found) = self.pending.retry(&*self.tx.resolver, type_name.id) {
                    type_name.set_reference(found.declaration, found.type_description);
                }
            }
            NodeKind::MappingTypeName if type_name.type_description.is_none() => {
                type_name.type_description =
                    self.tx.mapping_type(type_name.key_type.as_deref(), type_name.value_type.as_deref());
            }
            NodeKind::ArrayTypeName if type_name.type_description.is_none() => {
                let base = type_name.base_type.as_ref().and_then(|b| b.type_description.as_ref());
                type_name.type_description = self.tx.array_type(base, type_name.length.as_deref());
            }
            _ => {}
        }
    }
}

struct ExpressionPass<'t, 'r> {
    tx: &'t mut Translator<'r>,
    pending: Pending,
    completed: HashMap<NodeId, TypeDescription>,
    contract: Option<NodeId>,
}

impl ExpressionPass<'_, '_> {
    fn complete_identifier(&mut self, node: &mut PrimaryExpression) {
        if node.referenced_declaration.is_none() {
            if let Some(found) = self.pending.retry(&*self.tx.resolver, node.id) {
                node.referenced_declaration = Some(found.declaration);
                node.type_description = found.type_description;
                node.overloaded_declarations = found.overloaded_declarations;
            }
            return;
        }
        if node.type_description.is_some() {
            return;
        }
        let Some(declaration) = node.referenced_declaration else {
            return;
        };
        node.type_description = match self.completed.get(&declaration) {
            Some(td) => Some(td.clone()),
            None => self
                .tx
                .resolver
                .resolve(&Request::new(node.id, &node.name, self.contract))
                .filter(|found| found.declaration == declaration)
                .and_then(|found| found.type_description),
        };
    }
}

impl VisitMut for ExpressionPass<'_, '_> {
    fn visit_contract(&mut self, contract: &mut ContractDefinition) {
        let outer = self.contract.replace(contract.id);
        walk_contract(self, contract);
        self.contract = outer;
    }

    fn visit_function_call(&mut self, call: &mut FunctionCall) {
        walk_function_call(self, call);
        for (slot, argument) in call.argument_types.iter_mut().zip(&call.arguments) {
            if slot.is_none() {
                *slot = argument.type_description().cloned();
            }
        }
        if let Expression::Primary(callee) = &mut call.expression {
            if matches!(callee.node_type, NodeKind::Identifier | NodeKind::ElementaryTypeNameExpression) {
                callee.argument_types = call.argument_types.clone();
            }
        }
        self.tx.type_call(call);
    }

    /// Children first; each rule only fills a type that is still unknown.
    fn visit_expression(&mut self, expression: &mut Expression) {
        walk_expression(self, expression);
        match expression {
            Expression::Primary(p) if p.node_type == NodeKind::Identifier => self.complete_identifier(p),
            Expression::MemberAccess(m) if m.type_description.is_none() => {
                let (td, declaration) = self.tx.member_type(&m.expression, &m.member_name);
                m.type_description = td;
                if m.referenced_declaration.is_none() {
                    m.referenced_declaration = declaration;
                }
            }
            Expression::IndexAccess(i) if i.type_description.is_none() => {
                i.type_description = self.tx.index_type(i.base.type_description());
            }
            Expression::Assignment(a) if a.type_description.is_none() => {
                a.type_description = a.left.type_description().cloned();
            }
            Expression::BinaryOperation(b) if b.type_description.is_none() => {
                b.type_description = binary_type(b.operator, b.left.type_description(), b.right.type_description());
            }
            Expression::UnaryOperation(u) if u.type_description.is_none() => {
                u.type_description = unary_type(u.operator, u.sub_expression.type_description());
            }
            Expression::Conditional(c) if c.type_description.is_none() => {
                c.type_description =
                    conditional_type(c.true_expression.type_description(), c.false_expression.type_description());
            }
            Expression::Tuple(t) if t.is_inline_array => {
                if t.type_description.is_none() {
                    t.type_description = self.tx.inline_array_type(&t.components);
                }
            }
            // a tuple's type is its components' types, so it is rebuilt
            Expression::Tuple(t) => t.type_description = tuple_type(&t.components),
            Expression::New(n) if n.type_description.is_none() => {
                n.type_description = n.type_name.type_description.clone();
            }
            Expression::FunctionCallOptions(o) if o.type_description.is_none() => {
                o.type_description = o.expression.type_description().cloned();
            }
            _ => {}
        }
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree traversal.
//!
//! [`walk`] is the read-only pre-order walk used by inspectors.
//! [`VisitMut`] is the mutable visitor used by passes that fill in
//! type information after the tree is built; override a method and call
//! the matching `walk_*` function to keep descending.

use crate::decl::*;
use crate::expr::{Expression, FunctionCall};
use crate::node::NodeRef;
use crate::stmt::{Block, Statement};
use crate::type_name::TypeName;

/// Pre-order walk. `f` receives each node and its depth below `root`.
pub fn walk<'a>(root: NodeRef<'a>, f: &mut impl FnMut(NodeRef<'a>, usize)) {
    fn go<'a>(node: NodeRef<'a>, depth: usize, f: &mut impl FnMut(NodeRef<'a>, usize)) {
        f(node, depth);
        for child in node.children() {
            go(child, depth + 1, f);
        }
    }
    go(root, 0, f);
}

/// Every node under `root`, root included, in pre-order.
pub fn descendants(root: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    walk(root, &mut |node, _| out.push(node));
    out
}

pub trait VisitMut {
    fn visit_source_unit(&mut self, unit: &mut SourceUnit) {
        walk_source_unit(self, unit)
    }

    fn visit_contract(&mut self, contract: &mut ContractDefinition) {
        walk_contract(self, contract)
    }

    fn visit_function(&mut self, function: &mut FunctionDefinition) {
        walk_function(self, function)
    }

    fn visit_parameter_list(&mut self, list: &mut ParameterList) {
        for p in &mut list.parameters {
            self.visit_variable(p);
        }
    }

    fn visit_variable(&mut self, variable: &mut VariableDeclaration) {
        walk_variable(self, variable)
    }

    fn visit_type_name(&mut self, type_name: &mut TypeName) {
        walk_type_name(self, type_name)
    }

    fn visit_block(&mut self, block: &mut Block) {
        for s in &mut block.statements {
            self.visit_statement(s);
        }
    }

    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement)
    }

    fn visit_expression(&mut self, expression: &mut Expression) {
        walk_expression(self, expression)
    }

    fn visit_function_call(&mut self, call: &mut FunctionCall) {
        walk_function_call(self, call)
    }
}

pub fn walk_source_unit<V: VisitMut + ?Sized>(v: &mut V, unit: &mut SourceUnit) {
    for part in &mut unit.nodes {
        match part {
            SourceUnitPart::Pragma(_) | SourceUnitPart::Import(_) | SourceUnitPart::Enum(_) => {}
            SourceUnitPart::Contract(c) => v.visit_contract(c),
            SourceUnitPart::Function(f) => v.visit_function(f),
            SourceUnitPart::Struct(s) => walk_struct(v, s),
            SourceUnitPart::Error(e) => v.visit_parameter_list(&mut e.parameters),
            SourceUnitPart::Event(e) => v.visit_parameter_list(&mut e.parameters),
            SourceUnitPart::UserDefinedValueType(u) => v.visit_type_name(&mut u.underlying_type),
            SourceUnitPart::Using(u) => walk_using(v, u),
            SourceUnitPart::Constant(c) => v.visit_variable(c),
        }
    }
}

pub fn walk_contract<V: VisitMut + ?Sized>(v: &mut V, contract: &mut ContractDefinition) {
    for base in &mut contract.base_contracts {
        for arg in &mut base.arguments {
            v.visit_expression(arg);
        }
    }
    // Declarations before bodies, so bodies see completed member types.
    for part in &mut contract.nodes {
        match part {
            ContractPart::StateVariable(var) => v.visit_variable(var),
            ContractPart::Struct(s) => walk_struct(v, s),
            ContractPart::Event(e) => v.visit_parameter_list(&mut e.parameters),
            ContractPart::Error(e) => v.visit_parameter_list(&mut e.parameters),
            ContractPart::UserDefinedValueType(u) => v.visit_type_name(&mut u.underlying_type),
            ContractPart::Using(u) => walk_using(v, u),
            ContractPart::Function(_) | ContractPart::Enum(_) => {}
        }
    }
    for part in &mut contract.nodes {
        if let ContractPart::Function(f) = part {
            v.visit_function(f);
        }
    }
}

fn walk_struct<V: VisitMut + ?Sized>(v: &mut V, s: &mut StructDefinition) {
    for m in &mut s.members {
        v.visit_variable(m);
    }
}

fn walk_using<V: VisitMut + ?Sized>(v: &mut V, using: &mut UsingForDirective) {
    if let Some(t) = &mut using.type_name {
        v.visit_type_name(t);
    }
}

pub fn walk_function<V: VisitMut + ?Sized>(v: &mut V, function: &mut FunctionDefinition) {
    v.visit_parameter_list(&mut function.parameters);
    v.visit_parameter_list(&mut function.return_parameters);
    for m in &mut function.modifiers {
        for arg in &mut m.arguments {
            v.visit_expression(arg);
        }
    }
    if let Some(body) = &mut function.body {
        v.visit_block(body);
    }
}

pub fn walk_variable<V: VisitMut + ?Sized>(v: &mut V, variable: &mut VariableDeclaration) {
    if let Some(t) = &mut variable.type_name {
        v.visit_type_name(t);
    }
    if let Some(value) = &mut variable.value {
        v.visit_expression(value);
    }
}

pub fn walk_type_name<V: VisitMut + ?Sized>(v: &mut V, type_name: &mut TypeName) {
    if let Some(key) = &mut type_name.key_type {
        v.visit_type_name(key);
    }
    if let Some(value) = &mut type_name.value_type {
        v.visit_type_name(value);
    }
    if let Some(base) = &mut type_name.base_type {
        v.visit_type_name(base);
    }
}

pub fn walk_statement<V: VisitMut + ?Sized>(v: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Block(b) => v.visit_block(b),
        Statement::VariableDeclaration(decl) => {
            for d in decl.declarations.iter_mut().flatten() {
                v.visit_variable(d);
            }
            if let Some(value) = &mut decl.initial_value {
                v.visit_expression(value);
            }
        }
        Statement::Expression(e) => v.visit_expression(e),
        Statement::If(s) => {
            v.visit_expression(&mut s.condition);
            v.visit_statement(&mut s.true_body);
            if let Some(f) = &mut s.false_body {
                v.visit_statement(f);
            }
        }
        Statement::For(s) => {
            if let Some(init) = &mut s.initialization {
                v.visit_statement(init);
            }
            if let Some(cond) = &mut s.condition {
                v.visit_expression(cond);
            }
            if let Some(step) = &mut s.loop_expression {
                v.visit_expression(step);
            }
            v.visit_statement(&mut s.body);
        }
        Statement::While(s) | Statement::DoWhile(s) => {
            v.visit_expression(&mut s.condition);
            v.visit_statement(&mut s.body);
        }
        Statement::Continue(_) | Statement::Break(_) => {}
        Statement::Return(r) => {
            if let Some(e) = &mut r.expression {
                v.visit_expression(e);
            }
        }
        Statement::Emit(e) => v.visit_function_call(&mut e.event_call),
        Statement::Revert(r) => v.visit_function_call(&mut r.error_call),
    }
}

pub fn walk_function_call<V: VisitMut + ?Sized>(v: &mut V, call: &mut FunctionCall) {
    for arg in &mut call.arguments {
        v.visit_expression(arg);
    }
    v.visit_expression(&mut call.expression);
}

pub fn walk_expression<V: VisitMut + ?Sized>(v: &mut V, expression: &mut Expression) {
    match expression {
        Expression::Primary(_) => {}
        Expression::FunctionCall(call) => v.visit_function_call(call),
        Expression::FunctionCallOptions(o) => {
            for opt in &mut o.options {
                v.visit_expression(opt);
            }
            v.visit_expression(&mut o.expression);
        }
        Expression::MemberAccess(m) => v.visit_expression(&mut m.expression),
        Expression::IndexAccess(i) => {
            v.visit_expression(&mut i.base);
            if let Some(index) = &mut i.index {
                v.visit_expression(index);
            }
        }
        Expression::Assignment(a) => {
            v.visit_expression(&mut a.left);
            v.visit_expression(&mut a.right);
        }
        Expression::BinaryOperation(b) => {
            v.visit_expression(&mut b.left);
            v.visit_expression(&mut b.right);
        }
        Expression::UnaryOperation(u) => v.visit_expression(&mut u.sub_expression),
        Expression::Conditional(c) => {
            v.visit_expression(&mut c.condition);
            v.visit_expression(&mut c.true_expression);
            v.visit_expression(&mut c.false_expression);
        }
        Expression::Tuple(t) => {
            for c in t.components.iter_mut().flatten() {
                v.visit_expression(c);
            }
        }
        Expression::New(n) => v.visit_type_name(&mut n.type_name),
    }
}

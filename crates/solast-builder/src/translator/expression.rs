// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression translation.
//!
//! Children are translated before their parent's type is derived, so a
//! composite node always sees its operands' types. Call arguments go
//! before the callee so the callee can record them.

use solast_ast::expr::{
    AssignOperator, Assignment, BinaryOperation, BinaryOperator, Conditional, Expression, FunctionCall,
    FunctionCallKind, FunctionCallOptions, IndexAccess, MemberAccess, NewExpression, PrimaryExpression, TupleExpression,
    UnaryOperation, UnaryOperator,
};
use solast_ast::token::{Token, TokenKind};
use solast_ast::{NodeId, NodeKind, SrcNode, TypeDescription};
use solast_parser::{ParseTree, Production, Rule};
use tracing::trace;

use super::typing::{binary_type, conditional_type, tuple_type, unary_type};
use super::{Cx, Translator};
use crate::error::BuildError;

fn operator_token(p: &Production) -> Option<&Token> {
    p.terminals().next()
}

impl Translator<'_> {
    pub(super) fn translate_expression(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        trace!(rule = %p.rule, line = p.start.line, "expression");
        match p.rule {
            Rule::PrimaryExpression => self.translate_primary(p, cx),
            Rule::FunctionCall => {
                let id = self.next_id();
                let src = self.src(p, cx.parent);
                let (Some(callee), Some(list)) = (p.nodes().next(), p.child(Rule::CallArgumentList)) else {
                    return Err(Self::unsupported("FunctionCall", p));
                };
                Ok(Expression::FunctionCall(Box::new(self.translate_call(id, src, callee, list)?)))
            }
            Rule::FunctionCallOptions => self.translate_call_options(p, cx),
            Rule::PayableConversion => self.translate_payable_conversion(p, cx),
            Rule::MemberAccess => self.translate_member_access(p, cx),
            Rule::IndexAccess => self.translate_index_access(p, cx),
            Rule::Assignment => self.translate_assignment(p, cx),
            Rule::UnaryPrefixOperation | Rule::UnarySuffixOperation => self.translate_unary(p, cx),
            Rule::Conditional => self.translate_conditional(p, cx),
            Rule::Tuple => self.translate_tuple(p, cx),
            Rule::InlineArray => self.translate_inline_array(p, cx),
            Rule::NewExpr => self.translate_new(p, cx),
            rule if rule.is_binary() => self.translate_binary(p, cx),
            _ => Err(Self::unsupported("Expression", p)),
        }
    }

    /// Expressions of a `CallArgumentList`. Named arguments contribute
    /// their value; their names come back separately.
    fn translate_arguments(&mut self, list: &Production, cx: &Cx<'_>) -> Result<(Vec<Expression>, Vec<String>), BuildError> {
        let mut arguments = Vec::new();
        let mut names = Vec::new();
        for node in list.nodes() {
            if node.rule == Rule::NamedArgument {
                let Some(value) = node.nodes().next() else {
                    return Err(Self::unsupported("NamedArgument", node));
                };
                names.push(node.identifier().unwrap_or_default().to_string());
                arguments.push(self.translate_expression(value, cx)?);
            } else {
                arguments.push(self.translate_expression(node, cx)?);
            }
        }
        Ok((arguments, names))
    }

    pub(super) fn translate_positional_arguments(&mut self, list: &Production, cx: &Cx<'_>) -> Result<Vec<Expression>, BuildError> {
        Ok(self.translate_arguments(list, cx)?.0)
    }

    /// A call from its callee production and argument list. Also used for
    /// `emit` and `revert`, whose calls are spliced into the statement.
    pub(super) fn translate_call(
        &mut self,
        id: NodeId,
        src: SrcNode,
        callee: &Production,
        list: &Production,
    ) -> Result<FunctionCall, BuildError> {
        let (arguments, names) = self.translate_arguments(list, &Cx::new(id))?;
        let argument_types: Vec<Option<TypeDescription>> =
            arguments.iter().map(|a| a.type_description().cloned()).collect();
        let expression = self.translate_expression(callee, &Cx::callee(id, &argument_types))?;
        let mut call = FunctionCall {
            id,
            src,
            kind: FunctionCallKind::FunctionCall,
            expression,
            arguments,
            names,
            argument_types,
            type_description: None,
            referenced_declaration: None,
        };
        self.type_call(&mut call);
        if let Some(td) = &call.type_description {
            // untyped identifier arguments fall back to the call's type
            for argument in &mut call.arguments {
                if let Expression::Primary(p) = argument {
                    if p.node_type == NodeKind::Identifier && p.type_description.is_none() {
                        p.type_description = Some(td.clone());
                    }
                }
            }
        }
        Ok(call)
    }

    /// `callee{value: v, gas: g}`
    fn translate_call_options(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let Some(callee) = p.nodes().next() else {
            return Err(Self::unsupported("FunctionCallOptions", p));
        };
        let mut names = Vec::new();
        let mut options = Vec::new();
        for option in p.children_of(Rule::NamedArgument) {
            let Some(value) = option.nodes().next() else {
                return Err(Self::unsupported("NamedArgument", option));
            };
            names.push(option.identifier().unwrap_or_default().to_string());
            options.push(self.translate_expression(value, &Cx::new(id))?);
        }
        let expression = self.translate_expression(callee, &Cx { parent: id, ..*cx })?;
        let type_description = expression.type_description().cloned();
        Ok(Expression::FunctionCallOptions(Box::new(FunctionCallOptions {
            id,
            src,
            expression,
            names,
            options,
            type_description,
        })))
    }

    /// `payable(x)` is a conversion to `address payable`.
    fn translate_payable_conversion(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let Some(list) = p.child(Rule::CallArgumentList) else {
            return Err(Self::unsupported("PayableConversion", p));
        };
        let (arguments, names) = self.translate_arguments(list, &Cx::new(id))?;
        let argument_types: Vec<Option<TypeDescription>> =
            arguments.iter().map(|a| a.type_description().cloned()).collect();

        let payable = TypeDescription::elementary("address payable");
        let mut callee = PrimaryExpression::new(self.next_id(), Self::range_src(&p.start, &p.start, id));
        callee.node_type = NodeKind::ElementaryTypeNameExpression;
        callee.name = "payable".to_string();
        callee.type_description = Some(payable.clone());
        callee.argument_types = argument_types.clone();
        callee.is_pure = true;

        let call = FunctionCall {
            id,
            src,
            kind: FunctionCallKind::TypeConversion,
            expression: Expression::Primary(callee),
            arguments,
            names,
            argument_types,
            type_description: Some(payable),
            referenced_declaration: None,
        };
        Ok(Expression::FunctionCall(Box::new(call)))
    }

    fn translate_member_access(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let (Some(base), Some(member)) = (p.nodes().next(), p.terminals().last()) else {
            return Err(Self::unsupported("MemberAccess", p));
        };
        let expression = self.translate_expression(base, &Cx::new(id))?;
        let member_name = member.text.clone();
        let (type_description, referenced_declaration) = self.member_type(&expression, &member_name);
        Ok(Expression::MemberAccess(Box::new(MemberAccess {
            id,
            src,
            expression,
            member_name,
            type_description,
            referenced_declaration,
        })))
    }

    fn translate_index_access(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let mut nodes = p.nodes();
        let Some(base) = nodes.next() else {
            return Err(Self::unsupported("IndexAccess", p));
        };
        let base = self.translate_expression(base, &Cx::new(id))?;
        let index = match nodes.next() {
            Some(index) => Some(self.translate_expression(index, &Cx::new(id))?),
            None => None,
        };
        let type_description = self.index_type(base.type_description());
        Ok(Expression::IndexAccess(Box::new(IndexAccess { id, src, base, index, type_description })))
    }

    /// Left operand, operator token, right operand.
    fn operands<'p>(p: &'p Production, translator: &'static str) -> Result<(&'p Production, &'p Token, &'p Production), BuildError> {
        let mut nodes = p.nodes();
        match (nodes.next(), operator_token(p), nodes.next()) {
            (Some(left), Some(op), Some(right)) => Ok((left, op, right)),
            _ => Err(Self::unsupported(translator, p)),
        }
    }

    fn translate_assignment(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let (left, op, right) = Self::operands(p, "Assignment")?;
        let Some(operator) = AssignOperator::from_token(&op.kind) else {
            return Err(Self::unsupported("Assignment", p));
        };
        let left = self.translate_expression(left, &Cx::new(id))?;
        let right = self.translate_expression(right, &Cx::new(id))?;
        let type_description = left.type_description().cloned();
        Ok(Expression::Assignment(Box::new(Assignment {
            id,
            src,
            operator,
            left,
            right,
            type_description,
        })))
    }

    fn translate_binary(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let (left, op, right) = Self::operands(p, "BinaryOperation")?;
        let Some(operator) = BinaryOperator::from_token(&op.kind) else {
            return Err(Self::unsupported("BinaryOperation", p));
        };
        let left = self.translate_expression(left, &Cx::new(id))?;
        let right = self.translate_expression(right, &Cx::new(id))?;
        let type_description = binary_type(operator, left.type_description(), right.type_description());
        Ok(Expression::BinaryOperation(Box::new(BinaryOperation {
            id,
            src,
            operator,
            left,
            right,
            type_description,
        })))
    }

    fn translate_unary(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let prefix = p.rule == Rule::UnaryPrefixOperation;
        let (Some(operand), Some(op)) = (p.nodes().next(), operator_token(p)) else {
            return Err(Self::unsupported("UnaryOperation", p));
        };
        let Some(operator) = UnaryOperator::from_token(&op.kind) else {
            return Err(Self::unsupported("UnaryOperation", p));
        };
        let sub_expression = self.translate_expression(operand, &Cx::new(id))?;
        let type_description = unary_type(operator, sub_expression.type_description());
        Ok(Expression::UnaryOperation(Box::new(UnaryOperation {
            id,
            src,
            operator,
            prefix,
            sub_expression,
            type_description,
        })))
    }

    fn translate_conditional(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let mut nodes = p.nodes();
        let (Some(condition), Some(when_true), Some(when_false)) = (nodes.next(), nodes.next(), nodes.next()) else {
            return Err(Self::unsupported("Conditional", p));
        };
        let condition = self.translate_expression(condition, &Cx::new(id))?;
        let true_expression = self.translate_expression(when_true, &Cx::new(id))?;
        let false_expression = self.translate_expression(when_false, &Cx::new(id))?;
        let type_description =
            conditional_type(true_expression.type_description(), false_expression.type_description());
        Ok(Expression::Conditional(Box::new(Conditional {
            id,
            src,
            condition,
            true_expression,
            false_expression,
            type_description,
        })))
    }

    /// `(a, , b)`: a comma closes a slot, empty slots stay `None`.
    fn translate_tuple(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let mut components = Vec::new();
        let mut slot = None;
        let mut open_slot = false;
        for child in p.children.iter().skip(1) {
            match child {
                ParseTree::Node(node) => {
                    slot = Some(self.translate_expression(node, &Cx::new(id))?);
                    open_slot = true;
                }
                ParseTree::Terminal(t) if t.is(&TokenKind::Comma) => {
                    components.push(slot.take());
                    open_slot = true;
                }
                ParseTree::Terminal(_) => {
                    if open_slot {
                        components.push(slot.take());
                    }
                }
            }
        }
        let type_description = tuple_type(&components);
        Ok(Expression::Tuple(TupleExpression {
            id,
            src,
            components,
            is_inline_array: false,
            type_description,
        }))
    }

    fn translate_inline_array(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let mut components = Vec::new();
        for element in p.nodes() {
            components.push(Some(self.translate_expression(element, &Cx::new(id))?));
        }
        let type_description = self.inline_array_type(&components);
        Ok(Expression::Tuple(TupleExpression {
            id,
            src,
            components,
            is_inline_array: true,
            type_description,
        }))
    }

    fn translate_new(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let src = self.src(p, cx.parent);
        let Some(type_name) = p.child(Rule::TypeName) else {
            return Err(Self::unsupported("NewExpression", p));
        };
        let type_name = self.translate_type_name(type_name, id)?;
        let type_description = type_name.type_description.clone();
        Ok(Expression::New(Box::new(NewExpression { id, src, type_name, type_description })))
    }
}

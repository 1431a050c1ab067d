// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement translation.

use solast_ast::decl::VariableDeclaration;
use solast_ast::expr::{Expression, FunctionCall};
use solast_ast::stmt::{
    Block, EmitStatement, ForStatement, IfStatement, Jump, Return, RevertStatement, Statement,
    VariableDeclarationStatement, WhileStatement,
};
use solast_ast::token::TokenKind;
use solast_ast::NodeId;
use solast_parser::{ParseTree, Production, Rule};
use tracing::trace;

use super::{Cx, Local, Translator};
use crate::error::BuildError;

type ForParts = (Option<Statement>, Option<Expression>, Option<Expression>, Statement);

impl Translator<'_> {
    pub(super) fn translate_block(&mut self, p: &Production, parent: NodeId) -> Result<Block, BuildError> {
        self.translate_block_as(p, p, parent, false)
    }

    /// `outer` supplies the position (`unchecked { ... }` includes the
    /// keyword), `block` the statements.
    fn translate_block_as(
        &mut self,
        outer: &Production,
        block: &Production,
        parent: NodeId,
        unchecked: bool,
    ) -> Result<Block, BuildError> {
        let id = self.next_id();
        let src = self.src(outer, parent);
        self.push_frame();
        let statements = self.translate_statements(block, id);
        self.pop_frame();
        Ok(Block { id, src, unchecked, statements: statements? })
    }

    fn translate_statements(&mut self, block: &Production, parent: NodeId) -> Result<Vec<Statement>, BuildError> {
        let mut statements = Vec::new();
        for statement in block.nodes() {
            let result = self.translate_statement(statement, parent);
            if let Some(statement) = self.guard(result)? {
                statements.push(statement);
            }
        }
        Ok(statements)
    }

    pub(super) fn translate_statement(&mut self, p: &Production, parent: NodeId) -> Result<Statement, BuildError> {
        trace!(rule = %p.rule, line = p.start.line, "statement");
        Ok(match p.rule {
            Rule::Block => Statement::Block(self.translate_block(p, parent)?),
            Rule::UncheckedBlock => match p.child(Rule::Block) {
                Some(block) => Statement::Block(self.translate_block_as(p, block, parent, true)?),
                None => return Err(Self::unsupported("UncheckedBlock", p)),
            },
            Rule::VariableDeclarationStatement => {
                Statement::VariableDeclaration(self.translate_variable_declaration_statement(p, parent)?)
            }
            Rule::ExpressionStatement => Statement::Expression(self.translate_expression_statement(p, parent)?),
            Rule::IfStatement => Statement::If(Box::new(self.translate_if(p, parent)?)),
            Rule::ForStatement => Statement::For(Box::new(self.translate_for(p, parent)?)),
            Rule::WhileStatement => Statement::While(Box::new(self.translate_while(p, parent, false)?)),
            Rule::DoWhileStatement => Statement::DoWhile(Box::new(self.translate_while(p, parent, true)?)),
            Rule::ContinueStatement => Statement::Continue(Jump { id: self.next_id(), src: self.src(p, parent) }),
            Rule::BreakStatement => Statement::Break(Jump { id: self.next_id(), src: self.src(p, parent) }),
            Rule::ReturnStatement => Statement::Return(self.translate_return(p, parent)?),
            Rule::EmitStatement => {
                let id = self.next_id();
                let src = self.src(p, parent);
                let event_call = self.translate_spliced_call(p, id)?;
                Statement::Emit(EmitStatement { id, src, event_call })
            }
            Rule::RevertStatement => {
                let id = self.next_id();
                let src = self.src(p, parent);
                let error_call = self.translate_spliced_call(p, id)?;
                Statement::Revert(RevertStatement { id, src, error_call })
            }
            _ => return Err(Self::unsupported("Statement", p)),
        })
    }

    /// Locals become visible after their initializer, so `uint x = x;`
    /// reads an outer `x`.
    fn translate_variable_declaration_statement(
        &mut self,
        p: &Production,
        parent: NodeId,
    ) -> Result<VariableDeclarationStatement, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);

        let mut declarations = Vec::new();
        if let Some(tuple) = p.child(Rule::VariableDeclarationTuple) {
            let mut slot = None;
            let mut open_slot = false;
            for child in tuple.children.iter().skip(1) {
                match child {
                    ParseTree::Node(node) => {
                        slot = Some(self.translate_parameter(node, id, id)?);
                        open_slot = true;
                    }
                    ParseTree::Terminal(t) if t.is(&TokenKind::Comma) => {
                        declarations.push(slot.take());
                        open_slot = true;
                    }
                    ParseTree::Terminal(_) => {
                        if open_slot {
                            declarations.push(slot.take());
                        }
                    }
                }
            }
        } else if let Some(declaration) = p.child(Rule::VariableDeclaration) {
            declarations.push(Some(self.translate_parameter(declaration, id, id)?));
        }

        let initial_value = match p.nodes().find(|n| n.rule.is_expression()) {
            Some(value) => Some(self.translate_expression(value, &Cx::new(id))?),
            None => None,
        };

        for declaration in declarations.iter().flatten() {
            self.bind_local(local_of(declaration));
        }

        Ok(VariableDeclarationStatement { id, src, declarations, initial_value })
    }

    fn translate_if(&mut self, p: &Production, parent: NodeId) -> Result<IfStatement, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let mut nodes = p.nodes();
        let (Some(condition), Some(true_body)) = (nodes.next(), nodes.next()) else {
            return Err(Self::unsupported("IfStatement", p));
        };
        let condition = self.translate_expression(condition, &Cx::new(id))?;
        let true_body = self.translate_statement(true_body, id)?;
        let false_body = match nodes.next() {
            Some(body) => Some(self.translate_statement(body, id)?),
            None => None,
        };
        Ok(IfStatement { id, src, condition, true_body, false_body })
    }

    /// The header declares into its own scope, closed after the body.
    fn translate_for(&mut self, p: &Production, parent: NodeId) -> Result<ForStatement, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        self.push_frame();
        let parts = self.translate_for_parts(p, id);
        self.pop_frame();
        let (initialization, condition, loop_expression, body) = parts?;
        Ok(ForStatement { id, src, initialization, condition, loop_expression, body })
    }

    /// `for (init; cond; step) body`. An absent init or condition leaves a
    /// bare `;` in its slot; present ones carry their own `;`.
    fn translate_for_parts(&mut self, p: &Production, id: NodeId) -> Result<ForParts, BuildError> {
        let mut slot = 0;
        let mut closed = false;
        let mut initialization = None;
        let mut condition = None;
        let mut loop_expression = None;
        let mut body = None;

        for child in &p.children {
            match child {
                ParseTree::Terminal(t) if t.is(&TokenKind::Semi) => slot += 1,
                ParseTree::Terminal(t) if t.is(&TokenKind::RParen) => closed = true,
                ParseTree::Terminal(_) => {}
                ParseTree::Node(node) if closed => body = Some(self.translate_statement(node, id)?),
                ParseTree::Node(node) => match slot {
                    0 => {
                        initialization = Some(self.translate_statement(node, id)?);
                        slot += 1;
                    }
                    1 => {
                        condition = Some(self.translate_expression_statement(node, id)?);
                        slot += 1;
                    }
                    _ => loop_expression = Some(self.translate_expression(node, &Cx::new(id))?),
                },
            }
        }

        match body {
            Some(body) => Ok((initialization, condition, loop_expression, body)),
            None => Err(Self::unsupported("ForStatement", p)),
        }
    }

    fn translate_while(&mut self, p: &Production, parent: NodeId, do_while: bool) -> Result<WhileStatement, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let mut nodes = p.nodes();
        let (Some(first), Some(second)) = (nodes.next(), nodes.next()) else {
            return Err(Self::unsupported("WhileStatement", p));
        };
        // a do-while body comes before its condition
        let (condition, body) = if do_while {
            let body = self.translate_statement(first, id)?;
            (self.translate_expression(second, &Cx::new(id))?, body)
        } else {
            let condition = self.translate_expression(first, &Cx::new(id))?;
            (condition, self.translate_statement(second, id)?)
        };
        Ok(WhileStatement { id, src, condition, body })
    }

    fn translate_return(&mut self, p: &Production, parent: NodeId) -> Result<Return, BuildError> {
        let id = self.next_id();
        let src = self.src(p, parent);
        let expression = match p.nodes().next() {
            Some(expression) => Some(self.translate_expression(expression, &Cx::new(id))?),
            None => None,
        };
        let function_return_parameters = self.function.as_ref().map_or(NodeId::ROOT, |f| f.return_list);
        Ok(Return { id, src, expression, function_return_parameters })
    }

    /// `emit E(args);` / `revert E(args);` carry the callee and argument
    /// list directly; the call node spans from callee to `)`.
    fn translate_spliced_call(&mut self, p: &Production, parent: NodeId) -> Result<FunctionCall, BuildError> {
        let (Some(callee), Some(list)) = (p.nodes().next(), p.child(Rule::CallArgumentList)) else {
            return Err(Self::unsupported("Statement", p));
        };
        let id = self.next_id();
        let src = Self::range_src(&callee.start, &list.stop, parent);
        self.translate_call(id, src, callee, list)
    }
}

fn local_of(declaration: &VariableDeclaration) -> Local {
    Local {
        name: declaration.name.clone(),
        id: declaration.id,
        type_description: declaration.type_description.clone(),
    }
}

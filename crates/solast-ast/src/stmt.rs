// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement nodes.

use crate::decl::VariableDeclaration;
use crate::expr::{Expression, FunctionCall};
use crate::{NodeId, NodeKind, SrcNode};

/// A statement in the AST.
///
/// Expression statements hold the bare expression: a call statement is a
/// `FunctionCall` node and `_;` is a `PlaceholderStatement` node.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Block(Block),
    VariableDeclaration(VariableDeclarationStatement),
    Expression(Expression),
    If(Box<IfStatement>),
    For(Box<ForStatement>),
    While(Box<WhileStatement>),
    DoWhile(Box<WhileStatement>),
    Continue(Jump),
    Break(Jump),
    Return(Return),
    Emit(EmitStatement),
    Revert(RevertStatement),
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Statement::Block(s) => s.id,
            Statement::VariableDeclaration(s) => s.id,
            Statement::Expression(e) => e.id(),
            Statement::If(s) => s.id,
            Statement::For(s) => s.id,
            Statement::While(s) | Statement::DoWhile(s) => s.id,
            Statement::Continue(s) | Statement::Break(s) => s.id,
            Statement::Return(s) => s.id,
            Statement::Emit(s) => s.id,
            Statement::Revert(s) => s.id,
        }
    }

    pub fn src(&self) -> &SrcNode {
        match self {
            Statement::Block(s) => &s.src,
            Statement::VariableDeclaration(s) => &s.src,
            Statement::Expression(e) => e.src(),
            Statement::If(s) => &s.src,
            Statement::For(s) => &s.src,
            Statement::While(s) | Statement::DoWhile(s) => &s.src,
            Statement::Continue(s) | Statement::Break(s) => &s.src,
            Statement::Return(s) => &s.src,
            Statement::Emit(s) => &s.src,
            Statement::Revert(s) => &s.src,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Block(b) if b.unchecked => NodeKind::UncheckedBlock,
            Statement::Block(_) => NodeKind::Block,
            Statement::VariableDeclaration(_) => NodeKind::VariableDeclarationStatement,
            Statement::Expression(e) => e.kind(),
            Statement::If(_) => NodeKind::IfStatement,
            Statement::For(_) => NodeKind::ForStatement,
            Statement::While(_) => NodeKind::WhileStatement,
            Statement::DoWhile(_) => NodeKind::DoWhileStatement,
            Statement::Continue(_) => NodeKind::Continue,
            Statement::Break(_) => NodeKind::Break,
            Statement::Return(_) => NodeKind::Return,
            Statement::Emit(_) => NodeKind::EmitStatement,
            Statement::Revert(_) => NodeKind::RevertStatement,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub id: NodeId,
    pub src: SrcNode,
    pub unchecked: bool,
    pub statements: Vec<Statement>,
}

/// `T x = v;` or `(T a, , U b) = f();`. Omitted tuple slots are `None`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDeclarationStatement {
    pub id: NodeId,
    pub src: SrcNode,
    pub declarations: Vec<Option<VariableDeclaration>>,
    pub initial_value: Option<Expression>,
}

impl VariableDeclarationStatement {
    pub fn declared(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.declarations.iter().flatten()
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStatement {
    pub id: NodeId,
    pub src: SrcNode,
    pub condition: Expression,
    pub true_body: Statement,
    pub false_body: Option<Statement>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStatement {
    pub id: NodeId,
    pub src: SrcNode,
    pub initialization: Option<Statement>,
    pub condition: Option<Expression>,
    pub loop_expression: Option<Expression>,
    pub body: Statement,
}

/// Shared by `while` and `do ... while`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhileStatement {
    pub id: NodeId,
    pub src: SrcNode,
    pub condition: Expression,
    pub body: Statement,
}

/// `continue;` or `break;`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Jump {
    pub id: NodeId,
    pub src: SrcNode,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Return {
    pub id: NodeId,
    pub src: SrcNode,
    pub expression: Option<Expression>,
    /// Return parameter list of the enclosing function.
    pub function_return_parameters: NodeId,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmitStatement {
    pub id: NodeId,
    pub src: SrcNode,
    pub event_call: FunctionCall,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevertStatement {
    pub id: NodeId,
    pub src: SrcNode,
    pub error_call: FunctionCall,
}

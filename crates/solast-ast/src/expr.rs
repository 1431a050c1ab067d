// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes.

use crate::token::TokenKind;
use crate::type_name::TypeName;
use crate::{NodeId, NodeKind, SrcNode, TypeDescription};

/// An expression in the AST.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expression {
    Primary(PrimaryExpression),
    FunctionCall(Box<FunctionCall>),
    FunctionCallOptions(Box<FunctionCallOptions>),
    MemberAccess(Box<MemberAccess>),
    IndexAccess(Box<IndexAccess>),
    Assignment(Box<Assignment>),
    BinaryOperation(Box<BinaryOperation>),
    UnaryOperation(Box<UnaryOperation>),
    Conditional(Box<Conditional>),
    Tuple(TupleExpression),
    New(Box<NewExpression>),
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Primary(e) => e.id,
            Expression::FunctionCall(e) => e.id,
            Expression::FunctionCallOptions(e) => e.id,
            Expression::MemberAccess(e) => e.id,
            Expression::IndexAccess(e) => e.id,
            Expression::Assignment(e) => e.id,
            Expression::BinaryOperation(e) => e.id,
            Expression::UnaryOperation(e) => e.id,
            Expression::Conditional(e) => e.id,
            Expression::Tuple(e) => e.id,
            Expression::New(e) => e.id,
        }
    }

    pub fn src(&self) -> &SrcNode {
        match self {
            Expression::Primary(e) => &e.src,
            Expression::FunctionCall(e) => &e.src,
            Expression::FunctionCallOptions(e) => &e.src,
            Expression::MemberAccess(e) => &e.src,
            Expression::IndexAccess(e) => &e.src,
            Expression::Assignment(e) => &e.src,
            Expression::BinaryOperation(e) => &e.src,
            Expression::UnaryOperation(e) => &e.src,
            Expression::Conditional(e) => &e.src,
            Expression::Tuple(e) => &e.src,
            Expression::New(e) => &e.src,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Primary(e) => e.node_type,
            Expression::FunctionCall(_) => NodeKind::FunctionCall,
            Expression::FunctionCallOptions(_) => NodeKind::FunctionCallOptions,
            Expression::MemberAccess(_) => NodeKind::MemberAccess,
            Expression::IndexAccess(_) => NodeKind::IndexAccess,
            Expression::Assignment(_) => NodeKind::Assignment,
            Expression::BinaryOperation(_) => NodeKind::BinaryOperation,
            Expression::UnaryOperation(_) => NodeKind::UnaryOperation,
            Expression::Conditional(_) => NodeKind::Conditional,
            Expression::Tuple(_) => NodeKind::TupleExpression,
            Expression::New(_) => NodeKind::NewExpression,
        }
    }

    pub fn type_description(&self) -> Option<&TypeDescription> {
        match self {
            Expression::Primary(e) => e.type_description.as_ref(),
            Expression::FunctionCall(e) => e.type_description.as_ref(),
            Expression::FunctionCallOptions(e) => e.type_description.as_ref(),
            Expression::MemberAccess(e) => e.type_description.as_ref(),
            Expression::IndexAccess(e) => e.type_description.as_ref(),
            Expression::Assignment(e) => e.type_description.as_ref(),
            Expression::BinaryOperation(e) => e.type_description.as_ref(),
            Expression::UnaryOperation(e) => e.type_description.as_ref(),
            Expression::Conditional(e) => e.type_description.as_ref(),
            Expression::Tuple(e) => e.type_description.as_ref(),
            Expression::New(e) => e.type_description.as_ref(),
        }
    }

    pub fn set_type_description(&mut self, td: Option<TypeDescription>) {
        let slot = match self {
            Expression::Primary(e) => &mut e.type_description,
            Expression::FunctionCall(e) => &mut e.type_description,
            Expression::FunctionCallOptions(e) => &mut e.type_description,
            Expression::MemberAccess(e) => &mut e.type_description,
            Expression::IndexAccess(e) => &mut e.type_description,
            Expression::Assignment(e) => &mut e.type_description,
            Expression::BinaryOperation(e) => &mut e.type_description,
            Expression::UnaryOperation(e) => &mut e.type_description,
            Expression::Conditional(e) => &mut e.type_description,
            Expression::Tuple(e) => &mut e.type_description,
            Expression::New(e) => &mut e.type_description,
        };
        *slot = td;
    }

    pub fn referenced_declaration(&self) -> Option<NodeId> {
        match self {
            Expression::Primary(e) => e.referenced_declaration,
            Expression::FunctionCall(e) => e.referenced_declaration,
            Expression::MemberAccess(e) => e.referenced_declaration,
            _ => None,
        }
    }

    pub fn as_primary(&self) -> Option<&PrimaryExpression> {
        match self {
            Expression::Primary(p) => Some(p),
            _ => None,
        }
    }
}

/// What a primary expression's text was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum PrimaryKind {
    Identifier,
    Boolean,
    String,
    Number,
    HexString,
    UnicodeString,
}

/// Identifier, literal, elementary type name used as a value, or the `_`
/// placeholder of a modifier body. `node_type` tells which.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryExpression {
    pub id: NodeId,
    pub node_type: NodeKind,
    pub kind: PrimaryKind,
    pub src: SrcNode,
    pub name: String,
    pub value: String,
    pub hex_value: String,
    pub subdenomination: Option<String>,
    pub type_description: Option<TypeDescription>,
    pub argument_types: Vec<Option<TypeDescription>>,
    pub overloaded_declarations: Vec<NodeId>,
    pub referenced_declaration: Option<NodeId>,
    pub is_pure: bool,
    /// Number literal whose lexeme could not be read; its value is 0.
    pub malformed: bool,
}

impl PrimaryExpression {
    pub fn new(id: NodeId, src: SrcNode) -> Self {
        Self {
            id,
            node_type: NodeKind::Identifier,
            kind: PrimaryKind::Identifier,
            src,
            name: String::new(),
            value: String::new(),
            hex_value: String::new(),
            subdenomination: None,
            type_description: None,
            argument_types: Vec::new(),
            overloaded_declarations: Vec::new(),
            referenced_declaration: None,
            is_pure: false,
            malformed: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.node_type == NodeKind::PlaceholderStatement
    }

    pub fn is_literal(&self) -> bool {
        self.node_type == NodeKind::Literal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum FunctionCallKind {
    FunctionCall,
    TypeConversion,
    StructConstructorCall,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCall {
    pub id: NodeId,
    pub src: SrcNode,
    pub kind: FunctionCallKind,
    pub expression: Expression,
    pub arguments: Vec<Expression>,
    /// Names of named arguments, in order; empty for positional calls.
    pub names: Vec<String>,
    pub argument_types: Vec<Option<TypeDescription>>,
    pub type_description: Option<TypeDescription>,
    pub referenced_declaration: Option<NodeId>,
}

/// `callee{value: v, gas: g}`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCallOptions {
    pub id: NodeId,
    pub src: SrcNode,
    pub expression: Expression,
    pub names: Vec<String>,
    pub options: Vec<Expression>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberAccess {
    pub id: NodeId,
    pub src: SrcNode,
    pub expression: Expression,
    pub member_name: String,
    pub type_description: Option<TypeDescription>,
    pub referenced_declaration: Option<NodeId>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexAccess {
    pub id: NodeId,
    pub src: SrcNode,
    pub base: Expression,
    pub index: Option<Expression>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub id: NodeId,
    pub src: SrcNode,
    pub operator: AssignOperator,
    pub left: Expression,
    pub right: Expression,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryOperation {
    pub id: NodeId,
    pub src: SrcNode,
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnaryOperation {
    pub id: NodeId,
    pub src: SrcNode,
    pub operator: UnaryOperator,
    pub prefix: bool,
    pub sub_expression: Expression,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditional {
    pub id: NodeId,
    pub src: SrcNode,
    pub condition: Expression,
    pub true_expression: Expression,
    pub false_expression: Expression,
    pub type_description: Option<TypeDescription>,
}

/// `(a, , b)` or, with `is_inline_array`, `[a, b]`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TupleExpression {
    pub id: NodeId,
    pub src: SrcNode,
    pub components: Vec<Option<Expression>>,
    pub is_inline_array: bool,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewExpression {
    pub id: NodeId,
    pub src: SrcNode,
    pub type_name: TypeName,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    Sar,
    BitAnd,
    BitOr,
    BitXor,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::Percent => Self::Mod,
            TokenKind::StarStar => Self::Exp,
            TokenKind::Shl => Self::Shl,
            TokenKind::Shr => Self::Shr,
            TokenKind::Sar => Self::Sar,
            TokenKind::Amp => Self::BitAnd,
            TokenKind::Pipe => Self::BitOr,
            TokenKind::Caret => Self::BitXor,
            TokenKind::Lt => Self::Lt,
            TokenKind::Gt => Self::Gt,
            TokenKind::LtEq => Self::LtEq,
            TokenKind::GtEq => Self::GtEq,
            TokenKind::EqEq => Self::Eq,
            TokenKind::BangEq => Self::NotEq,
            TokenKind::AmpAmp => Self::And,
            TokenKind::PipePipe => Self::Or,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Exp => "**",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Sar => ">>>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Comparisons and logical connectives always produce `bool`.
    pub fn yields_bool(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq | Self::Eq | Self::NotEq | Self::And | Self::Or
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum UnaryOperator {
    Neg,
    Not,
    BitNot,
    Increment,
    Decrement,
    Delete,
}

impl UnaryOperator {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Minus => Self::Neg,
            TokenKind::Bang => Self::Not,
            TokenKind::Tilde => Self::BitNot,
            TokenKind::PlusPlus => Self::Increment,
            TokenKind::MinusMinus => Self::Decrement,
            TokenKind::Delete => Self::Delete,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum AssignOperator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    SarAssign,
}

impl AssignOperator {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Eq => Self::Assign,
            TokenKind::PlusEq => Self::AddAssign,
            TokenKind::MinusEq => Self::SubAssign,
            TokenKind::StarEq => Self::MulAssign,
            TokenKind::SlashEq => Self::DivAssign,
            TokenKind::PercentEq => Self::ModAssign,
            TokenKind::AmpEq => Self::BitAndAssign,
            TokenKind::PipeEq => Self::BitOrAssign,
            TokenKind::CaretEq => Self::BitXorAssign,
            TokenKind::ShlEq => Self::ShlAssign,
            TokenKind::ShrEq => Self::ShrAssign,
            TokenKind::SarEq => Self::SarAssign,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::BitAndAssign => "&=",
            Self::BitOrAssign => "|=",
            Self::BitXorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::SarAssign => ">>>=",
        }
    }
}

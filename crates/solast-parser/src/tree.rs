// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Concrete parse tree.

use solast_ast::token::{Token, TokenKind};

/// Grammar rule a production matched.
///
/// Expression rules are labelled by alternative (`AddSubOperation`,
/// `OrderComparison`, ...) so consumers can dispatch on the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    SourceUnit,
    PragmaDirective,
    ImportDirective,
    ImportAlias,
    ContractDefinition,
    InheritanceSpecifier,
    StateVariableDeclaration,
    ConstantVariableDeclaration,
    ConstructorDefinition,
    FunctionDefinition,
    ModifierDefinition,
    FallbackFunctionDefinition,
    ReceiveFunctionDefinition,
    ModifierInvocation,
    OverrideSpecifier,
    ParameterList,
    ParameterDeclaration,
    EventDefinition,
    EventParameter,
    ErrorDefinition,
    ErrorParameter,
    StructDefinition,
    StructMember,
    EnumDefinition,
    UserDefinedValueTypeDefinition,
    UsingDirective,

    TypeName,
    ElementaryTypeName,
    FunctionTypeName,
    MappingType,
    MappingKeyType,
    IdentifierPath,

    Block,
    UncheckedBlock,
    VariableDeclaration,
    VariableDeclarationTuple,
    VariableDeclarationStatement,
    ExpressionStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    DoWhileStatement,
    ContinueStatement,
    BreakStatement,
    ReturnStatement,
    EmitStatement,
    RevertStatement,

    CallArgumentList,
    NamedArgument,
    IndexAccess,
    MemberAccess,
    FunctionCallOptions,
    FunctionCall,
    PayableConversion,
    UnaryPrefixOperation,
    UnarySuffixOperation,
    ExpOperation,
    MulDivModOperation,
    AddSubOperation,
    ShiftOperation,
    BitAndOperation,
    BitXorOperation,
    BitOrOperation,
    OrderComparison,
    EqualityComparison,
    AndOperation,
    OrOperation,
    Conditional,
    Assignment,
    NewExpr,
    Tuple,
    InlineArray,
    PrimaryExpression,

    Literal,
    BooleanLiteral,
    StringLiteral,
    NumberLiteral,
    HexStringLiteral,
    UnicodeStringLiteral,
}

impl Rule {
    /// Rules that are alternatives of the `expression` grammar rule.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Rule::IndexAccess
                | Rule::MemberAccess
                | Rule::FunctionCallOptions
                | Rule::FunctionCall
                | Rule::PayableConversion
                | Rule::UnaryPrefixOperation
                | Rule::UnarySuffixOperation
                | Rule::ExpOperation
                | Rule::MulDivModOperation
                | Rule::AddSubOperation
                | Rule::ShiftOperation
                | Rule::BitAndOperation
                | Rule::BitXorOperation
                | Rule::BitOrOperation
                | Rule::OrderComparison
                | Rule::EqualityComparison
                | Rule::AndOperation
                | Rule::OrOperation
                | Rule::Conditional
                | Rule::Assignment
                | Rule::NewExpr
                | Rule::Tuple
                | Rule::InlineArray
                | Rule::PrimaryExpression
        )
    }

    /// Binary operator alternatives.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Rule::ExpOperation
                | Rule::MulDivModOperation
                | Rule::AddSubOperation
                | Rule::ShiftOperation
                | Rule::BitAndOperation
                | Rule::BitXorOperation
                | Rule::BitOrOperation
                | Rule::OrderComparison
                | Rule::EqualityComparison
                | Rule::AndOperation
                | Rule::OrOperation
        )
    }

    /// Rules that can appear as a statement.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Rule::Block
                | Rule::UncheckedBlock
                | Rule::VariableDeclarationStatement
                | Rule::ExpressionStatement
                | Rule::IfStatement
                | Rule::ForStatement
                | Rule::WhileStatement
                | Rule::DoWhileStatement
                | Rule::ContinueStatement
                | Rule::BreakStatement
                | Rule::ReturnStatement
                | Rule::EmitStatement
                | Rule::RevertStatement
        )
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A child of a production.
#[derive(Debug, Clone)]
pub enum ParseTree {
    Node(Production),
    Terminal(Token),
}

impl ParseTree {
    pub fn first_token(&self) -> &Token {
        match self {
            ParseTree::Node(p) => &p.start,
            ParseTree::Terminal(t) => t,
        }
    }

    pub fn as_node(&self) -> Option<&Production> {
        match self {
            ParseTree::Node(p) => Some(p),
            ParseTree::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&Token> {
        match self {
            ParseTree::Terminal(t) => Some(t),
            ParseTree::Node(_) => None,
        }
    }
}

/// A matched grammar rule with its children and first/last tokens.
#[derive(Debug, Clone)]
pub struct Production {
    pub rule: Rule,
    pub children: Vec<ParseTree>,
    pub start: Token,
    pub stop: Token,
}

impl Production {
    /// Child productions, skipping terminals.
    pub fn nodes(&self) -> impl Iterator<Item = &Production> {
        self.children.iter().filter_map(ParseTree::as_node)
    }

    /// Direct terminal children.
    pub fn terminals(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(ParseTree::as_terminal)
    }

    /// First child production with the given rule.
    pub fn child(&self, rule: Rule) -> Option<&Production> {
        self.nodes().find(|p| p.rule == rule)
    }

    pub fn children_of(&self, rule: Rule) -> impl Iterator<Item = &Production> {
        self.nodes().filter(move |p| p.rule == rule)
    }

    /// First direct terminal of the given kind (payloads ignored).
    pub fn terminal(&self, kind: &TokenKind) -> Option<&Token> {
        self.terminals().find(|t| t.is(kind))
    }

    pub fn has_terminal(&self, kind: &TokenKind) -> bool {
        self.terminal(kind).is_some()
    }

    /// First direct identifier terminal.
    pub fn identifier(&self) -> Option<&str> {
        self.terminals().find_map(|t| match &t.kind {
            TokenKind::Ident(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Every leaf token under this production, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                ParseTree::Node(p) => p.collect_tokens(out),
                ParseTree::Terminal(t) => out.push(t),
            }
        }
    }

    /// Source text of the production with whitespace runs collapsed to a
    /// single space.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut prev_end = None;
        for token in self.tokens() {
            if matches!(prev_end, Some(end) if end < token.span.start) {
                out.push(' ');
            }
            out.push_str(&token.text);
            prev_end = Some(token.span.end);
        }
        out
    }

    /// Indented outline of the tree, one production or token per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{indent}{} {}:{}\n", self.rule, self.start.line, self.start.column));
        for child in &self.children {
            match child {
                ParseTree::Node(p) => p.dump_into(out, depth + 1),
                ParseTree::Terminal(t) => out.push_str(&format!("{indent}  {:?}\n", t.text)),
            }
        }
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Build errors and warnings.

use solast_ast::{NodeId, Span};
use solast_lexer::LexError;
use solast_parser::{ParseError, Rule};
use thiserror::Error;

/// A production the builder cannot turn into a node.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("{translator} translator cannot handle {rule} at {line}:{column}")]
    UnsupportedProduction {
        translator: &'static str,
        rule: Rule,
        span: Span,
        line: u32,
        column: u32,
    },
    #[error("function type names are not supported (at {line}:{column})")]
    FunctionTypeName { span: Span, line: u32, column: u32 },
}

impl BuildError {
    pub fn span(&self) -> Span {
        match self {
            BuildError::UnsupportedProduction { span, .. } | BuildError::FunctionTypeName { span, .. } => *span,
        }
    }
}

/// Failure of [`crate::build_source`] at any stage.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{} lex error(s)", .0.len())]
    Lex(Vec<LexError>),
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A number literal that could not be read; its value is `0`.
    MalformedLiteral,
    UnresolvedReference,
    /// An expression inside a type name, such as a constant array length.
    TypeNameExpression,
}

/// A tolerated problem found while building.
#[derive(Debug, Clone)]
pub struct BuildWarning {
    pub kind: WarningKind,
    pub node: NodeId,
    pub span: Span,
    pub message: String,
}

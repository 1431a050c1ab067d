// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for Solidity source.
//!
//! Tokenizes source code into a stream of tokens for the parser.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}

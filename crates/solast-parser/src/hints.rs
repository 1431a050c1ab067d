// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use solast_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("';'", TokenKind::RBrace) => Some("statements and declarations end with ';'"),
        ("';'", _) => Some("add ';' at the end of the previous line"),

        ("'{'", _) => Some("blocks start with '{'"),
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),
        ("'}'", _) => None,

        ("'('", _) => Some("parameter lists and calls need parentheses"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => None,
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),

        ("'=>'", _) => Some("mapping syntax: mapping(KeyType => ValueType)"),

        ("expression", TokenKind::Semi) => Some("statement is incomplete"),
        ("expression", _) => Some("try a value, variable, or function call"),

        ("a name", TokenKind::Number(_)) => Some("names can't start with a number"),
        ("a name", TokenKind::ElementaryType(_)) => Some("type names like 'uint' are reserved"),
        ("a name", _) => Some("names start with a letter, '_' or '$'"),

        ("a string", _) => Some("import paths are quoted, like \"./Token.sol\""),

        ("type", _) => Some("try a type like 'uint256', 'address', or a contract name"),

        ("'contract', 'interface' or 'library'", _) => {
            Some("'abstract' must be followed by 'contract'")
        }

        ("'from'", _) => Some("syntax: import {Name} from \"path\";"),

        _ => None,
    }
}

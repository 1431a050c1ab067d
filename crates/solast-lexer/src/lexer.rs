// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use solast_ast::token::{Token, TokenKind};
use solast_ast::types::elementary::is_elementary;
use solast_ast::{LineMap, Span};

/// Raw token type for logos - literal payloads are attached in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // === Keywords ===
    #[token("pragma")]
    Pragma,
    #[token("import")]
    Import,
    #[token("as")]
    As,
    #[token("abstract")]
    Abstract,
    #[token("contract")]
    Contract,
    #[token("interface")]
    Interface,
    #[token("library")]
    Library,
    #[token("is")]
    Is,
    #[token("using")]
    Using,
    #[token("struct")]
    Struct,
    #[token("enum")]
    Enum,
    #[token("event")]
    Event,
    #[token("function")]
    Function,
    #[token("modifier")]
    Modifier,
    #[token("constructor")]
    Constructor,
    #[token("returns")]
    Returns,
    #[token("return")]
    Return,
    #[token("emit")]
    Emit,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("continue")]
    Continue,
    #[token("break")]
    Break,
    #[token("unchecked")]
    Unchecked,
    #[token("new")]
    New,
    #[token("delete")]
    Delete,
    #[token("mapping")]
    Mapping,
    #[token("memory")]
    Memory,
    #[token("storage")]
    Storage,
    #[token("calldata")]
    Calldata,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("internal")]
    Internal,
    #[token("external")]
    External,
    #[token("pure")]
    Pure,
    #[token("view")]
    View,
    #[token("payable")]
    Payable,
    #[token("constant")]
    Constant,
    #[token("immutable")]
    Immutable,
    #[token("virtual")]
    Virtual,
    #[token("override")]
    Override,
    #[token("indexed")]
    Indexed,
    #[token("anonymous")]
    Anonymous,
    #[token("type")]
    Type,
    #[token("assembly")]
    Assembly,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("wei")]
    #[token("gwei")]
    #[token("ether")]
    #[token("seconds")]
    #[token("minutes")]
    #[token("hours")]
    #[token("days")]
    #[token("weeks")]
    #[token("years")]
    SubDenomination,

    // === Multi-char operators (longest first) ===
    #[token(">>>=")]
    SarEq,
    #[token(">>>")]
    Sar,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("**")]
    StarStar,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=>")]
    Arrow,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,

    // === Single-char operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    // === Comments (skip them, NatSpec included) ===
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    HexNumber,

    // Decimal, fractional and scientific: 42, 1_000, 12.5, .5, 2e18, 1.5e-3
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE]-?[0-9][0-9_]*)?")]
    #[regex(r"\.[0-9][0-9_]*([eE]-?[0-9][0-9_]*)?")]
    Number,

    #[regex(r#"hex"[0-9a-fA-F_]*""#)]
    #[regex(r#"hex'[0-9a-fA-F_]*'"#)]
    HexString,

    #[regex(r#"unicode"([^"\\\n]|\\.)*""#)]
    #[regex(r#"unicode'([^'\\\n]|\\.)*'"#)]
    UnicodeString,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z$_][a-zA-Z0-9$_]*")]
    Ident,
}

/// Skip block comments. They do not nest.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> logos::Skip {
    let remainder = lexer.remainder();
    let consumed = match remainder.find("*/") {
        Some(end) => end + 2,
        None => remainder.len(),
    };
    lexer.bump(consumed);
    logos::Skip
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Solidity source code.
pub struct Lexer<'a> {
    source: &'a str,
    line_map: LineMap,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line_map: LineMap::new(source),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => self.convert_token(raw, slice),
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    let error = if ch == '"' || ch == '\'' {
                        LexError::unterminated_string(span.start, self.line_end(span.start), ch)
                    } else {
                        LexError::unexpected_char(ch, span.start)
                    };
                    self.errors.push(error);
                    continue;
                }
            };

            tokens.push(self.token(kind, span.start, span.end));
        }

        let end = self.source.len();
        tokens.push(self.token(TokenKind::Eof, end, end));

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        let (line, col) = self.line_map.offset_to_line_col(start);
        Token {
            kind,
            span: Span::new(start, end),
            line,
            column: col - 1,
            text: self.source[start..end].to_string(),
        }
    }

    fn line_end(&self, from: usize) -> usize {
        self.source[from..].find('\n').map_or(self.source.len(), |i| from + i)
    }

    /// Convert a raw logos token to our TokenKind.
    fn convert_token(&self, raw: RawToken, slice: &str) -> TokenKind {
        match raw {
            RawToken::Pragma => TokenKind::Pragma,
            RawToken::Import => TokenKind::Import,
            RawToken::As => TokenKind::As,
            RawToken::Abstract => TokenKind::Abstract,
            RawToken::Contract => TokenKind::Contract,
            RawToken::Interface => TokenKind::Interface,
            RawToken::Library => TokenKind::Library,
            RawToken::Is => TokenKind::Is,
            RawToken::Using => TokenKind::Using,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Enum => TokenKind::Enum,
            RawToken::Event => TokenKind::Event,
            RawToken::Function => TokenKind::Function,
            RawToken::Modifier => TokenKind::Modifier,
            RawToken::Constructor => TokenKind::Constructor,
            RawToken::Returns => TokenKind::Returns,
            RawToken::Return => TokenKind::Return,
            RawToken::Emit => TokenKind::Emit,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::For => TokenKind::For,
            RawToken::While => TokenKind::While,
            RawToken::Do => TokenKind::Do,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Break => TokenKind::Break,
            RawToken::Unchecked => TokenKind::Unchecked,
            RawToken::New => TokenKind::New,
            RawToken::Delete => TokenKind::Delete,
            RawToken::Mapping => TokenKind::Mapping,
            RawToken::Memory => TokenKind::Memory,
            RawToken::Storage => TokenKind::Storage,
            RawToken::Calldata => TokenKind::Calldata,
            RawToken::Public => TokenKind::Public,
            RawToken::Private => TokenKind::Private,
            RawToken::Internal => TokenKind::Internal,
            RawToken::External => TokenKind::External,
            RawToken::Pure => TokenKind::Pure,
            RawToken::View => TokenKind::View,
            RawToken::Payable => TokenKind::Payable,
            RawToken::Constant => TokenKind::Constant,
            RawToken::Immutable => TokenKind::Immutable,
            RawToken::Virtual => TokenKind::Virtual,
            RawToken::Override => TokenKind::Override,
            RawToken::Indexed => TokenKind::Indexed,
            RawToken::Anonymous => TokenKind::Anonymous,
            RawToken::Type => TokenKind::Type,
            RawToken::Assembly => TokenKind::Assembly,
            RawToken::Try => TokenKind::Try,
            RawToken::Catch => TokenKind::Catch,
            RawToken::True => TokenKind::Bool(true),
            RawToken::False => TokenKind::Bool(false),
            RawToken::SubDenomination => TokenKind::SubDenomination(slice.to_string()),

            RawToken::SarEq => TokenKind::SarEq,
            RawToken::Sar => TokenKind::Sar,
            RawToken::ShlEq => TokenKind::ShlEq,
            RawToken::ShrEq => TokenKind::ShrEq,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::Shl => TokenKind::Shl,
            RawToken::Shr => TokenKind::Shr,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::AmpEq => TokenKind::AmpEq,
            RawToken::PipeEq => TokenKind::PipeEq,
            RawToken::CaretEq => TokenKind::CaretEq,

            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Question => TokenKind::Question,

            // Skipped by logos callbacks; never produced.
            RawToken::LineComment | RawToken::BlockComment => TokenKind::Eof,

            RawToken::HexNumber | RawToken::Number => TokenKind::Number(slice.to_string()),
            RawToken::HexString => TokenKind::HexString(slice.to_string()),
            RawToken::UnicodeString => TokenKind::UnicodeString(slice.to_string()),
            RawToken::String => TokenKind::String(slice.to_string()),
            RawToken::Ident if is_elementary(slice) => TokenKind::ElementaryType(slice.to_string()),
            RawToken::Ident => TokenKind::Ident(slice.to_string()),
        }
    }
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize, quote: char) -> Self {
        Self {
            span: Span::new(start, end.max(start + 1)),
            message: "Unterminated string".to_string(),
            hint: Some(format!("Add a closing {quote} before the end of the line")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let result = Lexer::new(source).tokenize();
        assert!(result.is_ok(), "{:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_types_and_identifiers() {
        assert_eq!(
            kinds("contract Token is Base"),
            vec![
                TokenKind::Contract,
                TokenKind::Ident("Token".into()),
                TokenKind::Is,
                TokenKind::Ident("Base".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("uint256 uint7 address"),
            vec![
                TokenKind::ElementaryType("uint256".into()),
                TokenKind::Ident("uint7".into()),
                TokenKind::ElementaryType("address".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn placeholder_is_an_identifier() {
        assert_eq!(kinds("_;"), vec![TokenKind::Ident("_".into()), TokenKind::Semi, TokenKind::Eof]);
    }

    #[test]
    fn number_forms() {
        assert_eq!(
            kinds("42 12.5 .5 2e18 0xFF 1_000"),
            vec![
                TokenKind::Number("42".into()),
                TokenKind::Number("12.5".into()),
                TokenKind::Number(".5".into()),
                TokenKind::Number("2e18".into()),
                TokenKind::Number("0xFF".into()),
                TokenKind::Number("1_000".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_forms() {
        assert_eq!(
            kinds(r#""hello" 'hi' hex"00ff" unicode"x""#),
            vec![
                TokenKind::String("\"hello\"".into()),
                TokenKind::String("'hi'".into()),
                TokenKind::HexString("hex\"00ff\"".into()),
                TokenKind::UnicodeString("unicode\"x\"".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_prefer_longest_match() {
        assert_eq!(
            kinds("a >>>= b >> c => d"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::SarEq,
                TokenKind::Ident("b".into()),
                TokenKind::Shr,
                TokenKind::Ident("c".into()),
                TokenKind::Arrow,
                TokenKind::Ident("d".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("/// @notice doc\nx /* block\n comment */ y // tail"),
            vec![TokenKind::Ident("x".into()), TokenKind::Ident("y".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn positions_are_recorded() {
        let result = Lexer::new("pragma x;\n  uint a;").tokenize();
        let uint = &result.tokens[3];
        assert_eq!(uint.kind, TokenKind::ElementaryType("uint".into()));
        assert_eq!((uint.line, uint.column), (2, 2));
        assert_eq!(uint.span, Span::new(12, 16));
        assert_eq!(uint.stop(), 15);
        assert_eq!(uint.text, "uint");
    }

    #[test]
    fn unterminated_string_is_reported() {
        let result = Lexer::new("x = \"abc\ny;").tokenize();
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].message, "Unterminated string");
    }

    #[test]
    fn unexpected_character_is_reported() {
        let result = Lexer::new("a # b").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].span, Span::new(2, 3));
    }
}

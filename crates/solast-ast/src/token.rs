// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
///
/// `line` is 1-based, `column` is 0-based. `text` is the exact source
/// slice the token was lexed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    pub text: String,
}

impl Token {
    /// Inclusive offset of the token's last character.
    pub fn stop(&self) -> usize {
        self.span.end.saturating_sub(1).max(self.span.start)
    }

    pub fn is(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(kind)
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals; payloads keep the raw lexeme.
    Number(String),
    String(String),
    HexString(String),
    UnicodeString(String),
    Bool(bool),
    /// wei, gwei, ether, seconds, minutes, hours, days, weeks, years
    SubDenomination(String),

    /// Built-in value type spelling such as `uint256`, `bytes32` or `address`.
    ElementaryType(String),
    Ident(String),

    // Keywords
    Pragma,
    Import,
    As,
    Abstract,
    Contract,
    Interface,
    Library,
    Is,
    Using,
    Struct,
    Enum,
    Event,
    Function,
    Modifier,
    Constructor,
    Returns,
    Return,
    Emit,
    If,
    Else,
    For,
    While,
    Do,
    Continue,
    Break,
    Unchecked,
    New,
    Delete,
    Mapping,
    Memory,
    Storage,
    Calldata,
    Public,
    Private,
    Internal,
    External,
    Pure,
    View,
    Payable,
    Constant,
    Immutable,
    Virtual,
    Override,
    Indexed,
    Anonymous,
    Type,
    Assembly,
    Try,
    Catch,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Colon,
    Dot,
    Question,
    Arrow,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    PlusPlus,
    MinusMinus,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Sar,
    AmpAmp,
    PipePipe,
    Eq,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    SarEq,

    Eof,
}

impl TokenKind {
    /// Human-readable description used in parse errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "a number",
            TokenKind::String(_) => "a string",
            TokenKind::HexString(_) => "a hex string",
            TokenKind::UnicodeString(_) => "a unicode string",
            TokenKind::Bool(_) => "'true' or 'false'",
            TokenKind::SubDenomination(_) => "a unit such as 'ether' or 'days'",
            TokenKind::ElementaryType(_) => "a type name",
            TokenKind::Ident(_) => "a name",

            TokenKind::Pragma => "'pragma'",
            TokenKind::Import => "'import'",
            TokenKind::As => "'as'",
            TokenKind::Abstract => "'abstract'",
            TokenKind::Contract => "'contract'",
            TokenKind::Interface => "'interface'",
            TokenKind::Library => "'library'",
            TokenKind::Is => "'is'",
            TokenKind::Using => "'using'",
            TokenKind::Struct => "'struct'",
            TokenKind::Enum => "'enum'",
            TokenKind::Event => "'event'",
            TokenKind::Function => "'function'",
            TokenKind::Modifier => "'modifier'",
            TokenKind::Constructor => "'constructor'",
            TokenKind::Returns => "'returns'",
            TokenKind::Return => "'return'",
            TokenKind::Emit => "'emit'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::For => "'for'",
            TokenKind::While => "'while'",
            TokenKind::Do => "'do'",
            TokenKind::Continue => "'continue'",
            TokenKind::Break => "'break'",
            TokenKind::Unchecked => "'unchecked'",
            TokenKind::New => "'new'",
            TokenKind::Delete => "'delete'",
            TokenKind::Mapping => "'mapping'",
            TokenKind::Memory => "'memory'",
            TokenKind::Storage => "'storage'",
            TokenKind::Calldata => "'calldata'",
            TokenKind::Public => "'public'",
            TokenKind::Private => "'private'",
            TokenKind::Internal => "'internal'",
            TokenKind::External => "'external'",
            TokenKind::Pure => "'pure'",
            TokenKind::View => "'view'",
            TokenKind::Payable => "'payable'",
            TokenKind::Constant => "'constant'",
            TokenKind::Immutable => "'immutable'",
            TokenKind::Virtual => "'virtual'",
            TokenKind::Override => "'override'",
            TokenKind::Indexed => "'indexed'",
            TokenKind::Anonymous => "'anonymous'",
            TokenKind::Type => "'type'",
            TokenKind::Assembly => "'assembly'",
            TokenKind::Try => "'try'",
            TokenKind::Catch => "'catch'",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Semi => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Question => "'?'",
            TokenKind::Arrow => "'=>'",

            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::StarStar => "'**'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Bang => "'!'",
            TokenKind::Tilde => "'~'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Sar => "'>>>'",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::ShlEq => "'<<='",
            TokenKind::ShrEq => "'>>='",
            TokenKind::SarEq => "'>>>='",

            TokenKind::Eof => "end of file",
        }
    }

    /// `memory`, `storage` or `calldata`.
    pub fn is_data_location(&self) -> bool {
        matches!(self, TokenKind::Memory | TokenKind::Storage | TokenKind::Calldata)
    }

    pub fn is_assignment_op(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::ShlEq
                | TokenKind::ShrEq
                | TokenKind::SarEq
        )
    }
}

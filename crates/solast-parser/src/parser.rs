// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use solast_ast::token::{Token, TokenKind};
use solast_ast::Span;

use crate::tree::{ParseTree, Production, Rule};

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Binding power of postfix operators: calls, indexing, member access.
const POSTFIX_BP: u8 = 29;
/// Binding power of prefix unary operators.
const PREFIX_BP: u8 = 27;

/// The parser for Solidity source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            let (line, column) = tokens.last().map_or((1, 0), |t| (t.line, t.column));
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end),
                line,
                column,
                text: String::new(),
            });
        }
        Self { tokens, pos: 0, errors: Vec::new() }
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the next top-level item after an error.
    fn synchronize(&mut self) {
        let mut brace_depth = 0;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace => {
                    brace_depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    self.advance();
                    if brace_depth > 0 {
                        brace_depth -= 1;
                        if brace_depth == 0 {
                            return;
                        }
                    }
                }
                TokenKind::Semi if brace_depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::Pragma
                | TokenKind::Import
                | TokenKind::Abstract
                | TokenKind::Contract
                | TokenKind::Interface
                | TokenKind::Library
                    if brace_depth == 0 =>
                {
                    return;
                }
                _ => self.advance(),
            }
        }
    }

    /// Skip to the next contract member after an error. Stops in front of
    /// the `}` closing the contract.
    fn synchronize_member(&mut self) {
        let mut brace_depth = 0;
        if !self.check(&TokenKind::RBrace) {
            self.advance();
        }

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace => {
                    brace_depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    if brace_depth == 0 {
                        return;
                    }
                    brace_depth -= 1;
                    self.advance();
                    if brace_depth == 0 {
                        return;
                    }
                }
                TokenKind::Semi if brace_depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::Function
                | TokenKind::Modifier
                | TokenKind::Constructor
                | TokenKind::Event
                | TokenKind::Struct
                | TokenKind::Enum
                | TokenKind::Using
                    if brace_depth == 0 =>
                {
                    return;
                }
                _ => self.advance(),
            }
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Consume the current token as a terminal child.
    fn bump(&mut self) -> ParseTree {
        let token = self.current().clone();
        self.advance();
        ParseTree::Terminal(token)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current().is(kind)
    }

    /// Identifier with this exact text (`from`, `error`, `revert`, ...).
    fn check_word(&self, word: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(name) if name == word)
    }

    fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<ParseTree, ParseError> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<ParseTree, ParseError> {
        if self.check_ident() {
            Ok(self.bump())
        } else {
            Err(ParseError::expected("a name", self.current_kind(), self.current().span))
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<ParseTree, ParseError> {
        if self.check_word(word) {
            Ok(self.bump())
        } else {
            let expected = format!("'{word}'");
            Err(ParseError::expected(&expected, self.current_kind(), self.current().span))
        }
    }

    /// Build a production from `start` up to the last consumed token.
    fn finish(&self, rule: Rule, start: usize, children: Vec<ParseTree>) -> Production {
        let last = self.tokens.len() - 1;
        let first = self.tokens[start.min(last)].clone();
        let stop = if self.pos > start {
            self.tokens[(self.pos - 1).min(last)].clone()
        } else {
            first.clone()
        };
        Production { rule, children, start: first, stop }
    }

    /// Build a production whose first child was parsed earlier (infix and
    /// postfix forms).
    fn wrap(&self, rule: Rule, children: Vec<ParseTree>) -> Production {
        let last = self.tokens.len() - 1;
        let stop = self.tokens[self.pos.saturating_sub(1).min(last)].clone();
        let start = children.first().map_or_else(|| stop.clone(), |c| c.first_token().clone());
        Production { rule, children, start, stop }
    }

    // =========================================================================
    // Source Units
    // =========================================================================

    /// Parse a whole source unit, collecting errors.
    pub fn parse(&mut self) -> ParseResult {
        let start = self.pos;
        let mut children = Vec::new();

        while !self.at_end() {
            let before = self.pos;
            match self.parse_source_unit_part() {
                Ok(part) => children.push(ParseTree::Node(part)),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }

        ParseResult {
            tree: self.finish(Rule::SourceUnit, start, children),
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_source_unit_part(&mut self) -> Result<Production, ParseError> {
        match self.current_kind() {
            TokenKind::Pragma => self.parse_pragma(),
            TokenKind::Import => self.parse_import(),
            TokenKind::Abstract | TokenKind::Contract | TokenKind::Interface | TokenKind::Library => {
                self.parse_contract()
            }
            TokenKind::Function => self.parse_function_definition(),
            TokenKind::Struct => self.parse_struct(),
            TokenKind::Enum => self.parse_enum(),
            TokenKind::Event => self.parse_event(),
            TokenKind::Type => self.parse_user_defined_value_type(),
            TokenKind::Using => self.parse_using(),
            TokenKind::Ident(name) if name == "error" && matches!(self.peek(1), TokenKind::Ident(_)) => {
                self.parse_error_definition()
            }
            TokenKind::ElementaryType(_) | TokenKind::Mapping | TokenKind::Ident(_) => {
                self.parse_constant_variable()
            }
            _ => Err(ParseError::expected(
                "declaration (contract, interface, library, pragma, import, ...)",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    fn parse_pragma(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        while !self.check(&TokenKind::Semi) && !self.at_end() {
            children.push(self.bump());
        }
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::PragmaDirective, start, children))
    }

    fn parse_import(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];

        match self.current_kind() {
            TokenKind::String(_) => {
                children.push(self.bump());
                if self.check(&TokenKind::As) {
                    children.push(self.bump());
                    children.push(self.expect_ident()?);
                }
            }
            TokenKind::Star => {
                children.push(self.bump());
                children.push(self.expect(&TokenKind::As)?);
                children.push(self.expect_ident()?);
                children.push(self.expect_word("from")?);
                children.push(self.expect(&TokenKind::String(String::new()))?);
            }
            TokenKind::LBrace => {
                children.push(self.bump());
                loop {
                    let alias_start = self.pos;
                    let mut alias = vec![self.expect_ident()?];
                    if self.check(&TokenKind::As) {
                        alias.push(self.bump());
                        alias.push(self.expect_ident()?);
                    }
                    children.push(ParseTree::Node(self.finish(Rule::ImportAlias, alias_start, alias)));
                    if !self.check(&TokenKind::Comma) {
                        break;
                    }
                    children.push(self.bump());
                }
                children.push(self.expect(&TokenKind::RBrace)?);
                children.push(self.expect_word("from")?);
                children.push(self.expect(&TokenKind::String(String::new()))?);
            }
            _ => {
                return Err(ParseError::expected("a string", self.current_kind(), self.current().span));
            }
        }

        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::ImportDirective, start, children))
    }

    fn parse_contract(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = Vec::new();
        if self.check(&TokenKind::Abstract) {
            children.push(self.bump());
        }
        match self.current_kind() {
            TokenKind::Contract | TokenKind::Interface | TokenKind::Library => children.push(self.bump()),
            _ => {
                return Err(ParseError::expected(
                    "'contract', 'interface' or 'library'",
                    self.current_kind(),
                    self.current().span,
                ));
            }
        }
        children.push(self.expect_ident()?);

        if self.check(&TokenKind::Is) {
            children.push(self.bump());
            loop {
                children.push(ParseTree::Node(self.parse_inheritance_specifier()?));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
        }

        children.push(self.expect(&TokenKind::LBrace)?);
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let before = self.pos;
            match self.parse_contract_body_element() {
                Ok(member) => children.push(ParseTree::Node(member)),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_member();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
        }
        children.push(self.expect(&TokenKind::RBrace)?);

        Ok(self.finish(Rule::ContractDefinition, start, children))
    }

    fn parse_inheritance_specifier(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![ParseTree::Node(self.parse_identifier_path()?)];
        if self.check(&TokenKind::LParen) {
            children.push(ParseTree::Node(self.parse_call_argument_list()?));
        }
        Ok(self.finish(Rule::InheritanceSpecifier, start, children))
    }

    fn parse_contract_body_element(&mut self) -> Result<Production, ParseError> {
        match self.current_kind() {
            TokenKind::Function if matches!(self.peek(1), TokenKind::LParen) => self.parse_state_variable(),
            TokenKind::Function => self.parse_function_definition(),
            TokenKind::Constructor => self.parse_constructor(),
            TokenKind::Modifier => self.parse_modifier_definition(),
            TokenKind::Struct => self.parse_struct(),
            TokenKind::Enum => self.parse_enum(),
            TokenKind::Event => self.parse_event(),
            TokenKind::Type => self.parse_user_defined_value_type(),
            TokenKind::Using => self.parse_using(),
            TokenKind::Ident(name) if name == "error" && matches!(self.peek(1), TokenKind::Ident(_)) => {
                self.parse_error_definition()
            }
            TokenKind::Ident(name) if name == "fallback" && matches!(self.peek(1), TokenKind::LParen) => {
                self.parse_special_function(Rule::FallbackFunctionDefinition)
            }
            TokenKind::Ident(name) if name == "receive" && matches!(self.peek(1), TokenKind::LParen) => {
                self.parse_special_function(Rule::ReceiveFunctionDefinition)
            }
            _ => self.parse_state_variable(),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_state_variable(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![ParseTree::Node(self.parse_type_name()?)];
        loop {
            match self.current_kind() {
                TokenKind::Public
                | TokenKind::Private
                | TokenKind::Internal
                | TokenKind::Constant
                | TokenKind::Immutable => children.push(self.bump()),
                TokenKind::Override => children.push(ParseTree::Node(self.parse_override_specifier()?)),
                _ => break,
            }
        }
        children.push(self.expect_ident()?);
        if self.check(&TokenKind::Eq) {
            children.push(self.bump());
            children.push(ParseTree::Node(self.parse_expression()?));
        }
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::StateVariableDeclaration, start, children))
    }

    fn parse_constant_variable(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![ParseTree::Node(self.parse_type_name()?)];
        children.push(self.expect(&TokenKind::Constant)?);
        children.push(self.expect_ident()?);
        children.push(self.expect(&TokenKind::Eq)?);
        children.push(ParseTree::Node(self.parse_expression()?));
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::ConstantVariableDeclaration, start, children))
    }

    fn parse_function_definition(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.expect(&TokenKind::Function)?];
        children.push(self.expect_ident()?);
        self.parse_parameters_in_parens(&mut children)?;
        self.parse_function_attributes(&mut children, true)?;
        self.parse_returns(&mut children)?;
        self.parse_body_or_semi(&mut children)?;
        Ok(self.finish(Rule::FunctionDefinition, start, children))
    }

    fn parse_constructor(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        self.parse_parameters_in_parens(&mut children)?;
        self.parse_function_attributes(&mut children, true)?;
        children.push(ParseTree::Node(self.parse_block()?));
        Ok(self.finish(Rule::ConstructorDefinition, start, children))
    }

    fn parse_modifier_definition(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect_ident()?);
        if self.check(&TokenKind::LParen) {
            self.parse_parameters_in_parens(&mut children)?;
        }
        self.parse_function_attributes(&mut children, false)?;
        self.parse_body_or_semi(&mut children)?;
        Ok(self.finish(Rule::ModifierDefinition, start, children))
    }

    /// `fallback(...)` and `receive()`.
    fn parse_special_function(&mut self, rule: Rule) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        self.parse_parameters_in_parens(&mut children)?;
        self.parse_function_attributes(&mut children, true)?;
        self.parse_returns(&mut children)?;
        self.parse_body_or_semi(&mut children)?;
        Ok(self.finish(rule, start, children))
    }

    fn parse_parameters_in_parens(&mut self, children: &mut Vec<ParseTree>) -> Result<(), ParseError> {
        children.push(self.expect(&TokenKind::LParen)?);
        if !self.check(&TokenKind::RParen) {
            children.push(ParseTree::Node(self.parse_parameter_list()?));
        }
        children.push(self.expect(&TokenKind::RParen)?);
        Ok(())
    }

    fn parse_returns(&mut self, children: &mut Vec<ParseTree>) -> Result<(), ParseError> {
        if self.check(&TokenKind::Returns) {
            children.push(self.bump());
            self.parse_parameters_in_parens(children)?;
        }
        Ok(())
    }

    fn parse_body_or_semi(&mut self, children: &mut Vec<ParseTree>) -> Result<(), ParseError> {
        if self.check(&TokenKind::Semi) {
            children.push(self.bump());
        } else {
            children.push(ParseTree::Node(self.parse_block()?));
        }
        Ok(())
    }

    /// Visibility, mutability, `virtual`, `override` and, when allowed,
    /// modifier invocations.
    fn parse_function_attributes(
        &mut self,
        children: &mut Vec<ParseTree>,
        allow_modifiers: bool,
    ) -> Result<(), ParseError> {
        loop {
            match self.current_kind() {
                TokenKind::Public
                | TokenKind::Private
                | TokenKind::Internal
                | TokenKind::External
                | TokenKind::Pure
                | TokenKind::View
                | TokenKind::Payable
                | TokenKind::Virtual => children.push(self.bump()),
                TokenKind::Override => children.push(ParseTree::Node(self.parse_override_specifier()?)),
                TokenKind::Ident(_) if allow_modifiers => {
                    children.push(ParseTree::Node(self.parse_modifier_invocation()?))
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_modifier_invocation(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![ParseTree::Node(self.parse_identifier_path()?)];
        if self.check(&TokenKind::LParen) {
            children.push(ParseTree::Node(self.parse_call_argument_list()?));
        }
        Ok(self.finish(Rule::ModifierInvocation, start, children))
    }

    fn parse_override_specifier(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        if self.check(&TokenKind::LParen) {
            children.push(self.bump());
            loop {
                children.push(ParseTree::Node(self.parse_identifier_path()?));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
            children.push(self.expect(&TokenKind::RParen)?);
        }
        Ok(self.finish(Rule::OverrideSpecifier, start, children))
    }

    fn parse_parameter_list(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = Vec::new();
        loop {
            let param_start = self.pos;
            let mut param = vec![ParseTree::Node(self.parse_type_name()?)];
            if self.current_kind().is_data_location() {
                param.push(self.bump());
            }
            if self.check_ident() {
                param.push(self.bump());
            }
            children.push(ParseTree::Node(self.finish(Rule::ParameterDeclaration, param_start, param)));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            children.push(self.bump());
        }
        Ok(self.finish(Rule::ParameterList, start, children))
    }

    fn parse_event(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect_ident()?);
        children.push(self.expect(&TokenKind::LParen)?);
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_start = self.pos;
                let mut param = vec![ParseTree::Node(self.parse_type_name()?)];
                if self.check(&TokenKind::Indexed) {
                    param.push(self.bump());
                }
                if self.check_ident() {
                    param.push(self.bump());
                }
                children.push(ParseTree::Node(self.finish(Rule::EventParameter, param_start, param)));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
        }
        children.push(self.expect(&TokenKind::RParen)?);
        if self.check(&TokenKind::Anonymous) {
            children.push(self.bump());
        }
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::EventDefinition, start, children))
    }

    fn parse_error_definition(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect_ident()?);
        children.push(self.expect(&TokenKind::LParen)?);
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_start = self.pos;
                let mut param = vec![ParseTree::Node(self.parse_type_name()?)];
                if self.check_ident() {
                    param.push(self.bump());
                }
                children.push(ParseTree::Node(self.finish(Rule::ErrorParameter, param_start, param)));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
        }
        children.push(self.expect(&TokenKind::RParen)?);
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::ErrorDefinition, start, children))
    }

    fn parse_struct(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect_ident()?);
        children.push(self.expect(&TokenKind::LBrace)?);
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let member_start = self.pos;
            let member = vec![
                ParseTree::Node(self.parse_type_name()?),
                self.expect_ident()?,
                self.expect(&TokenKind::Semi)?,
            ];
            children.push(ParseTree::Node(self.finish(Rule::StructMember, member_start, member)));
        }
        children.push(self.expect(&TokenKind::RBrace)?);
        Ok(self.finish(Rule::StructDefinition, start, children))
    }

    fn parse_enum(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect_ident()?);
        children.push(self.expect(&TokenKind::LBrace)?);
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            children.push(self.expect_ident()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            children.push(self.bump());
        }
        children.push(self.expect(&TokenKind::RBrace)?);
        Ok(self.finish(Rule::EnumDefinition, start, children))
    }

    fn parse_user_defined_value_type(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect_ident()?);
        children.push(self.expect(&TokenKind::Is)?);
        if !matches!(self.current_kind(), TokenKind::ElementaryType(_)) {
            return Err(ParseError::expected("type", self.current_kind(), self.current().span));
        }
        children.push(ParseTree::Node(self.parse_elementary_type_name()?));
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::UserDefinedValueTypeDefinition, start, children))
    }

    fn parse_using(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        if self.check(&TokenKind::LBrace) {
            return Err(ParseError::not_supported(
                "'using' with a function list",
                "bind a library instead: using Lib for Type;",
                self.current().span,
            ));
        }
        children.push(ParseTree::Node(self.parse_identifier_path()?));
        children.push(self.expect(&TokenKind::For)?);
        if self.check(&TokenKind::Star) {
            children.push(self.bump());
        } else {
            children.push(ParseTree::Node(self.parse_type_name()?));
        }
        if self.check_word("global") {
            children.push(self.bump());
        }
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::UsingDirective, start, children))
    }

    // =========================================================================
    // Type Names
    // =========================================================================

    fn parse_type_name(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let inner = match self.current_kind() {
            TokenKind::ElementaryType(_) => self.parse_elementary_type_name()?,
            TokenKind::Mapping => self.parse_mapping()?,
            TokenKind::Function => self.parse_function_type_name()?,
            TokenKind::Ident(_) => self.parse_identifier_path()?,
            _ => return Err(ParseError::expected("type", self.current_kind(), self.current().span)),
        };
        let mut type_name = self.finish(Rule::TypeName, start, vec![ParseTree::Node(inner)]);

        while self.check(&TokenKind::LBracket) {
            let mut children = vec![ParseTree::Node(type_name), self.bump()];
            if !self.check(&TokenKind::RBracket) {
                children.push(ParseTree::Node(self.parse_expression()?));
            }
            children.push(self.expect(&TokenKind::RBracket)?);
            type_name = self.finish(Rule::TypeName, start, children);
        }
        Ok(type_name)
    }

    fn parse_elementary_type_name(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let is_address = matches!(self.current_kind(), TokenKind::ElementaryType(name) if name == "address");
        let mut children = vec![self.bump()];
        if is_address && self.check(&TokenKind::Payable) {
            children.push(self.bump());
        }
        Ok(self.finish(Rule::ElementaryTypeName, start, children))
    }

    fn parse_mapping(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect(&TokenKind::LParen)?);

        let key_start = self.pos;
        let key = match self.current_kind() {
            TokenKind::ElementaryType(_) => self.parse_elementary_type_name()?,
            TokenKind::Ident(_) => self.parse_identifier_path()?,
            _ => return Err(ParseError::expected("type", self.current_kind(), self.current().span)),
        };
        children.push(ParseTree::Node(self.finish(Rule::MappingKeyType, key_start, vec![ParseTree::Node(key)])));
        if self.check_ident() {
            children.push(self.bump());
        }

        children.push(self.expect(&TokenKind::Arrow)?);
        children.push(ParseTree::Node(self.parse_type_name()?));
        if self.check_ident() {
            children.push(self.bump());
        }
        children.push(self.expect(&TokenKind::RParen)?);
        Ok(self.finish(Rule::MappingType, start, children))
    }

    fn parse_function_type_name(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        self.parse_parameters_in_parens(&mut children)?;
        self.parse_function_attributes(&mut children, false)?;
        self.parse_returns(&mut children)?;
        Ok(self.finish(Rule::FunctionTypeName, start, children))
    }

    fn parse_identifier_path(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.expect_ident()?];
        while self.check(&TokenKind::Dot) && matches!(self.peek(1), TokenKind::Ident(_)) {
            children.push(self.bump());
            children.push(self.bump());
        }
        Ok(self.finish(Rule::IdentifierPath, start, children))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.expect(&TokenKind::LBrace)?];
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            children.push(ParseTree::Node(self.parse_statement()?));
        }
        children.push(self.expect(&TokenKind::RBrace)?);
        Ok(self.finish(Rule::Block, start, children))
    }

    fn parse_statement(&mut self) -> Result<Production, ParseError> {
        match self.current_kind() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Unchecked => {
                let start = self.pos;
                let children = vec![self.bump(), ParseTree::Node(self.parse_block()?)];
                Ok(self.finish(Rule::UncheckedBlock, start, children))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Continue => self.parse_jump(Rule::ContinueStatement),
            TokenKind::Break => self.parse_jump(Rule::BreakStatement),
            TokenKind::Return => self.parse_return(),
            TokenKind::Emit => self.parse_call_statement(Rule::EmitStatement),
            TokenKind::Ident(name) if name == "revert" && matches!(self.peek(1), TokenKind::Ident(_)) => {
                self.parse_call_statement(Rule::RevertStatement)
            }
            TokenKind::Assembly => Err(ParseError::not_supported(
                "inline assembly blocks",
                "move the assembly into a separate library",
                self.current().span,
            )),
            TokenKind::Try => Err(ParseError::not_supported(
                "try/catch statements",
                "check the call result with a low-level call instead",
                self.current().span,
            )),
            _ => self.parse_simple_statement(),
        }
    }

    fn parse_if(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect(&TokenKind::LParen)?);
        children.push(ParseTree::Node(self.parse_expression()?));
        children.push(self.expect(&TokenKind::RParen)?);
        children.push(ParseTree::Node(self.parse_statement()?));
        if self.check(&TokenKind::Else) {
            children.push(self.bump());
            children.push(ParseTree::Node(self.parse_statement()?));
        }
        Ok(self.finish(Rule::IfStatement, start, children))
    }

    fn parse_for(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect(&TokenKind::LParen)?);
        if self.check(&TokenKind::Semi) {
            children.push(self.bump());
        } else {
            children.push(ParseTree::Node(self.parse_simple_statement()?));
        }
        if self.check(&TokenKind::Semi) {
            children.push(self.bump());
        } else {
            children.push(ParseTree::Node(self.parse_expression_statement()?));
        }
        if !self.check(&TokenKind::RParen) {
            children.push(ParseTree::Node(self.parse_expression()?));
        }
        children.push(self.expect(&TokenKind::RParen)?);
        children.push(ParseTree::Node(self.parse_statement()?));
        Ok(self.finish(Rule::ForStatement, start, children))
    }

    fn parse_while(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(self.expect(&TokenKind::LParen)?);
        children.push(ParseTree::Node(self.parse_expression()?));
        children.push(self.expect(&TokenKind::RParen)?);
        children.push(ParseTree::Node(self.parse_statement()?));
        Ok(self.finish(Rule::WhileStatement, start, children))
    }

    fn parse_do_while(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        children.push(ParseTree::Node(self.parse_statement()?));
        children.push(self.expect(&TokenKind::While)?);
        children.push(self.expect(&TokenKind::LParen)?);
        children.push(ParseTree::Node(self.parse_expression()?));
        children.push(self.expect(&TokenKind::RParen)?);
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::DoWhileStatement, start, children))
    }

    fn parse_jump(&mut self, rule: Rule) -> Result<Production, ParseError> {
        let start = self.pos;
        let children = vec![self.bump(), self.expect(&TokenKind::Semi)?];
        Ok(self.finish(rule, start, children))
    }

    fn parse_return(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        if !self.check(&TokenKind::Semi) {
            children.push(ParseTree::Node(self.parse_expression()?));
        }
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::ReturnStatement, start, children))
    }

    /// `emit E(args);` and `revert E(args);`: keyword, callee expression,
    /// argument list.
    fn parse_call_statement(&mut self, rule: Rule) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        let span = self.current().span;
        let call = self.parse_expression()?;
        if call.rule != Rule::FunctionCall {
            return Err(ParseError::expected("a call like Name(...)", &self.current().kind, span));
        }
        children.extend(call.children);
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(rule, start, children))
    }

    /// Variable declaration or expression statement.
    fn parse_simple_statement(&mut self) -> Result<Production, ParseError> {
        if self.check(&TokenKind::LParen) {
            let save = self.pos;
            if let Ok(statement) = self.parse_tuple_declaration_statement() {
                return Ok(statement);
            }
            self.pos = save;
        }
        if self.is_declaration_start() {
            return self.parse_variable_declaration_statement();
        }
        self.parse_expression_statement()
    }

    /// A type name followed by a name or data location starts a declaration.
    fn is_declaration_start(&mut self) -> bool {
        if !matches!(
            self.current_kind(),
            TokenKind::ElementaryType(_) | TokenKind::Mapping | TokenKind::Function | TokenKind::Ident(_)
        ) {
            return false;
        }
        let save = self.pos;
        let result = self.parse_type_name().is_ok()
            && (self.check_ident() || self.current_kind().is_data_location());
        self.pos = save;
        result
    }

    fn parse_variable_declaration(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![ParseTree::Node(self.parse_type_name()?)];
        if self.current_kind().is_data_location() {
            children.push(self.bump());
        }
        children.push(self.expect_ident()?);
        Ok(self.finish(Rule::VariableDeclaration, start, children))
    }

    fn parse_variable_declaration_statement(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![ParseTree::Node(self.parse_variable_declaration()?)];
        if self.check(&TokenKind::Eq) {
            children.push(self.bump());
            children.push(ParseTree::Node(self.parse_expression()?));
        }
        children.push(self.expect(&TokenKind::Semi)?);
        Ok(self.finish(Rule::VariableDeclarationStatement, start, children))
    }

    fn parse_tuple_declaration_statement(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let tuple_start = self.pos;
        let mut tuple = vec![self.bump()];
        loop {
            if !self.check(&TokenKind::Comma) && !self.check(&TokenKind::RParen) {
                tuple.push(ParseTree::Node(self.parse_variable_declaration()?));
            }
            if !self.check(&TokenKind::Comma) {
                break;
            }
            tuple.push(self.bump());
        }
        tuple.push(self.expect(&TokenKind::RParen)?);
        let tuple = self.finish(Rule::VariableDeclarationTuple, tuple_start, tuple);

        let children = vec![
            ParseTree::Node(tuple),
            self.expect(&TokenKind::Eq)?,
            ParseTree::Node(self.parse_expression()?),
            self.expect(&TokenKind::Semi)?,
        ];
        Ok(self.finish(Rule::VariableDeclarationStatement, start, children))
    }

    fn parse_expression_statement(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let children = vec![ParseTree::Node(self.parse_expression()?), self.expect(&TokenKind::Semi)?];
        Ok(self.finish(Rule::ExpressionStatement, start, children))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn parse_expression(&mut self) -> Result<Production, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Production, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            if self.postfix_applies() {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            if self.check(&TokenKind::Question) {
                if 4 < min_bp {
                    break;
                }
                let mut children = vec![ParseTree::Node(lhs), self.bump()];
                children.push(ParseTree::Node(self.parse_expr_bp(0)?));
                children.push(self.expect(&TokenKind::Colon)?);
                children.push(ParseTree::Node(self.parse_expr_bp(3)?));
                lhs = self.wrap(Rule::Conditional, children);
                continue;
            }

            if self.current_kind().is_assignment_op() {
                if 2 < min_bp {
                    break;
                }
                let mut children = vec![ParseTree::Node(lhs), self.bump()];
                children.push(ParseTree::Node(self.parse_expr_bp(1)?));
                lhs = self.wrap(Rule::Assignment, children);
                continue;
            }

            if let Some((l_bp, r_bp, rule)) = infix_bp(self.current_kind()) {
                if l_bp < min_bp {
                    break;
                }
                let mut children = vec![ParseTree::Node(lhs), self.bump()];
                children.push(ParseTree::Node(self.parse_expr_bp(r_bp)?));
                lhs = self.wrap(rule, children);
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn postfix_applies(&self) -> bool {
        match self.current_kind() {
            TokenKind::LBracket
            | TokenKind::Dot
            | TokenKind::LParen
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => true,
            // `{` only opens call options when it reads `{name: ...`
            TokenKind::LBrace => {
                matches!(self.peek(1), TokenKind::Ident(_)) && matches!(self.peek(2), TokenKind::Colon)
            }
            _ => false,
        }
    }

    fn parse_postfix(&mut self, lhs: Production) -> Result<Production, ParseError> {
        let mut children = vec![ParseTree::Node(lhs)];
        let rule = match self.current_kind() {
            TokenKind::LBracket => {
                children.push(self.bump());
                if !self.check(&TokenKind::RBracket) {
                    children.push(ParseTree::Node(self.parse_expression()?));
                }
                children.push(self.expect(&TokenKind::RBracket)?);
                Rule::IndexAccess
            }
            TokenKind::Dot => {
                children.push(self.bump());
                match self.current_kind() {
                    TokenKind::Ident(_) => children.push(self.bump()),
                    TokenKind::ElementaryType(name) if name == "address" => children.push(self.bump()),
                    _ => {
                        return Err(ParseError::expected("a name", self.current_kind(), self.current().span));
                    }
                }
                Rule::MemberAccess
            }
            TokenKind::LParen => {
                children.push(ParseTree::Node(self.parse_call_argument_list()?));
                Rule::FunctionCall
            }
            TokenKind::LBrace => {
                children.push(self.bump());
                loop {
                    children.push(ParseTree::Node(self.parse_named_argument()?));
                    if !self.check(&TokenKind::Comma) {
                        break;
                    }
                    children.push(self.bump());
                }
                children.push(self.expect(&TokenKind::RBrace)?);
                Rule::FunctionCallOptions
            }
            _ => {
                children.push(self.bump());
                Rule::UnarySuffixOperation
            }
        };
        Ok(self.wrap(rule, children))
    }

    fn parse_call_argument_list(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.expect(&TokenKind::LParen)?];
        if self.check(&TokenKind::LBrace) {
            children.push(self.bump());
            while !self.check(&TokenKind::RBrace) && !self.at_end() {
                children.push(ParseTree::Node(self.parse_named_argument()?));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
            children.push(self.expect(&TokenKind::RBrace)?);
        } else if !self.check(&TokenKind::RParen) {
            loop {
                children.push(ParseTree::Node(self.parse_expression()?));
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
        }
        children.push(self.expect(&TokenKind::RParen)?);
        Ok(self.finish(Rule::CallArgumentList, start, children))
    }

    fn parse_named_argument(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let children = vec![
            self.expect_ident()?,
            self.expect(&TokenKind::Colon)?,
            ParseTree::Node(self.parse_expression()?),
        ];
        Ok(self.finish(Rule::NamedArgument, start, children))
    }

    fn parse_prefix(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        match self.current_kind() {
            TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Delete => {
                let children = vec![self.bump(), ParseTree::Node(self.parse_expr_bp(PREFIX_BP)?)];
                Ok(self.finish(Rule::UnaryPrefixOperation, start, children))
            }
            TokenKind::New => {
                let children = vec![self.bump(), ParseTree::Node(self.parse_type_name()?)];
                Ok(self.finish(Rule::NewExpr, start, children))
            }
            TokenKind::Payable => {
                let children = vec![self.bump(), ParseTree::Node(self.parse_call_argument_list()?)];
                Ok(self.finish(Rule::PayableConversion, start, children))
            }
            TokenKind::LParen => self.parse_tuple(),
            TokenKind::LBracket => self.parse_inline_array(),
            TokenKind::Ident(_) => {
                let children = vec![self.bump()];
                Ok(self.finish(Rule::PrimaryExpression, start, children))
            }
            TokenKind::ElementaryType(_) => {
                let children = vec![ParseTree::Node(self.parse_elementary_type_name()?)];
                Ok(self.finish(Rule::PrimaryExpression, start, children))
            }
            TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::HexString(_)
            | TokenKind::UnicodeString(_)
            | TokenKind::Bool(_) => {
                let literal = self.parse_literal()?;
                Ok(self.finish(Rule::PrimaryExpression, start, vec![ParseTree::Node(literal)]))
            }
            TokenKind::Type => Err(ParseError::not_supported(
                "type(...) expressions",
                "compute the value outside of the contract",
                self.current().span,
            )),
            _ => Err(ParseError::expected("expression", self.current_kind(), self.current().span)),
        }
    }

    fn parse_literal(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let inner_start = self.pos;
        let (rule, children) = match self.current_kind() {
            TokenKind::Number(_) => {
                let mut children = vec![self.bump()];
                if matches!(self.current_kind(), TokenKind::SubDenomination(_)) {
                    children.push(self.bump());
                }
                (Rule::NumberLiteral, children)
            }
            TokenKind::Bool(_) => (Rule::BooleanLiteral, vec![self.bump()]),
            TokenKind::String(_) => (Rule::StringLiteral, self.bump_run(&TokenKind::String(String::new()))),
            TokenKind::HexString(_) => {
                (Rule::HexStringLiteral, self.bump_run(&TokenKind::HexString(String::new())))
            }
            TokenKind::UnicodeString(_) => {
                (Rule::UnicodeStringLiteral, self.bump_run(&TokenKind::UnicodeString(String::new())))
            }
            _ => return Err(ParseError::expected("expression", self.current_kind(), self.current().span)),
        };
        let inner = self.finish(rule, inner_start, children);
        Ok(self.finish(Rule::Literal, start, vec![ParseTree::Node(inner)]))
    }

    /// Adjacent string literals concatenate: `"a" "b"`.
    fn bump_run(&mut self, kind: &TokenKind) -> Vec<ParseTree> {
        let mut children = Vec::new();
        while self.check(kind) {
            children.push(self.bump());
        }
        children
    }

    fn parse_tuple(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        if !self.check(&TokenKind::RParen) {
            loop {
                if !self.check(&TokenKind::Comma) && !self.check(&TokenKind::RParen) {
                    children.push(ParseTree::Node(self.parse_expression()?));
                }
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                children.push(self.bump());
            }
        }
        children.push(self.expect(&TokenKind::RParen)?);
        Ok(self.finish(Rule::Tuple, start, children))
    }

    fn parse_inline_array(&mut self) -> Result<Production, ParseError> {
        let start = self.pos;
        let mut children = vec![self.bump()];
        loop {
            children.push(ParseTree::Node(self.parse_expression()?));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            children.push(self.bump());
        }
        children.push(self.expect(&TokenKind::RBracket)?);
        Ok(self.finish(Rule::InlineArray, start, children))
    }
}

/// Binding powers and production label of binary operators.
fn infix_bp(kind: &TokenKind) -> Option<(u8, u8, Rule)> {
    Some(match kind {
        TokenKind::PipePipe => (5, 6, Rule::OrOperation),
        TokenKind::AmpAmp => (7, 8, Rule::AndOperation),
        TokenKind::EqEq | TokenKind::BangEq => (9, 10, Rule::EqualityComparison),
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => (11, 12, Rule::OrderComparison),
        TokenKind::Pipe => (13, 14, Rule::BitOrOperation),
        TokenKind::Caret => (15, 16, Rule::BitXorOperation),
        TokenKind::Amp => (17, 18, Rule::BitAndOperation),
        TokenKind::Shl | TokenKind::Shr | TokenKind::Sar => (19, 20, Rule::ShiftOperation),
        TokenKind::Plus | TokenKind::Minus => (21, 22, Rule::AddSubOperation),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (23, 24, Rule::MulDivModOperation),
        // right associative
        TokenKind::StarStar => (26, 25, Rule::ExpOperation),
        _ => return None,
    })
}

/// Result of parsing: the source unit tree plus any errors found.
///
/// The tree holds every item that parsed cleanly, even when errors were
/// recorded for others.
#[derive(Debug)]
pub struct ParseResult {
    pub tree: Production,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn not_supported(feature: &str, hint: &str, span: Span) -> Self {
        Self {
            span,
            message: format!("{} are not supported", feature),
            hint: Some(hint.to_string()),
        }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "';'" => format!("Expected ';', found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => format!("Expected '}}' to close block, found {}", found.display_name()),
        "')'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '(' - missing ')'".to_string()
            } else {
                format!("Expected ')', found {}", found.display_name())
            }
        }
        "']'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '[' - missing ']'".to_string()
            } else {
                format!("Expected ']', found {}", found.display_name())
            }
        }
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}

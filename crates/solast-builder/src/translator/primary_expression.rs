// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Identifiers, literals and elementary type names used as values.

use solast_ast::expr::{Expression, PrimaryExpression, PrimaryKind};
use solast_ast::token::TokenKind;
use solast_ast::types::literal::{hex_value, unquote};
use solast_ast::types::{elementary, Rational};
use solast_ast::{NodeKind, Span, TypeDescription};
use solast_parser::{Production, Rule};

use super::typing::{fallback_global_type, is_builtin, pseudo_global_type};
use super::{Cx, Translator};
use crate::error::{BuildError, WarningKind};

/// Marks where a modifier splices in the body it wraps.
const PLACEHOLDER: &str = "_";

impl Translator<'_> {
    pub(super) fn translate_primary(&mut self, p: &Production, cx: &Cx<'_>) -> Result<Expression, BuildError> {
        let id = self.next_id();
        let mut node = PrimaryExpression::new(id, self.src(p, cx.parent));

        if let Some(literal) = p.child(Rule::Literal) {
            self.fill_literal(&mut node, literal);
        } else if let Some(type_name) = p.child(Rule::ElementaryTypeName) {
            let written = type_name.text();
            let normalized = elementary::normalize(&written);
            node.node_type = NodeKind::ElementaryTypeNameExpression;
            node.type_description = Some(normalized.description());
            node.name = written;
            node.is_pure = true;
            node.argument_types = cx.call_arguments.map(<[_]>::to_vec).unwrap_or_default();
        } else if let Some(name) = p.identifier() {
            self.fill_identifier(&mut node, name, cx, Self::span_of(p));
        } else {
            return Err(Self::unsupported("PrimaryExpression", p));
        }

        Ok(Expression::Primary(node))
    }

    fn fill_identifier(&mut self, node: &mut PrimaryExpression, name: &str, cx: &Cx<'_>, span: Span) {
        node.name = name.to_string();
        if name == PLACEHOLDER {
            node.node_type = NodeKind::PlaceholderStatement;
            return;
        }
        node.argument_types = cx.call_arguments.map(<[_]>::to_vec).unwrap_or_default();

        if name == "this" {
            node.type_description = self.contract.as_ref().map(|c| c.type_description.clone());
            return;
        }
        if let Some(td) = pseudo_global_type(name) {
            node.type_description = Some(td);
            return;
        }
        if let Some(local) = self.lookup_local(name) {
            node.referenced_declaration = Some(local.id);
            node.type_description = local.type_description.clone();
            return;
        }
        match self.resolve(node.id, name) {
            Some(found) => {
                node.referenced_declaration = Some(found.declaration);
                node.type_description = found.type_description;
                node.overloaded_declarations = found.overloaded_declarations;
            }
            None if is_builtin(name) => node.type_description = fallback_global_type(name),
            None => self.defer(node.id, name, span),
        }
    }

    fn fill_literal(&mut self, node: &mut PrimaryExpression, literal: &Production) {
        node.node_type = NodeKind::Literal;
        node.is_pure = true;
        let Some(inner) = literal.nodes().next() else {
            return;
        };
        let parts: Vec<String> = inner.terminals().map(|t| unquote(&t.text)).collect();

        match inner.rule {
            Rule::NumberLiteral => {
                let lexeme = inner
                    .terminal(&TokenKind::Number(String::new()))
                    .map(|t| t.text.clone())
                    .unwrap_or_default();
                let unit = inner
                    .terminal(&TokenKind::SubDenomination(String::new()))
                    .map(|t| t.text.clone());
                let mut value = Rational::parse(&lexeme);
                if let Some(unit) = &unit {
                    value = value.scaled(unit);
                }
                if value.malformed {
                    node.malformed = true;
                    self.warn(
                        WarningKind::MalformedLiteral,
                        node.id,
                        Self::span_of(inner),
                        format!("cannot read number literal `{lexeme}`; using 0"),
                    );
                }
                node.kind = PrimaryKind::Number;
                node.type_description = Some(TypeDescription::rational(&value, &lexeme));
                node.hex_value = hex_value(&lexeme);
                node.value = lexeme;
                node.subdenomination = unit;
            }
            Rule::BooleanLiteral => {
                node.kind = PrimaryKind::Boolean;
                node.value = inner.text();
                node.hex_value = hex_value(&node.value);
                node.type_description = Some(TypeDescription::boolean());
            }
            Rule::StringLiteral | Rule::UnicodeStringLiteral => {
                node.kind = if inner.rule == Rule::StringLiteral { PrimaryKind::String } else { PrimaryKind::UnicodeString };
                node.value = parts.concat();
                node.hex_value = hex_value(&node.value);
                node.type_description = Some(TypeDescription::string_literal(&inner.text()));
            }
            Rule::HexStringLiteral => {
                node.kind = PrimaryKind::HexString;
                node.value = parts.concat();
                node.hex_value = hex_value(&node.value);
                node.type_description = Some(TypeDescription::hex_string_literal(&inner.text()));
            }
            _ => {}
        }
    }
}

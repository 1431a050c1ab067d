// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source unit, pragma and import translation.

use solast_ast::decl::{FunctionKind, ImportDirective, PragmaDirective, SourceUnit, SourceUnitPart, SymbolAlias};
use solast_ast::token::TokenKind;
use solast_ast::types::literal::unquote;
use solast_ast::NodeId;
use solast_parser::{Production, Rule};
use tracing::trace;

use super::Translator;
use crate::error::BuildError;

impl Translator<'_> {
    pub(super) fn translate_source_unit(&mut self, tree: &Production) -> Result<SourceUnit, BuildError> {
        let id = self.next_id();
        let src = self.src(tree, NodeId::ROOT);
        let mut nodes = Vec::new();

        for part in tree.nodes() {
            let result = self.translate_source_unit_part(part, id);
            if let Some(node) = self.guard(result)? {
                nodes.push(node);
            }
        }

        Ok(SourceUnit { id, src, nodes })
    }

    fn translate_source_unit_part(&mut self, p: &Production, parent: NodeId) -> Result<SourceUnitPart, BuildError> {
        trace!(rule = %p.rule, line = p.start.line, "source unit part");
        Ok(match p.rule {
            Rule::PragmaDirective => SourceUnitPart::Pragma(self.translate_pragma(p, parent)),
            Rule::ImportDirective => SourceUnitPart::Import(self.translate_import(p, parent)),
            Rule::ContractDefinition => SourceUnitPart::Contract(self.translate_contract(p, parent)?),
            Rule::FunctionDefinition => {
                SourceUnitPart::Function(self.translate_function(p, parent, FunctionKind::FreeFunction)?)
            }
            Rule::StructDefinition => SourceUnitPart::Struct(self.translate_struct(p, parent)?),
            Rule::EnumDefinition => SourceUnitPart::Enum(self.translate_enum(p, parent)),
            Rule::ErrorDefinition => SourceUnitPart::Error(self.translate_error(p, parent)?),
            Rule::EventDefinition => SourceUnitPart::Event(self.translate_event(p, parent)?),
            Rule::UserDefinedValueTypeDefinition => {
                SourceUnitPart::UserDefinedValueType(self.translate_user_defined_value_type(p, parent)?)
            }
            Rule::UsingDirective => SourceUnitPart::Using(self.translate_using(p, parent)?),
            Rule::ConstantVariableDeclaration => SourceUnitPart::Constant(self.translate_state_variable(p, parent)?),
            _ => return Err(Self::unsupported("SourceUnit", p)),
        })
    }

    fn translate_pragma(&mut self, p: &Production, parent: NodeId) -> PragmaDirective {
        let id = self.next_id();
        let literals = p
            .terminals()
            .filter(|t| !matches!(t.kind, TokenKind::Pragma | TokenKind::Semi))
            .map(|t| t.text.clone())
            .collect();
        PragmaDirective { id, src: self.src(p, parent), literals }
    }

    fn translate_import(&mut self, p: &Production, parent: NodeId) -> ImportDirective {
        let id = self.next_id();
        let file = p
            .terminal(&TokenKind::String(String::new()))
            .map(|t| unquote(&t.text))
            .unwrap_or_default();

        // `import "f" as X;` and `import * as X from "f";` both bind the
        // name after `as`
        let unit_alias = p
            .terminals()
            .skip_while(|t| !t.is(&TokenKind::As))
            .find_map(|t| match &t.kind {
                TokenKind::Ident(name) => Some(name.clone()),
                _ => None,
            });

        let symbol_aliases = p
            .children_of(Rule::ImportAlias)
            .map(|alias| {
                let mut names = alias.terminals().filter_map(|t| match &t.kind {
                    TokenKind::Ident(name) => Some(name.clone()),
                    _ => None,
                });
                SymbolAlias {
                    foreign: names.next().unwrap_or_default(),
                    local: names.next(),
                }
            })
            .collect();

        ImportDirective {
            id,
            src: self.src(p, parent),
            file,
            unit_alias,
            symbol_aliases,
        }
    }
}

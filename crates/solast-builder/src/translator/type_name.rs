// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type names: elementary, mapping, array and user-defined.

use solast_ast::token::TokenKind;
use solast_ast::type_name::{PathNode, TypeName};
use solast_ast::types::{elementary, Composite, Rational};
use solast_ast::{NodeId, NodeKind, TypeDescription};
use solast_parser::{Production, Rule};
use tracing::warn;

use super::Translator;
use crate::error::{BuildError, WarningKind};

impl Translator<'_> {
    /// Any type-name production: the `TypeName` wrapper or one of its
    /// alternatives.
    pub(super) fn translate_type_name(&mut self, p: &Production, parent: NodeId) -> Result<TypeName, BuildError> {
        match p.rule {
            Rule::TypeName if p.has_terminal(&TokenKind::LBracket) => self.translate_array_type(p, parent),
            Rule::TypeName | Rule::MappingKeyType => match p.nodes().next() {
                Some(inner) => self.translate_type_name(inner, parent),
                None => Err(Self::unsupported("TypeName", p)),
            },
            Rule::ElementaryTypeName => Ok(self.translate_elementary_type(p, parent)),
            Rule::MappingType => self.translate_mapping_type(p, parent),
            Rule::IdentifierPath => Ok(self.translate_user_defined_type(p, parent)),
            Rule::FunctionTypeName => Err(BuildError::FunctionTypeName {
                span: Self::span_of(p),
                line: p.start.line,
                column: p.start.column,
            }),
            _ => Err(Self::unsupported("TypeName", p)),
        }
    }

    /// The node keeps the spelling from the source (`uint`); only its type
    /// description is canonical (`uint256`).
    fn translate_elementary_type(&mut self, p: &Production, parent: NodeId) -> TypeName {
        let id = self.next_id();
        let written = p.text();
        let normalized = elementary::normalize(&written);
        let mut node = TypeName::new(id, self.src(p, parent), written);
        node.state_mutability = normalized.mutability;
        node.type_description = Some(normalized.description());
        node
    }

    fn translate_mapping_type(&mut self, p: &Production, parent: NodeId) -> Result<TypeName, BuildError> {
        let id = self.next_id();
        let (Some(key), Some(value)) = (p.child(Rule::MappingKeyType), p.child(Rule::TypeName)) else {
            return Err(Self::unsupported("TypeName", p));
        };
        let key = self.translate_type_name(key, id)?;
        let value = self.translate_type_name(value, id)?;

        let mut node = TypeName::new(id, self.src(p, parent), format!("mapping({} => {})", key.name, value.name));
        node.node_type = NodeKind::MappingTypeName;
        node.type_description = self.mapping_type(Some(&key), Some(&value));
        node.key_type = Some(Box::new(key));
        node.value_type = Some(Box::new(value));
        Ok(node)
    }

    /// `base[]` or `base[len]`. Children: base type name, `[`, optional
    /// length expression, `]`.
    fn translate_array_type(&mut self, p: &Production, parent: NodeId) -> Result<TypeName, BuildError> {
        let id = self.next_id();
        let mut nodes = p.nodes();
        let Some(base) = nodes.next() else {
            return Err(Self::unsupported("TypeName", p));
        };
        let base = self.translate_type_name(base, id)?;
        let length = nodes.next().map(|expression| self.array_length(expression, id));

        let name = format!("{}[{}]", base.name, length.as_deref().unwrap_or_default());
        let mut node = TypeName::new(id, self.src(p, parent), name);
        node.node_type = NodeKind::ArrayTypeName;
        node.type_description = self.array_type(base.type_description.as_ref(), length.as_deref());
        node.length = length;
        node.base_type = Some(Box::new(base));
        Ok(node)
    }

    /// Literal lengths are read as numbers; anything else is kept as
    /// written and reported.
    fn array_length(&mut self, expression: &Production, array: NodeId) -> String {
        let literal = expression
            .child(Rule::Literal)
            .and_then(|l| l.child(Rule::NumberLiteral))
            .filter(|n| !n.has_terminal(&TokenKind::SubDenomination(String::new())));
        if let Some(number) = literal {
            let value = Rational::parse(&number.text());
            if !value.malformed && value.denominator == "1" {
                return value.numerator;
            }
        }
        let text = expression.text();
        warn!(length = %text, "expression used as array length");
        self.warn(
            WarningKind::TypeNameExpression,
            array,
            Self::span_of(expression),
            format!("array length `{text}` is not a number literal; kept as written"),
        );
        text
    }

    fn translate_user_defined_type(&mut self, p: &Production, parent: NodeId) -> TypeName {
        let id = self.next_id();
        let name = p.text();
        let mut node = TypeName::new(id, self.src(p, parent), name.clone());
        node.node_type = NodeKind::UserDefinedTypeName;
        let path_id = self.next_id();
        node.path_node = Some(PathNode::new(path_id, name.clone(), self.src(p, id)));
        match self.resolve(id, &name) {
            Some(found) => node.set_reference(found.declaration, found.type_description),
            None => self.defer(id, &name, Self::span_of(p)),
        }
        node
    }

    /// The type string spells the components as the type names do, so it
    /// matches the mapping node's own name.
    pub(super) fn mapping_type(&mut self, key: Option<&TypeName>, value: Option<&TypeName>) -> Option<TypeDescription> {
        let (key, value) = (key?, value?);
        let (key_td, value_td) = (key.type_description.as_ref()?, value.type_description.as_ref()?);
        let td = TypeDescription::mapping(&key.name, key_td, &value.name, value_td);
        self.types.insert(&td, Composite::Mapping { key: key_td.clone(), value: value_td.clone() });
        Some(td)
    }

    pub(super) fn array_type(&mut self, base: Option<&TypeDescription>, length: Option<&str>) -> Option<TypeDescription> {
        let base = base?;
        let td = TypeDescription::array(base, length);
        self.types.insert(&td, Composite::Array { base: base.clone() });
        Some(td)
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression statements.

use solast_ast::expr::Expression;
use solast_ast::NodeId;
use solast_parser::Production;

use super::{Cx, Translator};
use crate::error::BuildError;

impl Translator<'_> {
    /// The statement is its expression: a call statement becomes the
    /// `FunctionCall` node, `_;` the placeholder node. Any child that is
    /// not an expression is a grammar gap and fails the build.
    pub(super) fn translate_expression_statement(&mut self, p: &Production, parent: NodeId) -> Result<Expression, BuildError> {
        match p.nodes().next() {
            Some(expression) if expression.rule.is_expression() => {
                self.translate_expression(expression, &Cx::new(parent))
            }
            _ => Err(Self::unsupported("ExpressionStatement", p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use solast_parser::{ParseTree, Production, Rule};

    use crate::{build, BuildError, BuildOptions};

    const SOURCE: &str = "contract C {\n    function f() public {\n        g();\n        uint256 kept;\n    }\n}\n";

    fn find_mut(p: &mut Production, rule: Rule) -> Option<&mut Production> {
        if p.rule == rule {
            return Some(p);
        }
        p.children.iter_mut().find_map(|child| match child {
            ParseTree::Node(node) => find_mut(node, rule),
            ParseTree::Terminal(_) => None,
        })
    }

    /// `g();` with its call relabelled as a block.
    fn tree_with_block_statement() -> Production {
        let (mut parsed, lex_errors) = solast_parser::parse_source(SOURCE);
        assert!(lex_errors.is_empty() && parsed.is_ok());
        let statement = find_mut(&mut parsed.tree, Rule::ExpressionStatement).expect("expression statement");
        match statement.children.first_mut() {
            Some(ParseTree::Node(expression)) => expression.rule = Rule::Block,
            other => panic!("expected an expression child, got {other:?}"),
        }
        parsed.tree
    }

    #[test]
    fn non_expression_child_fails_the_build() {
        match build(&tree_with_block_statement(), BuildOptions::default()) {
            Err(BuildError::UnsupportedProduction { translator, rule, line, .. }) => {
                assert_eq!(translator, "ExpressionStatement");
                assert_eq!(rule, Rule::ExpressionStatement);
                assert_eq!(line, 3);
            }
            other => panic!("expected an unsupported production, got {other:?}"),
        }
    }

    #[test]
    fn non_expression_child_is_skipped_on_request() {
        let out = build(&tree_with_block_statement(), BuildOptions::default().skip_unsupported()).expect("build");
        assert_eq!(out.skipped.len(), 1);
        assert!(matches!(
            out.skipped[0],
            BuildError::UnsupportedProduction { translator: "ExpressionStatement", .. }
        ));
        let function = out.unit.contract("C").and_then(|c| c.function("f")).expect("f");
        let statements = &function.body.as_ref().expect("body").statements;
        assert_eq!(statements.len(), 1);
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for Solidity source.
//!
//! Turns a token stream into a concrete parse tree: every node is a
//! [`Production`] labelled with the grammar [`Rule`] it matched, holding
//! its child productions and terminal tokens in source order.

mod hints;
mod parser;
pub mod tree;

pub use parser::{ParseError, ParseResult, Parser};
pub use tree::{ParseTree, Production, Rule};

/// Lex and parse `source` in one call. Lex errors are returned alongside
/// the parse result.
pub fn parse_source(source: &str) -> (ParseResult, Vec<solast_lexer::LexError>) {
    let lexed = solast_lexer::tokenize(source);
    let parsed = Parser::new(lexed.tokens).parse();
    (parsed, lexed.errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solast_ast::token::TokenKind;

    fn parse(src: &str) -> ParseResult {
        let lex_result = solast_lexer::Lexer::new(src).tokenize();
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        Parser::new(lex_result.tokens).parse()
    }

    fn parse_ok(src: &str) -> Production {
        let result = parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        result.tree
    }

    fn contract_members(src: &str) -> Vec<Production> {
        let tree = parse_ok(src);
        let contract = tree.child(Rule::ContractDefinition).expect("contract").clone();
        contract.nodes().filter(|n| n.rule != Rule::InheritanceSpecifier).cloned().collect()
    }

    /// First expression of the first statement of the first function.
    fn first_expression(body: &str) -> Production {
        let src = format!("contract C {{ function f() public {{ {body} }} }}");
        let members = contract_members(&src);
        let block = members[0].child(Rule::Block).expect("body").clone();
        let statement = block.nodes().next().expect("statement").clone();
        let expression = statement.nodes().next().expect("expression").clone();
        expression
    }

    #[test]
    fn parse_pragma_and_imports() {
        let tree = parse_ok(
            r#"pragma solidity ^0.8.0;
            import "./A.sol";
            import "./B.sol" as B;
            import * as C from "./C.sol";
            import {D, E as F} from "./D.sol";"#,
        );
        let rules: Vec<Rule> = tree.nodes().map(|n| n.rule).collect();
        assert_eq!(rules[0], Rule::PragmaDirective);
        assert_eq!(rules[1..].iter().filter(|r| **r == Rule::ImportDirective).count(), 4);

        let grouped = tree.nodes().nth(4).unwrap();
        assert_eq!(grouped.children_of(Rule::ImportAlias).count(), 2);
    }

    #[test]
    fn parse_contract_header() {
        let tree = parse_ok("abstract contract Token is Base(1), Other { }");
        let contract = tree.child(Rule::ContractDefinition).unwrap();
        assert!(contract.has_terminal(&TokenKind::Abstract));
        assert_eq!(contract.identifier(), Some("Token"));
        let bases: Vec<_> = contract.children_of(Rule::InheritanceSpecifier).collect();
        assert_eq!(bases.len(), 2);
        assert!(bases[0].child(Rule::CallArgumentList).is_some());
        assert_eq!(contract.start.text, "abstract");
        assert_eq!(contract.stop.text, "}");
    }

    #[test]
    fn parse_contract_members() {
        let members = contract_members(
            "contract C {
                uint256 public total;
                mapping(address => uint) balances;
                event Transfer(address indexed from, address to, uint value);
                error Insufficient(uint needed);
                struct Point { uint x; uint y; }
                enum Color { Red, Green }
                type Price is uint128;
                using Math for uint;
                modifier onlyOwner() { _; }
                constructor(uint x) payable { }
                function get() external view returns (uint) { return total; }
                fallback() external { }
                receive() external payable { }
            }",
        );
        let rules: Vec<Rule> = members.iter().map(|m| m.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::StateVariableDeclaration,
                Rule::StateVariableDeclaration,
                Rule::EventDefinition,
                Rule::ErrorDefinition,
                Rule::StructDefinition,
                Rule::EnumDefinition,
                Rule::UserDefinedValueTypeDefinition,
                Rule::UsingDirective,
                Rule::ModifierDefinition,
                Rule::ConstructorDefinition,
                Rule::FunctionDefinition,
                Rule::FallbackFunctionDefinition,
                Rule::ReceiveFunctionDefinition,
            ]
        );
    }

    #[test]
    fn parse_function_with_modifiers_and_returns() {
        let members = contract_members(
            "contract C { function f(uint a, bytes memory b) public virtual override(A, B) onlyOwner(1) returns (bool ok) { } }",
        );
        let function = &members[0];
        assert_eq!(function.identifier(), Some("f"));
        assert!(function.has_terminal(&TokenKind::Public));
        assert!(function.has_terminal(&TokenKind::Virtual));
        assert!(function.child(Rule::OverrideSpecifier).is_some());
        assert_eq!(function.children_of(Rule::ModifierInvocation).count(), 1);
        assert_eq!(function.children_of(Rule::ParameterList).count(), 2);
        let params = function.child(Rule::ParameterList).unwrap();
        assert_eq!(params.children_of(Rule::ParameterDeclaration).count(), 2);
    }

    #[test]
    fn parse_mapping_and_array_types() {
        let members = contract_members("contract C { mapping(address => mapping(uint => bool[])) m; uint[3][] grid; }");
        let mapping = members[0].child(Rule::TypeName).unwrap().child(Rule::MappingType).unwrap();
        assert!(mapping.child(Rule::MappingKeyType).is_some());
        let value = mapping.child(Rule::TypeName).unwrap();
        assert!(value.child(Rule::MappingType).is_some());

        // uint[3][] nests as TypeName(TypeName(TypeName(uint) [3]) [])
        let grid = members[1].child(Rule::TypeName).unwrap();
        assert!(grid.has_terminal(&TokenKind::LBracket));
        let inner = grid.child(Rule::TypeName).unwrap();
        assert!(inner.child(Rule::PrimaryExpression).is_some());
    }

    #[test]
    fn operator_precedence() {
        let expr = first_expression("x = a + b * c;");
        assert_eq!(expr.rule, Rule::Assignment);
        let rhs = expr.nodes().nth(1).unwrap();
        assert_eq!(rhs.rule, Rule::AddSubOperation);
        assert_eq!(rhs.nodes().nth(1).unwrap().rule, Rule::MulDivModOperation);
    }

    #[test]
    fn exponent_is_right_associative() {
        let expr = first_expression("a ** b ** c;");
        assert_eq!(expr.rule, Rule::ExpOperation);
        assert_eq!(expr.nodes().next().unwrap().rule, Rule::PrimaryExpression);
        assert_eq!(expr.nodes().nth(1).unwrap().rule, Rule::ExpOperation);
    }

    #[test]
    fn conditional_and_comparisons() {
        let expr = first_expression("x = a < b && c == d ? 1 : 2;");
        let rhs = expr.nodes().nth(1).unwrap();
        assert_eq!(rhs.rule, Rule::Conditional);
        assert_eq!(rhs.nodes().next().unwrap().rule, Rule::AndOperation);
    }

    #[test]
    fn postfix_chain() {
        let expr = first_expression("token.balances[msg.sender].push(1);");
        assert_eq!(expr.rule, Rule::FunctionCall);
        let callee = expr.nodes().next().unwrap();
        assert_eq!(callee.rule, Rule::MemberAccess);
        assert_eq!(callee.nodes().next().unwrap().rule, Rule::IndexAccess);
    }

    #[test]
    fn call_options_need_named_entries() {
        let expr = first_expression("target.call{value: 1, gas: 2}(data);");
        assert_eq!(expr.rule, Rule::FunctionCall);
        let callee = expr.nodes().next().unwrap();
        assert_eq!(callee.rule, Rule::FunctionCallOptions);
        assert_eq!(callee.children_of(Rule::NamedArgument).count(), 2);
    }

    #[test]
    fn literals_and_units() {
        let expr = first_expression("x = 1 ether;");
        let literal = expr.nodes().nth(1).unwrap().child(Rule::Literal).unwrap();
        let number = literal.child(Rule::NumberLiteral).unwrap();
        assert_eq!(number.terminals().count(), 2);

        let expr = first_expression(r#"s = "ab" "cd";"#);
        let literal = expr.nodes().nth(1).unwrap().child(Rule::Literal).unwrap();
        assert_eq!(literal.child(Rule::StringLiteral).unwrap().terminals().count(), 2);
    }

    #[test]
    fn tuples_keep_empty_slots() {
        let expr = first_expression("(a, , b) = f();");
        let tuple = expr.nodes().next().unwrap();
        assert_eq!(tuple.rule, Rule::Tuple);
        assert_eq!(tuple.nodes().count(), 2);
        assert_eq!(tuple.terminals().filter(|t| t.is(&TokenKind::Comma)).count(), 2);
    }

    #[test]
    fn declaration_statements() {
        let src = "contract C { function f() public {
            uint x = 1;
            bytes memory data;
            (uint a, , bool b) = g();
            Point storage p = points[0];
            x = 2;
            items[i] = 3;
        } }";
        let members = contract_members(src);
        let block = members[0].child(Rule::Block).unwrap();
        let rules: Vec<Rule> = block.nodes().map(|n| n.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::VariableDeclarationStatement,
                Rule::VariableDeclarationStatement,
                Rule::VariableDeclarationStatement,
                Rule::VariableDeclarationStatement,
                Rule::ExpressionStatement,
                Rule::ExpressionStatement,
            ]
        );
        let tuple = block.nodes().nth(2).unwrap().child(Rule::VariableDeclarationTuple).unwrap();
        assert_eq!(tuple.children_of(Rule::VariableDeclaration).count(), 2);
    }

    #[test]
    fn control_flow_statements() {
        let src = "contract C { function f() public {
            if (a) { b; } else c;
            for (uint i = 0; i < 10; i++) { continue; }
            while (x) break;
            do { x--; } while (x > 0);
            unchecked { y += 1; }
            emit Done(1);
            revert Failed();
            return;
        } }";
        let members = contract_members(src);
        let block = members[0].child(Rule::Block).unwrap();
        let rules: Vec<Rule> = block.nodes().map(|n| n.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::IfStatement,
                Rule::ForStatement,
                Rule::WhileStatement,
                Rule::DoWhileStatement,
                Rule::UncheckedBlock,
                Rule::EmitStatement,
                Rule::RevertStatement,
                Rule::ReturnStatement,
            ]
        );
        let emit = block.child(Rule::EmitStatement).unwrap();
        assert!(emit.child(Rule::PrimaryExpression).is_some());
        assert!(emit.child(Rule::CallArgumentList).is_some());
    }

    #[test]
    fn revert_call_is_an_expression() {
        let expr = first_expression(r#"revert("no");"#);
        assert_eq!(expr.rule, Rule::FunctionCall);
    }

    #[test]
    fn placeholder_statement() {
        let members = contract_members("contract C { modifier m() { _; } }");
        let block = members[0].child(Rule::Block).unwrap();
        let statement = block.nodes().next().unwrap();
        assert_eq!(statement.rule, Rule::ExpressionStatement);
        assert_eq!(statement.text(), "_;");
    }

    #[test]
    fn free_declarations() {
        let tree = parse_ok(
            "function add(uint a, uint b) pure returns (uint) { return a + b; }
             uint constant LIMIT = 10;
             struct S { uint v; }
             error Bad();",
        );
        let rules: Vec<Rule> = tree.nodes().map(|n| n.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::FunctionDefinition,
                Rule::ConstantVariableDeclaration,
                Rule::StructDefinition,
                Rule::ErrorDefinition,
            ]
        );
    }

    #[test]
    fn error_recovery_keeps_later_members() {
        let result = parse("contract C { uint x = ; function f() public { } }");
        assert_eq!(result.errors.len(), 1);
        let contract = result.tree.child(Rule::ContractDefinition).unwrap();
        assert!(contract.child(Rule::FunctionDefinition).is_some());
    }

    #[test]
    fn error_recovery_between_contracts() {
        let result = parse("contract A { } garbage here; contract B { }");
        assert!(!result.is_ok());
        assert_eq!(result.tree.children_of(Rule::ContractDefinition).count(), 2);
    }

    #[test]
    fn missing_semicolon_has_hint() {
        let result = parse("contract C { uint x }");
        assert!(!result.is_ok());
        let error = &result.errors[0];
        assert!(error.message.contains("';'"), "{}", error.message);
        assert!(error.hint.is_some());
    }

    #[test]
    fn assembly_is_rejected() {
        let result = parse("contract C { function f() public { assembly { } } }");
        assert!(!result.is_ok());
        assert!(result.errors[0].message.contains("assembly"));
    }

    #[test]
    fn error_count_is_capped() {
        let src = "x ".repeat(100);
        let result = parse(&src);
        assert!(result.errors.len() <= 20);
    }

    #[test]
    fn parse_source_reports_lex_errors() {
        let (result, lex_errors) = parse_source("contract C { uint x = 1 # 2; }");
        assert!(!lex_errors.is_empty());
        assert!(result.tree.child(Rule::ContractDefinition).is_some() || !result.is_ok());
    }
}

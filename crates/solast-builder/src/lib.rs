// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Typed AST construction for Solidity.
//!
//! The builder walks a parse tree once, top-down, turning each production
//! into a typed node: ids are allocated depth-first, source positions are
//! captured, type descriptions are derived, and names are resolved against
//! the declarations seen so far. Names that cannot be resolved yet are
//! deferred and retried in a second pass once every declaration of the
//! unit is registered.

mod error;
mod options;
mod translator;

pub use error::{BuildError, BuildWarning, SourceError, WarningKind};
pub use options::{BuildOptions, UnsupportedPolicy};

use solast_ast::decl::SourceUnit;
use solast_ast::TypeTable;
use solast_parser::Production;
use solast_resolve::{DeclarationTable, SymbolTable};

use translator::Translator;

/// Everything a successful build produces.
#[derive(Debug)]
pub struct BuildOutput {
    pub unit: SourceUnit,
    pub warnings: Vec<BuildWarning>,
    /// Unsupported productions dropped under [`UnsupportedPolicy::Skip`].
    pub skipped: Vec<BuildError>,
    /// Structure behind every composite type identifier in `unit`.
    pub types: TypeTable,
    /// Number of node ids handed out.
    pub node_count: u32,
}

/// Builds one source unit against a caller-provided symbol table.
pub struct Builder<'r> {
    resolver: &'r mut dyn SymbolTable,
    options: BuildOptions,
}

impl<'r> Builder<'r> {
    pub fn new(resolver: &'r mut dyn SymbolTable, options: BuildOptions) -> Self {
        Self { resolver, options }
    }

    pub fn build(self, tree: &Production) -> Result<BuildOutput, BuildError> {
        let mut translator = Translator::new(self.resolver, self.options);
        let unit = translator.translate(tree)?;
        Ok(translator.finish(unit))
    }
}

/// Build `tree` with a fresh [`DeclarationTable`].
pub fn build(tree: &Production, options: BuildOptions) -> Result<BuildOutput, BuildError> {
    let mut table = DeclarationTable::new();
    Builder::new(&mut table, options).build(tree)
}

/// Lex, parse and build `source`. Any lex or parse error stops the build.
pub fn build_source(source: &str, options: BuildOptions) -> Result<BuildOutput, SourceError> {
    let (parsed, lex_errors) = solast_parser::parse_source(source);
    if !lex_errors.is_empty() {
        return Err(SourceError::Lex(lex_errors));
    }
    if !parsed.is_ok() {
        return Err(SourceError::Parse(parsed.errors));
    }
    Ok(build(&parsed.tree, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solast_ast::expr::{Expression, FunctionCallKind};
    use solast_ast::stmt::Statement;
    use solast_ast::visit::descendants;
    use solast_ast::{NodeKind, NodeRef};

    fn body(source: &str) -> Vec<Statement> {
        let out = build_source(source, BuildOptions::default()).unwrap();
        let contract = out.unit.contracts().next().unwrap();
        let function = contract.functions().last().unwrap();
        function.body.clone().unwrap().statements
    }

    fn expressions(out: &BuildOutput) -> Vec<Expression> {
        descendants(NodeRef::SourceUnit(&out.unit))
            .into_iter()
            .filter_map(|n| match n {
                NodeRef::Expression(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn untyped_argument_takes_the_call_type() {
        let source = "contract C { function f(uint256 a) internal returns (uint256) { return a; } function g() public { f(missing); } }";
        let out = build_source(source, BuildOptions::default()).unwrap();
        let missing = expressions(&out)
            .into_iter()
            .find_map(|e| match e {
                Expression::Primary(p) if p.name == "missing" => Some(p),
                _ => None,
            })
            .unwrap();
        assert_eq!(missing.referenced_declaration, None);
        assert_eq!(missing.type_description.map(|td| td.type_identifier).as_deref(), Some("t_uint256"));
    }

    #[test]
    fn empty_contract() {
        let out = build_source("contract C {}", BuildOptions::default()).unwrap();
        let contract = out.unit.contract("C").unwrap();
        assert_eq!(contract.type_description.type_identifier, format!("t_contract$_C_${}", contract.id));
        assert_eq!(contract.type_description.type_string, "contract C");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn conversions_and_struct_constructors() {
        let source = "contract C { struct P { uint256 a; } function f(address a) public { payable(a); uint8(1); P(2); } }";
        let statements = body(source);
        let kinds: Vec<FunctionCallKind> = statements
            .iter()
            .map(|s| match s {
                Statement::Expression(Expression::FunctionCall(call)) => call.kind,
                other => panic!("not a call: {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            [FunctionCallKind::TypeConversion, FunctionCallKind::TypeConversion, FunctionCallKind::StructConstructorCall]
        );
        let Statement::Expression(payable) = &statements[0] else { unreachable!() };
        assert_eq!(payable.type_description().unwrap().type_identifier, "t_address_payable");
    }

    #[test]
    fn named_arguments_keep_their_names() {
        let source = "contract C { function g(uint256 a, bool b) public {} function f() public { g({b: true, a: 1}); } }";
        let statements = body(source);
        let Statement::Expression(Expression::FunctionCall(call)) = &statements[0] else {
            panic!("expected a call");
        };
        assert_eq!(call.names, ["b", "a"]);
        assert_eq!(call.argument_types.len(), 2);
        assert_eq!(call.argument_types[0].as_ref().unwrap().type_identifier, "t_bool");
        let callee = call.expression.as_primary().unwrap();
        assert_eq!(callee.argument_types, call.argument_types);
    }

    #[test]
    fn comparison_and_logic_yield_bool() {
        let source = "contract C { function f(uint256 a) public { a > 1 && a != 3; } }";
        let out = build_source(source, BuildOptions::default()).unwrap();
        for e in expressions(&out) {
            if let Expression::BinaryOperation(b) = &e {
                assert_eq!(b.type_description.as_ref().unwrap().type_identifier, "t_bool");
            }
        }
    }

    #[test]
    fn tuples_and_inline_arrays() {
        let source = "contract C { function f() public { (uint256 a, , bool c) = (1, 2, true); [uint8(1), 2, 3]; } }";
        let statements = body(source);
        let Statement::VariableDeclaration(decl) = &statements[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(decl.declarations.len(), 3);
        assert!(decl.declarations[1].is_none());
        assert_eq!(decl.declarations[2].as_ref().unwrap().name, "c");

        let Statement::Expression(Expression::Tuple(array)) = &statements[1] else {
            panic!("expected an inline array");
        };
        assert!(array.is_inline_array);
        assert_eq!(array.type_description.as_ref().unwrap().type_identifier, "t_array$_t_uint8_$3");
    }

    #[test]
    fn for_header_scope_closes_after_the_loop() {
        let source = "contract C { uint256 i; function f() public { for (uint256 i = 0; i < 3; i++) {} i; } }";
        let out = build_source(source, BuildOptions::default()).unwrap();
        let state = out.unit.contract("C").unwrap().state_variables().next().unwrap().id;
        let uses: Vec<_> = expressions(&out)
            .into_iter()
            .filter_map(|e| match e {
                Expression::Primary(p) if p.node_type == NodeKind::Identifier && p.name == "i" => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(uses.len(), 3);
        assert_ne!(uses[0].referenced_declaration, Some(state));
        assert_eq!(uses[0].referenced_declaration, uses[1].referenced_declaration);
        assert_eq!(uses[2].referenced_declaration, Some(state));
    }

    #[test]
    fn return_points_at_the_return_list() {
        let source = "contract C { function f() public pure returns (uint256 r) { return 1; } }";
        let out = build_source(source, BuildOptions::default()).unwrap();
        let function = out.unit.contract("C").unwrap().function("f").unwrap();
        let Some(Statement::Return(ret)) = function.body.as_ref().unwrap().statements.first() else {
            panic!("expected a return");
        };
        assert_eq!(ret.function_return_parameters, function.return_parameters.id);
    }

    #[test]
    fn sub_denominations_scale_the_value() {
        let source = "contract C { uint256 constant T = 2 days; }";
        let out = build_source(source, BuildOptions::default()).unwrap();
        let literal = expressions(&out)
            .into_iter()
            .find_map(|e| match e {
                Expression::Primary(p) if p.node_type == NodeKind::Literal => Some(p),
                _ => None,
            })
            .unwrap();
        assert_eq!(literal.subdenomination.as_deref(), Some("days"));
        assert_eq!(literal.type_description.unwrap().type_identifier, "rational_172800_by_1");
    }

    #[test]
    fn lex_errors_stop_the_build() {
        assert!(matches!(build_source("contract C { § }", BuildOptions::default()), Err(SourceError::Lex(_))));
        assert!(matches!(build_source("contract {", BuildOptions::default()), Err(SourceError::Parse(_))));
    }
}

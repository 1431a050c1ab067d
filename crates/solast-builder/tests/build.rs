// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end builds of the fixtures under `tests/fixtures`.

use solast_ast::decl::{SourceUnit, VariableDeclaration};
use solast_ast::expr::{Expression, PrimaryExpression};
use solast_ast::visit::descendants;
use solast_ast::{Node, NodeId, NodeKind, NodeRef};
use solast_builder::{build_source, BuildError, BuildOptions, BuildOutput, SourceError, WarningKind};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"))
}

fn build_with(source: &str, options: BuildOptions) -> BuildOutput {
    build_source(source, options).unwrap_or_else(|e| panic!("build failed: {e}"))
}

fn build(name: &str) -> BuildOutput {
    build_with(&fixture(name), BuildOptions::default())
}

fn nodes(unit: &SourceUnit) -> Vec<NodeRef<'_>> {
    descendants(NodeRef::SourceUnit(unit))
}

fn primaries<'a>(unit: &'a SourceUnit, name: &str) -> Vec<&'a PrimaryExpression> {
    nodes(unit)
        .into_iter()
        .filter_map(|n| match n {
            NodeRef::Expression(Expression::Primary(p)) if p.name == name => Some(p),
            _ => None,
        })
        .collect()
}

fn literal<'a>(unit: &'a SourceUnit, value: &str) -> &'a PrimaryExpression {
    nodes(unit)
        .into_iter()
        .find_map(|n| match n {
            NodeRef::Expression(Expression::Primary(p)) if p.node_type == NodeKind::Literal && p.value == value => Some(p),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no literal `{value}`"))
}

fn variables<'a>(unit: &'a SourceUnit, name: &str) -> Vec<&'a VariableDeclaration> {
    nodes(unit)
        .into_iter()
        .filter_map(|n| match n {
            NodeRef::Variable(v) if v.name == name => Some(v),
            _ => None,
        })
        .collect()
}

fn state_variable<'a>(unit: &'a SourceUnit, contract: &str, name: &str) -> &'a VariableDeclaration {
    unit.contract(contract)
        .and_then(|c| c.state_variables().find(|v| v.name == name))
        .unwrap_or_else(|| panic!("no state variable {contract}.{name}"))
}

fn identifier_of(td: Option<&solast_ast::TypeDescription>) -> Option<&str> {
    td.map(|t| t.type_identifier.as_str())
}

// ---------------------------------------------------------------------------
// Whole-tree properties
// ---------------------------------------------------------------------------

#[test]
fn translation_is_deterministic() {
    let shape = |out: &BuildOutput| -> Vec<(NodeKind, usize, usize, Option<String>)> {
        nodes(&out.unit)
            .into_iter()
            .map(|n| (n.kind(), n.src().start, n.src().end, n.type_description().map(|t| t.type_identifier.clone())))
            .collect()
    };
    for name in ["token.sol", "registry.sol", "shadow.sol"] {
        assert_eq!(shape(&build(name)), shape(&build(name)), "{name}");
    }
}

#[test]
fn every_span_is_inclusive() {
    for name in ["token.sol", "registry.sol", "shadow.sol"] {
        let out = build(name);
        for node in nodes(&out.unit) {
            let src = node.src();
            assert_eq!(src.length, src.end - src.start + 1, "{} in {name}", node.kind());
            assert!(src.line >= 1, "{} in {name}", node.kind());
        }
    }
}

#[test]
fn ids_are_unique() {
    let out = build("token.sol");
    let mut ids: Vec<NodeId> = nodes(&out.unit).into_iter().map(|n| n.id()).collect();
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert!(ids.iter().all(|id| !id.is_root()));
    assert!(out.node_count as usize >= count);
}

// ---------------------------------------------------------------------------
// Type descriptions
// ---------------------------------------------------------------------------

#[test]
fn mapping_types() {
    let out = build("token.sol");
    let balances = state_variable(&out.unit, "Token", "balances");
    let td = balances.type_description.as_ref().expect("typed");
    assert_eq!(td.type_identifier, "mapping_$t_address_$t_uint256$");
    assert_eq!(td.type_string, "mapping(address => uint256)");
    let type_name = balances.type_name.as_ref().expect("type name");
    assert_eq!(type_name.name, "mapping(address => uint256)");
    assert_eq!(type_name.node_type, NodeKind::MappingTypeName);

    let allowances = state_variable(&out.unit, "Token", "allowances");
    let td = allowances.type_description.as_ref().expect("typed");
    assert_eq!(td.type_identifier, "mapping_$t_address_$mapping_$t_address_$t_uint256$$");
    assert_eq!(td.type_string, "mapping(address => mapping(address => uint256))");
}

#[test]
fn mapping_type_string_follows_the_written_names() {
    let source = "contract Vault {}\ncontract C {\n    mapping(uint => Entry) entries;\n    mapping(address => Vault) vaults;\n    struct Entry { uint a; }\n}\n";
    let out = build_with(source, BuildOptions::default());
    let vault = out.unit.contract("Vault").expect("Vault").id;

    let entries = state_variable(&out.unit, "C", "entries");
    let type_name = entries.type_name.as_ref().expect("type name");
    let td = entries.type_description.as_ref().expect("typed");
    assert_eq!(type_name.name, "mapping(uint => Entry)");
    assert_eq!(td.type_string, type_name.name);
    assert!(td.type_identifier.starts_with("mapping_$t_uint256_$t_struct$_Entry_$"));

    let vaults = state_variable(&out.unit, "C", "vaults");
    let td = vaults.type_description.as_ref().expect("typed");
    assert_eq!(td.type_string, "mapping(address => Vault)");
    assert_eq!(td.type_identifier, format!("mapping_$t_address_$t_contract$_Vault_${vault}$"));
    assert_eq!(vaults.type_name.as_ref().map(|t| t.name.as_str()), Some(td.type_string.as_str()));
}

#[test]
fn elementary_type_names_keep_their_spelling() {
    let source = "contract C { function f() public { uint a = uint(1); } }";
    let out = build_with(source, BuildOptions::default());
    let a = &variables(&out.unit, "a")[0];
    let type_name = a.type_name.as_ref().expect("type name");
    assert_eq!(type_name.name, "uint");
    assert_eq!(identifier_of(type_name.type_description.as_ref()), Some("t_uint256"));
    assert_eq!(identifier_of(a.type_description.as_ref()), Some("t_uint256"));

    let conversion = nodes(&out.unit)
        .into_iter()
        .find_map(|n| match n {
            NodeRef::Expression(Expression::Primary(p)) if p.node_type == NodeKind::ElementaryTypeNameExpression => Some(p),
            _ => None,
        })
        .expect("type conversion");
    assert_eq!(conversion.name, "uint");
    assert_eq!(identifier_of(conversion.type_description.as_ref()), Some("t_uint256"));
}

#[test]
fn huge_exponent_is_a_malformed_literal() {
    let source = "contract C { function f() public { 1e-9223372036854775808; 1e4000000000; } }";
    let out = build_with(source, BuildOptions::default());
    for value in ["1e-9223372036854775808", "1e4000000000"] {
        let node = literal(&out.unit, value);
        assert!(node.malformed, "{value}");
        assert_eq!(identifier_of(node.type_description.as_ref()), Some("rational_0_by_1"));
        assert!(out.warnings.iter().any(|w| w.kind == WarningKind::MalformedLiteral && w.node == node.id));
    }
}

#[test]
fn number_literals() {
    let out = build("registry.sol");
    let fixed = literal(&out.unit, "12.5");
    let td = fixed.type_description.as_ref().expect("typed");
    assert_eq!(td.type_identifier, "rational_125_by_10");
    assert_eq!(td.type_string, "fixed_const 12.5");

    let int = literal(&out.unit, "42");
    let td = int.type_description.as_ref().expect("typed");
    assert_eq!(td.type_identifier, "rational_42_by_1");
    assert_eq!(td.type_string, "int_const 42");
    assert!(int.is_pure);
    assert!(!int.malformed);
}

#[test]
fn string_literal_hex_value() {
    let out = build("token.sol");
    let hello = literal(&out.unit, "hello");
    assert_eq!(hello.hex_value, "68656c6c6f");
    assert_eq!(identifier_of(hello.type_description.as_ref()), Some("t_string_literal"));
}

#[test]
fn msg_is_always_the_message_context() {
    let out = build("shadow.sol");
    // a state variable named `msg` does not capture the global
    assert_eq!(variables(&out.unit, "msg").len(), 1);
    let uses = primaries(&out.unit, "msg");
    assert!(!uses.is_empty());
    for msg in uses {
        assert_eq!(identifier_of(msg.type_description.as_ref()), Some("t_magic_message"));
        assert_eq!(msg.referenced_declaration, None);
    }
}

#[test]
fn member_and_index_types() {
    let out = build("token.sol");
    let sender = nodes(&out.unit).into_iter().find_map(|n| match n {
        NodeRef::Expression(Expression::MemberAccess(m)) if m.member_name == "sender" => Some(m),
        _ => None,
    });
    assert_eq!(identifier_of(sender.and_then(|m| m.type_description.as_ref())), Some("t_address"));

    let nested = nodes(&out.unit).into_iter().find_map(|n| match n {
        NodeRef::Expression(Expression::IndexAccess(i)) if matches!(i.base, Expression::IndexAccess(_)) => Some(i),
        _ => None,
    });
    assert_eq!(identifier_of(nested.and_then(|i| i.type_description.as_ref())), Some("t_uint256"));
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn innermost_local_wins() {
    let out = build("shadow.sol");
    let declared = variables(&out.unit, "x");
    // state variable, parameter, block local
    assert_eq!(declared.len(), 3);
    let (parameter, local) = (declared[1].id, declared[2].id);

    let uses = primaries(&out.unit, "x");
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[0].referenced_declaration, Some(parameter));
    assert_eq!(uses[1].referenced_declaration, Some(local));
    assert_eq!(identifier_of(uses[1].type_description.as_ref()), Some("t_uint256"));
}

#[test]
fn now_and_tx_are_ordinary_names() {
    let source = "contract C {\n    function f() public returns (uint) { uint now = 5; return now; }\n    function g() public view returns (uint) { return now; }\n    function h() public view returns (address) { return tx.origin; }\n}\n";
    let out = build_with(source, BuildOptions { report_unresolved: true, ..BuildOptions::default() });
    let local = variables(&out.unit, "now")[0].id;

    let uses = primaries(&out.unit, "now");
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[0].referenced_declaration, Some(local));
    assert_eq!(identifier_of(uses[0].type_description.as_ref()), Some("t_uint256"));
    // without a declaration, the global
    assert_eq!(uses[1].referenced_declaration, None);
    assert_eq!(identifier_of(uses[1].type_description.as_ref()), Some("t_uint256"));

    let tx = &primaries(&out.unit, "tx")[0];
    assert_eq!(identifier_of(tx.type_description.as_ref()), Some("t_magic_transaction"));
    assert!(out.warnings.is_empty());
}

#[test]
fn placeholder_is_its_own_node() {
    let out = build("token.sol");
    let placeholders = primaries(&out.unit, "_");
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].node_type, NodeKind::PlaceholderStatement);
    assert_eq!(placeholders[0].type_description, None);
    assert_eq!(placeholders[0].referenced_declaration, None);
}

#[test]
fn forward_function_reference_resolves_in_phase_two() {
    let source = fixture("token.sol");
    let out = build_with(&source, BuildOptions::default());
    let mint = out.unit.contract("Token").and_then(|c| c.function("mint")).expect("mint").id;
    let call = &primaries(&out.unit, "mint")[0];
    assert_eq!(call.referenced_declaration, Some(mint));
    assert!(identifier_of(call.type_description.as_ref())
        .is_some_and(|id| id.starts_with("t_function_internal_nonpayable$_t_address_$_t_uint256_$")));

    let options = BuildOptions { resolve_deferred: false, ..BuildOptions::default() };
    let out = build_with(&source, options);
    assert_eq!(primaries(&out.unit, "mint")[0].referenced_declaration, None);
}

#[test]
fn forward_struct_reference_completes_declaration_types() {
    let out = build("registry.sol");
    let entry = nodes(&out.unit)
        .into_iter()
        .find_map(|n| match n {
            NodeRef::Struct(s) if s.name == "Entry" => Some(s.id),
            _ => None,
        })
        .expect("struct Entry");

    let entries = state_variable(&out.unit, "Registry", "entries");
    assert_eq!(
        identifier_of(entries.type_description.as_ref()),
        Some(format!("mapping_$t_uint256_$t_struct$_Entry_${entry}$").as_str())
    );
    let value_type = entries.type_name.as_ref().and_then(|t| t.value_type.as_ref()).expect("value type");
    assert_eq!(value_type.referenced_declaration, Some(entry));
    assert_eq!(value_type.path_node.as_ref().and_then(|p| p.referenced_declaration), Some(entry));

    let history = state_variable(&out.unit, "Registry", "history");
    assert_eq!(
        identifier_of(history.type_description.as_ref()),
        Some(format!("t_array$_t_struct$_Entry_${entry}_$dyn").as_str())
    );

    // `entries[key]` was typed after the mapping was completed
    let index = nodes(&out.unit).into_iter().find_map(|n| match n {
        NodeRef::Expression(Expression::IndexAccess(i)) => Some(i),
        _ => None,
    });
    assert_eq!(
        identifier_of(index.and_then(|i| i.type_description.as_ref())),
        Some(format!("t_struct$_Entry_${entry}").as_str())
    );
    assert!(out.warnings.iter().all(|w| w.kind != WarningKind::UnresolvedReference));
}

#[test]
fn unresolved_names_are_reported_on_request() {
    let source = fixture("registry.sol");
    let options = BuildOptions { resolve_deferred: false, report_unresolved: true, ..BuildOptions::default() };
    let out = build_with(&source, options);
    let unresolved: Vec<_> = out.warnings.iter().filter(|w| w.kind == WarningKind::UnresolvedReference).collect();
    assert!(!unresolved.is_empty());
    assert!(unresolved.iter().all(|w| w.message.contains("Entry")));
    assert_eq!(state_variable(&out.unit, "Registry", "entries").type_description, None);

    let quiet = build_with(&source, BuildOptions { resolve_deferred: false, ..BuildOptions::default() });
    assert!(quiet.warnings.iter().all(|w| w.kind != WarningKind::UnresolvedReference));
}

#[test]
fn undeclared_names_stay_unresolved() {
    let source = "contract C { function f() public { g(1); } }";
    let options = BuildOptions { report_unresolved: true, ..BuildOptions::default() };
    let out = build_with(source, options);
    let g = &primaries(&out.unit, "g")[0];
    assert_eq!(g.referenced_declaration, None);
    assert_eq!(g.type_description, None);
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].node, g.id);
}

// ---------------------------------------------------------------------------
// Warnings and errors
// ---------------------------------------------------------------------------

#[test]
fn array_length_expression_is_kept_and_reported() {
    let out = build("registry.sol");
    let slots = state_variable(&out.unit, "Registry", "slots");
    let type_name = slots.type_name.as_ref().expect("type name");
    assert_eq!(type_name.length.as_deref(), Some("SIZE"));
    assert_eq!(identifier_of(slots.type_description.as_ref()), Some("t_array$_t_uint256_$SIZE"));
    let warning = out
        .warnings
        .iter()
        .find(|w| w.kind == WarningKind::TypeNameExpression)
        .expect("type name warning");
    assert_eq!(warning.node, type_name.id);
}

#[test]
fn function_type_names_abort_by_default() {
    let source = "contract C {\n    function (uint256) external callback;\n    uint256 kept;\n}\n";
    match build_source(source, BuildOptions::default()) {
        Err(SourceError::Build(BuildError::FunctionTypeName { line, .. })) => assert_eq!(line, 2),
        other => panic!("expected a function type error, got {other:?}"),
    }
}

#[test]
fn function_type_names_can_be_skipped() {
    let source = "contract C {\n    function (uint256) external callback;\n    uint256 kept;\n}\n";
    let out = build_with(source, BuildOptions::default().skip_unsupported());
    assert_eq!(out.skipped.len(), 1);
    assert!(matches!(out.skipped[0], BuildError::FunctionTypeName { .. }));
    let names: Vec<&str> =
        out.unit.contract("C").expect("C").state_variables().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["kept"]);
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

#[test]
fn token_signature() {
    let out = build("token.sol");
    let signatures = out.unit.signatures();
    assert_eq!(signatures.len(), 1);
    let token = &signatures[0];
    assert_eq!(token.name, "Token");

    let functions: Vec<String> = token.functions.iter().map(|f| f.selector_text()).collect();
    assert_eq!(
        functions,
        [
            "balanceOf(address)",
            "transfer(address,uint256)",
            "allowance(address,address)",
            "approve(address,uint256)",
            "mint(address,uint256)",
        ]
    );
    let transfer = &token.functions[1];
    assert_eq!(transfer.outputs.len(), 1);
    assert_eq!(transfer.outputs[0].type_string, "bool");

    let event = token.events.iter().find(|e| e.name == "Transfer").expect("Transfer");
    let indexed: Vec<bool> = event.inputs.iter().map(|p| p.indexed).collect();
    assert_eq!(indexed, [true, true, false]);
    let types: Vec<&str> = event.inputs.iter().map(|p| p.type_string.as_str()).collect();
    assert_eq!(types, ["address", "address", "uint256"]);
}

#[test]
fn emit_targets_the_event() {
    let out = build("token.sol");
    let token = out.unit.contract("Token").expect("Token");
    let transfer = token.events().find(|e| e.name == "Transfer").expect("Transfer");
    let calls: Vec<_> = nodes(&out.unit)
        .into_iter()
        .filter_map(|n| match n {
            NodeRef::Call(call) => Some(call),
            _ => None,
        })
        .collect();
    assert_eq!(calls.len(), 3);
    for call in calls {
        let callee = call.expression.referenced_declaration();
        assert!(callee.is_some());
        if call.expression.as_primary().is_some_and(|p| p.name == "Transfer") {
            assert_eq!(callee, Some(transfer.id));
        }
    }
}

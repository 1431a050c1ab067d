// SPDX-License-Identifier: (MIT OR Apache-2.0)

use solast_ast::decl::SourceUnit;
use solast_ast::NodeRef;
use solast_builder::{build_source, BuildOptions};
use solast_inspect::{
    builtin_registry, inspect, Detector, DetectorRegistry, DetectorType, InspectOpts, Inspector,
    StateVariableDetector,
};

const VAULT: &str = r#"
contract Vault {
    address public owner;
    uint256 constant LIMIT = 10;
    uint256 immutable created;
    mapping(address => uint256) private deposits;

    constructor() {
        owner = msg.sender;
        created = block.timestamp;
    }

    function deposit() public payable {
        uint256 local = msg.value;
        deposits[msg.sender] += local;
    }
}

contract Empty {}
"#;

fn unit() -> SourceUnit {
    build_source(VAULT, BuildOptions::default()).expect("vault builds").unit
}

#[test]
fn state_variables_are_listed_per_contract() {
    let unit = unit();
    let report = inspect(&unit, "Vault.sol", &InspectOpts::default());
    assert_eq!(report.file, "Vault.sol");

    let found = report.get("state_variables").and_then(|v| v.as_array()).expect("detector ran");
    let names: Vec<_> = found.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["owner", "LIMIT", "created", "deposits"]);

    assert!(found.iter().all(|v| v["contract"] == "Vault"));
    assert_eq!(found[0]["visibility"], "public");
    assert_eq!(found[0]["type_string"], "address");
    assert_eq!(found[1]["constant"], true);
    assert_eq!(found[2]["immutable"], true);
    assert_eq!(found[3]["visibility"], "private");
    assert_eq!(found[3]["type_string"], "mapping(address => uint256)");
    assert_eq!(found[0]["line"], 3);
}

#[test]
fn excluded_detectors_do_not_report() {
    let unit = unit();
    let opts = InspectOpts { detectors: Vec::new(), excludes: vec!["info/*".to_string()] };
    let report = inspect(&unit, "Vault.sol", &opts);
    assert!(report.detectors.is_empty());
}

#[test]
fn inspecting_twice_does_not_duplicate_findings() {
    let unit = unit();
    let mut registry = builtin_registry();
    let inspector = Inspector::new(InspectOpts::default());
    inspector.inspect(&mut registry, &unit);
    let report = inspector.inspect(&mut registry, &unit);
    assert_eq!(report.get("state_variables").and_then(|v| v.as_array()).map(Vec::len), Some(4));
}

/// Records the order hooks fire in, skipping function bodies.
#[derive(Default)]
struct Trace {
    events: Vec<String>,
}

impl Trace {
    fn record(&mut self, phase: &str, node: NodeRef<'_>) -> bool {
        match node {
            NodeRef::Contract(c) => self.events.push(format!("{phase} {}", c.name)),
            NodeRef::Function(f) => {
                self.events.push(format!("{phase} fn {}", f.name));
                return false;
            }
            NodeRef::Expression(_) => self.events.push(format!("{phase} expression")),
            _ => {}
        }
        true
    }
}

impl Detector for Trace {
    fn name(&self) -> &str {
        "trace"
    }

    fn detector_type(&self) -> DetectorType {
        DetectorType("debug/trace")
    }

    fn enter(&mut self, node: NodeRef<'_>) -> bool {
        self.record("enter", node)
    }

    fn detect(&mut self, node: NodeRef<'_>) -> bool {
        self.record("detect", node)
    }

    fn exit(&mut self, node: NodeRef<'_>) -> bool {
        self.record("exit", node)
    }

    fn results(&self) -> serde_json::Value {
        serde_json::json!(self.events)
    }
}

#[test]
fn walks_run_in_phase_order_and_prune() {
    let unit = build_source("contract A { function f() public { g(); } function g() public {} }", BuildOptions::default())
        .expect("builds")
        .unit;
    let mut registry = DetectorRegistry::new();
    registry.register(Box::new(Trace::default())).unwrap();
    registry.register(Box::new(StateVariableDetector::new())).unwrap();

    let report = Inspector::new(InspectOpts::default()).inspect(&mut registry, &unit);
    assert_eq!(report.detectors.len(), 2);
    let events: Vec<_> = report.get("trace").and_then(|v| v.as_array()).unwrap().iter().map(|e| e.as_str().unwrap()).collect();
    assert_eq!(
        events,
        ["enter A", "enter fn f", "enter fn g", "detect A", "detect fn f", "detect fn g", "exit A", "exit fn f", "exit fn g"]
    );
    assert_eq!(report.get("state_variables"), Some(&serde_json::json!([])));
}

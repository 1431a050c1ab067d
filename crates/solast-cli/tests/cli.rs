// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `solast` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn solast(args: &[&str], file: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_solast"))
        .args(args)
        .arg(fixture(file))
        .env("NO_COLOR", "1")
        .env_remove("SOLAST_LOG")
        .output()
        .expect("failed to run solast")
}

fn stdout_json(out: &Output) -> serde_json::Value {
    let text = String::from_utf8_lossy(&out.stdout);
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{text}"))
}

#[test]
fn version() {
    let out = Command::new(env!("CARGO_BIN_EXE_solast")).arg("version").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("solast "));
}

#[test]
fn build_json_has_ast_and_report() {
    let out = solast(&["build", "--format", "json"], "vault.sol");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let value = stdout_json(&out);
    assert_eq!(value["diagnostics"]["success"], true);
    assert_eq!(value["diagnostics"]["phase"], "build");
    assert_eq!(value["ast"]["nodes"][1]["Contract"]["name"], "Vault");
}

#[test]
fn build_human_prints_types() {
    let out = solast(&["build"], "vault.sol");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("ContractDefinition"));
    assert!(text.contains("mapping(address => uint256)"));
    assert!(text.contains("Build OK"));
}

#[test]
fn signatures_json() {
    let out = solast(&["signatures", "--format", "json"], "vault.sol");
    assert!(out.status.success());
    let value = stdout_json(&out);
    let vault = &value[0];
    assert_eq!(vault["name"], "Vault");
    let names: Vec<_> = vault["functions"].as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["deposit", "balanceOf", "credit"]);
    assert_eq!(vault["events"][0]["inputs"][0]["indexed"], true);
    assert_eq!(vault["events"][0]["inputs"][1]["type"], "uint256");
}

#[test]
fn inspect_lists_state_variables() {
    let out = solast(&["inspect", "--format", "json"], "vault.sol");
    assert!(out.status.success());
    let value = stdout_json(&out);
    let vars = value["detectors"]["state_variables"].as_array().unwrap();
    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0]["name"], "owner");
    assert_eq!(vars[1]["visibility"], "private");
}

#[test]
fn function_type_name_fails_the_build() {
    let out = solast(&["build"], "callback.sol");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error[E0301]"), "stderr: {stderr}");
    assert!(stderr.contains("callback.sol:2:5"), "stderr: {stderr}");
}

#[test]
fn skip_unsupported_downgrades_to_a_warning() {
    let out = solast(&["build", "--skip-unsupported", "--format", "json"], "callback.sol");
    assert!(out.status.success());
    let value = stdout_json(&out);
    assert_eq!(value["diagnostics"]["warning_count"], 1);
    assert_eq!(value["diagnostics"]["diagnostics"][0]["code"], "E0301");
}

#[test]
fn missing_file_exits_with_error() {
    let out = solast(&["build"], "does-not-exist.sol");
    assert_eq!(out.status.code(), Some(1));
}

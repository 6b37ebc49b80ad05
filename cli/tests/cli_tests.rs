//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("tsconfig-types").expect("binary should exist")
}

fn simple_declarations() -> &'static str {
    "export type Root = Options | { [k: string]: unknown };\n\
     export interface Options {\n  target?: \"es5\" | \"es6\" | string;\n  [k: string]: unknown;\n}\n"
}

// ── Transform to File ───────────────────────────────────────────────────────

#[test]
fn test_transform_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    let output = dir.path().join("out.d.ts");
    fs::write(&input, simple_declarations()).unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&output).expect("output file should exist");
    assert_eq!(
        content,
        "export type Tsconfig = Options;\n\nexport interface Options {\n  target?: \"es5\" | \"es6\";\n}\n"
    );
}

// ── Transform to Stdout ─────────────────────────────────────────────────────

#[test]
fn test_transform_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    fs::write(&input, simple_declarations()).unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("export type Tsconfig = Options;"))
        .stdout(predicate::str::contains("| string").not());
}

// ── Flags and Config ────────────────────────────────────────────────────────

#[test]
fn test_root_name_and_inject_flags() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    fs::write(&input, simple_declarations()).unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .args(["--root-name", "CompilerConfig"])
        .args(["--inject-property", "Options.$schema=https://json.schemastore.org/tsconfig"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export type CompilerConfig = Options;"))
        .stdout(predicate::str::contains(
            "  $schema?: \"https://json.schemastore.org/tsconfig\";\n  target?:",
        ));
}

#[test]
fn test_config_file_with_flag_override() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    let config = dir.path().join("config.json");
    fs::write(&input, "type First = string;\ntype Second = A | B;\ninterface A {}\ninterface B {}\n").unwrap();
    fs::write(
        &config,
        r#"{ "root-name": "FromConfig", "root-alias": "Second", "merge-root-unions": true }"#,
    )
    .unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .args(["--root-name", "FromFlag"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type First = string;"))
        .stdout(predicate::str::contains("type FromFlag = A & B;"))
        .stdout(predicate::str::contains("FromConfig").not());
}

#[test]
fn test_malformed_inject_property_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    fs::write(&input, simple_declarations()).unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .args(["--inject-property", "no-dot-here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Interface.property=literal"));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    let config = dir.path().join("config.json");
    fs::write(&input, simple_declarations()).unwrap();
    fs::write(&config, "{ not json").unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

// ── Inspect ─────────────────────────────────────────────────────────────────

#[test]
fn test_inspect_outputs_syntax_tree() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    fs::write(&input, "type Root = \"a\" | string;\n").unwrap();

    let assert = cmd()
        .args(["inspect", input.to_str().unwrap(), "--format", "compact"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&stdout).expect("inspect should emit JSON");
    let statements = tree["statements"].as_array().expect("should have statements");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0]["type-alias"]["name"], serde_json::json!("Root"));
}

#[test]
fn test_inspect_transformed() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tsconfig.d.ts");
    fs::write(&input, "type Root = \"a\" | string;\n").unwrap();

    let assert = cmd()
        .args(["inspect", input.to_str().unwrap(), "--transformed"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&stdout).expect("inspect should emit JSON");
    assert_eq!(
        tree["statements"][0]["type-alias"]["name"],
        serde_json::json!("Tsconfig")
    );
    assert_eq!(
        tree["statements"][0]["type-alias"]["ty"],
        serde_json::json!({ "literal": { "string": "a" } })
    );
}

// ── Invalid Input ───────────────────────────────────────────────────────────

#[test]
fn test_invalid_input() {
    cmd()
        .args(["transform", "/nonexistent/path/tsconfig.d.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_syntax_error_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.d.ts");
    fs::write(&input, "type Root = ;\n").unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse declarations"))
        .stderr(predicate::str::contains("Syntax error at 1:"));
}

#[test]
fn test_missing_root_alias_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("no-root.d.ts");
    fs::write(&input, "interface A { a?: string }\n").unwrap();

    cmd()
        .args(["transform", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transform failed"))
        .stderr(predicate::str::contains("Root type alias not found"));
}

// ── Help Output ─────────────────────────────────────────────────────────────

#[test]
fn test_help_output() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transform"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_transform_help() {
    cmd()
        .args(["transform", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--root-name"))
        .stdout(predicate::str::contains("--inject-property"))
        .stdout(predicate::str::contains("--merge-root-unions"));
}

//! End-to-end tests that run the full pipeline against a declaration file
//! generated from the tsconfig schema and compare with the committed output.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tsconfig_types_core::ast::{Keyword, SourceFile, Statement, TypeMember, TypeNode};
use tsconfig_types_core::ast_utils::{visit_file_types, visit_type};
use tsconfig_types_core::passes::p3_unknown_records::is_unknown_record;
use tsconfig_types_core::{parse, print, transform, InjectedProperty, PipelineOptions};

// ── Helpers ─────────────────────────────────────────────────────────────────

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

fn load_fixture(name: &str) -> String {
    let path = Path::new(FIXTURES_DIR).join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}

fn transformed_fixture(options: &PipelineOptions) -> SourceFile {
    let file = parse(&load_fixture("tsconfig.d.ts")).expect("fixture should parse");
    transform(&file, options).expect("fixture should transform")
}

/// Every type expression in the file, including nested ones.
fn all_types(file: &SourceFile) -> Vec<TypeNode> {
    let mut found = Vec::new();
    visit_file_types(file, &mut |ty| visit_type(ty, &mut |node| found.push(node.clone())));
    found
}

/// Every object shape in the file: interface bodies and type literals.
fn all_shapes(file: &SourceFile) -> Vec<Vec<TypeMember>> {
    let mut shapes: Vec<Vec<TypeMember>> = file
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Interface(iface) => Some(iface.members.clone()),
            _ => None,
        })
        .collect();
    for ty in all_types(file) {
        if let TypeNode::TypeLiteral(members) = ty {
            shapes.push(members);
        }
    }
    shapes
}

// ── Golden output ───────────────────────────────────────────────────────────

#[test]
fn test_fixture_matches_expected_output() {
    let out = print(&transformed_fixture(&PipelineOptions::default()));
    assert_eq!(out, load_fixture("tsconfig.expected.d.ts"));
}

#[test]
fn test_expected_output_is_a_fixed_point() {
    let expected = load_fixture("tsconfig.expected.d.ts");
    let file = parse(&expected).expect("expected output should parse");
    let again = transform(&file, &PipelineOptions::default()).expect("should transform");
    assert_eq!(print(&again), expected);
}

// ── Structural guarantees ───────────────────────────────────────────────────

#[test]
fn test_no_string_member_next_to_string_literals() {
    let file = transformed_fixture(&PipelineOptions::default());
    for ty in all_types(&file) {
        if let TypeNode::Union(members) | TypeNode::Intersection(members) = &ty {
            let has_literal = members.iter().any(|m| matches!(m, TypeNode::Literal(_)));
            let has_string = members.iter().any(|m| m.is_keyword(Keyword::String));
            assert!(!(has_literal && has_string), "string widening left in {ty:?}");
        }
    }
}

#[test]
fn test_no_unknown_record_union_members() {
    let file = transformed_fixture(&PipelineOptions::default());
    for ty in all_types(&file) {
        if let TypeNode::Union(members) = &ty {
            assert!(!members.iter().any(is_unknown_record), "unknown record left in {ty:?}");
        }
    }
}

#[test]
fn test_index_signatures_only_in_single_member_shapes() {
    let file = transformed_fixture(&PipelineOptions::default());
    for shape in all_shapes(&file) {
        if shape.len() > 1 {
            assert!(
                !shape.iter().any(TypeMember::is_unknown_string_index),
                "unknown index signature left in {shape:?}"
            );
        }
    }
}

#[test]
fn test_root_declared_once() {
    let file = transformed_fixture(&PipelineOptions::default());
    let roots: Vec<&Statement> = file
        .statements
        .iter()
        .filter(|s| s.name() == Some("Tsconfig"))
        .collect();
    assert_eq!(roots.len(), 1);
    assert!(file
        .statements
        .iter()
        .all(|s| s.name() != Some("JSONSchemaForTheTypeScriptCompilerSConfigurationFile")));
}

// ── Optional stages on the fixture ──────────────────────────────────────────

#[test]
fn test_fixture_with_schema_property_injected() {
    let options = PipelineOptions {
        inject_property: Some(InjectedProperty {
            interface: "CompilerOptionsDefinition".to_string(),
            name: "$schema".to_string(),
            value: "https://json.schemastore.org/tsconfig".to_string(),
        }),
        ..PipelineOptions::default()
    };
    let out = print(&transformed_fixture(&options));
    assert!(
        out.contains("export interface CompilerOptionsDefinition {\n  $schema?: \"https://json.schemastore.org/tsconfig\";\n"),
        "{out}"
    );
}

#[test]
fn test_fixture_with_root_unions_merged() {
    let options = PipelineOptions {
        merge_root_unions: true,
        ..PipelineOptions::default()
    };
    let out = print(&transformed_fixture(&options));
    assert!(
        out.contains("& (FilesDefinition & ExcludeDefinition & IncludeDefinition & ReferencesDefinition);"),
        "{out}"
    );
    // Unions outside the root alias are untouched.
    assert!(out.contains("jsx?: \"preserve\" | \"react\""), "{out}");
}

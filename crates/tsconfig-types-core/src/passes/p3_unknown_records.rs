//! Pass 3: Standalone Unknown-Record Removal
//!
//! Open-ended enum schemas come out as `("a" | "b") | { [k: string]: unknown }`.
//! The record alternative accepts any object and adds nothing a reader of the
//! declaration can use, so it is dropped from every union it appears in.
//!
//! Only members that are exactly `{ [k: string]: unknown }` are removed.
//! Shapes that combine the index signature with other fields are kept and
//! recursed into like any other member.
//!
//! Dropping a record can leave `string` as the last member of a nested
//! union, so `"a" | (string | { [k: string]: unknown })` collapses to
//! `"a" | string`. Every rebuilt union and intersection goes back through
//! the string-widening check before it reaches its parent.

use crate::ast::{SourceFile, TypeNode};
use crate::ast_utils::{map_children, map_file, rebuild_union};
use crate::passes::p2_string_widening::drop_wide_string;

/// Remove standalone unknown-record members from every union in the file.
pub fn remove_unknown_records(file: &SourceFile) -> SourceFile {
    map_file(file, &mut walk)
}

/// `{ [k: string]: unknown }` and nothing else.
pub fn is_unknown_record(node: &TypeNode) -> bool {
    match node {
        TypeNode::TypeLiteral(members) => members.len() == 1 && members[0].is_unknown_string_index(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Recursive walker
// ---------------------------------------------------------------------------

fn walk(node: &TypeNode) -> TypeNode {
    let TypeNode::Union(members) = node else {
        return drop_wide_string(map_children(node, &mut walk));
    };

    let kept: Vec<TypeNode> = members
        .iter()
        .filter(|member| !is_unknown_record(member))
        .map(walk)
        .collect();

    if kept.is_empty() {
        // Every alternative is an unknown record; removing them all would
        // leave an empty union.
        return TypeNode::Union(members.iter().map(walk).collect());
    }
    if kept.len() < members.len() {
        tracing::debug!(
            removed = members.len() - kept.len(),
            "dropping unknown-record union member"
        );
    }
    drop_wide_string(rebuild_union(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn run(src: &str) -> SourceFile {
        remove_unknown_records(&parse(src).unwrap())
    }

    fn assert_rewrites(src: &str, expected: &str) {
        assert_eq!(run(src), parse(expected).unwrap());
    }

    #[test]
    fn test_is_unknown_record() {
        let file = parse("type A = { [k: string]: unknown };\ntype B = { [k: string]: unknown; a: string };\ntype C = { [k: string]: string };").unwrap();
        let types: Vec<&TypeNode> = file
            .statements
            .iter()
            .map(|s| match s {
                crate::ast::Statement::TypeAlias(alias) => &alias.ty,
                other => panic!("expected alias, got: {:?}", other),
            })
            .collect();
        assert!(is_unknown_record(types[0]));
        assert!(!is_unknown_record(types[1]));
        assert!(!is_unknown_record(types[2]));
    }

    #[test]
    fn test_removes_record_member() {
        assert_rewrites(
            "type A = (\"a\" | \"b\") | { [k: string]: unknown } | null;",
            "type A = (\"a\" | \"b\") | null;",
        );
    }

    #[test]
    fn test_collapses_to_single_member() {
        assert_rewrites(
            "type A = Foo | { [key: string]: unknown };",
            "type A = Foo;",
        );
    }

    #[test]
    fn test_parenthesized_union_collapses_cleanly() {
        assert_rewrites(
            "interface O { target?: ((\"ES3\" | \"ES5\") | { [k: string]: unknown }); }",
            "interface O { target?: (\"ES3\" | \"ES5\"); }",
        );
    }

    #[test]
    fn test_mixed_shape_kept_and_recursed() {
        assert_rewrites(
            "type A = B | { [k: string]: unknown; inner?: C | { [k: string]: unknown } };",
            "type A = B | { [k: string]: unknown; inner?: C };",
        );
    }

    #[test]
    fn test_standalone_shape_outside_union_kept() {
        let src = "type A = { [k: string]: unknown };\ninterface B { x: { [k: string]: unknown }[] }";
        assert_eq!(run(src), parse(src).unwrap());
    }

    #[test]
    fn test_union_of_only_records_kept() {
        let src = "type A = { [k: string]: unknown } | { [j: string]: unknown };";
        assert_eq!(run(src), parse(src).unwrap());
    }

    #[test]
    fn test_collapsed_member_rechecked_for_widening() {
        assert_rewrites(
            "type A = \"a\" | (string | { [k: string]: unknown });",
            "type A = \"a\";",
        );
        assert_rewrites(
            "type A = (\"a\" | \"b\") & (string | { [k: string]: unknown });",
            "type A = (\"a\" | \"b\");",
        );
    }

    #[test]
    fn test_nested_union_in_array() {
        assert_rewrites(
            "type A = (B | { [k: string]: unknown })[];",
            "type A = B[];",
        );
    }
}

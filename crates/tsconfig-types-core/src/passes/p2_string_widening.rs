//! Pass 2: Redundant String Widening Removal
//!
//! Schema compilers render "one of these values, or any string" as
//! `"a" | "b" | string`. The bare `string` swallows the literals, so editors
//! show `string` and lose the suggestions. This pass drops the `string`
//! member from every union or intersection that also involves a string
//! literal, keeping all other members.
//!
//! Parenthesized nodes are transparent on both sides, so
//! `("a" | "b") & string`, `string | ("a" | "b")` and `"a" | (string)` are
//! all cleaned. Children are rewritten before their parent.

use crate::ast::{Keyword, Literal, SourceFile, TypeNode};
use crate::ast_utils::{map_children, map_file, rebuild_intersection, rebuild_union};

/// Remove redundant `string` members throughout the file.
pub fn remove_string_widening(file: &SourceFile) -> SourceFile {
    map_file(file, &mut walk)
}

/// Whether `node` is, or combines, a string literal type.
pub fn intersects_with_string_literal(node: &TypeNode) -> bool {
    match node {
        TypeNode::Literal(Literal::String(_)) => true,
        TypeNode::Union(members) | TypeNode::Intersection(members) => {
            members.iter().any(intersects_with_string_literal)
        }
        TypeNode::Parenthesized(inner) => intersects_with_string_literal(inner),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Recursive walker
// ---------------------------------------------------------------------------

fn walk(node: &TypeNode) -> TypeNode {
    drop_wide_string(map_children(node, &mut walk))
}

/// Rewrite a single union or intersection whose children are already clean.
///
/// Later passes that collapse a member to a bare `string` call this on the
/// rebuilt parent so no widening is left behind.
pub(crate) fn drop_wide_string(node: TypeNode) -> TypeNode {
    match node {
        TypeNode::Union(members) if members.iter().any(intersects_with_string_literal) => {
            rebuild_union(without_wide_string(members))
        }
        TypeNode::Intersection(members) if members.iter().any(intersects_with_string_literal) => {
            rebuild_intersection(without_wide_string(members))
        }
        other => other,
    }
}

/// `string`, possibly wrapped in parentheses.
pub fn is_wide_string(node: &TypeNode) -> bool {
    match node {
        TypeNode::Parenthesized(inner) => is_wide_string(inner),
        other => other.is_keyword(Keyword::String),
    }
}

/// Drop wide `string` members. At least one member intersects with a string
/// literal, so the result is never empty.
fn without_wide_string(members: Vec<TypeNode>) -> Vec<TypeNode> {
    let before = members.len();
    let kept: Vec<TypeNode> = members
        .into_iter()
        .filter(|member| !is_wide_string(member))
        .collect();
    if kept.len() < before {
        tracing::debug!(removed = before - kept.len(), "dropping wide string member");
    }
    kept
}

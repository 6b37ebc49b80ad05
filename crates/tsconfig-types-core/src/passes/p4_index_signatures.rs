//! Pass 4: Unknown Index-Signature Stripping
//!
//! Schemas that allow additional properties produce `[k: string]: unknown;`
//! in every object. Next to declared fields the signature only disables
//! excess-property checks, so it is removed from any interface body or type
//! literal that has other members.
//!
//! A shape whose sole member is the signature is left alone: emptying it
//! would turn `{ [k: string]: unknown }` into `{}`, which means something
//! else.

use crate::ast::{SourceFile, Statement, TypeMember, TypeNode};
use crate::ast_utils::{map_children, map_member};

/// Strip unknown index signatures from every multi-member shape in the file.
pub fn strip_unknown_index_signatures(file: &SourceFile) -> SourceFile {
    let statements = file
        .statements
        .iter()
        .map(|statement| match statement {
            Statement::TypeAlias(alias) => {
                let mut alias = alias.clone();
                alias.ty = walk(&alias.ty);
                Statement::TypeAlias(alias)
            }
            Statement::Interface(iface) => {
                let mut iface = iface.clone();
                iface.extends = iface.extends.iter().map(walk).collect();
                iface.members = strip_members(&iface.members, &iface.name);
                Statement::Interface(iface)
            }
            Statement::Verbatim(_) => statement.clone(),
        })
        .collect();

    SourceFile {
        statements,
        trailing_comments: file.trailing_comments.clone(),
    }
}

// ---------------------------------------------------------------------------
// Recursive walker
// ---------------------------------------------------------------------------

fn walk(node: &TypeNode) -> TypeNode {
    match node {
        TypeNode::TypeLiteral(members) => TypeNode::TypeLiteral(strip_members(members, "type literal")),
        _ => map_children(node, &mut walk),
    }
}

/// Remove unknown index signatures when siblings exist, then recurse into
/// the remaining members.
fn strip_members(members: &[TypeMember], owner: &str) -> Vec<TypeMember> {
    let kept: Vec<&TypeMember> = if members.len() > 1 {
        members.iter().filter(|m| !m.is_unknown_string_index()).collect()
    } else {
        members.iter().collect()
    };

    // Duplicate signatures with nothing else: keep the shape as written.
    let kept = if kept.is_empty() { members.iter().collect() } else { kept };

    if kept.len() < members.len() {
        tracing::debug!(owner = %owner, "dropping unknown index signature");
    }
    kept.into_iter().map(|m| map_member(m, &mut walk)).collect()
}

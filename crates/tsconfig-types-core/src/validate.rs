//! Structural checks run on the pipeline output before it is printed.

use std::collections::{BTreeSet, HashSet};

use crate::ast::{SourceFile, Statement, TypeMember, TypeNode};
use crate::ast_utils::{declared_names, is_identifier, reference_root, verbatim_identifiers, visit_type};
use crate::error::TransformError;

/// Check that `file` is a well-formed declaration file.
///
/// `declared_before` holds the type names declared by the pipeline input; a
/// reference to one of them that the output no longer declares is dangling.
pub fn validate(file: &SourceFile, declared_before: &BTreeSet<String>) -> Result<(), TransformError> {
    let declared_now = declared_names(file);
    let mut seen = HashSet::new();

    for statement in &file.statements {
        let Some(name) = statement.name() else {
            continue;
        };
        if !is_identifier(name) {
            return Err(TransformError::invariant(name, "declared name is not a valid identifier"));
        }
        if !seen.insert(name) {
            return Err(TransformError::invariant(name, "type declared more than once"));
        }
    }

    for statement in &file.statements {
        let (name, types): (&str, Vec<&TypeNode>) = match statement {
            Statement::TypeAlias(alias) => (alias.name.as_str(), vec![&alias.ty]),
            Statement::Interface(iface) => {
                let mut types: Vec<&TypeNode> = iface.extends.iter().collect();
                for member in &iface.members {
                    match member {
                        TypeMember::Property(prop) => types.push(&prop.ty),
                        TypeMember::Index(index) => {
                            types.push(&index.key_type);
                            types.push(&index.value_type);
                        }
                    }
                }
                (iface.name.as_str(), types)
            }
            Statement::Verbatim(verbatim) => {
                let dangling = verbatim_identifiers(&verbatim.text)
                    .map(|(_, word)| word)
                    .find(|word| declared_before.contains(*word) && !declared_now.contains(*word));
                if let Some(word) = dangling {
                    let path = verbatim.text.lines().next().unwrap_or_default();
                    return Err(TransformError::invariant(path, format!("dangling reference to `{word}`")));
                }
                continue;
            }
        };

        let mut failure = None;
        for ty in types {
            visit_type(ty, &mut |node| {
                if failure.is_none() {
                    failure = check_node(node, declared_before, &declared_now);
                }
            });
        }
        if let Some(message) = failure {
            return Err(TransformError::invariant(name, message));
        }
    }
    Ok(())
}

fn check_node(
    node: &TypeNode,
    declared_before: &BTreeSet<String>,
    declared_now: &BTreeSet<String>,
) -> Option<String> {
    match node {
        TypeNode::Union(members) if members.is_empty() => Some("empty union type".to_string()),
        TypeNode::Intersection(members) if members.is_empty() => {
            Some("empty intersection type".to_string())
        }
        TypeNode::Reference { name, .. } => {
            let root = reference_root(name);
            if root.is_empty() {
                Some("type reference without a name".to_string())
            } else if declared_before.contains(root) && !declared_now.contains(root) {
                Some(format!("dangling reference to `{name}`"))
            } else {
                None
            }
        }
        _ => None,
    }
}

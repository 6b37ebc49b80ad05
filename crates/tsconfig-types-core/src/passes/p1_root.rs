//! Pass 1: Root Renaming & Export Pruning
//!
//! Finds the type alias that represents the schema root and gives it a fixed
//! public name. Every alias and interface keeps only its `export` modifiers;
//! `declare` and `default` are dropped. References to the old root name are
//! rewritten so recursive schemas keep pointing at the root, including
//! identifiers inside statements kept as verbatim text.
//!
//! Two optional stages run after the rename:
//! - **inject property**: adds `name?: "value"` to the front of a named
//!   interface, for convenience fields the source schema does not declare.
//! - **merge root unions**: turns every union under the root alias into an
//!   intersection, bottom-up.

use crate::ast::{
    InterfaceDecl, Modifier, PropertySignature, SourceFile, Statement, TypeMember, TypeNode,
};
use crate::ast_utils::{is_identifier, map_children, map_file, reference_root, rename_identifier};
use crate::config::{InjectedProperty, PipelineOptions};
use crate::error::TransformError;

/// Run the full pass: rename and prune, then any enabled optional stages.
pub fn apply(file: &SourceFile, options: &PipelineOptions) -> Result<SourceFile, TransformError> {
    let mut result = rename_root(file, &options.root_name, options.root_alias.as_deref())?;
    if let Some(property) = &options.inject_property {
        result = inject_property(&result, property);
    }
    if options.merge_root_unions {
        result = merge_root_unions(&result, &options.root_name);
    }
    Ok(result)
}

/// Rename the root alias to `root_name` and prune modifiers.
///
/// The root is the alias named `root_alias` when given, otherwise the first
/// top-level type alias.
pub fn rename_root(
    file: &SourceFile,
    root_name: &str,
    root_alias: Option<&str>,
) -> Result<SourceFile, TransformError> {
    if !is_identifier(root_name) {
        return Err(TransformError::InvalidIdentifier {
            name: root_name.to_string(),
            context: "root type name".to_string(),
        });
    }

    let old_name = find_root(file, root_alias)?;
    tracing::debug!(from = %old_name, to = %root_name, "renaming root alias");

    let mut renamed = if old_name == root_name {
        file.clone()
    } else {
        map_file(file, &mut |ty| rename_references(ty, &old_name, root_name))
    };

    let mut root_seen = false;
    for statement in &mut renamed.statements {
        match statement {
            Statement::TypeAlias(alias) => {
                if !root_seen && alias.name == old_name {
                    alias.name = root_name.to_string();
                    root_seen = true;
                }
                alias.modifiers = export_only(&alias.modifiers);
            }
            Statement::Interface(iface) => {
                iface.modifiers = export_only(&iface.modifiers);
            }
            Statement::Verbatim(verbatim) => {
                verbatim.text = rename_identifier(&verbatim.text, &old_name, root_name);
            }
        }
    }
    Ok(renamed)
}

fn find_root(file: &SourceFile, root_alias: Option<&str>) -> Result<String, TransformError> {
    let mut aliases = file.statements.iter().filter_map(|statement| match statement {
        Statement::TypeAlias(alias) => Some(alias.name.as_str()),
        _ => None,
    });
    let found = match root_alias {
        Some(wanted) => aliases.find(|name| *name == wanted),
        None => aliases.next(),
    };
    found.map(str::to_string).ok_or_else(|| {
        TransformError::RootAliasNotFound(match root_alias {
            Some(wanted) => format!("no type alias named `{wanted}`"),
            None => "source file declares no type alias".to_string(),
        })
    })
}

fn export_only(modifiers: &[Modifier]) -> Vec<Modifier> {
    modifiers
        .iter()
        .copied()
        .filter(|m| *m == Modifier::Export)
        .collect()
}

fn rename_references(node: &TypeNode, old_name: &str, new_name: &str) -> TypeNode {
    match node {
        TypeNode::Reference { name, type_arguments } if reference_root(name) == old_name => {
            TypeNode::Reference {
                name: format!("{new_name}{}", &name[old_name.len()..]),
                type_arguments: type_arguments
                    .iter()
                    .map(|arg| rename_references(arg, old_name, new_name))
                    .collect(),
            }
        }
        _ => map_children(node, &mut |child| rename_references(child, old_name, new_name)),
    }
}

// ---------------------------------------------------------------------------
// Optional stage: inject property
// ---------------------------------------------------------------------------

/// Insert `property.name?: "property.value"` as the first member of the
/// interface named `property.interface`.
///
/// No-op when the interface already declares the property or does not exist.
pub fn inject_property(file: &SourceFile, property: &InjectedProperty) -> SourceFile {
    let mut result = file.clone();
    let target = result.statements.iter_mut().find_map(|statement| match statement {
        Statement::Interface(iface) if iface.name == property.interface => Some(iface),
        _ => None,
    });

    let Some(iface) = target else {
        tracing::warn!(
            interface = %property.interface,
            "interface for property injection not found, skipping"
        );
        return result;
    };

    if declares_property(iface, &property.name) {
        tracing::debug!(
            interface = %property.interface,
            property = %property.name,
            "property already declared, skipping injection"
        );
    } else {
        tracing::debug!(
            interface = %property.interface,
            property = %property.name,
            "injecting property"
        );
        iface.members.insert(0, injected_member(property));
    }
    result
}

fn injected_member(property: &InjectedProperty) -> TypeMember {
    TypeMember::Property(PropertySignature {
        leading_comments: Vec::new(),
        readonly: false,
        name: property.name.clone(),
        optional: true,
        ty: TypeNode::string_literal(property.value.clone()),
    })
}

fn declares_property(iface: &InterfaceDecl, name: &str) -> bool {
    iface.members.iter().any(|m| m.property_name() == Some(name))
}

// ---------------------------------------------------------------------------
// Optional stage: merge root unions
// ---------------------------------------------------------------------------

/// Rewrite every union under the alias named `root_name` into an
/// intersection. Other statements are untouched.
pub fn merge_root_unions(file: &SourceFile, root_name: &str) -> SourceFile {
    let mut result = file.clone();
    for statement in &mut result.statements {
        if let Statement::TypeAlias(alias) = statement {
            if alias.name == root_name {
                alias.ty = unions_to_intersections(&alias.ty);
                break;
            }
        }
    }
    result
}

fn unions_to_intersections(node: &TypeNode) -> TypeNode {
    match map_children(node, &mut unions_to_intersections) {
        TypeNode::Union(members) => TypeNode::Intersection(members),
        other => other,
    }
}

//! Shared syntax-tree utilities used across the rewrite passes.
//!
//! Provides three concerns:
//! 1. **Identifier checks** for declared names and property keys, and
//!    identifier lookup inside verbatim statement text
//! 2. **Shared traversal** that rebuilds every child type of a node consistently
//! 3. **Collapse helpers** that rebuild unions/intersections after members are
//!    removed, without ever producing an empty or single-member compound node
//!
//! ## Cross-Reference
//!
//! Pass 4 (`p4_index_signatures`) rewrites member lists itself and only uses
//! [`map_member`] for the member types. When adding a node kind here, also
//! update its walker.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{SourceFile, Statement, TupleElement, TypeMember, TypeNode};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").expect("identifier pattern is valid"))
}

fn verbatim_declaration_regex() -> &'static Regex {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    DECLARATION.get_or_init(|| {
        Regex::new(
            r"^(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:const\s+|abstract\s+)?(?:enum|class|namespace|module|type|interface)\s+([\p{L}_$][\p{L}\p{N}_$]*)",
        )
        .expect("declaration pattern is valid")
    })
}

fn verbatim_token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        // Quoted text and comments match as a whole so the words inside them
        // never surface as identifiers.
        Regex::new(
            r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`|//[^\n]*|/\*(?s:.*?)\*/|[\p{L}_$][\p{L}\p{N}_$]*"#,
        )
        .expect("verbatim token pattern is valid")
    })
}

/// Whether `name` can be written as a bare identifier.
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// Names of every type declared at the top level, including declarations
/// kept as verbatim text (enums, classes, namespaces).
pub fn declared_names(file: &SourceFile) -> BTreeSet<String> {
    file.statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Verbatim(verbatim) => verbatim_declaration_regex()
                .captures(&verbatim.text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            other => other.name().map(str::to_string),
        })
        .collect()
}

/// Identifiers in verbatim statement text, with their byte offsets.
///
/// Words inside string literals, template literals and comments are skipped,
/// and so are member accesses (`Ns.Name` yields only `Ns`).
pub fn verbatim_identifiers(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    verbatim_token_regex().find_iter(text).filter_map(move |m| {
        let word = m.as_str();
        let is_word = word.starts_with(|c: char| c == '_' || c == '$' || c.is_alphabetic());
        let before = text[..m.start()].trim_end();
        let member_access = before.ends_with('.') && !before.ends_with("...");
        (is_word && !member_access).then_some((m.start(), word))
    })
}

/// Replace the identifier `old` with `new` throughout verbatim text.
pub fn rename_identifier(text: &str, old: &str, new: &str) -> String {
    let mut renamed = String::with_capacity(text.len());
    let mut copied = 0;
    for (start, word) in verbatim_identifiers(text) {
        if word == old {
            renamed.push_str(&text[copied..start]);
            renamed.push_str(new);
            copied = start + word.len();
        }
    }
    renamed.push_str(&text[copied..]);
    renamed
}

/// First segment of a possibly qualified reference name (`A` for `A.B`).
pub fn reference_root(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

// ---------------------------------------------------------------------------
// Shared traversal
// ---------------------------------------------------------------------------

/// Rebuild `node` with `walk_fn` applied to each direct child type.
///
/// Leaves are cloned. When the contents of a parenthesized node change, its
/// parentheses are re-derived with [`parenthesize`], so a collapse deeper in
/// the tree does not leave `("a")` or `((A | B))` behind.
pub fn map_children<F>(node: &TypeNode, walk_fn: &mut F) -> TypeNode
where
    F: FnMut(&TypeNode) -> TypeNode,
{
    match node {
        TypeNode::Keyword(_) | TypeNode::Literal(_) => node.clone(),
        TypeNode::Reference { name, type_arguments } => TypeNode::Reference {
            name: name.clone(),
            type_arguments: type_arguments.iter().map(&mut *walk_fn).collect(),
        },
        TypeNode::Array(element) => TypeNode::Array(Box::new(walk_fn(element))),
        TypeNode::Tuple(elements) => TypeNode::Tuple(
            elements
                .iter()
                .map(|element| TupleElement {
                    ty: walk_fn(&element.ty),
                    optional: element.optional,
                    rest: element.rest,
                })
                .collect(),
        ),
        TypeNode::Union(members) => TypeNode::Union(members.iter().map(&mut *walk_fn).collect()),
        TypeNode::Intersection(members) => {
            TypeNode::Intersection(members.iter().map(&mut *walk_fn).collect())
        }
        TypeNode::Parenthesized(inner) => {
            let rewritten = walk_fn(inner);
            if rewritten == **inner {
                TypeNode::Parenthesized(Box::new(rewritten))
            } else {
                parenthesize(rewritten)
            }
        }
        TypeNode::TypeLiteral(members) => TypeNode::TypeLiteral(
            members.iter().map(|member| map_member(member, walk_fn)).collect(),
        ),
    }
}

/// Rebuild a member with `walk_fn` applied to each of its types.
pub fn map_member<F>(member: &TypeMember, walk_fn: &mut F) -> TypeMember
where
    F: FnMut(&TypeNode) -> TypeNode,
{
    match member {
        TypeMember::Property(prop) => {
            let mut prop = prop.clone();
            prop.ty = walk_fn(&prop.ty);
            TypeMember::Property(prop)
        }
        TypeMember::Index(index) => {
            let mut index = index.clone();
            index.key_type = walk_fn(&index.key_type);
            index.value_type = walk_fn(&index.value_type);
            TypeMember::Index(index)
        }
    }
}

/// Rebuild a statement with `walk_fn` applied to every top-level type
/// position: the alias definition, interface heritage, and member types.
/// Verbatim statements are cloned.
pub fn map_statement<F>(statement: &Statement, walk_fn: &mut F) -> Statement
where
    F: FnMut(&TypeNode) -> TypeNode,
{
    match statement {
        Statement::TypeAlias(alias) => {
            let mut alias = alias.clone();
            alias.ty = walk_fn(&alias.ty);
            Statement::TypeAlias(alias)
        }
        Statement::Interface(iface) => {
            let mut iface = iface.clone();
            iface.extends = iface.extends.iter().map(&mut *walk_fn).collect();
            iface.members = iface.members.iter().map(|member| map_member(member, walk_fn)).collect();
            Statement::Interface(iface)
        }
        Statement::Verbatim(_) => statement.clone(),
    }
}

/// Apply [`map_statement`] to every statement of a file.
pub fn map_file<F>(file: &SourceFile, walk_fn: &mut F) -> SourceFile
where
    F: FnMut(&TypeNode) -> TypeNode,
{
    SourceFile {
        statements: file.statements.iter().map(|s| map_statement(s, walk_fn)).collect(),
        trailing_comments: file.trailing_comments.clone(),
    }
}

/// Visit every type node in a file, parents before children.
pub fn visit_file_types<F>(file: &SourceFile, visit_fn: &mut F)
where
    F: FnMut(&TypeNode),
{
    for statement in &file.statements {
        match statement {
            Statement::TypeAlias(alias) => visit_type(&alias.ty, visit_fn),
            Statement::Interface(iface) => {
                for heritage in &iface.extends {
                    visit_type(heritage, visit_fn);
                }
                for member in &iface.members {
                    visit_member(member, visit_fn);
                }
            }
            Statement::Verbatim(_) => {}
        }
    }
}

fn visit_member<F>(member: &TypeMember, visit_fn: &mut F)
where
    F: FnMut(&TypeNode),
{
    match member {
        TypeMember::Property(prop) => visit_type(&prop.ty, visit_fn),
        TypeMember::Index(index) => {
            visit_type(&index.key_type, visit_fn);
            visit_type(&index.value_type, visit_fn);
        }
    }
}

/// Visit `node` and all of its descendants, parents before children.
pub fn visit_type<F>(node: &TypeNode, visit_fn: &mut F)
where
    F: FnMut(&TypeNode),
{
    visit_fn(node);
    match node {
        TypeNode::Keyword(_) | TypeNode::Literal(_) => {}
        TypeNode::Reference { type_arguments, .. } => {
            for arg in type_arguments {
                visit_type(arg, visit_fn);
            }
        }
        TypeNode::Array(element) | TypeNode::Parenthesized(element) => visit_type(element, visit_fn),
        TypeNode::Tuple(elements) => {
            for element in elements {
                visit_type(&element.ty, visit_fn);
            }
        }
        TypeNode::Union(members) | TypeNode::Intersection(members) => {
            for member in members {
                visit_type(member, visit_fn);
            }
        }
        TypeNode::TypeLiteral(members) => {
            for member in members {
                visit_member(member, visit_fn);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Collapse helpers
// ---------------------------------------------------------------------------

/// Wrap `inner` in parentheses only when it is a union or intersection.
/// Parentheses around parentheses collapse to one pair.
pub fn parenthesize(inner: TypeNode) -> TypeNode {
    match inner {
        TypeNode::Parenthesized(_) => inner,
        node if node.is_compound() => TypeNode::Parenthesized(Box::new(node)),
        node => node,
    }
}

/// Build a union from `members`, collapsing a single member to itself.
///
/// Callers must not pass an empty list.
pub fn rebuild_union(mut members: Vec<TypeNode>) -> TypeNode {
    debug_assert!(!members.is_empty(), "union rebuilt without members");
    if members.len() == 1 {
        members.remove(0)
    } else {
        TypeNode::Union(members)
    }
}

/// Build an intersection from `members`, collapsing a single member to itself.
///
/// Callers must not pass an empty list.
pub fn rebuild_intersection(mut members: Vec<TypeNode>) -> TypeNode {
    debug_assert!(!members.is_empty(), "intersection rebuilt without members");
    if members.len() == 1 {
        members.remove(0)
    } else {
        TypeNode::Intersection(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Keyword;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Tsconfig"));
        assert!(is_identifier("$schema"));
        assert!(is_identifier("_private1"));
        assert!(!is_identifier("allow-js"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_declared_names_include_verbatim_declarations() {
        let file = parse("export enum Mode { A }\ntype B = string;\ninterface C { x: B }\nimport x from \"y\";").unwrap();
        let names: Vec<String> = declared_names(&file).into_iter().collect();
        assert_eq!(names, vec!["B".to_string(), "C".to_string(), "Mode".to_string()]);
    }

    #[test]
    fn test_verbatim_identifiers_skip_strings_and_comments() {
        let text = "export const x: Root<\"Root\"> = Ns.Root; // Root\n/* Root */ let y: `Root` = ...Root";
        let words: Vec<&str> = verbatim_identifiers(text).map(|(_, word)| word).collect();
        assert_eq!(words, vec!["export", "const", "x", "Root", "Ns", "let", "y", "Root"]);
    }

    #[test]
    fn test_rename_identifier() {
        assert_eq!(
            rename_identifier("export default Root; // Root\nconst RootX: Root[] = [];", "Root", "Tsconfig"),
            "export default Tsconfig; // Root\nconst RootX: Tsconfig[] = [];"
        );
        assert_eq!(rename_identifier("import \"./Root\";", "Root", "Tsconfig"), "import \"./Root\";");
    }

    #[test]
    fn test_reference_root() {
        assert_eq!(reference_root("A.B.C"), "A");
        assert_eq!(reference_root("A"), "A");
    }

    #[test]
    fn test_parenthesize() {
        let union = TypeNode::Union(vec![TypeNode::reference("A"), TypeNode::reference("B")]);
        assert_eq!(parenthesize(union.clone()), TypeNode::Parenthesized(Box::new(union.clone())));
        assert_eq!(
            parenthesize(TypeNode::Parenthesized(Box::new(union.clone()))),
            TypeNode::Parenthesized(Box::new(union))
        );
        assert_eq!(parenthesize(TypeNode::reference("A")), TypeNode::reference("A"));
    }

    #[test]
    fn test_rebuild_collapses_single_member() {
        assert_eq!(rebuild_union(vec![TypeNode::reference("A")]), TypeNode::reference("A"));
        assert_eq!(
            rebuild_intersection(vec![TypeNode::reference("A"), TypeNode::reference("B")]),
            TypeNode::Intersection(vec![TypeNode::reference("A"), TypeNode::reference("B")])
        );
    }

    #[test]
    fn test_map_children_rederives_changed_parentheses() {
        let node = TypeNode::Parenthesized(Box::new(TypeNode::Union(vec![
            TypeNode::string_literal("a"),
            TypeNode::keyword(Keyword::String),
        ])));
        let rewritten = map_children(&node, &mut |child| match child {
            TypeNode::Union(members) => members[0].clone(),
            other => other.clone(),
        });
        assert_eq!(rewritten, TypeNode::string_literal("a"));

        let untouched = map_children(&node, &mut |child| child.clone());
        assert_eq!(untouched, node);
    }

    #[test]
    fn test_visit_file_types_counts_all_nodes() {
        let file = parse("type A = { a: B[] } | C<D>;").unwrap();
        let mut count = 0;
        visit_file_types(&file, &mut |_| count += 1);
        // union, literal, B[], B, C<D>, D
        assert_eq!(count, 6);
    }
}

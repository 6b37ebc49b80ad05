//! Serialize a syntax tree back to declaration text.
//!
//! The layout is fixed: one declaration per block separated by a blank line,
//! two-space indentation, object shapes expanded one member per line, and a
//! `;` after every member. Parentheses the tree does not carry explicitly
//! are added wherever precedence requires them.

use serde_json::Value;

use crate::ast::{
    Literal, SourceFile, Statement, TupleElement, TypeMember, TypeNode,
};
use crate::ast_utils::is_identifier;

const INDENT: &str = "  ";

/// Print `file` as declaration source text.
pub fn print(file: &SourceFile) -> String {
    let mut printer = Printer { out: String::new() };
    for (index, statement) in file.statements.iter().enumerate() {
        if index > 0 {
            printer.out.push('\n');
        }
        printer.statement(statement);
    }
    if !file.trailing_comments.is_empty() {
        if !file.statements.is_empty() {
            printer.out.push('\n');
        }
        printer.comments(&file.trailing_comments, 0);
    }
    printer.out
}

/// Print a single type expression on one line where possible.
pub fn print_type(node: &TypeNode) -> String {
    let mut printer = Printer { out: String::new() };
    printer.ty(node, 0);
    printer.out
}

/// Where a type is printed, for deciding on parentheses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    UnionMember,
    IntersectionMember,
    /// Array element or optional tuple element.
    Postfix,
}

struct Printer {
    out: String,
}

impl Printer {
    fn pad(&mut self, indent: usize) {
        for _ in 0..indent {
            self.out.push_str(INDENT);
        }
    }

    fn comments(&mut self, comments: &[String], indent: usize) {
        for comment in comments {
            for line in comment.lines() {
                self.pad(indent);
                self.out.push_str(line);
                self.out.push('\n');
            }
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::TypeAlias(alias) => {
                self.comments(&alias.leading_comments, 0);
                for modifier in &alias.modifiers {
                    self.out.push_str(modifier.as_str());
                    self.out.push(' ');
                }
                self.out.push_str("type ");
                self.out.push_str(&alias.name);
                self.out.push_str(" = ");
                self.ty(&alias.ty, 0);
                self.out.push_str(";\n");
            }
            Statement::Interface(iface) => {
                self.comments(&iface.leading_comments, 0);
                for modifier in &iface.modifiers {
                    self.out.push_str(modifier.as_str());
                    self.out.push(' ');
                }
                self.out.push_str("interface ");
                self.out.push_str(&iface.name);
                for (index, heritage) in iface.extends.iter().enumerate() {
                    self.out.push_str(if index == 0 { " extends " } else { ", " });
                    self.ty(heritage, 0);
                }
                self.out.push(' ');
                self.members(&iface.members, 0);
                self.out.push('\n');
            }
            Statement::Verbatim(verbatim) => {
                self.comments(&verbatim.leading_comments, 0);
                self.out.push_str(&verbatim.text);
                self.out.push('\n');
            }
        }
    }

    /// Print `{ ... }` with members one level deeper than `indent`.
    fn members(&mut self, members: &[TypeMember], indent: usize) {
        if members.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        for member in members {
            self.member(member, indent + 1);
        }
        self.pad(indent);
        self.out.push('}');
    }

    fn member(&mut self, member: &TypeMember, indent: usize) {
        match member {
            TypeMember::Property(prop) => {
                self.comments(&prop.leading_comments, indent);
                self.pad(indent);
                if prop.readonly {
                    self.out.push_str("readonly ");
                }
                self.property_name(&prop.name);
                if prop.optional {
                    self.out.push('?');
                }
                self.out.push_str(": ");
                self.ty(&prop.ty, indent);
            }
            TypeMember::Index(index) => {
                self.comments(&index.leading_comments, indent);
                self.pad(indent);
                if index.readonly {
                    self.out.push_str("readonly ");
                }
                self.out.push('[');
                self.out.push_str(&index.parameter);
                self.out.push_str(": ");
                self.ty(&index.key_type, indent);
                self.out.push_str("]: ");
                self.ty(&index.value_type, indent);
            }
        }
        self.out.push_str(";\n");
    }

    fn property_name(&mut self, name: &str) {
        if is_identifier(name) {
            self.out.push_str(name);
        } else {
            self.string(name);
        }
    }

    fn string(&mut self, value: &str) {
        self.out.push_str(&Value::from(value).to_string());
    }

    fn ty(&mut self, node: &TypeNode, indent: usize) {
        match node {
            TypeNode::Keyword(keyword) => self.out.push_str(keyword.as_str()),
            TypeNode::Literal(Literal::String(value)) => self.string(value),
            TypeNode::Literal(Literal::Number(text)) => self.out.push_str(text),
            TypeNode::Literal(Literal::Boolean(value)) => {
                self.out.push_str(if *value { "true" } else { "false" })
            }
            TypeNode::Reference { name, type_arguments } => {
                self.out.push_str(name);
                if !type_arguments.is_empty() {
                    self.out.push('<');
                    for (index, arg) in type_arguments.iter().enumerate() {
                        if index > 0 {
                            self.out.push_str(", ");
                        }
                        self.ty(arg, indent);
                    }
                    self.out.push('>');
                }
            }
            TypeNode::Array(element) => {
                self.nested(element, Position::Postfix, indent);
                self.out.push_str("[]");
            }
            TypeNode::Tuple(elements) => {
                self.out.push('[');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.tuple_element(element, indent);
                }
                self.out.push(']');
            }
            TypeNode::Union(members) => self.separated(members, " | ", Position::UnionMember, indent),
            TypeNode::Intersection(members) => {
                self.separated(members, " & ", Position::IntersectionMember, indent)
            }
            TypeNode::Parenthesized(inner) => {
                self.out.push('(');
                self.ty(inner, indent);
                self.out.push(')');
            }
            TypeNode::TypeLiteral(members) => self.members(members, indent),
        }
    }

    fn tuple_element(&mut self, element: &TupleElement, indent: usize) {
        if element.rest {
            self.out.push_str("...");
        }
        if element.optional {
            self.nested(&element.ty, Position::Postfix, indent);
            self.out.push('?');
        } else {
            self.ty(&element.ty, indent);
        }
    }

    fn separated(&mut self, members: &[TypeNode], separator: &str, position: Position, indent: usize) {
        for (index, member) in members.iter().enumerate() {
            if index > 0 {
                self.out.push_str(separator);
            }
            self.nested(member, position, indent);
        }
    }

    /// Print a child type, adding parentheses when precedence requires them.
    fn nested(&mut self, node: &TypeNode, position: Position, indent: usize) {
        let needs_parens = match (node, position) {
            (TypeNode::Union(_), _) => true,
            (TypeNode::Intersection(_), Position::Postfix) => true,
            _ => false,
        };
        if needs_parens {
            self.out.push('(');
            self.ty(node, indent);
            self.out.push(')');
        } else {
            self.ty(node, indent);
        }
    }
}

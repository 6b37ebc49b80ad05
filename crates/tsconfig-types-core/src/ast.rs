//! Syntax tree for TypeScript type-declaration sources.
//!
//! The tree covers what schema-to-type compilers emit: type aliases,
//! interfaces, and the type expressions used inside them. Any other
//! top-level statement is kept as verbatim text.
//!
//! Trees are plain values. Passes never mutate a tree in place; they build a
//! new one from the old.

use serde::{Deserialize, Serialize};

/// A parsed declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub statements: Vec<Statement>,
    /// Comments after the last statement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statement {
    TypeAlias(TypeAliasDecl),
    Interface(InterfaceDecl),
    Verbatim(VerbatimStatement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Export,
    Declare,
    Default,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Export => "export",
            Modifier::Declare => "declare",
            Modifier::Default => "default",
        }
    }
}

/// `type Name = Type;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub ty: TypeNode,
}

/// `interface Name extends A, B { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TypeNode>,
    pub members: Vec<TypeMember>,
}

/// A statement outside the modelled subset, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbatimStatement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    pub text: String,
}

impl Statement {
    /// Declared type name, for aliases and interfaces.
    pub fn name(&self) -> Option<&str> {
        match self {
            Statement::TypeAlias(alias) => Some(&alias.name),
            Statement::Interface(iface) => Some(&iface.name),
            Statement::Verbatim(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Keyword {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    Bigint,
    Symbol,
    Object,
    Null,
    Undefined,
    Void,
    Never,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::Bigint => "bigint",
            Keyword::Symbol => "symbol",
            Keyword::Object => "object",
            Keyword::Null => "null",
            Keyword::Undefined => "undefined",
            Keyword::Void => "void",
            Keyword::Never => "never",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Literal {
    /// Decoded string value.
    String(String),
    /// Numeric literal as written in the source (including a leading `-`).
    Number(String),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeNode {
    Keyword(Keyword),
    Literal(Literal),
    Reference {
        /// Possibly qualified name (`A.B`).
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<TypeNode>,
    },
    Array(Box<TypeNode>),
    Tuple(Vec<TupleElement>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Parenthesized(Box<TypeNode>),
    TypeLiteral(Vec<TypeMember>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleElement {
    pub ty: TypeNode,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub rest: bool,
}

impl TypeNode {
    pub fn keyword(keyword: Keyword) -> Self {
        TypeNode::Keyword(keyword)
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeNode::Literal(Literal::String(value.into()))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TypeNode::Keyword(k) if *k == keyword)
    }

    /// Union and intersection nodes.
    pub fn is_compound(&self) -> bool {
        matches!(self, TypeNode::Union(_) | TypeNode::Intersection(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeMember {
    Property(PropertySignature),
    Index(IndexSignature),
}

/// `name?: Type;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySignature {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    /// Unquoted property name.
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    pub ty: TypeNode,
}

/// `[parameter: KeyType]: ValueType;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSignature {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    pub parameter: String,
    pub key_type: TypeNode,
    pub value_type: TypeNode,
}

impl IndexSignature {
    /// `[k: string]: unknown`
    pub fn is_unknown_string_index(&self) -> bool {
        self.key_type.is_keyword(Keyword::String) && self.value_type.is_keyword(Keyword::Unknown)
    }
}

impl TypeMember {
    pub fn is_unknown_string_index(&self) -> bool {
        matches!(self, TypeMember::Index(index) if index.is_unknown_string_index())
    }

    pub fn property_name(&self) -> Option<&str> {
        match self {
            TypeMember::Property(prop) => Some(&prop.name),
            TypeMember::Index(_) => None,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

//! Declaration parsing on top of `swc_ecma_parser`.
//!
//! The source is parsed as a TypeScript module and the swc syntax tree is
//! lowered into [`crate::ast`]. Type aliases and interfaces over keyword,
//! literal, reference, array, tuple, union, intersection, parenthesized and
//! object-literal types are modelled. Any other top-level item, including
//! generic declarations, is kept as its exact source text so it survives a
//! parse/print cycle untouched.
//!
//! Comments are collected by swc and re-attached by position: a comment
//! before a statement or a member becomes one of its leading comments,
//! comments after the last statement are kept on the file, and comments
//! anywhere else are dropped.

use swc_core::common::comments::{Comment, CommentKind, SingleThreadedComments};
use swc_core::common::sync::Lrc;
use swc_core::common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_core::ecma::ast::{
    Decl, DefaultDecl, EsVersion, Expr, Lit, MemberProp, ModuleDecl, ModuleItem, Stmt, TsEntityName,
    TsFnParam, TsInterfaceDecl, TsKeywordTypeKind, TsLit, TsType, TsTypeAliasDecl, TsTypeElement,
    TsUnionOrIntersectionType,
};
use swc_core::ecma::parser::{lexer::Lexer, Parser, StringInput, Syntax};

use crate::ast::{
    IndexSignature, InterfaceDecl, Keyword, Literal, Modifier, PropertySignature, SourceFile,
    Statement, TupleElement, TypeAliasDecl, TypeMember, TypeNode, VerbatimStatement,
};
use crate::error::TransformError;

/// Parse declaration source text into a [`SourceFile`].
pub fn parse(src: &str) -> Result<SourceFile, TransformError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom("input.d.ts".to_string()).into(), src.to_string());
    let comments = SingleThreadedComments::default();

    let module = {
        let lexer = Lexer::new(
            Syntax::Typescript(Default::default()),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            Some(&comments),
        );
        let mut parser = Parser::new_from(lexer);
        let parsed = parser.parse_module();
        let recovered = parser.take_errors();
        let module = parsed.map_err(|err| syntax_error(&cm, err.span(), &err.kind().msg()))?;
        if let Some(err) = recovered.first() {
            return Err(syntax_error(&cm, err.span(), &err.kind().msg()));
        }
        module
    };

    let (leading, trailing) = comments.take_all();
    let mut collected: Vec<Comment> = leading
        .borrow()
        .values()
        .chain(trailing.borrow().values())
        .flatten()
        .cloned()
        .collect();
    collected.sort_by_key(|comment| comment.span.lo);

    let mut lowering = Lowering {
        src,
        cm: &cm,
        start: fm.start_pos,
        comments: collected,
        next_comment: 0,
    };
    let mut statements = Vec::new();
    for item in &module.body {
        if matches!(item, ModuleItem::Stmt(Stmt::Empty(_))) {
            continue;
        }
        statements.push(lowering.lower_item(item)?);
    }
    let trailing_comments = lowering.leading_comments(BytePos(u32::MAX));
    tracing::trace!(statements = statements.len(), "parsed declaration source");
    Ok(SourceFile {
        statements,
        trailing_comments,
    })
}

fn syntax_error(cm: &SourceMap, span: Span, message: &str) -> TransformError {
    let loc = cm.lookup_char_pos(span.lo);
    TransformError::ParseError {
        line: loc.line,
        column: loc.col.0 + 1,
        message: message.to_string(),
    }
}

struct Lowering<'a> {
    src: &'a str,
    cm: &'a SourceMap,
    start: BytePos,
    /// Every comment in the file, by position.
    comments: Vec<Comment>,
    next_comment: usize,
}

impl<'a> Lowering<'a> {
    // -----------------------------------------------------------------------
    // Source positions and comments
    // -----------------------------------------------------------------------

    fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.start.0) as usize).min(self.src.len())
    }

    fn text(&self, span: Span) -> &'a str {
        &self.src[self.offset(span.lo)..self.offset(span.hi)]
    }

    fn unsupported(&self, span: Span, what: &str) -> TransformError {
        syntax_error(self.cm, span, &format!("{what} are not supported"))
    }

    /// Take the comments that end before `pos`.
    fn leading_comments(&mut self, pos: BytePos) -> Vec<String> {
        let mut taken = Vec::new();
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.span.hi > pos {
                break;
            }
            let raw = self.text(comment.span);
            taken.push(match comment.kind {
                CommentKind::Line => raw.trim_end().to_string(),
                CommentKind::Block => normalize_block_comment(raw),
            });
            self.next_comment += 1;
        }
        taken
    }

    /// Drop the comments that start before `pos`.
    fn skip_comments(&mut self, pos: BytePos) {
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.span.lo >= pos {
                break;
            }
            self.next_comment += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn lower_item(&mut self, item: &ModuleItem) -> Result<Statement, TransformError> {
        let span = item.span();
        let leading_comments = self.leading_comments(span.lo);

        let declaration = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                Some((&export.decl, vec![Modifier::Export]))
            }
            ModuleItem::Stmt(Stmt::Decl(decl)) => Some((decl, Vec::new())),
            _ => None,
        };

        let statement = match (declaration, item) {
            (Some((Decl::TsTypeAlias(alias), modifiers)), _) if alias.type_params.is_none() => {
                Statement::TypeAlias(self.lower_alias(alias, modifiers, leading_comments)?)
            }
            (Some((Decl::TsInterface(iface), modifiers)), _) if iface.type_params.is_none() => {
                Statement::Interface(self.lower_interface(iface, modifiers, leading_comments)?)
            }
            (None, ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export))) => match &export.decl {
                DefaultDecl::TsInterfaceDecl(iface) if iface.type_params.is_none() => {
                    let modifiers = vec![Modifier::Export, Modifier::Default];
                    Statement::Interface(self.lower_interface(iface, modifiers, leading_comments)?)
                }
                _ => self.verbatim(span, leading_comments),
            },
            _ => self.verbatim(span, leading_comments),
        };
        self.skip_comments(span.hi);
        Ok(statement)
    }

    /// Keep an item as written, including a `;` that swc leaves outside its span.
    fn verbatim(&self, span: Span, leading_comments: Vec<String>) -> Statement {
        let start = self.offset(span.lo);
        let mut end = self.offset(span.hi);
        let rest = &self.src[end..];
        if !self.src[start..end].ends_with(';') && rest.trim_start().starts_with(';') {
            end += rest.len() - rest.trim_start().len() + 1;
        }
        Statement::Verbatim(VerbatimStatement {
            leading_comments,
            text: self.src[start..end].to_string(),
        })
    }

    fn lower_alias(
        &mut self,
        alias: &TsTypeAliasDecl,
        mut modifiers: Vec<Modifier>,
        leading_comments: Vec<String>,
    ) -> Result<TypeAliasDecl, TransformError> {
        if alias.declare {
            modifiers.push(Modifier::Declare);
        }
        Ok(TypeAliasDecl {
            leading_comments,
            modifiers,
            name: alias.id.sym.to_string(),
            ty: self.lower_type(&alias.type_ann)?,
        })
    }

    fn lower_interface(
        &mut self,
        iface: &TsInterfaceDecl,
        mut modifiers: Vec<Modifier>,
        leading_comments: Vec<String>,
    ) -> Result<InterfaceDecl, TransformError> {
        if iface.declare {
            modifiers.push(Modifier::Declare);
        }
        let mut extends = Vec::with_capacity(iface.extends.len());
        for heritage in &iface.extends {
            let name = self.expression_name(&heritage.expr)?;
            let type_arguments = match &heritage.type_args {
                Some(args) => self.lower_types(&args.params)?,
                None => Vec::new(),
            };
            extends.push(TypeNode::Reference { name, type_arguments });
        }
        Ok(InterfaceDecl {
            leading_comments,
            modifiers,
            name: iface.id.sym.to_string(),
            extends,
            members: self.lower_members(&iface.body.body)?,
        })
    }

    /// `A` or `A.B` in an `extends` clause.
    fn expression_name(&self, expr: &Expr) -> Result<String, TransformError> {
        match expr {
            Expr::Ident(ident) => Ok(ident.sym.to_string()),
            Expr::Member(member) => match &member.prop {
                MemberProp::Ident(prop) => Ok(format!("{}.{}", self.expression_name(&member.obj)?, prop.sym)),
                _ => Err(self.unsupported(member.span, "computed heritage names")),
            },
            other => Err(self.unsupported(other.span(), "heritage expressions")),
        }
    }

    // -----------------------------------------------------------------------
    // Object members
    // -----------------------------------------------------------------------

    fn lower_members(&mut self, elements: &[TsTypeElement]) -> Result<Vec<TypeMember>, TransformError> {
        let mut members = Vec::with_capacity(elements.len());
        for element in elements {
            let span = element.span();
            let leading_comments = self.leading_comments(span.lo);
            members.push(self.lower_member(element, leading_comments)?);
            self.skip_comments(span.hi);
        }
        Ok(members)
    }

    fn lower_member(
        &mut self,
        element: &TsTypeElement,
        leading_comments: Vec<String>,
    ) -> Result<TypeMember, TransformError> {
        match element {
            TsTypeElement::TsPropertySignature(prop) => {
                if prop.computed {
                    return Err(self.unsupported(prop.span, "computed property names"));
                }
                let name = match &*prop.key {
                    Expr::Ident(ident) => ident.sym.to_string(),
                    Expr::Lit(Lit::Str(value)) => value.value.to_string(),
                    Expr::Lit(Lit::Num(number)) => self.text(number.span).to_string(),
                    other => return Err(self.unsupported(other.span(), "property keys of this kind")),
                };
                let Some(annotation) = &prop.type_ann else {
                    return Err(self.unsupported(prop.span, "properties without a type"));
                };
                Ok(TypeMember::Property(PropertySignature {
                    leading_comments,
                    readonly: prop.readonly,
                    name,
                    optional: prop.optional,
                    ty: self.lower_type(&annotation.type_ann)?,
                }))
            }
            TsTypeElement::TsIndexSignature(index) => {
                let (parameter, key_type) = match (&index.params[..], &index.type_ann) {
                    ([TsFnParam::Ident(param)], Some(_)) => match &param.type_ann {
                        Some(key) => (param.id.sym.to_string(), self.lower_type(&key.type_ann)?),
                        None => return Err(self.unsupported(index.span, "untyped index parameters")),
                    },
                    _ => return Err(self.unsupported(index.span, "index signatures of this shape")),
                };
                let value_type = match &index.type_ann {
                    Some(value) => self.lower_type(&value.type_ann)?,
                    None => return Err(self.unsupported(index.span, "index signatures without a type")),
                };
                Ok(TypeMember::Index(IndexSignature {
                    leading_comments,
                    readonly: index.readonly,
                    parameter,
                    key_type,
                    value_type,
                }))
            }
            TsTypeElement::TsMethodSignature(method) => Err(self.unsupported(method.span, "method signatures")),
            other => Err(self.unsupported(other.span(), "call, construct and accessor signatures")),
        }
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    fn lower_types(&mut self, types: &[Box<TsType>]) -> Result<Vec<TypeNode>, TransformError> {
        types.iter().map(|ty| self.lower_type(ty)).collect()
    }

    fn lower_type(&mut self, ty: &TsType) -> Result<TypeNode, TransformError> {
        match ty {
            TsType::TsKeywordType(keyword) => {
                let keyword = match keyword.kind {
                    TsKeywordTypeKind::TsAnyKeyword => Keyword::Any,
                    TsKeywordTypeKind::TsUnknownKeyword => Keyword::Unknown,
                    TsKeywordTypeKind::TsStringKeyword => Keyword::String,
                    TsKeywordTypeKind::TsNumberKeyword => Keyword::Number,
                    TsKeywordTypeKind::TsBooleanKeyword => Keyword::Boolean,
                    TsKeywordTypeKind::TsBigIntKeyword => Keyword::Bigint,
                    TsKeywordTypeKind::TsSymbolKeyword => Keyword::Symbol,
                    TsKeywordTypeKind::TsObjectKeyword => Keyword::Object,
                    TsKeywordTypeKind::TsNullKeyword => Keyword::Null,
                    TsKeywordTypeKind::TsUndefinedKeyword => Keyword::Undefined,
                    TsKeywordTypeKind::TsVoidKeyword => Keyword::Void,
                    TsKeywordTypeKind::TsNeverKeyword => Keyword::Never,
                    _ => return Err(self.unsupported(keyword.span, "intrinsic types")),
                };
                Ok(TypeNode::Keyword(keyword))
            }
            TsType::TsLitType(literal) => match &literal.lit {
                TsLit::Str(value) => Ok(TypeNode::Literal(Literal::String(value.value.to_string()))),
                TsLit::Number(_) => Ok(TypeNode::Literal(Literal::Number(self.text(literal.span).to_string()))),
                TsLit::Bool(value) => Ok(TypeNode::Literal(Literal::Boolean(value.value))),
                _ => Err(self.unsupported(literal.span, "bigint and template literal types")),
            },
            TsType::TsTypeRef(reference) => Ok(TypeNode::Reference {
                name: entity_name(&reference.type_name),
                type_arguments: match &reference.type_params {
                    Some(args) => self.lower_types(&args.params)?,
                    None => Vec::new(),
                },
            }),
            TsType::TsArrayType(array) => Ok(TypeNode::Array(Box::new(self.lower_type(&array.elem_type)?))),
            TsType::TsTupleType(tuple) => {
                let mut elements = Vec::with_capacity(tuple.elem_types.len());
                for element in &tuple.elem_types {
                    if element.label.is_some() {
                        return Err(self.unsupported(element.span, "labelled tuple elements"));
                    }
                    elements.push(match &*element.ty {
                        TsType::TsOptionalType(optional) => TupleElement {
                            ty: self.lower_type(&optional.type_ann)?,
                            optional: true,
                            rest: false,
                        },
                        TsType::TsRestType(rest) => TupleElement {
                            ty: self.lower_type(&rest.type_ann)?,
                            optional: false,
                            rest: true,
                        },
                        other => TupleElement {
                            ty: self.lower_type(other)?,
                            optional: false,
                            rest: false,
                        },
                    });
                }
                Ok(TypeNode::Tuple(elements))
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                Ok(compound(self.lower_types(&union.types)?, TypeNode::Union))
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(intersection)) => {
                Ok(compound(self.lower_types(&intersection.types)?, TypeNode::Intersection))
            }
            TsType::TsParenthesizedType(paren) => {
                Ok(TypeNode::Parenthesized(Box::new(self.lower_type(&paren.type_ann)?)))
            }
            TsType::TsTypeLit(shape) => Ok(TypeNode::TypeLiteral(self.lower_members(&shape.members)?)),
            TsType::TsTypeOperator(op) => Err(self.unsupported(op.span, "type operators")),
            TsType::TsFnOrConstructorType(func) => Err(self.unsupported(func.span(), "function types")),
            TsType::TsConditionalType(cond) => Err(self.unsupported(cond.span, "conditional types")),
            TsType::TsMappedType(mapped) => Err(self.unsupported(mapped.span, "mapped types")),
            TsType::TsIndexedAccessType(access) => Err(self.unsupported(access.span, "indexed access types")),
            other => Err(self.unsupported(other.span(), "types of this kind")),
        }
    }
}

/// Re-indent a block comment so that it prints identically at any nesting
/// depth: continuation lines lose their indentation, and lines starting with
/// `*` are aligned one space in (JSDoc style).
fn normalize_block_comment(raw: &str) -> String {
    let mut lines = raw.lines();
    let mut out = lines.next().unwrap_or_default().trim_end().to_string();
    for line in lines {
        out.push('\n');
        let trimmed = line.trim();
        if trimmed.starts_with('*') {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

/// A leading `|` or `&` can leave swc with a one-member compound type.
fn compound(mut members: Vec<TypeNode>, build: fn(Vec<TypeNode>) -> TypeNode) -> TypeNode {
    if members.len() == 1 {
        members.remove(0)
    } else {
        build(members)
    }
}

fn entity_name(name: &TsEntityName) -> String {
    match name {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => {
            format!("{}.{}", entity_name(&qualified.left), qualified.right.sym)
        }
    }
}

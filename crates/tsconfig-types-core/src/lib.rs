//! Clean up TypeScript declarations generated from the tsconfig JSON Schema.
//!
//! The generated file is parsed into an immutable syntax tree, rewritten by
//! a fixed sequence of passes, checked, and printed back out:
//!
//! 1. [`passes::p1_root`]: rename the root alias and apply the optional
//!    root-level edits.
//! 2. [`passes::p2_string_widening`]: drop `string` next to string literals.
//! 3. [`passes::p3_unknown_records`]: drop `{ [k: string]: unknown }` union
//!    members.
//! 4. [`passes::p4_index_signatures`]: drop unknown index signatures from
//!    shapes that declare other members.
//!
//! Every pass takes a tree and returns a new one; the input is never changed.

pub mod ast;
pub mod ast_utils;
pub mod config;
pub mod error;
pub mod parser;
pub mod passes;
pub mod printer;
pub mod validate;

pub use ast::SourceFile;
pub use config::{InjectedProperty, PipelineOptions, DEFAULT_ROOT_NAME};
pub use error::TransformError;
pub use parser::parse;
pub use printer::print;

use passes::{p1_root, p2_string_widening, p3_unknown_records, p4_index_signatures};

/// Run the rewrite pipeline over a parsed declaration file.
///
/// The output is validated before it is returned: a tree with an empty
/// union, a duplicate declaration, or a reference to a type the pipeline
/// removed is reported as [`TransformError::StructuralInvariant`].
pub fn transform(file: &SourceFile, options: &PipelineOptions) -> Result<SourceFile, TransformError> {
    let declared_before = ast_utils::declared_names(file);
    tracing::debug!(
        statements = file.statements.len(),
        root_name = %options.root_name,
        "running transform pipeline"
    );

    let file = p1_root::apply(file, options)?;
    let file = p2_string_widening::remove_string_widening(&file);
    let file = p3_unknown_records::remove_unknown_records(&file);
    let file = p4_index_signatures::strip_unknown_index_signatures(&file);

    validate::validate(&file, &declared_before)?;
    tracing::debug!(statements = file.statements.len(), "transform pipeline finished");
    Ok(file)
}

/// Parse `src`, run [`transform`], and print the result.
pub fn transform_source(src: &str, options: &PipelineOptions) -> Result<String, TransformError> {
    let file = parse(src)?;
    let file = transform(&file, options)?;
    Ok(print(&file))
}

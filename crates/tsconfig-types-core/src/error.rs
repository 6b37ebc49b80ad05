//! Error types for declaration parsing and rewriting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Syntax error at {line}:{column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Root type alias not found: {0}")]
    RootAliasNotFound(String),

    #[error("Invalid identifier `{name}`: {context}")]
    InvalidIdentifier { name: String, context: String },

    #[error("Structural invariant violated at {path}: {message}")]
    StructuralInvariant { path: String, message: String },
}

impl TransformError {
    pub(crate) fn invariant(path: impl Into<String>, message: impl Into<String>) -> Self {
        TransformError::StructuralInvariant {
            path: path.into(),
            message: message.into(),
        }
    }
}

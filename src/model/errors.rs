//! Binding generation error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::bindings::types::SourceCoord;
use crate::core::language::Language;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while building the binding model or rendering a backend.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum BindError {
    #[error("unknown type `{type_name}` in function `{function}` ({language})")]
    #[diagnostic(code(flatbind::typemap::unknown_type))]
    UnknownType {
        type_name: String,
        function: String,
        coord: SourceCoord,
        language: Language,
    },

    #[error("opaque types `{first}` and `{second}` share the function prefix `{prefix}`")]
    #[diagnostic(
        code(flatbind::registry::ambiguous_prefix),
        help("give one of the types an explicit `prefix` in flatbind.toml")
    )]
    AmbiguousPrefix {
        prefix: String,
        first: String,
        second: String,
    },

    #[error("malformed declaration at {coord}: {message}")]
    #[diagnostic(code(flatbind::header::malformed))]
    MalformedDeclaration { message: String, coord: SourceCoord },

    #[error("failed to write {}: {message}", path.display())]
    #[diagnostic(code(flatbind::output::write))]
    Write { path: PathBuf, message: String },
}

impl BindError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BindError::UnknownType {
                type_name,
                function,
                coord,
                language,
            } => Diagnostic::error(format!(
                "no {} type for C type `{}`",
                language, type_name
            ))
            .with_context(format!("in function `{}` at {}", function, coord))
            .with_suggestion(format!(
                "Add `\"{}\" = \"...\"` under [types.{}] in flatbind.toml",
                type_name, language
            ))
            .with_suggestion(suggestions::ADD_TYPE),

            BindError::AmbiguousPrefix {
                prefix,
                first,
                second,
            } => Diagnostic::error(format!("ambiguous function prefix `{}`", prefix))
                .with_context(format!("claimed by both `{}` and `{}`", first, second))
                .with_suggestion(suggestions::EXPLICIT_PREFIX),

            BindError::MalformedDeclaration { message, coord } => {
                Diagnostic::error(format!("cannot interpret declaration: {}", message))
                    .with_context(format!("at {}", coord))
                    .with_suggestion(suggestions::MALFORMED)
            }

            BindError::Write { path, message } => {
                Diagnostic::error(format!("cannot write `{}`", path.display()))
                    .with_context(message.clone())
                    .with_suggestion(suggestions::WRITABLE_OUTPUT)
            }
        }
    }
}

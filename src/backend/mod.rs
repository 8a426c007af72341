//! Per-language renderers.
//!
//! Every language implements [`Backend`]; [`render`] composes the pieces
//! into the same artifact set for all of them:
//!
//! - an enum artifact (opaque type declarations and enum constants),
//! - a low-level artifact declaring every C function,
//! - for some languages, a binding artifact grouping bound methods under
//!   their opaque type, followed by the free functions,
//! - for Fortran, the procedures the bound methods point to.
//!
//! Artifacts are built in memory; writing them is the caller's job.

pub mod fortran;
pub mod java;
pub mod julia;
pub mod python;
pub mod rust;

use std::path::PathBuf;

use crate::bindings::types::{CEnum, CFunction, Declarations};
use crate::core::language::Language;
use crate::core::registry::{OpaqueRegistry, OpaqueType};
use crate::model::classify::{BindingModel, BoundMethod, TypeBinding};
use crate::model::errors::BindError;
use crate::model::typemap::{Dialect, TypeMapper};

pub use fortran::Fortran;
pub use java::Java;
pub use julia::Julia;
pub use python::Python;
pub use rust::Rust;

/// The artifacts every backend can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Enum constants and opaque type declarations
    Enums,
    /// One declaration per C function
    Ffi,
    /// Bound methods per opaque type, then free functions
    Bindings,
    /// Procedures implementing the bound methods on top of the C functions
    Wrappers,
}

/// A generated file, relative to the language's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything a backend can consult while rendering.
pub struct RenderContext<'a> {
    pub mapper: TypeMapper<'a>,
    pub registry: &'a OpaqueRegistry,
    /// Shared library name, without `lib` prefix or extension
    pub library: &'a str,
    /// Enum used as a status code return
    pub status_type: Option<&'a str>,
    /// Header the declarations came from
    pub source: &'a str,
}

/// A target language renderer.
pub trait Backend: Send + Sync {
    /// The language this backend renders.
    fn language(&self) -> Language;

    /// Default type mapping policy.
    fn dialect(&self) -> Dialect;

    /// File name of an artifact, `None` when the backend does not produce it.
    fn file_name(&self, kind: ArtifactKind) -> Option<&'static str>;

    /// Text before the artifact's items.
    fn preamble(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> String;

    /// Text after the artifact's items.
    fn postamble(&self, _kind: ArtifactKind) -> String {
        String::new()
    }

    /// Declaration of an opaque handle type, in the enum artifact.
    fn render_opaque(&self, _ty: &OpaqueType) -> String {
        String::new()
    }

    /// Constants of one enum, in declaration order with literal values.
    fn render_enum(&self, e: &CEnum) -> String;

    /// Low-level declaration of one C function.
    fn render_function(
        &self,
        function: &CFunction,
        ctx: &RenderContext<'_>,
    ) -> Result<String, BindError>;

    /// One opaque type with its bound methods.
    fn render_bound_type(&self, binding: &TypeBinding<'_>) -> String {
        binding
            .methods
            .iter()
            .map(|m| self.render_bound_method(binding.ty, m))
            .collect()
    }

    /// One bound method of `ty`.
    fn render_bound_method(&self, _ty: &OpaqueType, _method: &BoundMethod<'_>) -> String {
        String::new()
    }

    /// Procedure behind `method` of `ty`, in the wrapper artifact.
    fn render_wrapper(
        &self,
        _ty: &OpaqueType,
        _method: &BoundMethod<'_>,
        _ctx: &RenderContext<'_>,
    ) -> Result<String, BindError> {
        Ok(String::new())
    }

    /// One free function in the binding artifact.
    fn render_free_function(&self, _function: &CFunction) -> String {
        String::new()
    }

    /// Heading of the free function section of the binding artifact.
    fn free_functions_header(&self) -> String {
        String::new()
    }

    /// Closing of the free function section of the binding artifact.
    fn free_functions_footer(&self) -> String {
        String::new()
    }
}

/// The backend for `language`.
pub fn for_language(language: Language) -> Box<dyn Backend> {
    match language {
        Language::Fortran => Box::new(Fortran),
        Language::Python => Box::new(Python),
        Language::Julia => Box::new(Julia),
        Language::Rust => Box::new(Rust),
        Language::Java => Box::new(Java),
    }
}

/// Render every artifact of `backend`. Fails on the first function whose
/// types cannot be mapped; no partial artifact set is returned.
pub fn render(
    backend: &dyn Backend,
    decls: &Declarations,
    model: &BindingModel<'_>,
    ctx: &RenderContext<'_>,
) -> Result<Vec<Artifact>, BindError> {
    let mut artifacts = Vec::with_capacity(4);

    if let Some(name) = backend.file_name(ArtifactKind::Enums) {
        let mut out = backend.preamble(ArtifactKind::Enums, ctx);
        for ty in ctx.registry.types() {
            out.push_str(&backend.render_opaque(ty));
        }
        for e in &decls.enums {
            out.push_str(&backend.render_enum(e));
        }
        out.push_str(&backend.postamble(ArtifactKind::Enums));
        artifacts.push(Artifact {
            path: PathBuf::from(name),
            contents: out,
        });
    }

    if let Some(name) = backend.file_name(ArtifactKind::Ffi) {
        let mut out = backend.preamble(ArtifactKind::Ffi, ctx);
        for function in &decls.functions {
            out.push_str(&backend.render_function(function, ctx)?);
        }
        out.push_str(&backend.postamble(ArtifactKind::Ffi));
        artifacts.push(Artifact {
            path: PathBuf::from(name),
            contents: out,
        });
    }

    if let Some(name) = backend.file_name(ArtifactKind::Bindings) {
        let mut out = backend.preamble(ArtifactKind::Bindings, ctx);
        for binding in &model.types {
            out.push_str(&backend.render_bound_type(binding));
        }
        out.push_str(&backend.free_functions_header());
        for function in &model.free {
            out.push_str(&backend.render_free_function(function));
        }
        out.push_str(&backend.free_functions_footer());
        out.push_str(&backend.postamble(ArtifactKind::Bindings));
        artifacts.push(Artifact {
            path: PathBuf::from(name),
            contents: out,
        });
    }

    if let Some(name) = backend.file_name(ArtifactKind::Wrappers) {
        let mut out = backend.preamble(ArtifactKind::Wrappers, ctx);
        for binding in &model.types {
            for method in &binding.methods {
                out.push_str(&backend.render_wrapper(binding.ty, method, ctx)?);
            }
        }
        out.push_str(&backend.postamble(ArtifactKind::Wrappers));
        artifacts.push(Artifact {
            path: PathBuf::from(name),
            contents: out,
        });
    }

    Ok(artifacts)
}

/// "Do not edit" banner, one comment line per row.
pub(crate) fn banner(comment: &str, source: &str, what: &str) -> String {
    let rule = "=".repeat(75);
    format!(
        "{c} {rule}\n\
         {c} !!!! AUTO-GENERATED FILE !!!! Do not edit.\n\
         {c} Generated by flatbind from {source}.\n\
         {c} {what}\n\
         {c} {rule}\n",
        c = comment,
        rule = rule,
        source = source,
        what = what,
    )
}

/// Rename an argument that collides with a reserved word.
pub(crate) fn escape_reserved<'n>(
    name: &'n str,
    reserved: &[&str],
    replacement: impl Fn(&str) -> String,
) -> std::borrow::Cow<'n, str> {
    if reserved.contains(&name) {
        std::borrow::Cow::Owned(replacement(name))
    } else {
        std::borrow::Cow::Borrowed(name)
    }
}

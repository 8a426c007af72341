//! Rust `extern "C"` declarations, in the style of a `-sys` crate.

use crate::backend::{banner, escape_reserved, ArtifactKind, Backend, RenderContext};
use crate::bindings::types::{CEnum, CFunction, UNNAMED_ARGUMENT};
use crate::core::language::Language;
use crate::core::registry::OpaqueType;
use crate::model::errors::BindError;
use crate::model::typemap::{BaseTypeTable, Dialect};

const RESERVED: &[&str] = &[
    "as", "box", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "type", "unsafe", "use", "where",
    "while",
];

/// Rust backend.
pub struct Rust;

impl Backend for Rust {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn dialect(&self) -> Dialect {
        let types = BaseTypeTable::new()
            .with("float", "c_float")
            .with("double", "c_double")
            .with("int", "c_int")
            .with("size_t", "usize")
            .with("int64_t", "i64")
            .with("uint64_t", "u64")
            .with("bool", "bool")
            .with("char", "c_char")
            .with("char*", "*mut c_char")
            .with("const char*", "*const c_char")
            .with("float*", "*mut c_float")
            .with("double*", "*mut c_double")
            .with("const double*", "*const c_double")
            .with("int*", "*mut c_int")
            .with("size_t*", "*mut usize")
            .with("const size_t*", "*const usize")
            .with("uint64_t*", "*mut u64")
            .with("bool*", "*mut bool")
            .with("void*", "*mut c_void")
            .with("const void*", "*const c_void");

        Dialect {
            language: Language::Rust,
            types,
            opaque: "*mut {name}".to_string(),
            enumeration: "{enum}".to_string(),
            enum_pointer: "*mut {enum}".to_string(),
            raw_pointer: "*mut c_void".to_string(),
        }
    }

    fn file_name(&self, kind: ArtifactKind) -> Option<&'static str> {
        match kind {
            ArtifactKind::Enums => Some("types.rs"),
            ArtifactKind::Ffi => Some("lib.rs"),
            ArtifactKind::Bindings | ArtifactKind::Wrappers => None,
        }
    }

    fn preamble(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> String {
        match kind {
            ArtifactKind::Enums => {
                let mut out = banner("//", ctx.source, "Types of the C API");
                out.push_str("#![allow(non_camel_case_types, unused_imports)]\n\n");
                out.push_str("use std::os::raw::{c_int, c_uint};\n");
                out
            }
            _ => {
                let mut out = banner("//", ctx.source, "Declarations of the C functions");
                out.push_str("#![allow(non_camel_case_types, unused_imports)]\n\n");
                out.push_str("use std::os::raw::{c_char, c_double, c_float, c_int, c_void};\n\n");
                out.push_str("mod types;\n");
                out.push_str("pub use self::types::*;\n\n");
                out.push_str(&format!("#[link(name = \"{}\")]\n", ctx.library));
                out.push_str("extern \"C\" {\n");
                out
            }
        }
    }

    fn postamble(&self, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Ffi => "}\n".to_string(),
            _ => String::new(),
        }
    }

    fn render_opaque(&self, ty: &OpaqueType) -> String {
        format!(
            "\n#[repr(C)]\npub struct {} {{\n    _private: [u8; 0],\n}}\n",
            ty.c_name
        )
    }

    fn render_enum(&self, e: &CEnum) -> String {
        let carrier = if e.is_signed() { "c_int" } else { "c_uint" };
        let mut out = format!("\n// enum {}\npub type {} = {};\n", e.name, e.name, carrier);
        for enumerator in &e.enumerators {
            out.push_str(&format!(
                "pub const {}: {} = {};\n",
                enumerator.name, e.name, enumerator.value
            ));
        }
        out
    }

    fn render_function(
        &self,
        function: &CFunction,
        ctx: &RenderContext<'_>,
    ) -> Result<String, BindError> {
        let types = ctx.mapper.map_args(function)?;

        let args = function
            .args
            .iter()
            .zip(&types)
            .map(|(arg, ty)| {
                let name = if arg.name == UNNAMED_ARGUMENT {
                    "_".into()
                } else {
                    escape_reserved(&arg.name, RESERVED, |n| format!("{}_", n))
                };
                format!("{}: {}", name, ty)
            })
            .collect::<Vec<_>>()
            .join(", ");

        let ret = if function.return_type.is_void() {
            String::new()
        } else {
            format!(" -> {}", ctx.mapper.map_return_of(function)?)
        };

        Ok(format!(
            "    // Function \"{}\", at {}\n    pub fn {}({}){};\n\n",
            function.name, function.coord, function.name, args, ret
        ))
    }
}

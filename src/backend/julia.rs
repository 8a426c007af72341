//! Julia `ccall` wrappers.

use std::borrow::Cow;

use crate::backend::{banner, escape_reserved, ArtifactKind, Backend, RenderContext};
use crate::bindings::types::{CEnum, CFunction, UNNAMED_ARGUMENT};
use crate::core::language::Language;
use crate::core::registry::OpaqueType;
use crate::model::errors::BindError;
use crate::model::typemap::{BaseTypeTable, Dialect};

/// Argument names that cannot be used as-is in a Julia method.
const RESERVED: &[&str] = &[
    "type", "end", "function", "global", "local", "module", "begin", "let", "quote", "do",
];

/// Julia backend.
pub struct Julia;

impl Backend for Julia {
    fn language(&self) -> Language {
        Language::Julia
    }

    fn dialect(&self) -> Dialect {
        let types = BaseTypeTable::new()
            .with("void", "Cvoid")
            .with("float", "Cfloat")
            .with("double", "Cdouble")
            .with("int", "Cint")
            .with("size_t", "Csize_t")
            .with("int64_t", "Int64")
            .with("uint64_t", "UInt64")
            .with("bool", "CBool")
            .with("char", "Cchar")
            .with("char*", "Ptr{UInt8}")
            .with("const char*", "Ptr{UInt8}")
            .with("float*", "Ptr{Cfloat}")
            .with("double*", "Ptr{Cdouble}")
            .with("const double*", "Ptr{Cdouble}")
            .with("int*", "Ptr{Cint}")
            .with("size_t*", "Ptr{Csize_t}")
            .with("const size_t*", "Ptr{Csize_t}")
            .with("uint64_t*", "Ptr{UInt64}")
            .with("bool*", "Ptr{CBool}")
            .with("void*", "Ptr{Cvoid}")
            .with("const void*", "Ptr{Cvoid}");

        Dialect {
            language: Language::Julia,
            types,
            opaque: "Ptr{{name}}".to_string(),
            enumeration: "{enum}".to_string(),
            enum_pointer: "Ptr{{enum}}".to_string(),
            raw_pointer: "Ptr{Cvoid}".to_string(),
        }
    }

    fn file_name(&self, kind: ArtifactKind) -> Option<&'static str> {
        match kind {
            ArtifactKind::Enums => Some("types.jl"),
            ArtifactKind::Ffi => Some("cdef.jl"),
            ArtifactKind::Bindings | ArtifactKind::Wrappers => None,
        }
    }

    fn preamble(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> String {
        match kind {
            ArtifactKind::Enums => {
                let mut out = banner("#", ctx.source, "Julia types of the C API");
                out.push_str("const CBool = Cuchar\n");
                out
            }
            _ => banner("#", ctx.source, "Julia wrappers of the C functions"),
        }
    }

    fn render_opaque(&self, ty: &OpaqueType) -> String {
        format!("\nstruct {} end\n", ty.c_name)
    }

    fn render_enum(&self, e: &CEnum) -> String {
        let carrier = if e.is_signed() { "Int32" } else { "UInt32" };
        let mut out = format!("\n# enum {}\nconst {} = {}\n", e.name, e.name, carrier);
        for enumerator in &e.enumerators {
            out.push_str(&format!(
                "const {} = {}({})\n",
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
        let restype = ctx.mapper.map_return_of(function)?;

        let names: Vec<_> = function
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if arg.name == UNNAMED_ARGUMENT {
                    Cow::Owned(format!("arg{}", i))
                } else {
                    escape_reserved(&arg.name, RESERVED, |_| "typ".to_string())
                }
            })
            .collect();

        let argdecl = names
            .iter()
            .zip(&types)
            .map(|(name, ty)| format!("{}::{}", name, ty))
            .collect::<Vec<_>>()
            .join(", ");

        // A one-element tuple needs its trailing comma
        let argtypes = match types.as_slice() {
            [] => "()".to_string(),
            [single] => format!("({},)", single),
            many => format!("({})", many.join(", ")),
        };

        let mut call = format!(
            "ccall((:{}, lib{}), {}, {}",
            function.name, ctx.library, restype, argtypes
        );
        for name in &names {
            call.push_str(", ");
            call.push_str(name);
        }
        call.push(')');

        Ok(format!(
            "\n# Function '{name}' at {coord}\n\
             function {name}({argdecl})\n\
             \x20   {call}\n\
             end\n",
            name = function.name,
            coord = function.coord,
            argdecl = argdecl,
            call = call,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{artifact, chemfiles_declarations, render_language};

    #[test]
    fn test_ccall_wrapper() {
        let decls = chemfiles_declarations();
        let cdef = artifact(&render_language(Language::Julia, &decls), "cdef.jl");

        assert!(cdef.contains(
            "function chfl_atom_mass(atom::Ptr{CHFL_ATOM}, mass::Ptr{Cdouble})\n    \
             ccall((:chfl_atom_mass, libchemfiles), chfl_status, (Ptr{CHFL_ATOM}, Ptr{Cdouble}), atom, mass)\n\
             end\n"
        ));
    }

    #[test]
    fn test_argument_tuples() {
        let decls = chemfiles_declarations();
        let cdef = artifact(&render_language(Language::Julia, &decls), "cdef.jl");

        assert!(cdef.contains("ccall((:chfl_version, libchemfiles), Ptr{UInt8}, ())\n"));
        assert!(cdef.contains(
            "ccall((:chfl_atom, libchemfiles), Ptr{CHFL_ATOM}, (Ptr{UInt8},), name)\n"
        ));
        assert!(cdef.contains("ccall((:chfl_clear_errors, libchemfiles), Cvoid, ())\n"));
    }

    #[test]
    fn test_type_argument_is_renamed() {
        let decls = chemfiles_declarations();
        let cdef = artifact(&render_language(Language::Julia, &decls), "cdef.jl");

        assert!(cdef.contains("function chfl_atom_set_type(atom::Ptr{CHFL_ATOM}, typ::Ptr{UInt8})"));
        assert!(cdef.contains(", atom, typ)\n"));
    }

    #[test]
    fn test_unnamed_arguments_are_numbered() {
        let decls = crate::bindings::HeaderParser::new()
            .parse_content(
                "typedef struct CHFL_ATOM CHFL_ATOM;\nvoid chfl_atom_copy(const CHFL_ATOM*, CHFL_ATOM*);\n",
                std::path::Path::new("copy.h"),
            )
            .unwrap();
        let cdef = artifact(&render_language(Language::Julia, &decls), "cdef.jl");

        assert!(cdef.contains("function chfl_atom_copy(arg0::Ptr{CHFL_ATOM}, arg1::Ptr{CHFL_ATOM})"));
        assert!(cdef.contains(", arg0, arg1)\n"));
    }

    #[test]
    fn test_types_file() {
        let decls = chemfiles_declarations();
        let types = artifact(&render_language(Language::Julia, &decls), "types.jl");

        assert!(types.contains("const CBool = Cuchar\n"));
        assert!(types.contains("\nstruct CHFL_ATOM end\n"));
        assert!(types.contains(
            "# enum chfl_cellshape\nconst chfl_cellshape = UInt32\nconst CHFL_CELL_ORTHORHOMBIC = chfl_cellshape(0)\n"
        ));
    }

    #[test]
    fn test_no_binding_artifact() {
        let decls = chemfiles_declarations();
        assert_eq!(render_language(Language::Julia, &decls).len(), 2);
    }

    #[test]
    fn test_negative_enum_uses_signed_carrier() {
        let decls = crate::bindings::HeaderParser::new()
            .parse_content(
                "typedef enum {\n    CHFL_OK = 0,\n    CHFL_BAD = -3,\n} chfl_code;\n",
                std::path::Path::new("codes.h"),
            )
            .unwrap();
        let types = artifact(&render_language(Language::Julia, &decls), "types.jl");

        assert!(types.contains("const chfl_code = Int32\n"));
        assert!(types.contains("const CHFL_BAD = chfl_code(-3)\n"));
    }
}

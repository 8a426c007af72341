//! Python `ctypes` declarations.

use crate::backend::{banner, ArtifactKind, Backend, RenderContext};
use crate::bindings::types::{CEnum, CFunction};
use crate::core::language::Language;
use crate::model::classify::TypeBinding;
use crate::model::errors::BindError;
use crate::model::typemap::{BaseTypeTable, Dialect};

/// Python backend.
pub struct Python;

impl Backend for Python {
    fn language(&self) -> Language {
        Language::Python
    }

    fn dialect(&self) -> Dialect {
        let types = BaseTypeTable::new()
            .with("void", "None")
            .with("float", "c_float")
            .with("double", "c_double")
            .with("int", "c_int")
            .with("size_t", "c_size_t")
            .with("int64_t", "c_int64")
            .with("uint64_t", "c_uint64")
            .with("bool", "c_bool")
            .with("char", "c_char")
            .with("char*", "c_char_p")
            .with("const char*", "c_char_p")
            .with("float*", "POINTER(c_float)")
            .with("double*", "POINTER(c_double)")
            .with("const double*", "POINTER(c_double)")
            .with("int*", "POINTER(c_int)")
            .with("size_t*", "POINTER(c_size_t)")
            .with("const size_t*", "POINTER(c_size_t)")
            .with("uint64_t*", "POINTER(c_uint64)")
            .with("bool*", "POINTER(c_bool)")
            .with("void*", "c_void_p")
            .with("const void*", "c_void_p");

        Dialect {
            language: Language::Python,
            types,
            opaque: "POINTER({name})".to_string(),
            enumeration: "{enum}".to_string(),
            enum_pointer: "POINTER({enum})".to_string(),
            raw_pointer: "c_void_p".to_string(),
        }
    }

    fn file_name(&self, kind: ArtifactKind) -> Option<&'static str> {
        match kind {
            ArtifactKind::Enums => Some("enums.py"),
            ArtifactKind::Ffi => Some("ffi.py"),
            ArtifactKind::Bindings => Some("bindings.py"),
            ArtifactKind::Wrappers => None,
        }
    }

    fn preamble(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> String {
        match kind {
            ArtifactKind::Enums => {
                let mut out = banner("#", ctx.source, "Enumerations of the C API");
                out.push_str("from ctypes import c_int\n");
                out
            }
            ArtifactKind::Ffi => {
                let mut out = banner("#", ctx.source, "Python ctypes interface to the C API");
                out.push_str("from ctypes import *  # noqa: F401,F403\n\n");
                out.push_str("from .enums import *  # noqa: F401,F403\n");
                if ctx.status_type.is_some() {
                    out.push_str("from .errors import _check_return_code\n");
                }
                for ty in ctx.registry.types() {
                    out.push_str(&format!("\n\nclass {}(Structure):\n    pass\n", ty.c_name));
                }
                out.push_str("\n\ndef set_interfaces(c_lib):\n");
                out.push_str("    \"\"\"Declare the signature of every C function on `c_lib`.\"\"\"\n");
                out
            }
            ArtifactKind::Bindings => {
                let mut out = banner("#", ctx.source, "Methods bound to each handle type");
                out.push_str("\"\"\"Methods of the handle types, as (member, C function) pairs.\"\"\"\n");
                out
            }
            ArtifactKind::Wrappers => String::new(),
        }
    }

    fn render_enum(&self, e: &CEnum) -> String {
        let mut out = format!("\n\nclass {}(c_int):\n", e.name);
        if e.enumerators.is_empty() {
            out.push_str("    pass\n");
        }
        for enumerator in &e.enumerators {
            out.push_str(&format!("    {} = {}\n", enumerator.name, enumerator.value));
        }
        out
    }

    fn render_function(
        &self,
        function: &CFunction,
        ctx: &RenderContext<'_>,
    ) -> Result<String, BindError> {
        let argtypes = ctx.mapper.map_args(function)?.join(", ");
        let restype = ctx.mapper.map_return_of(function)?;

        let mut out = format!("\n    # Function \"{}\", at {}\n", function.name, function.coord);
        out.push_str(&format!(
            "    c_lib.{}.argtypes = [{}]\n",
            function.name, argtypes
        ));
        out.push_str(&format!("    c_lib.{}.restype = {}\n", function.name, restype));

        let returns_status = function
            .return_type
            .as_type()
            .is_some_and(|ty| !ty.is_pointer() && Some(ty.name.as_str()) == ctx.status_type);
        if returns_status {
            out.push_str(&format!(
                "    c_lib.{}.errcheck = _check_return_code\n",
                function.name
            ));
        }

        Ok(out)
    }

    fn render_bound_type(&self, binding: &TypeBinding<'_>) -> String {
        let mut out = format!("\n\nclass {}(object):\n", binding.ty.name);
        if binding.methods.is_empty() {
            out.push_str("    METHODS = []\n");
            return out;
        }

        out.push_str("    METHODS = [\n");
        for method in &binding.methods {
            out.push_str(&format!(
                "        (\"{}\", \"{}\"),\n",
                method.name, method.function.name
            ));
        }
        out.push_str("    ]\n");
        out
    }

    fn free_functions_header(&self) -> String {
        "\n\nFREE_FUNCTIONS = [\n".to_string()
    }

    fn render_free_function(&self, function: &CFunction) -> String {
        format!("    \"{}\",\n", function.name)
    }

    fn free_functions_footer(&self) -> String {
        "]\n".to_string()
    }
}

//! Java declarations for JNA.
//!
//! Handles are `com.sun.jna.Pointer` and enums are plain `int` constants,
//! grouped in one nested class per C enum.

use crate::backend::{banner, escape_reserved, ArtifactKind, Backend, RenderContext};
use crate::bindings::types::{CEnum, CFunction, UNNAMED_ARGUMENT};
use crate::core::language::Language;
use crate::model::errors::BindError;
use crate::model::typemap::{BaseTypeTable, Dialect};

const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

/// Java backend.
pub struct Java;

impl Backend for Java {
    fn language(&self) -> Language {
        Language::Java
    }

    fn dialect(&self) -> Dialect {
        let types = BaseTypeTable::new()
            .with("void", "void")
            .with("float", "float")
            .with("double", "double")
            .with("int", "int")
            .with("size_t", "long")
            .with("int64_t", "long")
            .with("uint64_t", "long")
            .with("bool", "byte")
            .with("char", "byte")
            .with("char*", "byte[]")
            .with("const char*", "String")
            .with("float*", "float[]")
            .with("double*", "double[]")
            .with("const double*", "double[]")
            .with("int*", "int[]")
            .with("size_t*", "long[]")
            .with("const size_t*", "long[]")
            .with("uint64_t*", "long[]")
            .with("bool*", "byte[]")
            .with("void*", "Pointer")
            .with("const void*", "Pointer");

        Dialect {
            language: Language::Java,
            types,
            opaque: "Pointer".to_string(),
            enumeration: "int".to_string(),
            enum_pointer: "int[]".to_string(),
            raw_pointer: "Pointer".to_string(),
        }
    }

    fn file_name(&self, kind: ArtifactKind) -> Option<&'static str> {
        match kind {
            ArtifactKind::Enums => Some("Enums.java"),
            ArtifactKind::Ffi => Some("Lib.java"),
            ArtifactKind::Bindings | ArtifactKind::Wrappers => None,
        }
    }

    fn preamble(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> String {
        match kind {
            ArtifactKind::Enums => {
                let mut out = banner("//", ctx.source, "Enumerations of the C API");
                out.push_str("public final class Enums {\n");
                out.push_str("    private Enums() {}\n");
                out
            }
            _ => {
                let mut out = banner("//", ctx.source, "JNA interface to the C functions");
                out.push_str("import com.sun.jna.Library;\n");
                out.push_str("import com.sun.jna.Native;\n");
                out.push_str("import com.sun.jna.Pointer;\n\n");
                out.push_str("public interface Lib extends Library {\n");
                out.push_str(&format!(
                    "    Lib INSTANCE = Native.load(\"{}\", Lib.class);\n",
                    ctx.library
                ));
                out
            }
        }
    }

    fn postamble(&self, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Bindings => String::new(),
            _ => "}\n".to_string(),
        }
    }

    fn render_enum(&self, e: &CEnum) -> String {
        let mut out = format!("\n    /** enum {} */\n", e.name);
        out.push_str(&format!("    public static final class {} {{\n", e.name));
        out.push_str(&format!("        private {}() {{}}\n\n", e.name));
        for enumerator in &e.enumerators {
            out.push_str(&format!(
                "        public static final int {} = {};\n",
                enumerator.name, enumerator.value
            ));
        }
        out.push_str("    }\n");
        out
    }

    fn render_function(
        &self,
        function: &CFunction,
        ctx: &RenderContext<'_>,
    ) -> Result<String, BindError> {
        let types = ctx.mapper.map_args(function)?;
        let restype = ctx.mapper.map_return_of(function)?;

        let params = function
            .args
            .iter()
            .zip(&types)
            .enumerate()
            .map(|(i, (arg, ty))| {
                let name = if arg.name == UNNAMED_ARGUMENT {
                    format!("arg{}", i)
                } else {
                    escape_reserved(&arg.name, RESERVED, |n| format!("{}_", n)).into_owned()
                };
                format!("{} {}", ty, name)
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "\n    // Function \"{}\", at {}\n    {} {}({});\n",
            function.name, function.coord, restype, function.name, params
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{artifact, chemfiles_declarations, render_language};

    #[test]
    fn test_library_interface() {
        let decls = chemfiles_declarations();
        let lib = artifact(&render_language(Language::Java, &decls), "Lib.java");

        assert!(lib.contains("public interface Lib extends Library {\n"));
        assert!(lib.contains("    Lib INSTANCE = Native.load(\"chemfiles\", Lib.class);\n"));
        assert!(lib.contains("    int chfl_atom_mass(Pointer atom, double[] mass);\n"));
        assert!(lib.contains("    Pointer chfl_atom(String name);\n"));
        assert!(lib.contains("    void chfl_clear_errors();\n"));
        assert!(lib.contains("    int chfl_cell_shape(Pointer cell, int[] shape);\n"));
        assert!(lib.ends_with("}\n"));
    }

    #[test]
    fn test_enum_constants() {
        let decls = chemfiles_declarations();
        let enums = artifact(&render_language(Language::Java, &decls), "Enums.java");

        assert!(enums.contains("    public static final class chfl_cellshape {\n"));
        assert!(enums.contains("        public static final int CHFL_CELL_TRICLINIC = 1;\n"));
        assert!(enums.ends_with("    }\n}\n"));
    }
}

//! Fortran 2003 interfaces through `iso_c_binding`.
//!
//! Enums become `enum, bind(C)` blocks in `cenums.f90`, which the function
//! interfaces `include` where an enum type is needed. Opaque handles are
//! `type(c_ptr)` passed by value.
//!
//! `types.f90` is the module users compile: it includes the enums and the
//! interfaces, declares one derived type per handle and, after `contains`,
//! includes `wrappers.f90`. Each type-bound procedure points at a wrapper
//! named after its C function (`chfl_atom_mass`), which forwards to the
//! interface (`chfl_atom_mass_c`) with the handle pointer of `this`.

use crate::backend::{banner, ArtifactKind, Backend, RenderContext};
use crate::bindings::types::{CEnum, CFunction, ReturnType, UNNAMED_ARGUMENT};
use crate::core::language::Language;
use crate::core::registry::OpaqueType;
use crate::model::classify::{BoundMethod, TypeBinding};
use crate::model::errors::BindError;
use crate::model::typemap::{BaseTypeTable, Dialect};

const ENUMS_FILE: &str = "cenums.f90";
const INTERFACES_FILE: &str = "cdef.f90";
const WRAPPERS_FILE: &str = "wrappers.f90";

/// Passed-object dummy argument of every wrapper.
const THIS: &str = "this";

/// Result variable of wrappers that are functions.
const RESULT: &str = "res";

/// Attribute removed from a type used as a function result.
const VALUE_ATTRIBUTE: &str = ", value";

/// Fortran backend.
pub struct Fortran;

impl Backend for Fortran {
    fn language(&self) -> Language {
        Language::Fortran
    }

    fn dialect(&self) -> Dialect {
        let types = BaseTypeTable::new()
            .with("float", "real(kind=c_float), value")
            .with("double", "real(kind=c_double), value")
            .with("int", "integer(kind=c_int), value")
            .with("size_t", "integer(kind=c_size_t), value")
            .with("int64_t", "integer(kind=c_int64_t), value")
            .with("uint64_t", "integer(kind=c_int64_t), value")
            .with("bool", "logical(kind=c_bool), value")
            .with("char", "character(len=1, kind=c_char), value")
            .with("float*", "real(kind=c_float)")
            .with("double*", "real(kind=c_double)")
            .with("const double*", "real(kind=c_double), intent(in)")
            .with("int*", "integer(kind=c_int)")
            .with("size_t*", "integer(kind=c_size_t)")
            .with("const size_t*", "integer(kind=c_size_t), intent(in)")
            .with("uint64_t*", "integer(kind=c_int64_t)")
            .with("bool*", "logical(kind=c_bool)")
            .with("char*", "character(len=1, kind=c_char), dimension(*)")
            .with(
                "const char*",
                "character(len=1, kind=c_char), dimension(*), intent(in)",
            )
            .with("void*", "type(c_ptr), value")
            .with("const void*", "type(c_ptr), value");

        Dialect {
            language: Language::Fortran,
            types,
            opaque: "type(c_ptr), value".to_string(),
            enumeration: format!("include \"{}\"\n    integer(kind={{enum}}), value", ENUMS_FILE),
            enum_pointer: format!("include \"{}\"\n    integer(kind={{enum}})", ENUMS_FILE),
            raw_pointer: "type(c_ptr)".to_string(),
        }
    }

    fn file_name(&self, kind: ArtifactKind) -> Option<&'static str> {
        Some(match kind {
            ArtifactKind::Enums => ENUMS_FILE,
            ArtifactKind::Ffi => INTERFACES_FILE,
            ArtifactKind::Bindings => "types.f90",
            ArtifactKind::Wrappers => WRAPPERS_FILE,
        })
    }

    fn preamble(&self, kind: ArtifactKind, ctx: &RenderContext<'_>) -> String {
        match kind {
            ArtifactKind::Enums => banner("!", ctx.source, "Enumerations of the C API"),
            ArtifactKind::Ffi => {
                let mut out = banner("!", ctx.source, "Fortran interfaces to the C functions");
                out.push_str("interface\n");
                out
            }
            ArtifactKind::Bindings => {
                let mut out = banner("!", ctx.source, "Fortran types wrapping the C handles");
                out.push_str(&format!("module {}\n", module_name(ctx.library)));
                out.push_str("    use iso_c_binding\n");
                out.push_str("    implicit none\n");
                out.push_str("    private\n\n");
                out.push_str(&format!("    include \"{}\"\n", ENUMS_FILE));
                out.push_str(&format!("    include \"{}\"\n", INTERFACES_FILE));
                out
            }
            ArtifactKind::Wrappers => banner(
                "!",
                ctx.source,
                "Procedures behind the type-bound methods of types.f90",
            ),
        }
    }

    fn postamble(&self, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Ffi => "end interface\n".to_string(),
            ArtifactKind::Bindings => format!(
                "\ncontains\n    include \"{}\"\nend module\n",
                WRAPPERS_FILE
            ),
            _ => String::new(),
        }
    }

    fn render_enum(&self, e: &CEnum) -> String {
        let mut out = format!("\n! enum {}, at {}\n", e.name, e.coord);
        out.push_str(&format!("integer, parameter :: {} = c_int\n", e.name));
        out.push_str("enum, bind(C)\n");
        for enumerator in &e.enumerators {
            out.push_str(&format!(
                "    enumerator :: {} = {}\n",
                enumerator.name, enumerator.value
            ));
        }
        out.push_str("end enum\n");
        out
    }

    fn render_function(
        &self,
        function: &CFunction,
        ctx: &RenderContext<'_>,
    ) -> Result<String, BindError> {
        let mapper = &ctx.mapper;
        let result_name = format!("{}_c", function.name);
        let mut body = Declarations::default();

        // A function result never takes `value`; any pointer comes back as
        // a bare `c_ptr`.
        let is_subroutine = function.return_type.is_void();
        if !is_subroutine {
            let ret = if function.return_type.is_pointer() {
                mapper.dialect().raw_pointer.clone()
            } else {
                mapper.map_return_of(function)?
            };
            body.push(&ret.replace(VALUE_ATTRIBUTE, ""), &result_name);
        }

        let names = argument_names(function);
        for (name, ty) in names.iter().zip(mapper.map_args(function)?) {
            body.push(&ty, name);
        }

        let keyword = if is_subroutine { "subroutine" } else { "function" };
        Ok(format!(
            "! Function \"{name}\", at {coord}\n\
             {keyword} {name}_c({args}) bind(C, name=\"{name}\")\n\
             \x20   use iso_c_binding\n\
             \x20   implicit none\n\
             {body}\
             end {keyword}\n\n",
            name = function.name,
            coord = function.coord,
            keyword = keyword,
            args = names.join(", "),
            body = body,
        ))
    }

    fn render_bound_type(&self, binding: &TypeBinding<'_>) -> String {
        let mut out = format!("\ntype, public :: {}\n", type_name(binding.ty));
        out.push_str("    private\n");
        out.push_str("    type(c_ptr) :: ptr = c_null_ptr\n");
        if !binding.methods.is_empty() {
            out.push_str("contains\n");
        }
        for method in &binding.methods {
            out.push_str(&format!(
                "    procedure :: {} => {}\n",
                method.name, method.function.name
            ));
        }
        out.push_str("end type\n");
        out
    }

    fn free_functions_header(&self) -> String {
        "\n! Free functions\n".to_string()
    }

    fn render_free_function(&self, function: &CFunction) -> String {
        format!("public :: {}_c\n", function.name)
    }

    fn render_wrapper(
        &self,
        ty: &OpaqueType,
        method: &BoundMethod<'_>,
        ctx: &RenderContext<'_>,
    ) -> Result<String, BindError> {
        let function = method.function;
        let mapper = &ctx.mapper;
        let types = mapper.map_args(function)?;
        let names = argument_names(function);

        let constructs_this = matches!(
            &function.return_type,
            ReturnType::Type(ret) if ret.is_pointer() && ret.name == ty.c_name
        );
        // Methods get the handle of `this` as their first C argument;
        // constructors fill `this` from the returned handle instead.
        let receiver_first = !constructs_this
            && function
                .args
                .first()
                .is_some_and(|arg| arg.ty.name == ty.c_name);

        let this_intent = if constructs_this { "inout" } else { "in" };
        let mut dummies = vec![THIS.to_string()];
        let mut decls = vec![format!(
            "class({}), intent({}) :: {}",
            type_name(ty),
            this_intent,
            THIS
        )];
        let mut actuals = Vec::with_capacity(function.args.len());

        for (i, ((arg, name), mapped)) in function.args.iter().zip(&names).zip(&types).enumerate() {
            if i == 0 && receiver_first {
                actuals.push(format!("{}%ptr", THIS));
                continue;
            }
            match ctx.registry.by_c_name(&arg.ty.name) {
                Some(handle) => {
                    decls.push(format!("class({}), intent(in) :: {}", type_name(handle), name));
                    actuals.push(format!("{}%ptr", name));
                }
                None => {
                    decls.push(format!("{} :: {}", declaration(mapped), name));
                    actuals.push(name.clone());
                }
            }
            dummies.push(name.clone());
        }

        let call = format!("{}_c({})", function.name, actuals.join(", "));
        let (keyword, header, statement) = if constructs_this {
            ("subroutine", String::new(), format!("{}%ptr = {}", THIS, call))
        } else if function.return_type.is_void() {
            ("subroutine", String::new(), format!("call {}", call))
        } else {
            let ret = if function.return_type.is_pointer() {
                mapper.dialect().raw_pointer.clone()
            } else {
                mapper.map_return_of(function)?
            };
            decls.push(format!(
                "{} :: {}",
                declaration(&ret).replace(VALUE_ATTRIBUTE, ""),
                RESULT
            ));
            (
                "function",
                format!(" result({})", RESULT),
                format!("{} = {}", RESULT, call),
            )
        };

        let mut out = format!(
            "\n! {}%{}, at {}\n{} {}({}){}\n",
            ty.name,
            method.name,
            function.coord,
            keyword,
            function.name,
            dummies.join(", "),
            header
        );
        for decl in decls {
            out.push_str(&format!("    {}\n", decl));
        }
        out.push_str(&format!("\n    {}\nend {}\n", statement, keyword));
        Ok(out)
    }
}

/// Argument names, with positional names for unnamed arguments.
fn argument_names(function: &CFunction) -> Vec<String> {
    function
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            if arg.name == UNNAMED_ARGUMENT {
                format!("arg{}", i)
            } else {
                arg.name.clone()
            }
        })
        .collect()
}

/// The declaration line of a mapped type, without its `include` lines.
/// The module includes the enums once for every wrapper.
fn declaration(mapped: &str) -> &str {
    mapped.lines().last().map(str::trim).unwrap_or_default()
}

/// Module name for a library, e.g. `chemfiles`.
fn module_name(library: &str) -> String {
    library
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Name of the Fortran derived type wrapping a handle, e.g. `chfl_atom_t`.
fn type_name(ty: &OpaqueType) -> String {
    format!("{}_t", ty.c_name.to_lowercase())
}

/// Specification part of one interface body. Include lines are hoisted
/// and emitted once.
#[derive(Default)]
struct Declarations {
    includes: Vec<String>,
    entities: Vec<String>,
}

impl Declarations {
    fn push(&mut self, ty: &str, name: &str) {
        let mut lines: Vec<&str> = ty.lines().map(str::trim).collect();
        let decl = lines.pop().unwrap_or_default();
        for include in lines {
            if !self.includes.iter().any(|i| i == include) {
                self.includes.push(include.to_string());
            }
        }
        self.entities.push(format!("{} :: {}", decl, name));
    }
}

impl std::fmt::Display for Declarations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.includes.iter().chain(&self.entities) {
            writeln!(f, "    {}", line)?;
        }
        Ok(())
    }
}

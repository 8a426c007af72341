//! Mapping of C types to target-language type expressions.
//!
//! A [`Dialect`] carries one language's policy: its base-type table and the
//! templates used for opaque handles, enums and unresolved pointers. The
//! [`TypeMapper`] combines a dialect with the opaque registry and the enum
//! names of the header being processed.

use std::collections::{BTreeMap, BTreeSet};

use crate::bindings::types::{CFunction, CType, ReturnType};
use crate::core::language::Language;
use crate::core::registry::OpaqueRegistry;
use crate::model::errors::BindError;

/// Per-language lookup from a C type spelling to a target type expression.
///
/// Keys are either bare names (`double`) or fully qualified spellings
/// (`const char*`). Qualified entries are how a language gets pointer
/// semantics: the mapper never builds them itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTypeTable {
    entries: BTreeMap<String, String>,
}

impl BaseTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, c_type: impl Into<String>, target: impl Into<String>) {
        self.entries.insert(c_type.into(), target.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, c_type: &str, target: &str) -> Self {
        self.insert(c_type, target);
        self
    }

    /// Merge overrides into this table (overrides win).
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in entries {
            self.insert(k, v);
        }
    }

    /// Look up the qualified spelling first, then the bare name.
    pub fn lookup(&self, ty: &CType) -> Option<&str> {
        if ty.is_const || ty.is_pointer() {
            if let Some(target) = self.entries.get(&ty.spelling()) {
                return Some(target);
            }
        }
        self.entries.get(&ty.name).map(String::as_str)
    }
}

/// A language's type mapping policy.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub language: Language,
    /// Primitive types
    pub types: BaseTypeTable,
    /// Opaque handle expression, `{name}` is the C struct name
    pub opaque: String,
    /// Enum expression, `{enum}` is the C enum name
    pub enumeration: String,
    /// Expression for a pointer to an enum, used for out-parameters
    pub enum_pointer: String,
    /// Pointer whose pointee is unknown
    pub raw_pointer: String,
}

impl Dialect {
    /// Opaque handle expression for a C struct name.
    pub fn opaque_handle(&self, c_name: &str) -> String {
        self.opaque.replace("{name}", c_name)
    }

    /// Enum expression for a C enum name.
    pub fn enum_type(&self, name: &str) -> String {
        self.enumeration.replace("{enum}", name)
    }

    /// Expression for a pointer to a C enum.
    pub fn enum_pointer_type(&self, name: &str) -> String {
        self.enum_pointer.replace("{enum}", name)
    }
}

/// A type with no entry in a language's base-type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedType(pub CType);

/// Maps C types to one language's type expressions.
pub struct TypeMapper<'a> {
    dialect: &'a Dialect,
    registry: &'a OpaqueRegistry,
    enums: BTreeSet<&'a str>,
}

impl<'a> TypeMapper<'a> {
    pub fn new<I>(dialect: &'a Dialect, registry: &'a OpaqueRegistry, enums: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        TypeMapper {
            dialect,
            registry,
            enums: enums.into_iter().collect(),
        }
    }

    pub fn language(&self) -> Language {
        self.dialect.language
    }

    pub fn dialect(&self) -> &Dialect {
        self.dialect
    }

    /// Whether `name` is one of the header's enums.
    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    /// Map a C type.
    ///
    /// Opaque handles ignore their qualifiers; enums use the dialect's enum
    /// templates (value or pointer); everything else goes through the
    /// base-type table.
    pub fn map_type(&self, ty: &CType) -> Result<String, UnmappedType> {
        if let Some(opaque) = self.registry.by_c_name(&ty.name) {
            return Ok(self.dialect.opaque_handle(&opaque.c_name));
        }

        if self.is_enum(&ty.name) {
            return Ok(if ty.is_pointer() {
                self.dialect.enum_pointer_type(&ty.name)
            } else {
                self.dialect.enum_type(&ty.name)
            });
        }

        self.dialect
            .types
            .lookup(ty)
            .map(str::to_string)
            .ok_or_else(|| UnmappedType(ty.clone()))
    }

    /// Map a return type.
    pub fn map_return(&self, ret: &ReturnType) -> Result<String, UnmappedType> {
        match ret {
            ReturnType::Type(ty) => self.map_type(ty),
            ReturnType::UnresolvedPointer => Ok(self.dialect.raw_pointer.clone()),
        }
    }

    /// Map an argument or return type of `function`, reporting failures
    /// against that function.
    pub fn map_in(&self, function: &CFunction, ty: &CType) -> Result<String, BindError> {
        self.map_type(ty).map_err(|e| self.unknown(function, e))
    }

    /// Map the return type of `function`.
    pub fn map_return_of(&self, function: &CFunction) -> Result<String, BindError> {
        self.map_return(&function.return_type)
            .map_err(|e| self.unknown(function, e))
    }

    /// Map every argument of `function`, in order.
    pub fn map_args(&self, function: &CFunction) -> Result<Vec<String>, BindError> {
        function
            .args
            .iter()
            .map(|arg| self.map_in(function, &arg.ty))
            .collect()
    }

    fn unknown(&self, function: &CFunction, err: UnmappedType) -> BindError {
        BindError::UnknownType {
            type_name: err.0.spelling(),
            function: function.name.clone(),
            coord: function.coord.clone(),
            language: self.language(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::types::{CArgument, SourceCoord};
    use crate::core::registry::OpaqueType;

    fn dialect() -> Dialect {
        Dialect {
            language: Language::Fortran,
            types: BaseTypeTable::new()
                .with("double", "real(kind=c_double)")
                .with("int", "integer(kind=c_int)")
                .with("const char*", "character(len=1, kind=c_char), dimension(*)"),
            opaque: "type(c_ptr), value".to_string(),
            enumeration: "include \"cenums.f90\"\n    integer(kind={enum})".to_string(),
            enum_pointer: "include \"cenums.f90\"\n    integer(kind={enum}), intent(out)"
                .to_string(),
            raw_pointer: "type(c_ptr)".to_string(),
        }
    }

    fn registry() -> OpaqueRegistry {
        OpaqueRegistry::new("chfl_", vec![OpaqueType::new("Atom", "chfl_")]).unwrap()
    }

    #[test]
    fn test_opaque_ignores_qualifiers() {
        let d = dialect();
        let reg = registry();
        let mapper = TypeMapper::new(&d, &reg, []);

        let plain = mapper.map_type(&CType::pointer("CHFL_ATOM")).unwrap();
        let constant = mapper.map_type(&CType::const_pointer("CHFL_ATOM")).unwrap();
        let value = mapper.map_type(&CType::value("CHFL_ATOM")).unwrap();
        assert_eq!(plain, "type(c_ptr), value");
        assert_eq!(plain, constant);
        assert_eq!(plain, value);
    }

    #[test]
    fn test_enum_uses_dialect_template() {
        let d = dialect();
        let reg = registry();
        let mapper = TypeMapper::new(&d, &reg, ["chfl_cellshape"]);

        let mapped = mapper.map_type(&CType::value("chfl_cellshape")).unwrap();
        assert_eq!(
            mapped,
            "include \"cenums.f90\"\n    integer(kind=chfl_cellshape)"
        );

        let out = mapper.map_type(&CType::pointer("chfl_cellshape")).unwrap();
        assert!(out.ends_with("integer(kind=chfl_cellshape), intent(out)"));
    }

    #[test]
    fn test_qualified_entry_preferred_then_bare_name() {
        let d = dialect();
        let reg = registry();
        let mapper = TypeMapper::new(&d, &reg, []);

        assert_eq!(
            mapper.map_type(&CType::const_pointer("char")).unwrap(),
            "character(len=1, kind=c_char), dimension(*)"
        );
        // No `double*` entry: qualifiers are not combined into the result.
        assert_eq!(
            mapper.map_type(&CType::pointer("double")).unwrap(),
            "real(kind=c_double)"
        );
    }

    #[test]
    fn test_mapping_is_referentially_transparent() {
        let d = dialect();
        let reg = registry();
        let mapper = TypeMapper::new(&d, &reg, []);
        let ty = CType::value("double");
        assert_eq!(mapper.map_type(&ty), mapper.map_type(&ty));
    }

    #[test]
    fn test_unknown_type_reports_function() {
        let d = dialect();
        let reg = registry();
        let mapper = TypeMapper::new(&d, &reg, []);

        let function = CFunction::new("chfl_trajectory_from_file", ReturnType::UnresolvedPointer)
            .at(SourceCoord::new("chemfiles.h", 12))
            .with_arg(CArgument::new("file", CType::pointer("FILE")));

        let err = mapper.map_args(&function).unwrap_err();
        assert_eq!(
            err,
            BindError::UnknownType {
                type_name: "FILE*".to_string(),
                function: "chfl_trajectory_from_file".to_string(),
                coord: SourceCoord::new("chemfiles.h", 12),
                language: Language::Fortran,
            }
        );
    }

    #[test]
    fn test_unresolved_pointer_return() {
        let d = dialect();
        let reg = registry();
        let mapper = TypeMapper::new(&d, &reg, []);
        assert_eq!(
            mapper.map_return(&ReturnType::UnresolvedPointer).unwrap(),
            "type(c_ptr)"
        );
    }
}

//! Declaration model for a parsed C header.
//!
//! These types hold what the header reader extracts: functions with their
//! arguments and return types, and enums with their explicit values.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name given to arguments that have no name in the prototype.
pub const UNNAMED_ARGUMENT: &str = "void";

/// The declarations read from one C header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Declarations {
    /// Source file path
    #[serde(default)]
    pub source: PathBuf,

    /// Function prototypes, in header order
    #[serde(default)]
    pub functions: Vec<CFunction>,

    /// Enumerations, in header order
    #[serde(default)]
    pub enums: Vec<CEnum>,
}

impl Declarations {
    /// Create an empty declaration set for the given header.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Declarations {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Look up an enum by name.
    pub fn find_enum(&self, name: &str) -> Option<&CEnum> {
        self.enums.iter().find(|e| e.name == name)
    }
}

/// Where a declaration was found, used in generated comments and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceCoord {
    pub file: String,
    pub line: usize,
}

impl SourceCoord {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        SourceCoord {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A C function declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CFunction {
    /// Function name
    pub name: String,

    /// Location of the prototype
    #[serde(default)]
    pub coord: SourceCoord,

    /// Arguments, in declaration order
    #[serde(default)]
    pub args: Vec<CArgument>,

    /// Return type
    pub return_type: ReturnType,
}

impl CFunction {
    /// Create a new function with the given name and return type.
    pub fn new(name: impl Into<String>, return_type: ReturnType) -> Self {
        CFunction {
            name: name.into(),
            coord: SourceCoord::default(),
            args: Vec::new(),
            return_type,
        }
    }

    /// Set the source coordinate.
    pub fn at(mut self, coord: SourceCoord) -> Self {
        self.coord = coord;
        self
    }

    /// Add an argument.
    pub fn with_arg(mut self, arg: CArgument) -> Self {
        self.args.push(arg);
        self
    }
}

/// A function argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CArgument {
    /// Argument name, `void` when the prototype leaves it unnamed
    pub name: String,

    /// Argument type
    #[serde(rename = "type")]
    pub ty: CType,
}

impl CArgument {
    /// Create a new argument. An empty name becomes [`UNNAMED_ARGUMENT`].
    pub fn new(name: impl Into<String>, ty: CType) -> Self {
        let name = name.into();
        CArgument {
            name: if name.is_empty() {
                UNNAMED_ARGUMENT.to_string()
            } else {
                name
            },
            ty,
        }
    }
}

/// Return type of a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// A type the reader could resolve
    Type(CType),
    /// A pointer whose pointee could not be resolved to a plain type
    UnresolvedPointer,
}

impl ReturnType {
    /// The resolved type, if any.
    pub fn as_type(&self) -> Option<&CType> {
        match self {
            ReturnType::Type(ty) => Some(ty),
            ReturnType::UnresolvedPointer => None,
        }
    }

    /// Whether the function returns a pointer (resolved or not).
    pub fn is_pointer(&self) -> bool {
        match self {
            ReturnType::Type(ty) => ty.is_pointer(),
            ReturnType::UnresolvedPointer => true,
        }
    }

    /// Whether the function returns `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, ReturnType::Type(ty) if ty.is_void())
    }
}

/// A C type: a base name with const and pointer qualifiers.
///
/// Typedefs are already resolved by the reader, so `name` is either a
/// primitive (`int`, `double`, `size_t`), an opaque struct name or an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CType {
    /// Base type name
    pub name: String,

    /// `const` appears somewhere in the declaration
    #[serde(default)]
    pub is_const: bool,

    /// Number of `*`
    #[serde(default)]
    pub pointers: u8,
}

impl CType {
    /// A plain value type.
    pub fn value(name: impl Into<String>) -> Self {
        CType {
            name: name.into(),
            is_const: false,
            pointers: 0,
        }
    }

    /// A mutable pointer to `name`.
    pub fn pointer(name: impl Into<String>) -> Self {
        CType {
            name: name.into(),
            is_const: false,
            pointers: 1,
        }
    }

    /// A pointer to const `name`.
    pub fn const_pointer(name: impl Into<String>) -> Self {
        CType {
            name: name.into(),
            is_const: true,
            pointers: 1,
        }
    }

    /// Parse a C type spelling such as `const char*` or `unsigned int`.
    pub fn parse(s: &str) -> Self {
        let pointers = s.chars().filter(|&c| c == '*').count() as u8;
        let mut is_const = false;
        let spaced = s.replace('*', " ");
        let mut words = Vec::new();
        for word in spaced.split_whitespace() {
            match word {
                "const" => is_const = true,
                "struct" | "enum" | "volatile" | "restrict" => {}
                other => words.push(other),
            }
        }

        CType {
            name: words.join(" "),
            is_const,
            pointers,
        }
    }

    /// Check if this is a pointer type.
    pub fn is_pointer(&self) -> bool {
        self.pointers > 0
    }

    /// Check if this is `void` (not `void*`).
    pub fn is_void(&self) -> bool {
        self.name == "void" && self.pointers == 0
    }

    /// Canonical C spelling, e.g. `const char*` or `double**`.
    pub fn spelling(&self) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(&self.name);
        for _ in 0..self.pointers {
            out.push('*');
        }
        out
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling())
    }
}

/// A C enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CEnum {
    /// Enum name
    pub name: String,

    /// Enumerators, in declaration order
    pub enumerators: Vec<CEnumerator>,

    /// Location of the declaration
    #[serde(default)]
    pub coord: SourceCoord,
}

impl CEnum {
    /// Create a new enum.
    pub fn new(name: impl Into<String>) -> Self {
        CEnum {
            name: name.into(),
            enumerators: Vec::new(),
            coord: SourceCoord::default(),
        }
    }

    /// Add an enumerator.
    pub fn with_enumerator(mut self, name: impl Into<String>, value: i64) -> Self {
        self.enumerators.push(CEnumerator {
            name: name.into(),
            value,
        });
        self
    }

    /// Whether any enumerator is negative, ruling out unsigned carriers.
    pub fn is_signed(&self) -> bool {
        self.enumerators.iter().any(|e| e.value < 0)
    }
}

/// An enumerator with its literal value from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CEnumerator {
    pub name: String,
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctype_parse() {
        assert_eq!(CType::parse("int"), CType::value("int"));
        assert_eq!(CType::parse("const char*"), CType::const_pointer("char"));
        assert_eq!(CType::parse("char * const"), CType::const_pointer("char"));
        assert_eq!(CType::parse("CHFL_ATOM *"), CType::pointer("CHFL_ATOM"));
        assert_eq!(CType::parse("unsigned int").name, "unsigned int");
        assert_eq!(CType::parse("struct CHFL_FRAME*").name, "CHFL_FRAME");

        let wide = CType::parse("const unsigned long long *");
        assert_eq!(wide.name, "unsigned long long");
        assert!(wide.is_const);
        assert_eq!(wide.pointers, 1);

        let double_ptr = CType::parse("char**");
        assert_eq!(double_ptr.pointers, 2);
        assert!(!double_ptr.is_const);
    }

    #[test]
    fn test_ctype_spelling() {
        assert_eq!(CType::const_pointer("char").spelling(), "const char*");
        assert_eq!(CType::parse("double **").spelling(), "double**");
        assert_eq!(CType::value("size_t").to_string(), "size_t");
    }

    #[test]
    fn test_unnamed_argument_gets_sentinel() {
        let arg = CArgument::new("", CType::value("int"));
        assert_eq!(arg.name, UNNAMED_ARGUMENT);
    }

    #[test]
    fn test_return_type_queries() {
        assert!(ReturnType::UnresolvedPointer.is_pointer());
        assert!(ReturnType::Type(CType::value("void")).is_void());
        assert!(!ReturnType::Type(CType::pointer("void")).is_void());
    }

    #[test]
    fn test_declarations_json_round_trip_keeps_order() {
        let mut decls = Declarations::new("chemfiles.h");
        decls.functions.push(
            CFunction::new("chfl_atom", ReturnType::Type(CType::pointer("CHFL_ATOM")))
                .with_arg(CArgument::new("name", CType::const_pointer("char"))),
        );
        decls
            .enums
            .push(CEnum::new("chfl_status").with_enumerator("CHFL_SUCCESS", 0));

        let json = serde_json::to_string(&decls).unwrap();
        let back: Declarations = serde_json::from_str(&json).unwrap();
        assert_eq!(back.functions, decls.functions);
        assert_eq!(back.enums, decls.enums);
    }
}

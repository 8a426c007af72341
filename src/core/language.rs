//! Target languages for binding generation.

use serde::{Deserialize, Serialize};

/// Supported binding target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Fortran 2003 with `iso_c_binding`
    #[serde(alias = "f90", alias = "f03")]
    Fortran,

    /// Python ctypes
    #[serde(alias = "py")]
    Python,

    /// Julia `ccall`
    #[serde(alias = "jl")]
    Julia,

    /// Rust `extern "C"` declarations
    #[serde(alias = "rs")]
    Rust,

    /// Java JNA interface
    Java,
}

impl Language {
    /// All languages, in output order.
    pub const ALL: [Language; 5] = [
        Language::Fortran,
        Language::Python,
        Language::Julia,
        Language::Rust,
        Language::Java,
    ];

    /// Directory name used for this language's artifacts.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Language::Fortran => "fortran",
            Language::Python => "python",
            Language::Julia => "julia",
            Language::Rust => "rust",
            Language::Java => "java",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fortran" | "f90" | "f03" => Ok(Language::Fortran),
            "python" | "py" => Ok(Language::Python),
            "julia" | "jl" => Ok(Language::Julia),
            "rust" | "rs" => Ok(Language::Rust),
            "java" => Ok(Language::Java),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid language string.
#[derive(Debug, Clone)]
pub struct LanguageParseError(pub String);

impl std::fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid language '{}', valid values: fortran, python, julia, rust, java",
            self.0
        )
    }
}

impl std::error::Error for LanguageParseError {}

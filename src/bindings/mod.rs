//! C header declarations.
//!
//! This module provides the declaration model and the reader that
//! extracts it from a C header file.

pub mod parser;
pub mod types;

pub use parser::HeaderParser;
pub use types::{
    CArgument, CEnum, CEnumerator, CFunction, CType, Declarations, ReturnType, SourceCoord,
};

//! flatbind - binding generator for flat C APIs
//!
//! Reads a C header built around opaque handles (`CHFL_ATOM*`) and emits
//! bindings for Fortran, Python, Julia, Rust and Java. Functions are bound
//! to the handle type their name starts with; types are translated through
//! a per-language mapping table.

pub mod backend;
pub mod bindings;
pub mod core;
pub mod model;
pub mod ops;
pub mod util;

/// Shared fixtures for the unit tests.
///
/// This module is only available when compiling with `--cfg test`.
#[cfg(test)]
pub mod test_support;

pub use self::bindings::{Declarations, HeaderParser};
pub use self::core::{Language, OpaqueRegistry, OpaqueType};
pub use model::{BindError, BindingModel, Classification, Classifier, TypeMapper};
pub use util::config::Config;

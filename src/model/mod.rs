//! Language-agnostic binding model.
//!
//! The classifier decides which functions become methods of which opaque
//! type; the type mapper turns C types into target-language expressions.
//! Both are pure and built from explicit configuration values.

pub mod classify;
pub mod errors;
pub mod typemap;

pub use classify::{BindingModel, BoundMethod, Classification, Classifier, TypeBinding};
pub use errors::BindError;
pub use typemap::{BaseTypeTable, Dialect, TypeMapper, UnmappedType};

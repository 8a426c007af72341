//! Core types shared by the binding model and the backends.

pub mod language;
pub mod registry;

pub use language::Language;
pub use registry::{OpaqueRegistry, OpaqueType};

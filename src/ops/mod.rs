//! High-level operations.
//!
//! This module contains the implementation of flatbind commands.

pub mod generate;
pub mod inspect;

pub use generate::{
    generate, load_declarations, render_language, GenerateOptions, GenerateReport,
    LanguageReport, DEFAULT_OUT_DIR,
};
pub use inspect::{format_text, inspect, InspectFormat};

//! Test utilities shared by the unit tests.
//!
//! Everything here builds on the chemfiles fixture header: the registry
//! and free functions that describe it, its parsed declarations, and
//! helpers rendering it through one or every backend.

pub mod fixtures;

use std::path::Path;

pub use fixtures::*;

use crate::backend::Artifact;
use crate::bindings::parser::HeaderParser;
use crate::bindings::types::Declarations;
use crate::core::language::Language;
use crate::core::registry::{OpaqueRegistry, OpaqueType};
use crate::model::classify::Classifier;
use crate::ops::generate::render_language as render_with_config;
use crate::util::config::Config;

/// Registry of the chemfiles opaque types, `Property` receiving the
/// property accessors.
pub fn chemfiles_registry() -> OpaqueRegistry {
    let types = CHEMFILES_TYPES
        .iter()
        .map(|name| OpaqueType::new(*name, "chfl_"))
        .collect();

    OpaqueRegistry::new("chfl_", types)
        .expect("chemfiles prefixes are distinct")
        .with_property_type("Property")
        .expect("Property is registered")
}

/// [`CHEMFILES_HEADER`], parsed as `chemfiles.h`.
pub fn chemfiles_declarations() -> Declarations {
    HeaderParser::new()
        .with_ignore_tokens(vec!["CHFL_EXPORT".to_string()])
        .parse_content(CHEMFILES_HEADER, Path::new("chemfiles.h"))
        .expect("fixture header parses")
}

/// Configuration describing the fixture header.
pub fn chemfiles_config() -> Config {
    let mut config = Config::default();
    config.api.free_functions = CHEMFILES_FREE.iter().map(|s| s.to_string()).collect();
    config
}

/// Render `decls` for one language with [`chemfiles_config`].
pub fn render_language(language: Language, decls: &Declarations) -> Vec<Artifact> {
    let config = chemfiles_config();
    let registry = chemfiles_registry();
    let model = Classifier::new(&registry, CHEMFILES_FREE).build(&decls.functions);

    render_with_config(language, decls, &model, &registry, &config)
        .unwrap_or_else(|e| panic!("rendering {} failed: {}", language, e))
}

/// Render `decls` for every language.
pub fn render_all(decls: &Declarations) -> Vec<(Language, Vec<Artifact>)> {
    Language::ALL
        .iter()
        .map(|&lang| (lang, render_language(lang, decls)))
        .collect()
}

/// Contents of the artifact named `name`.
pub fn artifact(artifacts: &[Artifact], name: &str) -> String {
    artifacts
        .iter()
        .find(|a| a.path == Path::new(name))
        .map(|a| a.contents.clone())
        .unwrap_or_else(|| panic!("no artifact named {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_header_parses() {
        let decls = chemfiles_declarations();
        assert_eq!(decls.enums.len(), 2);
        assert_eq!(decls.functions.len(), 17);
        assert_eq!(decls.functions[0].name, "chfl_version");
    }

    #[test]
    fn test_every_backend_renders_the_fixture() {
        let decls = chemfiles_declarations();
        for (lang, artifacts) in render_all(&decls) {
            assert!(artifacts.len() >= 2, "{} rendered {:?}", lang, artifacts);
        }
    }
}

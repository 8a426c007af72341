//! Implementation of `flatbind inspect`.
//!
//! Shows how a header is classified without rendering any backend: the
//! bound methods of every opaque type, the free functions, the functions
//! no type claims, and the enums.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::bindings::types::{CEnum, Declarations};
use crate::model::classify::{BindingModel, Classifier};
use crate::ops::generate::load_declarations;
use crate::util::config::Config;

/// Output format for `inspect`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct InspectJson<'a> {
    source: String,
    #[serde(flatten)]
    model: &'a BindingModel<'a>,
    enums: &'a [CEnum],
}

/// Classify the declarations in `input` and describe the result.
pub fn inspect(config: &Config, input: &Path, format: InspectFormat) -> Result<String> {
    let decls = load_declarations(input, config)?;
    let registry = config.api.registry()?;
    let model =
        Classifier::new(&registry, config.api.free_functions.iter().cloned()).build(&decls.functions);

    match format {
        InspectFormat::Text => Ok(format_text(&decls, &model)),
        InspectFormat::Json => {
            let json = InspectJson {
                source: decls.source.display().to_string(),
                model: &model,
                enums: &decls.enums,
            };
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

/// Human-readable summary of a binding model.
pub fn format_text(decls: &Declarations, model: &BindingModel<'_>) -> String {
    let mut out = String::new();
    let width = decls
        .functions
        .iter()
        .map(|f| f.name.len())
        .chain(model.types.iter().flat_map(|t| t.methods.iter().map(|m| m.name.len())))
        .max()
        .unwrap_or(0);

    let _ = writeln!(
        out,
        "{}: {} functions, {} enums",
        decls.source.display(),
        decls.functions.len(),
        decls.enums.len()
    );

    for binding in &model.types {
        let _ = writeln!(out, "\n{} ({})", binding.ty.name, binding.ty.c_name);
        if binding.methods.is_empty() {
            let _ = writeln!(out, "    (no methods)");
        }
        for method in &binding.methods {
            let _ = writeln!(
                out,
                "    {:<width$}  {}",
                method.name,
                method.function.name,
                width = width
            );
        }
    }

    let _ = writeln!(out, "\nfree functions");
    for function in &model.free {
        let _ = writeln!(out, "    {}", function.name);
    }

    if !model.dropped.is_empty() {
        let _ = writeln!(out, "\ndropped functions");
        for function in &model.dropped {
            let _ = writeln!(
                out,
                "    {:<width$}  {}",
                function.name,
                function.coord,
                width = width
            );
        }
    }

    if !decls.enums.is_empty() {
        let _ = writeln!(out, "\nenums");
        for e in &decls.enums {
            let _ = writeln!(out, "    {} ({} values)", e.name, e.enumerators.len());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chemfiles_config, CHEMFILES_HEADER};

    fn header() -> (tempfile::TempDir, std::path::PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("chemfiles.h");
        std::fs::write(&path, CHEMFILES_HEADER).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_text_output() {
        let (_tmp, path) = header();
        let text = inspect(&chemfiles_config(), &path, InspectFormat::Text).unwrap();

        assert!(text.contains("17 functions, 2 enums"));
        assert!(text.contains("\nAtom (CHFL_ATOM)\n"));
        assert!(text.contains("\nSelection (CHFL_SELECTION)\n    (no methods)\n"));
        assert!(text.contains("\nfree functions\n    chfl_version\n    chfl_clear_errors\n"));
        assert!(text.contains("\ndropped functions\n    chfl_guess_format"));
        assert!(text.contains("    chfl_cellshape (3 values)\n"));
    }

    #[test]
    fn test_json_output() {
        let (_tmp, path) = header();
        let json = inspect(&chemfiles_config(), &path, InspectFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["free"][0], "chfl_version");
        assert_eq!(value["dropped"][0], "chfl_guess_format");
        assert_eq!(value["types"][2]["type"]["name"], "Atom");
        assert_eq!(value["types"][2]["methods"][0]["name"], "init");
        assert_eq!(value["types"][2]["methods"][0]["function"], "chfl_atom");
        assert_eq!(value["enums"][0]["name"], "chfl_status");
    }
}
